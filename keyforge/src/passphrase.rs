//! Passphrase handling.

use std::fmt::Display;

use rand::{Rng, distributions::Alphanumeric, thread_rng};
use secrecy::{ExposeSecret, SecretString};

/// A secret passphrase used to protect exported private keys.
///
/// The passphrase is held by a [`SecretString`], which guarantees zeroing of memory on
/// destruct.
/// [`Display`] is redacted, so a passphrase never leaks through log output.
///
/// # Examples
///
/// ```
/// use keyforge::Passphrase;
///
/// let passphrase = Passphrase::new("a-secret-passphrase".to_string());
/// assert_eq!(passphrase.to_string(), "[REDACTED]");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Passphrase(SecretString);

impl Passphrase {
    /// The default length of generated passphrases.
    pub const DEFAULT_LENGTH: usize = 30;

    /// Creates a new [`Passphrase`] from an owned [`String`].
    pub fn new(passphrase: String) -> Self {
        Self(SecretString::new(passphrase.into()))
    }

    /// Generates a new alphanumeric [`Passphrase`].
    ///
    /// The passphrase is `length` characters long, but never shorter than
    /// [`Self::DEFAULT_LENGTH`].
    pub fn generate(length: Option<usize>) -> Self {
        let length = length
            .unwrap_or(Self::DEFAULT_LENGTH)
            .max(Self::DEFAULT_LENGTH);
        Self::new(
            thread_rng()
                .sample_iter(&Alphanumeric)
                .take(length)
                .map(char::from)
                .collect(),
        )
    }

    /// Exposes the secret passphrase as borrowed [`str`].
    pub fn expose_borrowed(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Display for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl From<&str> for Passphrase {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<String> for Passphrase {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
