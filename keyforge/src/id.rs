//! Entity identifier generation.

use rand::{RngCore, rngs::OsRng};

/// The number of random bytes in an entity identifier.
const ID_LENGTH: usize = 5;

/// Generates a fresh entity identifier.
///
/// Identifiers are the lowercase hex encoding of [`ID_LENGTH`] bytes from the
/// operating system's cryptographically secure random source.
pub(crate) fn generate_entity_id() -> String {
    let mut bytes = [0u8; ID_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_are_short_lowercase_hex() {
        let id = generate_entity_id();
        assert_eq!(id.len(), 2 * ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
        assert_ne!(id, generate_entity_id());
    }
}
