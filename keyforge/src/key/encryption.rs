//! Legacy RFC 1423 encryption of PEM block bodies.
//!
//! Encrypted PKCS#1 and SEC1 PEM blocks carry `Proc-Type: 4,ENCRYPTED` and a
//! `DEK-Info` header naming the cipher and the initialization vector.
//! The encryption key is derived from the passphrase and the first eight bytes of the
//! initialization vector using the single-round MD5 scheme of OpenSSL's
//! `EVP_BytesToKey`.

use aes::{
    Aes128,
    Aes256,
    cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7},
};
use md5::{Digest, Md5};
use rand::{RngCore, rngs::OsRng};
use zeroize::{Zeroize, Zeroizing};

use crate::error::ValidationError;

/// The PEM header marking a block as encrypted.
pub(crate) const PROC_TYPE_HEADER: &str = "Proc-Type";

/// The value of the `Proc-Type` header for encrypted blocks.
pub(crate) const PROC_TYPE_ENCRYPTED: &str = "4,ENCRYPTED";

/// The PEM header naming the cipher and initialization vector.
pub(crate) const DEK_INFO_HEADER: &str = "DEK-Info";

/// The cipher used for newly encrypted blocks.
const ENCRYPTION_CIPHER: &str = "AES-256-CBC";

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Derives an encryption key from a passphrase and salt.
///
/// Implements the MD5 based `EVP_BytesToKey` derivation with an iteration count of
/// one, as used by RFC 1423 style PEM encryption.
fn bytes_to_key(passphrase: &[u8], salt: &[u8], key: &mut [u8]) {
    let mut previous: Option<md5::digest::Output<Md5>> = None;
    let mut written = 0;
    while written < key.len() {
        let mut hasher = Md5::new();
        if let Some(digest) = &previous {
            hasher.update(digest);
        }
        hasher.update(passphrase);
        hasher.update(salt);
        let digest = hasher.finalize();
        let take = (key.len() - written).min(digest.len());
        key[written..written + take].copy_from_slice(&digest[..take]);
        previous = Some(digest);
        written += take;
    }
}

/// Encrypts a PEM block body with AES-256-CBC.
///
/// Returns the `DEK-Info` header value and the ciphertext.
/// The initialization vector is freshly generated and its first eight bytes double as
/// the key derivation salt.
pub(crate) fn encrypt_body(plaintext: &[u8], passphrase: &[u8]) -> (String, Vec<u8>) {
    let mut iv = [0u8; 16];
    OsRng.fill_bytes(&mut iv);

    let mut key = [0u8; 32];
    bytes_to_key(passphrase, &iv[..8], &mut key);
    let ciphertext =
        Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    key.zeroize();

    (
        format!("{ENCRYPTION_CIPHER},{}", hex::encode_upper(iv)),
        ciphertext,
    )
}

/// Decrypts a PEM block body according to its `DEK-Info` header.
///
/// # Errors
///
/// Returns an error if the header is malformed, names an unsupported cipher, or the
/// ciphertext does not decrypt cleanly under the passphrase.
pub(crate) fn decrypt_body(
    dek_info: &str,
    ciphertext: &[u8],
    passphrase: &[u8],
) -> Result<Zeroizing<Vec<u8>>, ValidationError> {
    let malformed = || ValidationError::MalformedDekInfo {
        dek_info: dek_info.to_string(),
    };
    let (cipher, iv_hex) = dek_info.split_once(',').ok_or_else(malformed)?;
    let iv: [u8; 16] = hex::decode(iv_hex.trim())
        .map_err(|_| malformed())?
        .try_into()
        .map_err(|_| malformed())?;

    let plaintext = match cipher {
        "AES-256-CBC" => {
            let mut key = [0u8; 32];
            bytes_to_key(passphrase, &iv[..8], &mut key);
            let result = Aes256CbcDec::new(&key.into(), &iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext);
            key.zeroize();
            result
        }
        "AES-128-CBC" => {
            let mut key = [0u8; 16];
            bytes_to_key(passphrase, &iv[..8], &mut key);
            let result = Aes128CbcDec::new(&key.into(), &iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext);
            key.zeroize();
            result
        }
        _ => {
            return Err(ValidationError::UnsupportedPemCipher {
                cipher: cipher.to_string(),
            });
        }
    };

    plaintext
        .map(Zeroizing::new)
        .map_err(|_| ValidationError::Decrypt)
}
