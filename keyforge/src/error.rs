//! Error handling for the entity object model.

use keyforge_engine::{EngineError, TransportError};

use crate::key::{ExportType, KeyAlgorithm};

/// An error that may occur when operating on keys, signing requests or certificates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller-supplied parameter is missing or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An operation was attempted in a state or combination it does not support.
    #[error(transparent)]
    State(#[from] StateError),

    /// The external engine reported a structured failure.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The external engine could not be driven to a structured result.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<keyforge_engine::Error> for Error {
    /// Splits an engine crate error into the matching taxonomy branch.
    fn from(error: keyforge_engine::Error) -> Self {
        match error {
            keyforge_engine::Error::Engine(error) => Self::Engine(error),
            keyforge_engine::Error::Transport(error) => Self::Transport(error),
        }
    }
}

/// A caller-supplied parameter is missing or malformed.
///
/// Validation errors are raised before any engine or local cryptography call.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A modulus length is required but missing.
    #[error("A modulus length is required to create a {algorithm} key")]
    ModulusLengthRequired {
        /// The algorithm of the key that should be created.
        algorithm: KeyAlgorithm,
    },

    /// A divisor length is required but missing.
    #[error("A divisor length is required to create a {algorithm} key")]
    DivisorLengthRequired {
        /// The algorithm of the key that should be created.
        algorithm: KeyAlgorithm,
    },

    /// A named curve is required but missing.
    #[error("A named curve is required to create a {algorithm} key")]
    CurveRequired {
        /// The algorithm of the key that should be created.
        algorithm: KeyAlgorithm,
    },

    /// A parameter was supplied that the algorithm does not use.
    #[error("The parameter {parameter} does not apply to {algorithm} keys")]
    ParameterUnsupported {
        /// The algorithm of the key that should be created.
        algorithm: KeyAlgorithm,

        /// The name of the offending parameter.
        parameter: &'static str,
    },

    /// Local generation is not available for the algorithm.
    #[error("Local generation of {algorithm} keys is not supported")]
    UnsupportedGeneration {
        /// The algorithm of the key that should be created.
        algorithm: KeyAlgorithm,
    },

    /// The DSA parameter combination is not supported.
    #[error(
        "Unsupported DSA parameter combination of {modulus_bits} modulus bits and {divisor_bits} divisor bits"
    )]
    UnsupportedDsaParameters {
        /// The requested modulus length in bits.
        modulus_bits: u32,

        /// The requested divisor length in bits.
        divisor_bits: u32,
    },

    /// A DER import is missing its key header type.
    #[error("DER import requires a key header type (pkcs1 or sec1)")]
    DerHeaderRequired,

    /// A passphrase was supplied for a DER import.
    #[error("DER encoded keys can not be passphrase protected")]
    DerPassphraseUnsupported,

    /// A passphrase is required to decrypt the key but missing.
    #[error("A passphrase is required to decrypt the key")]
    PassphraseRequired,

    /// The key could not be decrypted with the supplied passphrase.
    #[error("Unable to decrypt the key with the supplied passphrase")]
    Decrypt,

    /// A PEM block carries an unsupported label.
    #[error("Unsupported PEM block label: {label}")]
    UnsupportedPemLabel {
        /// The label of the offending PEM block.
        label: String,
    },

    /// An encrypted PEM block carries a malformed `DEK-Info` header.
    #[error("Malformed DEK-Info header in encrypted PEM block: {dek_info}")]
    MalformedDekInfo {
        /// The value of the offending header.
        dek_info: String,
    },

    /// An encrypted PEM block uses an unsupported cipher.
    #[error("Unsupported PEM encryption cipher: {cipher}")]
    UnsupportedPemCipher {
        /// The cipher named by the `DEK-Info` header.
        cipher: String,
    },

    /// Import is not supported for the key algorithm.
    #[error("Import of {algorithm} keys is not supported")]
    UnsupportedImport {
        /// The algorithm of the offending key.
        algorithm: KeyAlgorithm,
    },

    /// A PKCS#8 document carries an unsupported key algorithm.
    #[error("Unsupported PKCS#8 key algorithm: {oid}")]
    UnsupportedPkcs8Algorithm {
        /// The object identifier of the offending algorithm.
        oid: String,
    },

    /// An export type is outside the algorithm's compatibility table.
    #[error("A {export_type} export of a {algorithm} key is not supported")]
    ExportTypeUnsupported {
        /// The algorithm of the key that should be exported.
        algorithm: KeyAlgorithm,

        /// The requested export type.
        export_type: ExportType,
    },

    /// The subject common name of a signing request is missing.
    #[error("The subject common name must not be empty")]
    CommonNameRequired,

    /// A signing request was attempted with an unsupported key algorithm.
    #[error("Certificate signing requests require an RSA or EC key, not {algorithm}")]
    CsrKeyAlgorithm {
        /// The algorithm of the offending key.
        algorithm: KeyAlgorithm,
    },

    /// An RSA operation failed.
    #[error("RSA error: {0}")]
    Rsa(#[from] rsa::Error),

    /// A PKCS#1 document could not be processed.
    #[error("PKCS#1 error: {0}")]
    Pkcs1(#[from] rsa::pkcs1::Error),

    /// A PKCS#8 document could not be processed.
    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] pkcs8::Error),

    /// A DER document could not be processed.
    #[error("DER error: {0}")]
    Der(#[from] pkcs8::der::Error),

    /// An elliptic curve key could not be processed.
    #[error("Elliptic curve error: {0}")]
    EllipticCurve(#[from] p256::elliptic_curve::Error),

    /// A PEM document could not be processed.
    #[error("PEM error: {0}")]
    Pem(#[from] pem::PemError),
}

/// An operation was attempted in a state or combination it does not support.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// An encrypted export was requested for a DER type without an encrypted form.
    #[error("{export_type} DER has no standard passphrase protected form")]
    EncryptedDerExport {
        /// The requested export type.
        export_type: ExportType,
    },
}
