//! A command bridge to an external cryptographic engine process.
//!
//! The engine is a standalone binary that performs hashing, certificate signing
//! request (CSR) creation, X.509 certificate decoding, private key introspection and
//! secure random-number generation.
//! This crate turns a `(command, payload)` pair into one completed request against
//! that binary and a typed result:
//!
//! - the command and any further arguments are passed as a discrete argument vector
//!   (never concatenated into a shell command string),
//! - the payload is hex-encoded and written to the engine's standard input, making
//!   the text channel binary-safe,
//! - on success the engine emits exactly one JSON document on standard output, which
//!   is parsed into the command-specific success shape (see [`protocol`]),
//! - on failure the engine emits a `{"Err": ..., "Message": ...}` document and exits
//!   non-zero; both fields are surfaced distinctly as an [`EngineError`],
//! - every call is bound by a caller-supplied deadline and produces a
//!   [`TransportError::Timeout`] on expiry.
//!
//! Calls are independent request/response exchanges without session state and may be
//! issued concurrently.
//! No command is retried automatically.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use keyforge_engine::Engine;
//!
//! # fn main() -> testresult::TestResult {
//! let engine = Engine::new("/usr/lib/keyforge/engine", Duration::from_secs(5));
//!
//! // hashing happens in the engine, not in this process
//! let digest = engine.sha256_digest(b"hello, world!")?;
//!
//! // secure random integers below an upper bound
//! let number = engine.random_int(100)?;
//! assert!(number < 100);
//! # Ok(())
//! # }
//! ```

mod bridge;
mod command;
mod error;
pub mod protocol;

pub use bridge::Engine;
// Publicly re-export chrono facilities used in protocol documents.
pub use chrono::{DateTime, Utc};
pub use command::EngineCommand;
pub use error::{EngineError, Error, TransportError};
pub use protocol::{
    AuthorityInformationAccess,
    CertificateData,
    CertificateSigningRequest,
    CsrResponse,
    DistinguishedName,
    ExtendedKeyUsage,
    KeyUsage,
    MessageResponse,
    PrivateKeyInfo,
    ReportedKeyType,
    SubjectAlternativeNames,
};
