//! Error handling for engine invocations.

use std::{path::PathBuf, time::Duration};

#[cfg(doc)]
use crate::Engine;

/// An error that may occur when calling the external engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The engine ran and reported a structured failure.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The engine process could not be driven to a structured result.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A structured failure reported by the engine itself.
///
/// The engine emits a single `{"Err": ..., "Message": ...}` JSON document on failure.
/// Both fields are preserved distinctly: [`code`][`EngineError::code`] is the
/// machine-readable error code, [`message`][`EngineError::message`] the human-readable
/// detail.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("Engine reported failure ({code}): {message}")]
pub struct EngineError {
    /// The machine-readable error code reported by the engine.
    pub code: String,

    /// The human-readable error detail reported by the engine.
    pub message: String,
}

/// An error that occurred before a structured engine response could be obtained.
///
/// Transport errors are distinct from [`EngineError`]s: they indicate that the engine
/// process failed to start, did not produce output parsable as either the success or
/// the error shape, or exceeded its deadline.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The engine process could not be spawned.
    #[error("Unable to spawn engine process {program:?}: {source}")]
    Spawn {
        /// The engine program that could not be started.
        program: PathBuf,

        /// The source error.
        source: std::io::Error,
    },

    /// An I/O error occurred while communicating with the engine process.
    #[error("I/O error while {context}: {source}")]
    Io {
        /// The context in which the error occurred.
        ///
        /// This is meant to complete the sentence "I/O error while ".
        context: &'static str,

        /// The source error.
        source: std::io::Error,
    },

    /// The engine process did not finish before its deadline.
    #[error("Engine process {program:?} exceeded its deadline of {timeout:?}")]
    Timeout {
        /// The engine program that was killed.
        program: PathBuf,

        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// Engine output could not be parsed as either the success or the error shape.
    #[error("Engine output is not parsable while {context}: {output}")]
    MalformedResponse {
        /// The context in which the error occurred.
        ///
        /// This is meant to complete the sentence "Engine output is not parsable while ".
        context: &'static str,

        /// The (lossily decoded) output that could not be parsed.
        output: String,
    },

    /// A JSON document could not be serialized for transmission.
    #[error("JSON error while {context}: {source}")]
    Json {
        /// The context in which the error occurred.
        ///
        /// This is meant to complete the sentence "JSON error while ".
        context: &'static str,

        /// The source error.
        source: serde_json::Error,
    },

    /// A digest returned by the engine has the wrong length.
    #[error("Engine returned a digest of {actual} bytes where {expected} were expected")]
    DigestLength {
        /// The expected digest length in bytes.
        expected: usize,

        /// The length of the digest that was returned.
        actual: usize,
    },

    /// A hex string returned by the engine could not be decoded.
    #[error("Unable to decode hex data in engine response: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
