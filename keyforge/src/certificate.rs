//! X.509 certificates.

use keyforge_engine::{CertificateData, Engine};
use log::debug;

use crate::{error::Error, id::generate_entity_id};

/// An X.509 certificate.
///
/// A certificate is built exactly once, at import, by having the engine decode a PEM
/// document.
/// The decoded attributes are read-only views; the original PEM bytes remain the
/// source of truth and [`export`][`Certificate::export`] returns them byte-identical,
/// never a re-serialization.
#[derive(Clone, Debug)]
pub struct Certificate {
    id: String,
    data: CertificateData,
    pem: Vec<u8>,
}

impl Certificate {
    /// Imports a PEM encoded certificate by decoding it via the engine.
    ///
    /// Optional attribute groups the engine omits default to empty.
    ///
    /// # Errors
    ///
    /// Returns an engine error if the engine can not parse the certificate and a
    /// transport error if no structured engine response can be obtained.
    pub fn import(engine: &Engine, pem: &str) -> Result<Self, Error> {
        let data = engine.certificate_info(pem)?;
        debug!(
            "Imported certificate for subject {}",
            data.subject.common_name
        );
        Ok(Self {
            id: generate_entity_id(),
            data,
            pem: pem.as_bytes().to_vec(),
        })
    }

    /// Returns the identifier of the certificate.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the decoded attributes of the certificate.
    pub fn data(&self) -> &CertificateData {
        &self.data
    }

    /// Returns the original PEM bytes the certificate was imported from.
    pub fn export(&self) -> &[u8] {
        &self.pem
    }
}
