//! Certificate signing requests.

use std::sync::Arc;

use keyforge_engine::{
    CertificateSigningRequest,
    DistinguishedName,
    Engine,
    SubjectAlternativeNames,
};
use log::debug;

use crate::{
    error::{Error, ValidationError},
    id::generate_entity_id,
    key::{ExportType, KeyAlgorithm, KeyMaterial},
    passphrase::Passphrase,
};

/// The attributes a certificate is requested for.
#[derive(Clone, Debug, Default)]
pub struct CertificateRequestData {
    /// The subject distinguished name.
    ///
    /// The common name is mandatory; all other fields are optional.
    pub subject: DistinguishedName,

    /// The subject alternative names.
    pub san: SubjectAlternativeNames,
}

/// A certificate signing request (CSR).
///
/// A request is built exactly once, at creation, from a [`KeyMaterial`] and the
/// requested attributes; the encoded body returned by the engine is stored verbatim
/// and never re-parsed.
/// The key is shared, not owned: it may outlive the request and be used
/// independently.
#[derive(Clone, Debug)]
pub struct CertificateRequest {
    id: String,
    key: Arc<KeyMaterial>,
    data: CertificateRequestData,
    pem: Vec<u8>,
}

impl CertificateRequest {
    /// Creates a certificate signing request via the engine.
    ///
    /// The key must be an RSA or EC key; it is exported as PKCS#1 (RSA) or SEC1 (EC)
    /// PEM, passphrase protected if `passphrase` is given, and sent to the engine
    /// together with the request attributes.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] before any engine call if the key algorithm is
    /// unsupported or the subject common name is empty, and an engine or transport
    /// error if the engine call fails.
    pub fn create(
        engine: &Engine,
        key: Arc<KeyMaterial>,
        data: CertificateRequestData,
        passphrase: Option<&Passphrase>,
    ) -> Result<Self, Error> {
        let export_type = match key.algorithm() {
            KeyAlgorithm::Rsa => ExportType::Pkcs1,
            KeyAlgorithm::Ec => ExportType::Sec1,
            algorithm => return Err(ValidationError::CsrKeyAlgorithm { algorithm }.into()),
        };
        if data.subject.common_name.is_empty() {
            return Err(ValidationError::CommonNameRequired.into());
        }

        let key_pem = key.export_pem(export_type, passphrase)?;
        let payload = CertificateSigningRequest {
            subject: data.subject.clone(),
            san: data.san.clone(),
            key: key_pem.as_str().to_string(),
        };
        let pem = engine.create_csr(&payload)?;
        debug!(
            "Created certificate signing request for {}",
            data.subject.common_name
        );

        Ok(Self {
            id: generate_entity_id(),
            key,
            data,
            pem: pem.into_bytes(),
        })
    }

    /// Returns the identifier of the request.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the key the request was created with.
    pub fn key(&self) -> &Arc<KeyMaterial> {
        &self.key
    }

    /// Returns the attributes the request was created with.
    pub fn data(&self) -> &CertificateRequestData {
        &self.data
    }

    /// Returns the encoded request exactly as produced by the engine.
    pub fn export(&self) -> &[u8] {
        &self.pem
    }
}
