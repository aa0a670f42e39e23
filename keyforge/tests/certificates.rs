//! Certificate and signing request flows against a mock engine.
#![cfg(unix)]

mod common;

use std::sync::Arc;

use keyforge::{
    Certificate,
    CertificateRequest,
    CertificateRequestData,
    EcCurve,
    Error,
    KeyAlgorithm,
    KeyParams,
    KeyUsage,
    Registry,
    UnboundKey,
    ValidationError,
};
use testdir::testdir;
use testresult::TestResult;

use crate::common::mock_engine;

const CERTIFICATE_PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIBpretendbody\n-----END CERTIFICATE-----\n";

fn ec_key() -> TestResult<keyforge::KeyMaterial> {
    Ok(UnboundKey::new().generate(
        KeyAlgorithm::Ec,
        KeyParams {
            curve: Some(EcCurve::NistP256),
            ..Default::default()
        },
    )?)
}

fn request_data(common_name: &str) -> CertificateRequestData {
    CertificateRequestData {
        subject: keyforge::DistinguishedName {
            common_name: common_name.to_string(),
            ..Default::default()
        },
        san: keyforge::SubjectAlternativeNames {
            dns_names: vec!["example.org".to_string(), "www.example.org".to_string()],
            ..Default::default()
        },
    }
}

#[test]
fn certificate_import_export_is_byte_identical() -> TestResult {
    let dir = testdir!();
    let engine = mock_engine(
        &dir,
        r#"read -r payload
cat <<'EOF'
{"Subject":{"CommonName":"example.org","Organization":["Example Org"]},
 "San":{"DNSNames":["example.org"]},
 "Issuer":{"CommonName":"Example CA"},
 "IsCA":false,
 "KeyUsage":["DigitalSignature","KeyEncipherment"],
 "SerialNumber":"4096",
 "PublicKeyAlgorithm":"RSA",
 "SignatureAlgorithm":"SHA256-RSA",
 "Version":3,
 "NotBefore":"2024-01-01T00:00:00Z",
 "NotAfter":"2025-01-01T00:00:00Z"}
EOF"#,
    )?;

    let certificate = Certificate::import(&engine, CERTIFICATE_PEM)?;
    assert_eq!(certificate.export(), CERTIFICATE_PEM.as_bytes());
    assert_eq!(certificate.data().subject.common_name, "example.org");
    assert_eq!(certificate.data().issuer.common_name, "Example CA");
    assert_eq!(
        certificate.data().key_usage,
        [KeyUsage::DigitalSignature, KeyUsage::KeyEncipherment]
    );
    // groups the engine omitted default to empty
    assert!(certificate.data().extended_key_usage.is_empty());
    assert!(certificate.data().policy_identifiers.is_empty());
    Ok(())
}

#[test]
fn certificate_import_failure_is_an_engine_error() -> TestResult {
    let dir = testdir!();
    let engine = mock_engine(
        &dir,
        r#"printf '{"Err":"E1","Message":"bad input"}\n'
exit 1"#,
    )?;

    match Certificate::import(&engine, "not a certificate") {
        Err(Error::Engine(error)) => {
            assert_eq!(error.code, "E1");
            assert_eq!(error.message, "bad input");
        }
        other => panic!("expected an engine error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn signing_request_stores_the_engine_body_verbatim() -> TestResult {
    let dir = testdir!();
    let engine = mock_engine(
        &dir,
        r#"read -r payload
printf '{"Req":"-----BEGIN CERTIFICATE REQUEST-----\\nMIIBpretend\\n-----END CERTIFICATE REQUEST-----\\n"}\n'"#,
    )?;

    let key = Arc::new(ec_key()?);
    let request = CertificateRequest::create(&engine, key.clone(), request_data("example.org"), None)?;
    assert_eq!(
        request.export(),
        b"-----BEGIN CERTIFICATE REQUEST-----\nMIIBpretend\n-----END CERTIFICATE REQUEST-----\n"
    );
    assert_eq!(request.data().subject.common_name, "example.org");
    // the key is shared, not owned
    assert_eq!(request.key().id(), key.id());
    assert_eq!(request.id().len(), 10);
    Ok(())
}

#[test]
fn signing_request_without_common_name_issues_no_engine_call() -> TestResult {
    let dir = testdir!();
    let marker = dir.join("invoked");
    let engine = mock_engine(
        &dir,
        &format!(
            r#": > "{}"
printf '{{"Req":"unused"}}\n'"#,
            marker.display()
        ),
    )?;

    let key = Arc::new(ec_key()?);
    assert!(matches!(
        CertificateRequest::create(&engine, key, request_data(""), None),
        Err(Error::Validation(ValidationError::CommonNameRequired))
    ));
    assert!(!marker.exists());
    Ok(())
}

#[test]
fn signing_request_rejects_unsupported_key_algorithms() -> TestResult {
    let dir = testdir!();
    let marker = dir.join("invoked");
    let engine = mock_engine(
        &dir,
        &format!(
            r#": > "{}"
printf '{{"Req":"unused"}}\n'"#,
            marker.display()
        ),
    )?;

    let key = Arc::new(UnboundKey::new().generate(KeyAlgorithm::Ed25519, KeyParams::default())?);
    assert!(matches!(
        CertificateRequest::create(&engine, key, request_data("example.org"), None),
        Err(Error::Validation(ValidationError::CsrKeyAlgorithm {
            algorithm: KeyAlgorithm::Ed25519
        }))
    ));
    assert!(!marker.exists());
    Ok(())
}

#[test]
fn certificates_can_be_kept_in_a_registry() -> TestResult {
    let dir = testdir!();
    let engine = mock_engine(
        &dir,
        r#"read -r payload
cat <<'EOF'
{"Subject":{"CommonName":"example.org"},
 "Issuer":{"CommonName":"Example CA"},
 "SerialNumber":"1",
 "PublicKeyAlgorithm":"RSA",
 "SignatureAlgorithm":"SHA256-RSA",
 "Version":3,
 "NotBefore":"2024-01-01T00:00:00Z",
 "NotAfter":"2025-01-01T00:00:00Z"}
EOF"#,
    )?;

    let certificate = Certificate::import(&engine, CERTIFICATE_PEM)?;
    let replacement = Certificate::import(&engine, CERTIFICATE_PEM)?;

    let mut registry = Registry::new();
    let stored_id = certificate.id().to_string();
    registry.add("server", certificate, false);

    // idempotent registration keeps the first certificate
    assert_eq!(
        registry.add("server", replacement, false).id(),
        stored_id.as_str()
    );
    assert!(
        registry
            .find(|certificate| certificate.data().subject.common_name == "example.org")
            .is_some()
    );
    Ok(())
}
