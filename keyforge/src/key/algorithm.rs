//! Key algorithms, export types and named curves.

use strum::{EnumIter, EnumString, IntoStaticStr};

/// The algorithm variant of a private key.
///
/// Each variant maps 1:1 to a dotted-decimal object identifier, retrievable via
/// [`oid`][`KeyAlgorithm::oid`].
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
///
/// use keyforge::KeyAlgorithm;
///
/// # fn main() -> testresult::TestResult {
/// // algorithms can be displayed and parsed case-insensitively
/// assert_eq!(KeyAlgorithm::RsaPss.to_string(), "rsa-pss");
/// assert_eq!(KeyAlgorithm::from_str("Ed25519")?, KeyAlgorithm::Ed25519);
/// # Ok(())
/// # }
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    strum::Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Eq,
    Hash,
    PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum KeyAlgorithm {
    /// An RSA key.
    #[strum(serialize = "rsa")]
    Rsa,

    /// An RSA key restricted to PSS signatures.
    #[strum(serialize = "rsa-pss")]
    RsaPss,

    /// A DSA key.
    #[strum(serialize = "dsa")]
    Dsa,

    /// An elliptic curve key on a NIST curve.
    #[strum(serialize = "ec")]
    Ec,

    /// A Curve25519 Diffie-Hellman key.
    #[strum(serialize = "x25519")]
    X25519,

    /// A Curve448 Diffie-Hellman key.
    #[strum(serialize = "x448")]
    X448,

    /// An Ed25519 signing key.
    #[strum(serialize = "ed25519")]
    Ed25519,

    /// An Ed448 signing key.
    #[strum(serialize = "ed448")]
    Ed448,
}

impl KeyAlgorithm {
    /// Returns the dotted-decimal object identifier of the algorithm.
    pub const fn oid(self) -> &'static str {
        match self {
            Self::Rsa => "1.2.840.113549.1.1.1",
            Self::RsaPss => "1.2.840.113549.1.1.10",
            Self::Dsa => "1.2.840.10040.4.1",
            Self::Ec => "1.2.840.10045.2.1",
            Self::X25519 => "1.3.101.110",
            Self::X448 => "1.3.101.111",
            Self::Ed25519 => "1.3.101.112",
            Self::Ed448 => "1.3.101.113",
        }
    }

    /// Checks whether the algorithm supports an export type.
    ///
    /// RSA and RSA-PSS keys export as PKCS#1 or PKCS#8, elliptic curve keys as SEC1 or
    /// PKCS#8 and all other algorithms as PKCS#8 only.
    pub const fn supports_export(self, export_type: ExportType) -> bool {
        match export_type {
            ExportType::Pkcs8 => true,
            ExportType::Pkcs1 => matches!(self, Self::Rsa | Self::RsaPss),
            ExportType::Sec1 => matches!(self, Self::Ec),
        }
    }
}

/// The structural type of an exported private key.
#[derive(
    Clone,
    Copy,
    Debug,
    strum::Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Eq,
    Hash,
    PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum ExportType {
    /// A PKCS#1 `RSAPrivateKey` structure.
    #[strum(serialize = "pkcs1")]
    Pkcs1,

    /// A PKCS#8 `PrivateKeyInfo` structure.
    #[strum(serialize = "pkcs8")]
    Pkcs8,

    /// A SEC1 `ECPrivateKey` structure.
    #[strum(serialize = "sec1")]
    Sec1,
}

/// The encoding of an imported or exported private key.
#[derive(
    Clone,
    Copy,
    Debug,
    strum::Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Eq,
    Hash,
    PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum KeyFormat {
    /// PEM encoding.
    #[strum(serialize = "pem")]
    Pem,

    /// Raw DER encoding.
    #[strum(serialize = "der")]
    Der,
}

/// The structural header type of a DER encoded private key.
///
/// Raw DER carries no label, so imports must state whether the bytes hold a PKCS#1 or
/// a SEC1 structure.
#[derive(
    Clone,
    Copy,
    Debug,
    strum::Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Eq,
    Hash,
    PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum DerKeyType {
    /// A PKCS#1 `RSAPrivateKey` structure.
    #[strum(serialize = "pkcs1")]
    Pkcs1,

    /// A SEC1 `ECPrivateKey` structure.
    #[strum(serialize = "sec1")]
    Sec1,
}

/// A NIST curve for elliptic curve key generation.
///
/// Parsing accepts the SEC, ANSI X9.62 and NIST spellings of each curve
/// case-insensitively; [`Display`][`std::fmt::Display`] produces the canonical name.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
///
/// use keyforge::EcCurve;
///
/// # fn main() -> testresult::TestResult {
/// assert_eq!(EcCurve::from_str("P-256")?, EcCurve::NistP256);
/// assert_eq!(EcCurve::from_str("secp256r1")?, EcCurve::NistP256);
/// assert_eq!(EcCurve::NistP256.to_string(), "prime256v1");
/// # Ok(())
/// # }
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    strum::Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Eq,
    Hash,
    PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum EcCurve {
    /// The NIST P-224 curve.
    #[strum(to_string = "secp224r1", serialize = "P-224")]
    NistP224,

    /// The NIST P-256 curve.
    #[strum(to_string = "prime256v1", serialize = "secp256r1", serialize = "P-256")]
    NistP256,

    /// The NIST P-384 curve.
    #[strum(to_string = "secp384r1", serialize = "P-384")]
    NistP384,

    /// The NIST P-521 curve.
    #[strum(to_string = "secp521r1", serialize = "P-521")]
    NistP521,
}

impl EcCurve {
    /// Returns the field size of the curve in bits.
    pub const fn field_bits(self) -> u32 {
        match self {
            Self::NistP224 => 224,
            Self::NistP256 => 256,
            Self::NistP384 => 384,
            Self::NistP521 => 521,
        }
    }
}

/// Parameters for key generation.
///
/// Which fields are required depends on the algorithm: RSA and DSA need
/// [`modulus_bits`][`KeyParams::modulus_bits`], DSA additionally
/// [`divisor_bits`][`KeyParams::divisor_bits`] and elliptic curve keys a
/// [`curve`][`KeyParams::curve`].
/// Supplying a parameter an algorithm does not use is an error.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KeyParams {
    /// The modulus length in bits (RSA and DSA).
    pub modulus_bits: Option<u32>,

    /// The divisor length in bits (DSA).
    pub divisor_bits: Option<u32>,

    /// The named curve (elliptic curve keys).
    pub curve: Option<EcCurve>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;
    use strum::IntoEnumIterator;
    use testresult::TestResult;

    use super::*;

    #[rstest]
    #[case(KeyAlgorithm::Rsa, "1.2.840.113549.1.1.1")]
    #[case(KeyAlgorithm::RsaPss, "1.2.840.113549.1.1.10")]
    #[case(KeyAlgorithm::Dsa, "1.2.840.10040.4.1")]
    #[case(KeyAlgorithm::Ec, "1.2.840.10045.2.1")]
    #[case(KeyAlgorithm::X25519, "1.3.101.110")]
    #[case(KeyAlgorithm::X448, "1.3.101.111")]
    #[case(KeyAlgorithm::Ed25519, "1.3.101.112")]
    #[case(KeyAlgorithm::Ed448, "1.3.101.113")]
    fn key_algorithm_oid(#[case] algorithm: KeyAlgorithm, #[case] oid: &str) {
        assert_eq!(algorithm.oid(), oid);
    }

    #[test]
    fn export_compatibility_table() {
        for algorithm in KeyAlgorithm::iter() {
            assert!(algorithm.supports_export(ExportType::Pkcs8));
            assert_eq!(
                algorithm.supports_export(ExportType::Pkcs1),
                matches!(algorithm, KeyAlgorithm::Rsa | KeyAlgorithm::RsaPss)
            );
            assert_eq!(
                algorithm.supports_export(ExportType::Sec1),
                matches!(algorithm, KeyAlgorithm::Ec)
            );
        }
    }

    #[rstest]
    #[case("P-224", EcCurve::NistP224)]
    #[case("secp224r1", EcCurve::NistP224)]
    #[case("P-256", EcCurve::NistP256)]
    #[case("p-256", EcCurve::NistP256)]
    #[case("secp256r1", EcCurve::NistP256)]
    #[case("prime256v1", EcCurve::NistP256)]
    #[case("P-384", EcCurve::NistP384)]
    #[case("secp384r1", EcCurve::NistP384)]
    #[case("P-521", EcCurve::NistP521)]
    #[case("SECP521R1", EcCurve::NistP521)]
    fn ec_curve_aliases(#[case] input: &str, #[case] curve: EcCurve) -> TestResult {
        assert_eq!(EcCurve::from_str(input)?, curve);
        Ok(())
    }

    #[test]
    fn ec_curve_unknown_name_fails() {
        assert!(EcCurve::from_str("brainpoolP256r1").is_err());
    }

    #[rstest]
    #[case(KeyAlgorithm::Rsa, "rsa")]
    #[case(KeyAlgorithm::RsaPss, "rsa-pss")]
    #[case(KeyAlgorithm::Ed448, "ed448")]
    fn key_algorithm_round_trip(#[case] algorithm: KeyAlgorithm, #[case] name: &str) -> TestResult {
        assert_eq!(algorithm.to_string(), name);
        assert_eq!(KeyAlgorithm::from_str(name)?, algorithm);
        Ok(())
    }
}
