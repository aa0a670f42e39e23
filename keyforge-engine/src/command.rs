//! The commands understood by the external engine.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

/// A command of the external engine.
///
/// Each command corresponds to one invocation of the engine process with the command
/// name as its first argument.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    strum::Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum EngineCommand {
    /// Create a SHA-256 digest over the payload bytes.
    #[strum(serialize = "hashsha256")]
    HashSha256,

    /// Create a SHA-512 digest over the payload bytes.
    #[strum(serialize = "hashsha512")]
    HashSha512,

    /// Report metadata for a PEM-encoded private key.
    #[strum(serialize = "pkinfo")]
    PrivateKeyInfo,

    /// Create a certificate signing request.
    #[strum(serialize = "csr")]
    Csr,

    /// Decode a PEM-encoded X.509 certificate into its attributes.
    #[strum(serialize = "certinfo")]
    CertificateInfo,

    /// Generate a random integer below a positional upper bound.
    #[strum(serialize = "randint")]
    RandomInt,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;
    use testresult::TestResult;

    use super::*;

    #[rstest]
    #[case(EngineCommand::HashSha256, "hashsha256")]
    #[case(EngineCommand::HashSha512, "hashsha512")]
    #[case(EngineCommand::PrivateKeyInfo, "pkinfo")]
    #[case(EngineCommand::Csr, "csr")]
    #[case(EngineCommand::CertificateInfo, "certinfo")]
    #[case(EngineCommand::RandomInt, "randint")]
    fn enginecommand_display(#[case] command: EngineCommand, #[case] name: &str) -> TestResult {
        assert_eq!(command.to_string(), name);
        assert_eq!(EngineCommand::from_str(name)?, command);
        Ok(())
    }
}
