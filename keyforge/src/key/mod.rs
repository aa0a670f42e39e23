//! Private key material: algorithms, lifecycle, import and export.

mod algorithm;
mod encryption;
mod material;

pub use algorithm::{DerKeyType, EcCurve, ExportType, KeyAlgorithm, KeyFormat, KeyParams};
pub use material::{KeyMaterial, UnboundKey};
