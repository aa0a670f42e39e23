//! Shared mock engine helpers for integration tests.

use std::{fs, os::unix::fs::PermissionsExt, path::Path, time::Duration};

use keyforge::Engine;
use testresult::TestResult;

/// The deadline used for mock engine calls.
pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Writes an executable mock engine script to `dir` and returns an [`Engine`] for it.
pub fn mock_engine(dir: &Path, body: &str) -> TestResult<Engine> {
    let path = dir.join("engine");
    fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    let mut permissions = fs::metadata(&path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions)?;
    Ok(Engine::new(path, TIMEOUT))
}
