//! JSON I/O handling for CLI
//!
//! - Input: one catalog JSON document read from a file
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::metadata::Catalog;

use super::errors::{CliError, CliResult};

/// Read a catalog document
pub fn read_catalog(path: &Path) -> CliResult<Catalog> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::catalog_error(format!("Failed to read catalog {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::catalog_error(format!("Invalid catalog JSON: {}", e)))
}

/// Write one JSON line
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
