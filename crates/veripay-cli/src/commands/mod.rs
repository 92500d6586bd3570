//! CLI command implementations.

pub mod config;
pub mod resolve;
pub mod verify;

use std::path::Path;

use veripay_core::{FileKind, VeripayConfig};

/// Load configuration from an explicit path or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<VeripayConfig> {
    match config_path {
        Some(path) => Ok(VeripayConfig::from_file(Path::new(path))?),
        None => Ok(VeripayConfig::default()),
    }
}

/// Infer an uploaded file's kind from its extension.
pub fn file_kind_for(path: &Path) -> anyhow::Result<FileKind> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => Ok(FileKind::Pdf),
        "png" | "jpg" | "jpeg" | "tiff" | "bmp" => Ok(FileKind::Image),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}
