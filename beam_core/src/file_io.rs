//! # File I/O Module
//!
//! Writes reports and workbook templates, and reads report settings.
//!
//! Every write is atomic: bytes go to a `.tmp` sibling first, are synced to
//! disk, then renamed over the target. A failed run never leaves a truncated
//! PDF behind.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::file_io::{load_settings, write_template};
//! use std::path::Path;
//!
//! write_template(Path::new("vigas.json"))?;
//! let settings = load_settings(Path::new("settings.json"))?;
//! println!("sampling {} points", settings.sample_points);
//! # Ok::<(), beam_core::errors::CalcError>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{CalcError, CalcResult};
use crate::settings::ReportSettings;
use crate::workbook::Workbook;

/// Temp path next to the target: `report.pdf` -> `report.pdf.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes atomically (temp file, sync, rename).
fn write_atomic(bytes: &[u8], path: &Path) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Save rendered report bytes to `path`.
///
/// # Errors
///
/// * `FileError` - the temp file could not be written or renamed
pub fn save_report(pdf_bytes: &[u8], path: &Path) -> CalcResult<()> {
    write_atomic(pdf_bytes, path)
}

/// Write the example workbook (one beam per topology plus instructions).
pub fn write_template(path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(&Workbook::template())?;
    write_atomic(json.as_bytes(), path)
}

/// Load report settings from a JSON file.
///
/// Missing fields fall back to their defaults.
///
/// # Errors
///
/// * `FileError` - the file cannot be opened or read
/// * `SerializationError` - invalid JSON
pub fn load_settings(path: &Path) -> CalcResult<ReportSettings> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::load_workbook;

    #[test]
    fn test_tmp_path() {
        assert_eq!(
            tmp_path_for(Path::new("/out/Relatorio_Vigas.pdf")),
            Path::new("/out/Relatorio_Vigas.pdf.tmp")
        );
    }

    #[test]
    fn test_save_report_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");

        save_report(b"%PDF-old", &path).unwrap();
        save_report(b"%PDF-new", &path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"%PDF-new");
        assert!(!tmp_path_for(&path).exists(), "temp file should be renamed away");
    }

    #[test]
    fn test_save_report_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.pdf");
        let err = save_report(b"%PDF", &path).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_template_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigas.json");

        write_template(&path).unwrap();
        let workbook = load_workbook(&path).unwrap();
        assert_eq!(workbook, Workbook::template());
        assert_eq!(workbook.beam_rows().unwrap().len(), 3);
    }

    #[test]
    fn test_load_settings_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"title": "Obra 12", "footer_credits": ["Eng. A"]}"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.title, "Obra 12");
        assert_eq!(settings.footer_credits, vec!["Eng. A"]);
        assert_eq!(settings.sample_points, 500);
    }

    #[test]
    fn test_load_settings_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_settings(&dir.path().join("none.json")).unwrap_err();
        assert_eq!(missing.error_code(), "FILE_ERROR");

        let path = dir.path().join("bad.json");
        fs::write(&path, "{sample_points: }").unwrap();
        let bad = load_settings(&path).unwrap_err();
        assert_eq!(bad.error_code(), "SERIALIZATION_ERROR");
    }
}
