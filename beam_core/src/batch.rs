//! # Batch Processing
//!
//! Runs every workbook row through validate → solve → sample, in input order.
//! A failing row never stops the batch: it is recorded as a [`BeamFailure`]
//! with its id and reason, and the next row is processed.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::batch::process_rows;
//! use beam_core::settings::ReportSettings;
//! use beam_core::workbook::BeamRow;
//! use serde_json::json;
//!
//! let rows = vec![
//!     BeamRow::new("V1", json!("biapoiada"), json!(10), json!("[0, 10]"),
//!         json!(r#"[{"tipo": "pontual", "pos": 5, "valor": 100}]"#)),
//!     BeamRow::new("V2", json!("biapoiada"), json!(10), json!("[3, 1]"), json!("[]")),
//! ];
//!
//! let report = process_rows(&rows, &ReportSettings::default());
//! assert_eq!(report.processed_count(), 1);
//! assert_eq!(report.failed_count(), 1);
//! assert_eq!(report.failures[0].id, "V2");
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::calculations::analysis::{analyze, BeamAnalysis};
use crate::errors::{CalcError, CalcResult, ValidationError, ValidationErrorKind};
use crate::settings::ReportSettings;
use crate::validation::validate_row;
use crate::workbook::BeamRow;

/// A rejected row: its id and the reason shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamFailure {
    pub id: String,
    /// Spreadsheet line of the rejected row
    pub line: usize,
    pub kind: ValidationErrorKind,
    pub reason: String,
}

impl BeamFailure {
    fn new(row: &BeamRow, error: ValidationError) -> Self {
        BeamFailure {
            id: row.id.clone(),
            line: row.line,
            kind: error.kind,
            reason: error.message,
        }
    }
}

impl std::fmt::Display for BeamFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in beam {}: {}", self.id, self.reason)
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Solved beams, in input order
    pub beams: Vec<BeamAnalysis>,
    /// Rejected rows, in input order
    pub failures: Vec<BeamFailure>,
}

impl BatchReport {
    pub fn processed_count(&self) -> usize {
        self.beams.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// Nothing processed and nothing rejected
    pub fn is_empty(&self) -> bool {
        self.beams.is_empty() && self.failures.is_empty()
    }

    /// Fail with `EmptyInput` when there is nothing to report
    pub fn ensure_not_empty(&self) -> CalcResult<()> {
        if self.is_empty() {
            return Err(CalcError::EmptyInput);
        }
        Ok(())
    }
}

/// Process one row: validate, solve, sample.
///
/// Non-finite results (overflowing input, NaN propagation) are reported as
/// `UnexpectedProcessingError` instead of being passed on to reports.
pub fn process_row(row: &BeamRow, settings: &ReportSettings) -> Result<BeamAnalysis, ValidationError> {
    let beam = validate_row(row)?;
    let analysis = analyze(&beam, settings.effective_sample_points());

    if !analysis.is_finite() {
        return Err(ValidationError::unexpected(format!(
            "Unexpected error while processing beam {}: results are not finite numbers.",
            row.id
        )));
    }

    Ok(analysis)
}

/// Process every row, collecting results and failures.
pub fn process_rows(rows: &[BeamRow], settings: &ReportSettings) -> BatchReport {
    let mut report = BatchReport::default();

    for row in rows {
        match process_row(row, settings) {
            Ok(analysis) => {
                debug!(
                    "beam {} (line {}): reactions {:?}",
                    row.id,
                    row.line,
                    analysis.reactions.values()
                );
                report.beams.push(analysis);
            }
            Err(error) => {
                warn!("beam {} (line {}) skipped: [{}] {}", row.id, row.line, error.kind, error);
                report.failures.push(BeamFailure::new(row, error));
            }
        }
    }

    info!(
        "{} beam(s) processed, {} rejected",
        report.processed_count(),
        report.failed_count()
    );

    report
}
