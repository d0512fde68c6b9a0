//! # Error Types
//!
//! Two layers of errors live here:
//!
//! - [`CalcError`] - run-level failures (unreadable workbook, missing sheet or
//!   columns, report rendering). These abort the whole run before or after
//!   record processing.
//! - [`ValidationError`] - record-level failures. One bad beam row produces one
//!   `ValidationError`; it is captured with the row id and processing moves on
//!   to the next row.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::errors::{ValidationError, ValidationErrorKind};
//!
//! let err = ValidationError::new(
//!     ValidationErrorKind::InvalidLength,
//!     "Beam length (L) must be a positive value.",
//! );
//! assert_eq!(err.kind.code(), "INVALID_LENGTH");
//! assert_eq!(err.to_string(), "Beam length (L) must be a positive value.");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for run-level operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for run-level operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// The workbook has no sheet with the expected name
    #[error("Missing sheet: the workbook must contain a sheet named '{sheet}'")]
    MissingSheet { sheet: String },

    /// The beam sheet lacks one or more required columns
    #[error("Missing columns in sheet '{sheet}': {}", missing.join(", "))]
    MissingColumns { sheet: String, missing: Vec<String> },

    /// No beam was processed and no beam was rejected
    #[error("No beams could be processed. Check that the file contains data.")]
    EmptyInput,

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Typst compilation or PDF export failed
    #[error("Report error: {stage} - {reason}")]
    ReportError { stage: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingSheet error
    pub fn missing_sheet(sheet: impl Into<String>) -> Self {
        CalcError::MissingSheet { sheet: sheet.into() }
    }

    /// Create a MissingColumns error
    pub fn missing_columns(sheet: impl Into<String>, missing: Vec<String>) -> Self {
        CalcError::MissingColumns {
            sheet: sheet.into(),
            missing,
        }
    }

    /// Create a ReportError
    pub fn report_error(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ReportError {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::MissingSheet { .. } => "MISSING_SHEET",
            CalcError::MissingColumns { .. } => "MISSING_COLUMNS",
            CalcError::EmptyInput => "EMPTY_INPUT",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::ReportError { .. } => "REPORT_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

/// Failure kinds for a single beam record.
///
/// The first eight come from the validator; `UnexpectedProcessingError`
/// covers anything the validator could not anticipate (non-finite results,
/// malformed nested structures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    InvalidTopology,
    InvalidLength,
    InvalidSupports,
    InvalidLoadType,
    InvalidPointLoad,
    InvalidDistributedLoad,
    InvalidSupportCount,
    DegenerateSpan,
    UnexpectedProcessingError,
}

impl ValidationErrorKind {
    /// Stable code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidTopology => "INVALID_TOPOLOGY",
            ValidationErrorKind::InvalidLength => "INVALID_LENGTH",
            ValidationErrorKind::InvalidSupports => "INVALID_SUPPORTS",
            ValidationErrorKind::InvalidLoadType => "INVALID_LOAD_TYPE",
            ValidationErrorKind::InvalidPointLoad => "INVALID_POINT_LOAD",
            ValidationErrorKind::InvalidDistributedLoad => "INVALID_DISTRIBUTED_LOAD",
            ValidationErrorKind::InvalidSupportCount => "INVALID_SUPPORT_COUNT",
            ValidationErrorKind::DegenerateSpan => "DEGENERATE_SPAN",
            ValidationErrorKind::UnexpectedProcessingError => "UNEXPECTED_PROCESSING_ERROR",
        }
    }
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A rejected beam record: machine-checkable kind plus the message shown to
/// the user.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        ValidationError {
            kind,
            message: message.into(),
        }
    }

    /// Create an UnexpectedProcessingError
    pub fn unexpected(message: impl Into<String>) -> Self {
        ValidationError::new(ValidationErrorKind::UnexpectedProcessingError, message)
    }
}
