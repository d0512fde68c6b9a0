//! # beam_core - Beam Statics Engine
//!
//! `beam_core` turns rows of a beam workbook into support reactions, shear and
//! bending moment diagrams, and a PDF report. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Pipeline
//!
//! 1. [`workbook`] reads the `Vigas` sheet into raw [`workbook::BeamRow`]s
//! 2. [`validation`] turns each row into a [`BeamRecord`] or a [`ValidationError`]
//! 3. [`calculations`] solves reactions and samples internal forces
//! 4. [`batch`] collects results and per-row failures
//! 5. [`pdf`] renders the report; [`file_io`] writes it atomically
//!
//! ## Quick Start
//!
//! ```rust
//! use beam_core::{analyze, BeamRecord, PointLoad, Topology};
//!
//! let beam = BeamRecord::new("V1", Topology::SimplySupported, 10.0, vec![0.0, 10.0])
//!     .with_point_load(PointLoad::new(5.0, 100.0));
//!
//! let result = analyze(&beam, 11);
//! assert_eq!(result.reactions.values(), &[50.0, 50.0]);
//! assert_eq!(result.max_moment, 250.0);
//! ```
//!
//! ## Modules
//!
//! - [`loads`] - Point and distributed loads
//! - [`calculations`] - Reactions, internal forces, sampled analysis
//! - [`validation`] - Row validation with one error kind per rule
//! - [`workbook`] - Workbook input and template
//! - [`batch`] - Fault-isolated batch processing
//! - [`settings`] - Report settings
//! - [`pdf`] - Typst-based PDF report
//! - [`file_io`] - Atomic writes and settings loading
//! - [`errors`] - Structured error types

pub mod batch;
pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod pdf;
pub mod settings;
pub mod validation;
pub mod workbook;

// Re-export commonly used types at crate root for convenience
pub use batch::{process_row, process_rows, BatchReport, BeamFailure};
pub use calculations::{analyze, BeamAnalysis, BeamRecord, ReactionSet, Topology};
pub use errors::{CalcError, CalcResult, ValidationError, ValidationErrorKind};
pub use file_io::{load_settings, save_report, write_template};
pub use loads::{DistributedLoad, Load, PointLoad};
pub use settings::ReportSettings;
pub use workbook::{load_workbook, BeamRow, Workbook};
