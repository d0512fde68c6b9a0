//! # Report Settings
//!
//! Run-wide configuration: diagram resolution, report title, units and the
//! credit lines printed in the report footer. Settings serialize to JSON so
//! they can live in a file next to the workbook; every field is optional in
//! that file and falls back to its default.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::settings::ReportSettings;
//!
//! let settings: ReportSettings = serde_json::from_str(r#"{"sample_points": 200}"#).unwrap();
//! assert_eq!(settings.sample_points, 200);
//! assert_eq!(settings.force_unit, "kN");
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::analysis::{DEFAULT_SAMPLE_POINTS, MAX_SAMPLE_POINTS, MIN_SAMPLE_POINTS};

/// Default output file name for the PDF report
pub const DEFAULT_REPORT_FILE: &str = "Relatorio_Vigas.pdf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Number of positions sampled along each beam for the diagrams
    pub sample_points: usize,

    /// Title on the report cover block
    pub title: String,

    /// Lines printed under "Developed by:" at the end of the report
    pub footer_credits: Vec<String>,

    /// Length unit label
    pub length_unit: String,

    /// Force unit label
    pub force_unit: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            sample_points: DEFAULT_SAMPLE_POINTS,
            title: "Beam Calculator - Statics Report".to_string(),
            footer_credits: Vec::new(),
            length_unit: "m".to_string(),
            force_unit: "kN".to_string(),
        }
    }
}

impl ReportSettings {
    /// Set the sample count and return self (builder pattern)
    pub fn with_sample_points(mut self, points: usize) -> Self {
        self.sample_points = points;
        self
    }

    /// Sample count actually used, kept within the supported range
    pub fn effective_sample_points(&self) -> usize {
        self.sample_points.clamp(MIN_SAMPLE_POINTS, MAX_SAMPLE_POINTS)
    }

    /// Moment unit label, e.g. "kN·m"
    pub fn moment_unit(&self) -> String {
        format!("{}·{}", self.force_unit, self.length_unit)
    }

    /// Distributed load unit label, e.g. "kN/m"
    pub fn intensity_unit(&self) -> String {
        format!("{}/{}", self.force_unit, self.length_unit)
    }
}
