//! # Beam Record
//!
//! A [`BeamRecord`] is one validated input row: topology, length, support
//! positions and loads. Records are built by the validator and never mutated
//! afterwards.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::calculations::beam::{BeamRecord, Topology};
//! use beam_core::loads::PointLoad;
//!
//! let beam = BeamRecord::new("V1", Topology::SimplySupported, 10.0, vec![0.0, 10.0])
//!     .with_point_load(PointLoad::new(5.0, 100.0));
//!
//! assert_eq!(beam.total_load(), 100.0);
//! assert_eq!(beam.support_count(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::loads::{self, DistributedLoad, Load, PointLoad};

/// Support configuration of a beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    /// Two supports, statically determinate ("biapoiada")
    SimplySupported,
    /// Single support carrying the whole load ("balanço")
    Cantilever,
    /// Two or more supports ("contínua")
    Continuous,
}

impl Topology {
    /// All topologies in input order
    pub const ALL: [Topology; 3] = [
        Topology::SimplySupported,
        Topology::Cantilever,
        Topology::Continuous,
    ];

    /// Parse the `Tipo` column. Case-insensitive, surrounding whitespace ignored.
    ///
    /// # Example
    /// ```
    /// use beam_core::calculations::beam::Topology;
    ///
    /// assert_eq!(Topology::from_label("  BALANÇO "), Some(Topology::Cantilever));
    /// assert_eq!(Topology::from_label("engastada"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Topology> {
        let normalized = label.trim().to_lowercase();
        Topology::ALL
            .into_iter()
            .find(|t| t.label() == normalized)
    }

    /// Label used in the input sheet
    pub fn label(&self) -> &'static str {
        match self {
            Topology::SimplySupported => "biapoiada",
            Topology::Cantilever => "balanço",
            Topology::Continuous => "contínua",
        }
    }

    /// Human-readable name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Topology::SimplySupported => "Simply supported",
            Topology::Cantilever => "Cantilever",
            Topology::Continuous => "Continuous",
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One beam to be solved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamRecord {
    /// Report grouping key from the `ID` column (not necessarily unique)
    pub id: String,
    pub topology: Topology,
    /// Beam length (m)
    pub length: f64,
    /// Support positions (m), in input order
    pub supports: Vec<f64>,
    pub point_loads: Vec<PointLoad>,
    pub distributed_loads: Vec<DistributedLoad>,
}

impl BeamRecord {
    /// Create an unloaded record
    pub fn new(id: impl Into<String>, topology: Topology, length: f64, supports: Vec<f64>) -> Self {
        BeamRecord {
            id: id.into(),
            topology,
            length,
            supports,
            point_loads: Vec::new(),
            distributed_loads: Vec::new(),
        }
    }

    /// Add a point load and return self (builder pattern)
    pub fn with_point_load(mut self, load: PointLoad) -> Self {
        self.point_loads.push(load);
        self
    }

    /// Add a distributed load and return self (builder pattern)
    pub fn with_distributed_load(mut self, load: DistributedLoad) -> Self {
        self.distributed_loads.push(load);
        self
    }

    /// Add loads of either shape and return self (builder pattern)
    pub fn with_loads(mut self, loads: impl IntoIterator<Item = Load>) -> Self {
        for load in loads {
            match load {
                Load::Point(p) => self.point_loads.push(p),
                Load::Distributed(d) => self.distributed_loads.push(d),
            }
        }
        self
    }

    pub fn support_count(&self) -> usize {
        self.supports.len()
    }

    pub fn load_count(&self) -> usize {
        self.point_loads.len() + self.distributed_loads.len()
    }

    /// Resultant of all loads
    pub fn total_load(&self) -> f64 {
        loads::total_load(&self.point_loads, &self.distributed_loads)
    }

    /// Moment of all loads about x = 0
    pub fn total_moment_about_origin(&self) -> f64 {
        loads::total_moment_about_origin(&self.point_loads, &self.distributed_loads)
    }
}
