//! # Beam Statics
//!
//! The computation pipeline for one validated beam:
//!
//! - [`beam`] - Topology and the validated [`BeamRecord`]
//! - [`reactions`] - Support reactions per topology
//! - [`internal_forces`] - Shear and bending moment at any section
//! - [`analysis`] - Sampled diagrams and their extremes
//!
//! All functions here are pure and assume a record that passed validation.

pub mod analysis;
pub mod beam;
pub mod internal_forces;
pub mod reactions;

// Re-export commonly used types
pub use analysis::{analyze, BeamAnalysis};
pub use beam::{BeamRecord, Topology};
pub use internal_forces::{moment_at, shear_at, InternalForces, SectionSample};
pub use reactions::{solve_reactions, ReactionSet};
