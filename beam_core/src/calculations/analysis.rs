//! Beam Analysis
//!
//! Solves one validated [`BeamRecord`] end to end: load aggregates, support
//! reactions, and shear/moment diagrams sampled on a uniform grid over
//! `[0, L]`, plus the diagram extremes used in reports.
//!
//! ## Example
//! ```rust
//! use beam_core::calculations::analysis::analyze;
//! use beam_core::calculations::beam::{BeamRecord, Topology};
//! use beam_core::loads::PointLoad;
//!
//! let beam = BeamRecord::new("V1", Topology::SimplySupported, 10.0, vec![0.0, 10.0])
//!     .with_point_load(PointLoad::new(5.0, 100.0));
//!
//! let result = analyze(&beam, 11);
//! assert_eq!(result.reactions.values(), &[50.0, 50.0]);
//! assert_eq!(result.max_moment, 250.0);
//! assert_eq!(result.max_moment_position, 5.0);
//! ```

use serde::{Deserialize, Serialize};

use super::beam::BeamRecord;
use super::internal_forces::{uniform_grid, InternalForces, SectionSample};
use super::reactions::{solve_reactions, ReactionSet};

/// Default number of diagram samples across the beam
pub const DEFAULT_SAMPLE_POINTS: usize = 500;

/// Fewest samples that still cover both ends of the beam
pub const MIN_SAMPLE_POINTS: usize = 2;

/// Most samples taken along one beam
pub const MAX_SAMPLE_POINTS: usize = 10_000;

/// Results for one solved beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamAnalysis {
    /// The solved record
    pub beam: BeamRecord,

    /// Support reactions (kN), positive upward, in support order
    pub reactions: ReactionSet,
    /// Resultant of all loads (kN)
    pub total_load: f64,
    /// Moment of all loads about x = 0 (kN·m)
    pub total_moment_about_origin: f64,

    /// Sample positions (m)
    pub positions: Vec<f64>,
    /// Shear force at each position (kN)
    pub shear: Vec<f64>,
    /// Bending moment at each position (kN·m)
    pub moment: Vec<f64>,

    /// Largest absolute shear (kN)
    pub max_abs_shear: f64,
    pub max_abs_shear_position: f64,
    /// Largest positive (sagging) moment (kN·m), 0 if none
    pub max_moment: f64,
    pub max_moment_position: f64,
    /// Most negative (hogging) moment (kN·m), 0 if none
    pub min_moment: f64,
    pub min_moment_position: f64,
}

impl BeamAnalysis {
    /// Sections in position order
    pub fn samples(&self) -> impl Iterator<Item = SectionSample> + '_ {
        self.positions
            .iter()
            .zip(&self.shear)
            .zip(&self.moment)
            .map(|((&x, &shear), &moment)| SectionSample { x, shear, moment })
    }

    /// True when every scalar and sampled value is finite
    pub fn is_finite(&self) -> bool {
        self.total_load.is_finite()
            && self.total_moment_about_origin.is_finite()
            && self.reactions.values().iter().all(|r| r.is_finite())
            && self.shear.iter().all(|v| v.is_finite())
            && self.moment.iter().all(|m| m.is_finite())
    }
}

/// Solve a validated beam and sample its diagrams at `sample_points`
/// evenly spaced positions, clamped to
/// [`MIN_SAMPLE_POINTS`]..=[`MAX_SAMPLE_POINTS`].
pub fn analyze(beam: &BeamRecord, sample_points: usize) -> BeamAnalysis {
    let reactions = solve_reactions(beam);
    let sample_points = sample_points.clamp(MIN_SAMPLE_POINTS, MAX_SAMPLE_POINTS);
    let positions = uniform_grid(beam.length, sample_points);

    let forces = InternalForces::new(
        reactions.values(),
        &beam.supports,
        &beam.point_loads,
        &beam.distributed_loads,
    );

    let mut shear = Vec::with_capacity(positions.len());
    let mut moment = Vec::with_capacity(positions.len());

    let mut max_abs_shear = 0.0f64;
    let mut max_abs_shear_position = 0.0;
    let mut max_moment = 0.0f64;
    let mut max_moment_position = 0.0;
    let mut min_moment = 0.0f64;
    let mut min_moment_position = 0.0;

    for &x in &positions {
        let v = forces.shear_at(x);
        let m = forces.moment_at(x);

        if v.abs() > max_abs_shear {
            max_abs_shear = v.abs();
            max_abs_shear_position = x;
        }
        if m > max_moment {
            max_moment = m;
            max_moment_position = x;
        }
        if m < min_moment {
            min_moment = m;
            min_moment_position = x;
        }

        shear.push(v);
        moment.push(m);
    }

    BeamAnalysis {
        beam: beam.clone(),
        total_load: beam.total_load(),
        total_moment_about_origin: beam.total_moment_about_origin(),
        reactions,
        positions,
        shear,
        moment,
        max_abs_shear,
        max_abs_shear_position,
        max_moment,
        max_moment_position,
        min_moment,
        min_moment_position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::beam::Topology;
    use crate::loads::{DistributedLoad, PointLoad};

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if b.abs() < 1e-10 {
            a.abs() < tol
        } else {
            ((a - b) / b).abs() < tol
        }
    }

    #[test]
    fn test_unloaded_beam() {
        let beam = BeamRecord::new("V", Topology::SimplySupported, 4.0, vec![0.0, 4.0]);
        let result = analyze(&beam, 10);
        assert_eq!(result.total_load, 0.0);
        assert_eq!(result.total_moment_about_origin, 0.0);
        assert!(result.shear.iter().all(|v| *v == 0.0));
        assert!(result.moment.iter().all(|m| *m == 0.0));
        assert_eq!(result.max_abs_shear, 0.0);
    }

    #[test]
    fn test_sample_count_and_clamp() {
        let beam = BeamRecord::new("V", Topology::Cantilever, 3.0, vec![0.0]);
        assert_eq!(analyze(&beam, DEFAULT_SAMPLE_POINTS).positions.len(), 500);
        assert_eq!(analyze(&beam, 0).positions, vec![0.0, 3.0]);

        let huge = analyze(&beam, usize::MAX);
        assert_eq!(huge.positions.len(), MAX_SAMPLE_POINTS);
        assert_eq!(huge.positions.last(), Some(&3.0));
    }

    #[test]
    fn test_uniform_load_extremes() {
        let beam = BeamRecord::new("V", Topology::SimplySupported, 10.0, vec![0.0, 10.0])
            .with_distributed_load(DistributedLoad::new(0.0, 10.0, 10.0));
        let result = analyze(&beam, 101);

        assert!(approx_eq(result.max_moment, 125.0, 1e-9));
        assert!(approx_eq(result.max_moment_position, 5.0, 1e-9));
        assert!(approx_eq(result.max_abs_shear, 50.0, 1e-9));
        assert_eq!(result.min_moment, 0.0);
    }

    #[test]
    fn test_cantilever_without_fixed_end_moment() {
        // Support at the left end carries 20 kN; tip load 20 kN at 4 m
        let beam = BeamRecord::new("V", Topology::Cantilever, 4.0, vec![0.0])
            .with_point_load(PointLoad::new(4.0, 20.0));
        let result = analyze(&beam, 5);

        assert_eq!(result.reactions.values(), &[20.0]);
        // No fixed-end moment is modelled, so M grows as R*x along the beam
        assert_eq!(result.moment, vec![0.0, 20.0, 40.0, 60.0, 80.0]);
        assert_eq!(result.max_moment, 80.0);
        assert_eq!(result.max_moment_position, 4.0);
        assert_eq!(result.min_moment, 0.0);
    }

    #[test]
    fn test_repeat_evaluation_is_bit_identical() {
        let beam = BeamRecord::new("V", Topology::Continuous, 9.0, vec![0.0, 4.5, 9.0])
            .with_point_load(PointLoad::new(2.2, 13.7))
            .with_distributed_load(DistributedLoad::new(0.3, 8.1, 3.3));
        let first = analyze(&beam, 500);
        let second = analyze(&beam, 500);
        assert_eq!(first.shear, second.shear);
        assert_eq!(first.moment, second.moment);
    }

    #[test]
    fn test_samples_iterator() {
        let beam = BeamRecord::new("V", Topology::SimplySupported, 10.0, vec![0.0, 10.0])
            .with_point_load(PointLoad::new(5.0, 100.0));
        let result = analyze(&beam, 3);
        let samples: Vec<_> = result.samples().collect();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1], SectionSample { x: 5.0, shear: -50.0, moment: 250.0 });
        assert!(result.is_finite());
    }
}
