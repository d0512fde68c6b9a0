//! Support Reactions
//!
//! Topology-specific reaction rules. All reactions are positive upward and
//! returned in the same order as [`BeamRecord::supports`].
//!
//! ## Rules
//! - **Simply supported** (supports `a < b`): `Rb = M0 / (b - a)` where `M0` is
//!   the load moment about x = 0, then `Ra = W - Rb`. The moment is not
//!   re-based to `a`, so the result is exact only when `a = 0`.
//! - **Cantilever**: the single support carries the full load `W`. No fixed-end
//!   moment is modelled.
//! - **Continuous**: each of the `n` supports carries `W / n`, regardless of
//!   spacing or load position. This is an approximation, not an indeterminate
//!   analysis.
//!
//! ## Example
//! ```rust
//! use beam_core::calculations::beam::{BeamRecord, Topology};
//! use beam_core::calculations::reactions::solve_reactions;
//! use beam_core::loads::PointLoad;
//!
//! let beam = BeamRecord::new("V1", Topology::SimplySupported, 10.0, vec![0.0, 10.0])
//!     .with_point_load(PointLoad::new(5.0, 100.0));
//!
//! assert_eq!(solve_reactions(&beam).values(), &[50.0, 50.0]);
//! ```

use serde::{Deserialize, Serialize};

use super::beam::{BeamRecord, Topology};

/// Support reactions, one per support, in support order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionSet(Vec<f64>);

impl ReactionSet {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Reaction labels in report order: RA, RB, RC, ...
    pub fn labels(&self) -> Vec<String> {
        (0..self.0.len()).map(reaction_label).collect()
    }

    /// Pair each reaction with its support position
    pub fn with_positions<'a>(&'a self, supports: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
        supports.iter().copied().zip(self.0.iter().copied())
    }
}

/// Label for the reaction at support `index` (0-based): "RA", "RB", ...
///
/// Past "RZ" the label falls back to the 1-based support number.
pub fn reaction_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => format!("R{}", char::from(b'A' + i)),
        _ => format!("R{}", index + 1),
    }
}

/// Compute support reactions for a validated beam.
///
/// The record is assumed to have passed validation; support counts are not
/// re-checked here.
pub fn solve_reactions(beam: &BeamRecord) -> ReactionSet {
    let total_load = beam.total_load();

    let reactions = match beam.topology {
        Topology::SimplySupported => {
            let a = beam.supports[0];
            let b = beam.supports[1];
            let span = b - a;
            let rb = beam.total_moment_about_origin() / span;
            let ra = total_load - rb;
            vec![ra, rb]
        }
        Topology::Cantilever => vec![total_load],
        Topology::Continuous => continuous_equal_share(total_load, beam.support_count()),
    };

    ReactionSet(reactions)
}

/// Equal share of the total load at every support.
fn continuous_equal_share(total_load: f64, support_count: usize) -> Vec<f64> {
    let share = total_load / support_count as f64;
    vec![share; support_count]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{DistributedLoad, PointLoad};

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if b.abs() < 1e-10 {
            a.abs() < tol
        } else {
            ((a - b) / b).abs() < tol
        }
    }

    #[test]
    fn test_unloaded_beams_have_zero_reactions() {
        for (topology, supports) in [
            (Topology::SimplySupported, vec![0.0, 6.0]),
            (Topology::Cantilever, vec![0.0]),
            (Topology::Continuous, vec![0.0, 3.0, 6.0]),
        ] {
            let beam = BeamRecord::new("V", topology, 6.0, supports);
            let reactions = solve_reactions(&beam);
            assert!(reactions.values().iter().all(|r| *r == 0.0));
        }
    }

    #[test]
    fn test_simply_supported_midspan_point_load() {
        let beam = BeamRecord::new("V", Topology::SimplySupported, 8.0, vec![0.0, 8.0])
            .with_point_load(PointLoad::new(4.0, 30.0));
        assert_eq!(solve_reactions(&beam).values(), &[15.0, 15.0]);
    }

    #[test]
    fn test_simply_supported_asymmetric_point_load() {
        // 1000 at 3 on a 10 span: Ra = 700, Rb = 300
        let beam = BeamRecord::new("V", Topology::SimplySupported, 10.0, vec![0.0, 10.0])
            .with_point_load(PointLoad::new(3.0, 1000.0));
        let r = solve_reactions(&beam);
        assert!(approx_eq(r.values()[0], 700.0, EPSILON));
        assert!(approx_eq(r.values()[1], 300.0, EPSILON));
    }

    #[test]
    fn test_simply_supported_force_equilibrium() {
        let beam = BeamRecord::new("V", Topology::SimplySupported, 12.0, vec![1.0, 11.0])
            .with_point_load(PointLoad::new(2.5, 17.0))
            .with_distributed_load(DistributedLoad::new(3.0, 9.5, 4.25));
        let r = solve_reactions(&beam);
        assert!(approx_eq(r.sum(), beam.total_load(), EPSILON));
    }

    #[test]
    fn test_simply_supported_uses_origin_moment() {
        // Supports at 2 and 10, load 80 at 6: M0 = 480, span = 8 -> Rb = 60
        let beam = BeamRecord::new("V", Topology::SimplySupported, 10.0, vec![2.0, 10.0])
            .with_point_load(PointLoad::new(6.0, 80.0));
        assert_eq!(solve_reactions(&beam).values(), &[20.0, 60.0]);
    }

    #[test]
    fn test_cantilever_carries_total_load() {
        let beam = BeamRecord::new("V", Topology::Cantilever, 5.0, vec![0.0])
            .with_point_load(PointLoad::new(5.0, 12.0))
            .with_distributed_load(DistributedLoad::new(0.0, 5.0, 2.0));
        assert_eq!(solve_reactions(&beam).values(), &[22.0]);
    }

    #[test]
    fn test_continuous_equal_share_ignores_positions() {
        let loads = DistributedLoad::new(0.0, 12.0, 3.0);
        let a = BeamRecord::new("V", Topology::Continuous, 12.0, vec![0.0, 6.0, 12.0])
            .with_distributed_load(loads);
        let b = BeamRecord::new("V", Topology::Continuous, 12.0, vec![0.0, 1.0, 2.0])
            .with_distributed_load(loads);

        let ra = solve_reactions(&a);
        assert_eq!(ra.values(), &[12.0, 12.0, 12.0]);
        assert_eq!(ra, solve_reactions(&b));
    }

    #[test]
    fn test_reaction_labels() {
        assert_eq!(reaction_label(0), "RA");
        assert_eq!(reaction_label(2), "RC");
        assert_eq!(reaction_label(25), "RZ");
        assert_eq!(reaction_label(26), "R27");
    }
}
