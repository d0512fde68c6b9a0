//! Internal Force Evaluation
//!
//! Shear force V(x) and bending moment M(x) at any section, by summing the
//! contributions of everything at or to the left of the section.
//!
//! ## Sign Convention
//! - Reactions positive upward, loads positive downward
//! - Positive shear: resultant of the left part acts upward
//! - Positive moment: sagging
//!
//! Every evaluation is independent, so sections can be sampled in any order
//! (or concurrently) with identical results.
//!
//! ## Example
//! ```rust
//! use beam_core::calculations::internal_forces::{moment_at, shear_at};
//! use beam_core::loads::PointLoad;
//!
//! let supports = [0.0, 10.0];
//! let reactions = [50.0, 50.0];
//! let points = [PointLoad::new(5.0, 100.0)];
//!
//! assert_eq!(shear_at(2.0, &reactions, &supports, &points, &[]), 50.0);
//! assert_eq!(moment_at(5.0, &reactions, &supports, &points, &[]), 250.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::loads::{DistributedLoad, PointLoad};

/// Shear and moment at one section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionSample {
    /// Section position (m)
    pub x: f64,
    /// Shear force (kN)
    pub shear: f64,
    /// Bending moment (kN·m)
    pub moment: f64,
}

/// Shear force at `x`.
///
/// Reactions at supports with position <= x add, point loads with position
/// <= x subtract, and each distributed load subtracts the part of its
/// resultant lying at or before `x`.
pub fn shear_at(
    x: f64,
    reactions: &[f64],
    supports: &[f64],
    point_loads: &[PointLoad],
    distributed_loads: &[DistributedLoad],
) -> f64 {
    let mut v = 0.0;

    for (support, reaction) in supports.iter().zip(reactions) {
        if x >= *support {
            v += reaction;
        }
    }

    for load in point_loads {
        if x >= load.position {
            v -= load.magnitude;
        }
    }

    for load in distributed_loads {
        if x >= load.end {
            v -= load.resultant();
        } else if x >= load.start {
            v -= load.intensity * (x - load.start);
        }
    }

    v
}

/// Bending moment at `x`.
///
/// Same superposition as [`shear_at`], with every force multiplied by its
/// lever arm to the section. For a distributed load only the portion between
/// `start` and `min(x, end)` contributes, acting at that portion's centroid.
pub fn moment_at(
    x: f64,
    reactions: &[f64],
    supports: &[f64],
    point_loads: &[PointLoad],
    distributed_loads: &[DistributedLoad],
) -> f64 {
    let mut m = 0.0;

    for (support, reaction) in supports.iter().zip(reactions) {
        if x >= *support {
            m += reaction * (x - support);
        }
    }

    for load in point_loads {
        if load.position <= x {
            m -= load.magnitude * (x - load.position);
        }
    }

    for load in distributed_loads {
        if x <= load.start {
            continue;
        }
        let (loaded_length, centroid) = if x >= load.end {
            (load.loaded_length(), load.centroid())
        } else {
            (x - load.start, (load.start + x) / 2.0)
        };
        m -= load.intensity * loaded_length * (x - centroid);
    }

    m
}

/// A solved beam bound to its reactions, for repeated section evaluation.
#[derive(Debug, Clone, Copy)]
pub struct InternalForces<'a> {
    pub reactions: &'a [f64],
    pub supports: &'a [f64],
    pub point_loads: &'a [PointLoad],
    pub distributed_loads: &'a [DistributedLoad],
}

impl<'a> InternalForces<'a> {
    pub fn new(
        reactions: &'a [f64],
        supports: &'a [f64],
        point_loads: &'a [PointLoad],
        distributed_loads: &'a [DistributedLoad],
    ) -> Self {
        InternalForces {
            reactions,
            supports,
            point_loads,
            distributed_loads,
        }
    }

    pub fn shear_at(&self, x: f64) -> f64 {
        shear_at(x, self.reactions, self.supports, self.point_loads, self.distributed_loads)
    }

    pub fn moment_at(&self, x: f64) -> f64 {
        moment_at(x, self.reactions, self.supports, self.point_loads, self.distributed_loads)
    }

    pub fn section_at(&self, x: f64) -> SectionSample {
        SectionSample {
            x,
            shear: self.shear_at(x),
            moment: self.moment_at(x),
        }
    }

    /// Evaluate every position in `positions`, preserving their order
    pub fn sample(&self, positions: &[f64]) -> Vec<SectionSample> {
        positions.iter().map(|&x| self.section_at(x)).collect()
    }
}

/// `n` evenly spaced positions from 0 to `length`, both ends included.
///
/// `n = 0` gives an empty grid and `n = 1` gives `[0.0]`.
pub fn uniform_grid(length: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = length / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { length } else { step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < TOL
    }

    fn midspan_case() -> ([f64; 2], [f64; 2], [PointLoad; 1]) {
        ([50.0, 50.0], [0.0, 10.0], [PointLoad::new(5.0, 100.0)])
    }

    #[test]
    fn test_point_load_shear_jump() {
        let (reactions, supports, points) = midspan_case();
        let forces = InternalForces::new(&reactions, &supports, &points, &[]);

        assert_eq!(forces.shear_at(0.0), 50.0);
        assert_eq!(forces.shear_at(5.0 - 1e-9), 50.0);
        assert_eq!(forces.shear_at(5.0 + 1e-9), -50.0);
        assert_eq!(forces.shear_at(10.0 - 1e-9), -50.0);
        // The right reaction closes the diagram at the support itself
        assert_eq!(forces.shear_at(10.0), 0.0);
    }

    #[test]
    fn test_point_load_moment() {
        let (reactions, supports, points) = midspan_case();
        let forces = InternalForces::new(&reactions, &supports, &points, &[]);

        assert_eq!(forces.moment_at(0.0), 0.0);
        assert_eq!(forces.moment_at(5.0), 250.0);
        assert_eq!(forces.moment_at(2.0), 100.0);
        assert!(close(forces.moment_at(10.0), 0.0));
    }

    #[test]
    fn test_nothing_before_first_support() {
        // Supports at 1 and 9, nothing at the origin
        let reactions = [40.0, 40.0];
        let supports = [1.0, 9.0];
        let distributed = [DistributedLoad::new(1.0, 9.0, 10.0)];
        assert_eq!(shear_at(0.0, &reactions, &supports, &[], &distributed), 0.0);
        assert_eq!(moment_at(0.0, &reactions, &supports, &[], &distributed), 0.0);
    }

    #[test]
    fn test_distributed_load_slope() {
        // Full-span 10 kN/m on 0..10 with 50/50 reactions
        let reactions = [50.0, 50.0];
        let supports = [0.0, 10.0];
        let distributed = [DistributedLoad::new(0.0, 10.0, 10.0)];
        let forces = InternalForces::new(&reactions, &supports, &[], &distributed);

        assert!(close(forces.shear_at(2.0), 30.0));
        assert!(close(forces.shear_at(3.0), 20.0));
        assert!(close(forces.shear_at(5.0), 0.0));
        // wL^2/8 at midspan
        assert!(close(forces.moment_at(5.0), 125.0));
        assert!(close(forces.moment_at(10.0), 0.0));
    }

    #[test]
    fn test_partial_distributed_load() {
        // 6 kN/m over 2..5, reactions chosen arbitrarily
        let reactions = [10.0, 8.0];
        let supports = [0.0, 8.0];
        let distributed = [DistributedLoad::new(2.0, 5.0, 6.0)];
        let forces = InternalForces::new(&reactions, &supports, &[], &distributed);

        // Before the load: only RA
        assert!(close(forces.shear_at(2.0), 10.0));
        assert!(close(forces.moment_at(2.0), 20.0));
        // Inside: 10 - 6*1 and 10*3 - 6*1*0.5
        assert!(close(forces.shear_at(3.0), 4.0));
        assert!(close(forces.moment_at(3.0), 27.0));
        // Past the end: resultant 18 at centroid 3.5
        assert!(close(forces.shear_at(6.0), -8.0));
        assert!(close(forces.moment_at(6.0), 60.0 - 18.0 * 2.5));
    }

    #[test]
    fn test_shear_piecewise_constant_between_events() {
        let (reactions, supports, points) = midspan_case();
        let forces = InternalForces::new(&reactions, &supports, &points, &[]);
        let left: Vec<f64> = [0.5, 1.0, 2.5, 4.9].iter().map(|&x| forces.shear_at(x)).collect();
        assert!(left.iter().all(|v| *v == 50.0));
    }

    #[test]
    fn test_sampling_order_independent() {
        let reactions = [12.0, 30.0];
        let supports = [0.0, 7.0];
        let points = [PointLoad::new(3.3, 20.0)];
        let distributed = [DistributedLoad::new(1.0, 6.0, 4.4)];
        let forces = InternalForces::new(&reactions, &supports, &points, &distributed);

        let grid = uniform_grid(7.0, 50);
        let mut reversed = grid.clone();
        reversed.reverse();

        let forward = forces.sample(&grid);
        let mut backward = forces.sample(&reversed);
        backward.reverse();
        assert_eq!(forward, backward);
        assert_eq!(forward, forces.sample(&grid));
    }

    #[test]
    fn test_uniform_grid() {
        assert!(uniform_grid(10.0, 0).is_empty());
        assert_eq!(uniform_grid(10.0, 1), vec![0.0]);
        assert_eq!(uniform_grid(10.0, 3), vec![0.0, 5.0, 10.0]);

        let grid = uniform_grid(3.7, 500);
        assert_eq!(grid.len(), 500);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[499], 3.7);
    }
}
