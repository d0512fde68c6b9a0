//! Load model and load aggregates
//!
//! # Overview
//!
//! - [`PointLoad`] / [`DistributedLoad`] - the two load shapes
//! - [`Load`] - closed tagged variant over both shapes
//! - [`total_load`] / [`total_moment_about_origin`] - resultant force and its
//!   moment about x = 0, used by the reaction solver
//!
//! # Example
//!
//! ```
//! use beam_core::loads::{total_load, total_moment_about_origin, DistributedLoad, PointLoad};
//!
//! let points = [PointLoad::new(5.0, 100.0)];
//! let distributed = [DistributedLoad::new(0.0, 10.0, 2.0)];
//!
//! assert_eq!(total_load(&points, &distributed), 120.0);
//! assert_eq!(total_moment_about_origin(&points, &distributed), 600.0);
//! ```

pub mod load_types;

pub use load_types::{DistributedLoad, Load, PointLoad};

/// Sum of all point-load magnitudes plus w(b - a) for each distributed load.
pub fn total_load(point_loads: &[PointLoad], distributed_loads: &[DistributedLoad]) -> f64 {
    let points: f64 = point_loads.iter().map(|p| p.magnitude).sum();
    let distributed: f64 = distributed_loads.iter().map(|d| d.resultant()).sum();
    points + distributed
}

/// Moment of every load about the global origin (x = 0).
///
/// Distributed loads act through their resultant at the centroid of the
/// loaded interval.
pub fn total_moment_about_origin(
    point_loads: &[PointLoad],
    distributed_loads: &[DistributedLoad],
) -> f64 {
    let points: f64 = point_loads.iter().map(|p| p.moment_about_origin()).sum();
    let distributed: f64 = distributed_loads
        .iter()
        .map(|d| d.moment_about_origin())
        .sum();
    points + distributed
}

/// Split a mixed load list into point and distributed loads, keeping order.
pub fn partition_loads(loads: &[Load]) -> (Vec<PointLoad>, Vec<DistributedLoad>) {
    let mut points = Vec::new();
    let mut distributed = Vec::new();
    for load in loads {
        match load {
            Load::Point(p) => points.push(*p),
            Load::Distributed(d) => distributed.push(*d),
        }
    }
    (points, distributed)
}
