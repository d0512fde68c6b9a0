//! Load definitions
//!
//! Two load shapes are supported: concentrated point loads and uniformly
//! distributed loads over an interval. On the wire they are tagged by `tipo`
//! (`"pontual"` / `"distribuida"`), matching the spreadsheet format the
//! records come from.

use serde::{Deserialize, Serialize};

/// Concentrated force acting downward at `position` (m from the left end).
///
/// # Example
/// ```
/// use beam_core::loads::PointLoad;
///
/// let p = PointLoad::new(5.0, 100.0);
/// assert_eq!(p.moment_about_origin(), 500.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    /// Distance from the left end (m)
    #[serde(rename = "pos")]
    pub position: f64,
    /// Force (kN), positive downward
    #[serde(rename = "valor")]
    pub magnitude: f64,
}

impl PointLoad {
    pub fn new(position: f64, magnitude: f64) -> Self {
        PointLoad { position, magnitude }
    }

    /// Moment of this load about x = 0
    pub fn moment_about_origin(&self) -> f64 {
        self.magnitude * self.position
    }
}

/// Uniform load of constant `intensity` (kN/m) over `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Start of the loaded interval (m)
    #[serde(rename = "inicio")]
    pub start: f64,
    /// End of the loaded interval (m)
    #[serde(rename = "fim")]
    pub end: f64,
    /// Force per unit length (kN/m), positive downward
    #[serde(rename = "intensidade")]
    pub intensity: f64,
}

impl DistributedLoad {
    pub fn new(start: f64, end: f64, intensity: f64) -> Self {
        DistributedLoad { start, end, intensity }
    }

    /// Length of the loaded interval
    pub fn loaded_length(&self) -> f64 {
        self.end - self.start
    }

    /// Total force of the load: w(b - a)
    pub fn resultant(&self) -> f64 {
        self.intensity * self.loaded_length()
    }

    /// Position of the resultant: (a + b) / 2
    pub fn centroid(&self) -> f64 {
        (self.end + self.start) / 2.0
    }

    /// Moment of the resultant about x = 0
    pub fn moment_about_origin(&self) -> f64 {
        self.resultant() * self.centroid()
    }
}

/// A single load applied to a beam.
///
/// # Example
/// ```
/// use beam_core::loads::Load;
///
/// let load: Load = serde_json::from_str(r#"{"tipo": "pontual", "pos": 2.0, "valor": 10.0}"#).unwrap();
/// assert!(matches!(load, Load::Point(_)));
/// assert_eq!(load.tag(), "pontual");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo")]
pub enum Load {
    #[serde(rename = "pontual")]
    Point(PointLoad),
    #[serde(rename = "distribuida")]
    Distributed(DistributedLoad),
}

impl Load {
    /// Wire tag used in the `Cargas JSON` column
    pub fn tag(&self) -> &'static str {
        match self {
            Load::Point(_) => "pontual",
            Load::Distributed(_) => "distribuida",
        }
    }

    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Load::Point(_) => "Point",
            Load::Distributed(_) => "Distributed",
        }
    }
}

impl From<PointLoad> for Load {
    fn from(load: PointLoad) -> Self {
        Load::Point(load)
    }
}

impl From<DistributedLoad> for Load {
    fn from(load: DistributedLoad) -> Self {
        Load::Distributed(load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distributed_resultant_and_centroid() {
        let d = DistributedLoad::new(2.0, 8.0, 10.0);
        assert_eq!(d.loaded_length(), 6.0);
        assert_eq!(d.resultant(), 60.0);
        assert_eq!(d.centroid(), 5.0);
        assert_eq!(d.moment_about_origin(), 300.0);
    }

    #[test]
    fn test_wire_format() {
        let load = Load::Distributed(DistributedLoad::new(0.0, 4.0, 2.5));
        let json = serde_json::to_value(load).unwrap();
        assert_eq!(json["tipo"], "distribuida");
        assert_eq!(json["inicio"], 0.0);
        assert_eq!(json["fim"], 4.0);
        assert_eq!(json["intensidade"], 2.5);
    }

    #[test]
    fn test_point_load_parses_from_wire() {
        let load: Load =
            serde_json::from_str(r#"{"tipo": "pontual", "pos": 5, "valor": 100}"#).unwrap();
        assert_eq!(load, Load::Point(PointLoad::new(5.0, 100.0)));
    }
}
