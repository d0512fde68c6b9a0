//! # Beam Row Validation
//!
//! Turns one raw workbook row into a [`BeamRecord`], or explains precisely why
//! it cannot. Checks run in a fixed order and stop at the first failure:
//!
//! 1. topology label
//! 2. length
//! 3. support positions
//! 4. load list and each load's type
//! 5. point load fields and range
//! 6. distributed load fields and interval
//! 7. support count (and span direction) for the topology
//!
//! The validator only rejects what it checks; physically odd but well-formed
//! input (negative load values, supports out of order on a continuous beam)
//! passes through.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::errors::ValidationErrorKind;
//! use beam_core::validation::validate_row;
//! use beam_core::workbook::BeamRow;
//! use serde_json::json;
//!
//! let row = BeamRow::new("V1", json!("biapoiada"), json!(10), json!("[3, 1]"), json!("[]"));
//! let err = validate_row(&row).unwrap_err();
//! assert_eq!(err.kind, ValidationErrorKind::DegenerateSpan);
//! ```

use serde_json::{Map, Value};

use crate::calculations::beam::{BeamRecord, Topology};
use crate::errors::{ValidationError, ValidationErrorKind as Kind};
use crate::loads::{DistributedLoad, Load, PointLoad};
use crate::workbook::{BeamRow, COL_LOADS, COL_SUPPORTS};

/// Validate a row and build the beam record it describes.
pub fn validate_row(row: &BeamRow) -> Result<BeamRecord, ValidationError> {
    let topology = parse_topology(&row.topology)?;
    let length = parse_length(&row.length)?;
    let supports = parse_supports(&row.supports, length)?;
    let loads = parse_loads(&row.loads, length)?;
    check_support_count(topology, &supports)?;

    Ok(BeamRecord::new(row.id.clone(), topology, length, supports).with_loads(loads))
}

fn parse_topology(cell: &Value) -> Result<Topology, ValidationError> {
    let raw = cell_text(cell);
    Topology::from_label(&raw).ok_or_else(|| {
        ValidationError::new(
            Kind::InvalidTopology,
            format!(
                "Invalid beam type '{}'. Accepted types: 'biapoiada', 'balanço', 'contínua'.",
                raw
            ),
        )
    })
}

fn parse_length(cell: &Value) -> Result<f64, ValidationError> {
    let length = match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match length {
        Some(l) if l.is_finite() && l > 0.0 => Ok(l),
        Some(_) => Err(ValidationError::new(
            Kind::InvalidLength,
            "The beam length (L) must be a positive value.",
        )),
        None => Err(ValidationError::new(
            Kind::InvalidLength,
            format!("The beam length (L) must be a number, got '{}'.", cell_text(cell)),
        )),
    }
}

fn parse_supports(cell: &Value, length: f64) -> Result<Vec<f64>, ValidationError> {
    let invalid = |message: &str| ValidationError::new(Kind::InvalidSupports, message);

    let payload = json_payload(cell).ok_or_else(|| {
        invalid(&format!("The '{}' field is not valid JSON.", COL_SUPPORTS))
    })?;

    let positions = payload
        .as_array()
        .and_then(|items| items.iter().map(number).collect::<Option<Vec<f64>>>())
        .ok_or_else(|| {
            invalid(&format!("The '{}' field must be a JSON list of numbers.", COL_SUPPORTS))
        })?;

    if !positions.iter().all(|&a| within(a, 0.0, length)) {
        return Err(invalid(
            "Support positions must lie within the beam length (0 to L).",
        ));
    }

    Ok(positions)
}

fn parse_loads(cell: &Value, length: f64) -> Result<Vec<Load>, ValidationError> {
    let payload = json_payload(cell).ok_or_else(|| {
        ValidationError::new(
            Kind::InvalidLoadType,
            format!("The '{}' field is not valid JSON.", COL_LOADS),
        )
    })?;

    let entries = payload.as_array().ok_or_else(|| {
        ValidationError::new(
            Kind::InvalidLoadType,
            format!("The '{}' field must be a JSON list.", COL_LOADS),
        )
    })?;

    entries
        .iter()
        .map(|entry| {
            let object = entry.as_object().ok_or_else(|| {
                ValidationError::new(
                    Kind::InvalidLoadType,
                    format!("Each load in '{}' must be a JSON object.", COL_LOADS),
                )
            })?;
            parse_load(object, length)
        })
        .collect()
}

fn parse_load(object: &Map<String, Value>, length: f64) -> Result<Load, ValidationError> {
    match object.get("tipo").and_then(Value::as_str) {
        Some("pontual") => parse_point_load(object, length).map(Load::Point),
        Some("distribuida") => parse_distributed_load(object, length).map(Load::Distributed),
        _ => Err(ValidationError::new(
            Kind::InvalidLoadType,
            "Invalid load type. Must be 'pontual' or 'distribuida'.",
        )),
    }
}

fn parse_point_load(object: &Map<String, Value>, length: f64) -> Result<PointLoad, ValidationError> {
    let invalid = |message: &str| ValidationError::new(Kind::InvalidPointLoad, message);

    let [pos, valor] = required_numbers(object, ["pos", "valor"]).map_err(|missing| match missing {
        FieldProblem::Missing => invalid("A point load must have 'pos' and 'valor'."),
        FieldProblem::NotNumeric => invalid("Point load position and value must be numbers."),
    })?;

    if !within(pos, 0.0, length) {
        return Err(invalid(
            "The point load position must lie within the beam length (0 to L).",
        ));
    }

    Ok(PointLoad::new(pos, valor))
}

fn parse_distributed_load(
    object: &Map<String, Value>,
    length: f64,
) -> Result<DistributedLoad, ValidationError> {
    let invalid = |message: &str| ValidationError::new(Kind::InvalidDistributedLoad, message);

    let [inicio, fim, intensidade] = required_numbers(object, ["inicio", "fim", "intensidade"])
        .map_err(|missing| match missing {
            FieldProblem::Missing => {
                invalid("A distributed load must have 'inicio', 'fim' and 'intensidade'.")
            }
            FieldProblem::NotNumeric => {
                invalid("Distributed load start, end and intensity must be numbers.")
            }
        })?;

    if !(0.0 <= inicio && inicio < fim && fim <= length) {
        return Err(invalid(
            "The distributed load interval must lie within the beam length (0 to L) with 'inicio' < 'fim'.",
        ));
    }

    Ok(DistributedLoad::new(inicio, fim, intensidade))
}

fn check_support_count(topology: Topology, supports: &[f64]) -> Result<(), ValidationError> {
    match topology {
        Topology::SimplySupported => {
            if supports.len() != 2 {
                return Err(ValidationError::new(
                    Kind::InvalidSupportCount,
                    "A simply supported beam must have exactly 2 supports.",
                ));
            }
            if supports[1] - supports[0] <= 0.0 {
                return Err(ValidationError::new(
                    Kind::DegenerateSpan,
                    "For a simply supported beam, the second support must be positioned after the first.",
                ));
            }
        }
        Topology::Cantilever => {
            if supports.len() != 1 {
                return Err(ValidationError::new(
                    Kind::InvalidSupportCount,
                    "A cantilever beam must have exactly 1 support.",
                ));
            }
        }
        Topology::Continuous => {
            if supports.len() < 2 {
                return Err(ValidationError::new(
                    Kind::InvalidSupportCount,
                    "A continuous beam must have at least 2 supports.",
                ));
            }
        }
    }
    Ok(())
}

enum FieldProblem {
    Missing,
    NotNumeric,
}

/// Fetch `N` numeric fields. Presence of every key is checked before types.
fn required_numbers<const N: usize>(
    object: &Map<String, Value>,
    keys: [&str; N],
) -> Result<[f64; N], FieldProblem> {
    if !keys.iter().all(|k| object.contains_key(*k)) {
        return Err(FieldProblem::Missing);
    }
    let mut values = [0.0; N];
    for (slot, key) in values.iter_mut().zip(keys) {
        *slot = object.get(key).and_then(number).ok_or(FieldProblem::NotNumeric)?;
    }
    Ok(values)
}

/// A cell holding JSON: either text to be parsed or an already structured value.
fn json_payload(cell: &Value) -> Option<Value> {
    match cell {
        Value::String(s) => serde_json::from_str(s).ok(),
        Value::Array(_) => Some(cell.clone()),
        _ => None,
    }
}

/// Finite JSON numbers only; booleans and numeric strings are rejected.
fn number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn within(value: f64, low: f64, high: f64) -> bool {
    low <= value && value <= high
}

/// Text of a cell as the user typed it
fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
