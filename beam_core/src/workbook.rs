//! # Workbook Input
//!
//! Beam definitions arrive as a workbook: named sheets, each a list of rows,
//! each row a map from column header to cell value. On disk a workbook is a
//! JSON document:
//!
//! ```json
//! {
//!   "Vigas": [
//!     {
//!       "ID": "V1",
//!       "Tipo": "biapoiada",
//!       "L (m)": 10,
//!       "Apoios (m)": "[0, 10]",
//!       "Cargas JSON": "[{\"tipo\": \"pontual\", \"pos\": 5, \"valor\": 100}]"
//!     }
//!   ]
//! }
//! ```
//!
//! Only the `Vigas` sheet is read. A missing sheet or missing required
//! columns is fatal for the whole run; problems inside a row are left to the
//! validator and only reject that row.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::workbook::Workbook;
//!
//! let workbook = Workbook::from_json_str(r#"{"Vigas": [{"ID": "V1", "Tipo": "balanço",
//!     "L (m)": 3, "Apoios (m)": "[0]", "Cargas JSON": "[]"}]}"#)?;
//! let rows = workbook.beam_rows()?;
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].id, "V1");
//! # Ok::<(), beam_core::errors::CalcError>(())
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::{CalcError, CalcResult};

/// Name of the sheet holding beam rows
pub const BEAM_SHEET: &str = "Vigas";

pub const COL_ID: &str = "ID";
pub const COL_TOPOLOGY: &str = "Tipo";
pub const COL_LENGTH: &str = "L (m)";
pub const COL_SUPPORTS: &str = "Apoios (m)";
pub const COL_LOADS: &str = "Cargas JSON";

/// Required columns, in the order they are reported when missing
pub const REQUIRED_COLUMNS: [&str; 5] = [COL_ID, COL_TOPOLOGY, COL_LENGTH, COL_SUPPORTS, COL_LOADS];

/// One unvalidated beam row.
///
/// Cells are kept as raw JSON values; interpreting them is the validator's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamRow {
    /// Spreadsheet line number (header is line 1, first data row is line 2)
    pub line: usize,
    /// Row identifier, or "Linha {line}" when the cell is blank
    pub id: String,
    pub topology: Value,
    pub length: Value,
    pub supports: Value,
    pub loads: Value,
}

impl BeamRow {
    /// Build a row directly from cell values (first data line)
    pub fn new(
        id: impl Into<String>,
        topology: Value,
        length: Value,
        supports: Value,
        loads: Value,
    ) -> Self {
        BeamRow {
            line: 2,
            id: id.into(),
            topology,
            length,
            supports,
            loads,
        }
    }

    fn from_cells(index: usize, cells: &Map<String, Value>) -> Self {
        let line = index + 2;
        let cell = |name: &str| cells.get(name).cloned().unwrap_or(Value::Null);

        let id = match cells.get(COL_ID) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => format!("Linha {}", line),
        };

        BeamRow {
            line,
            id,
            topology: cell(COL_TOPOLOGY),
            length: cell(COL_LENGTH),
            supports: cell(COL_SUPPORTS),
            loads: cell(COL_LOADS),
        }
    }
}

/// A parsed workbook: sheet name to rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Workbook {
    pub sheets: BTreeMap<String, Vec<Map<String, Value>>>,
}

impl Workbook {
    /// Parse a workbook from JSON text
    pub fn from_json_str(text: &str) -> CalcResult<Self> {
        serde_json::from_str(text).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid workbook JSON: {}", e),
        })
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// Column headers present in a sheet (union over all rows)
    pub fn columns(&self, sheet: &str) -> Option<BTreeSet<&str>> {
        self.sheets.get(sheet).map(|rows| {
            rows.iter()
                .flat_map(|row| row.keys().map(String::as_str))
                .collect()
        })
    }

    /// Rows of the beam sheet, after checking the sheet and its columns.
    ///
    /// # Errors
    ///
    /// * `MissingSheet` - no sheet named [`BEAM_SHEET`]
    /// * `MissingColumns` - the sheet has rows but lacks required headers
    pub fn beam_rows(&self) -> CalcResult<Vec<BeamRow>> {
        let rows = self
            .sheets
            .get(BEAM_SHEET)
            .ok_or_else(|| CalcError::missing_sheet(BEAM_SHEET))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let columns = self.columns(BEAM_SHEET).unwrap_or_default();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !columns.contains(*c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CalcError::missing_columns(BEAM_SHEET, missing));
        }

        Ok(rows
            .iter()
            .enumerate()
            .map(|(index, cells)| BeamRow::from_cells(index, cells))
            .collect())
    }

    /// Example workbook with one beam per topology and an instructions sheet
    pub fn template() -> Self {
        let beams = vec![
            template_row(
                "V1",
                "biapoiada",
                6.0,
                "[0, 6]",
                r#"[{"tipo": "pontual", "pos": 3, "valor": 20}, {"tipo": "distribuida", "inicio": 0, "fim": 6, "intensidade": 5}]"#,
            ),
            template_row(
                "V2",
                "balanço",
                3.0,
                "[0]",
                r#"[{"tipo": "pontual", "pos": 3, "valor": 10}]"#,
            ),
            template_row(
                "V3",
                "contínua",
                12.0,
                "[0, 6, 12]",
                r#"[{"tipo": "distribuida", "inicio": 0, "fim": 12, "intensidade": 8}]"#,
            ),
        ];

        let instructions: Vec<Map<String, Value>> = [
            (COL_ID, "Beam identifier shown in the report. May repeat."),
            (COL_TOPOLOGY, "One of: biapoiada, balanço, contínua."),
            (COL_LENGTH, "Beam length in metres, greater than zero."),
            (COL_SUPPORTS, "JSON list of support positions in metres, each between 0 and L. biapoiada: 2, balanço: 1, contínua: 2 or more."),
            (COL_LOADS, "JSON list of loads: {\"tipo\": \"pontual\", \"pos\", \"valor\"} in kN or {\"tipo\": \"distribuida\", \"inicio\", \"fim\", \"intensidade\"} in kN/m."),
        ]
        .iter()
        .map(|(column, text)| {
            let mut row = Map::new();
            row.insert("Coluna".to_string(), json!(column));
            row.insert("Descrição".to_string(), json!(text));
            row
        })
        .collect();

        let mut sheets = BTreeMap::new();
        sheets.insert(BEAM_SHEET.to_string(), beams);
        sheets.insert("Instruções".to_string(), instructions);
        Workbook { sheets }
    }
}

fn template_row(id: &str, topology: &str, length: f64, supports: &str, loads: &str) -> Map<String, Value> {
    let mut row = Map::new();
    row.insert(COL_ID.to_string(), json!(id));
    row.insert(COL_TOPOLOGY.to_string(), json!(topology));
    row.insert(COL_LENGTH.to_string(), json!(length));
    row.insert(COL_SUPPORTS.to_string(), json!(supports));
    row.insert(COL_LOADS.to_string(), json!(loads));
    row
}

/// Read a workbook from disk.
///
/// # Errors
///
/// * `FileError` - the file cannot be opened or read
/// * `SerializationError` - the contents are not a valid workbook
pub fn load_workbook(path: &Path) -> CalcResult<Workbook> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    Workbook::from_json_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_row;

    #[test]
    fn test_missing_sheet() {
        let workbook = Workbook::from_json_str(r#"{"Plan1": []}"#).unwrap();
        assert_eq!(
            workbook.beam_rows().unwrap_err(),
            CalcError::missing_sheet("Vigas")
        );
    }

    #[test]
    fn test_missing_columns_listed_in_order() {
        let workbook = Workbook::from_json_str(
            r#"{"Vigas": [{"ID": "V1", "Tipo": "biapoiada", "L (m)": 4}]}"#,
        )
        .unwrap();
        match workbook.beam_rows().unwrap_err() {
            CalcError::MissingColumns { sheet, missing } => {
                assert_eq!(sheet, "Vigas");
                assert_eq!(missing, vec!["Apoios (m)", "Cargas JSON"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_columns_are_union_of_rows() {
        // Second row lacks "Cargas JSON": columns are still present sheet-wide
        let workbook = Workbook::from_json_str(
            r#"{"Vigas": [
                {"ID": "V1", "Tipo": "balanço", "L (m)": 2, "Apoios (m)": "[0]", "Cargas JSON": "[]"},
                {"ID": "V2", "Tipo": "balanço", "L (m)": 2, "Apoios (m)": "[0]"}
            ]}"#,
        )
        .unwrap();
        let rows = workbook.beam_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].loads, Value::Null);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_blank_id_falls_back_to_line() {
        let workbook = Workbook::from_json_str(
            r#"{"Vigas": [
                {"ID": "V1", "Tipo": "x", "L (m)": 1, "Apoios (m)": "[]", "Cargas JSON": "[]"},
                {"ID": "  ", "Tipo": "x", "L (m)": 1, "Apoios (m)": "[]", "Cargas JSON": "[]"},
                {"ID": 7, "Tipo": "x", "L (m)": 1, "Apoios (m)": "[]", "Cargas JSON": "[]"}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<_> = workbook.beam_rows().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["V1", "Linha 3", "7"]);
    }

    #[test]
    fn test_empty_sheet_has_no_rows() {
        let workbook = Workbook::from_json_str(r#"{"Vigas": []}"#).unwrap();
        assert!(workbook.beam_rows().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let err = Workbook::from_json_str("{not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_workbook_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_workbook(&dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_template_rows_validate() {
        let rows = Workbook::template().beam_rows().unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert!(validate_row(row).is_ok(), "template row {} invalid", row.id);
        }
    }
}
