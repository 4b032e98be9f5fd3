use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::GzDecoder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, ColumnType, Table};
use super::DataError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv.gz` / `.gz` – gzip-compressed CSV with a header row
/// * `.csv`            – plain CSV with a header row
/// * `.json`           – `[{ "Name": "...", "Age": 22, ... }, ...]`
pub fn load_file(path: &Path) -> Result<Table, DataError> {
    if !path.exists() {
        return Err(DataError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "gz" => {
            let file = std::fs::File::open(path)?;
            read_csv(GzDecoder::new(BufReader::new(file)))
        }
        "csv" => {
            let file = std::fs::File::open(path)?;
            read_csv(BufReader::new(file))
        }
        "json" => {
            let text = std::fs::read_to_string(path)?;
            read_json(&text)
        }
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Load-once cache
// ---------------------------------------------------------------------------

/// Memoizes the table loaded from one path. A failed load is not
/// remembered, so the next request reads the file again.
#[derive(Debug)]
pub struct CachedLoader {
    path: PathBuf,
    table: Option<Arc<Table>>,
}

impl CachedLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached table, loading it on first use.
    pub fn get(&mut self) -> Result<Arc<Table>, DataError> {
        if let Some(table) = &self.table {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_file(&self.path)?);
        log::info!(
            "Loaded {} rows x {} columns from {}",
            table.height(),
            table.width(),
            self.path.display()
        );
        self.table = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Point the cache at another file and drop the old table.
    pub fn reload_from(&mut self, path: impl Into<PathBuf>) -> Result<Arc<Table>, DataError> {
        self.path = path.into();
        self.table = None;
        self.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read CSV with a header row. Empty cells become nulls and every column
/// gets a single inferred dtype.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, DataError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() != headers.len() {
            return Err(DataError::Schema(format!(
                "row {row_no} has {} fields, header has {}",
                record.len(),
                headers.len()
            )));
        }
        for (col, field) in record.iter().enumerate() {
            raw[col].push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| parse_column(name, &cells))
        .collect();
    Table::from_columns(columns)
}

fn parse_column(name: String, cells: &[String]) -> Column {
    let dtype = infer_type(cells);
    let values = cells
        .iter()
        .map(|s| parse_cell(s, dtype))
        .collect();
    Column { name, dtype, values }
}

/// Pick the narrowest dtype that fits every non-empty cell.
fn infer_type(cells: &[String]) -> ColumnType {
    let mut non_empty = cells.iter().filter(|s| !s.is_empty()).peekable();
    if non_empty.peek().is_none() {
        return ColumnType::Null;
    }
    let mut dtype = ColumnType::Int64;
    for s in non_empty {
        if s.parse::<i64>().is_ok() {
            continue;
        }
        if s.parse::<f64>().is_ok() {
            dtype = ColumnType::Float64;
            continue;
        }
        return ColumnType::Utf8;
    }
    dtype
}

fn parse_cell(s: &str, dtype: ColumnType) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    match dtype {
        ColumnType::Int64 => s.parse().map(CellValue::Integer).unwrap_or(CellValue::Null),
        ColumnType::Float64 => s.parse().map(CellValue::Float).unwrap_or(CellValue::Null),
        ColumnType::Utf8 => CellValue::Str(s.to_string()),
        ColumnType::Null => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.write_json()` style):
///
/// ```json
/// [
///   { "PassengerId": 1, "Name": "Braund, Mr. Owen Harris", "Age": 22.0 },
///   ...
/// ]
/// ```
fn read_json(text: &str) -> Result<Table, DataError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataError::Schema("expected top-level JSON array".into()))?;

    // Column order: first appearance across records.
    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::Schema(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let cells: Vec<CellValue> = records
                .iter()
                .map(|rec| rec.get(&name).map_or(CellValue::Null, json_to_cell))
                .collect();
            unify_column(name, cells)
        })
        .collect();
    Table::from_columns(columns)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Str(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Str(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::Str(other.to_string()),
    }
}

/// Give a column of already-typed cells one dtype: ints widen to floats,
/// anything mixed with text becomes text.
fn unify_column(name: String, cells: Vec<CellValue>) -> Column {
    let has = |pred: fn(&CellValue) -> bool| cells.iter().any(pred);
    let dtype = if has(|c| matches!(c, CellValue::Str(_))) {
        ColumnType::Utf8
    } else if has(|c| matches!(c, CellValue::Float(_))) {
        ColumnType::Float64
    } else if has(|c| matches!(c, CellValue::Integer(_))) {
        ColumnType::Int64
    } else {
        ColumnType::Null
    };

    let values = cells
        .into_iter()
        .map(|c| match (dtype, c) {
            (_, CellValue::Null) => CellValue::Null,
            (ColumnType::Float64, CellValue::Integer(i)) => CellValue::Float(i as f64),
            (ColumnType::Utf8, c @ CellValue::Str(_)) => c,
            (ColumnType::Utf8, other) => CellValue::Str(other.to_string()),
            (_, c) => c,
        })
        .collect();
    Column { name, dtype, values }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;
    use crate::data::fixtures;

    #[test]
    fn test_infer_types_per_column() {
        let table = fixtures::manifest();
        let schema: Vec<(String, ColumnType)> = table.schema();
        let dtype = |name: &str| schema.iter().find(|(n, _)| n == name).unwrap().1;
        assert_eq!(dtype("PassengerId"), ColumnType::Int64);
        assert_eq!(dtype("Age"), ColumnType::Int64);
        assert_eq!(dtype("Fare"), ColumnType::Float64);
        assert_eq!(dtype("Name"), ColumnType::Utf8);
        assert_eq!(dtype("Ticket"), ColumnType::Utf8);
        assert_eq!(table.height(), 12);
        assert_eq!(table.width(), 12);
    }

    #[test]
    fn test_empty_cells_are_null() {
        let table = fixtures::manifest();
        assert!(table.value(5, "Age").is_null());
        assert!(table.value(10, "Embarked").is_null());
        assert!(table.value(0, "Cabin").is_null());
    }

    #[test]
    fn test_fractional_age_promotes_column_to_float() {
        let table = fixtures::from_csv("Age,Fare\n22,1\n0.42,2\n,3\n");
        assert_eq!(table.column("Age").unwrap().dtype, ColumnType::Float64);
        assert_eq!(table.value(0, "Age"), &CellValue::Float(22.0));
        assert!(table.value(2, "Age").is_null());
        assert_eq!(table.height(), 3);
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let err = read_csv("a,b\n1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Csv(_) | DataError::Schema(_)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_file(Path::new("no/such/titanic.csv.gz")).unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[test]
    fn test_gzip_and_cache() {
        let dir = std::env::temp_dir().join(format!("titanic-explorer-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("manifest.csv.gz");
        let mut enc = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        enc.write_all(fixtures::MANIFEST.as_bytes()).unwrap();
        enc.finish().unwrap();

        let mut loader = CachedLoader::new(&path);
        assert!(!loader.is_loaded());
        let first = loader.get().unwrap();
        assert_eq!(first.height(), 12);

        // The cached table survives the file going away.
        std::fs::remove_file(&path).unwrap();
        let second = loader.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut loader = CachedLoader::new("no/such/file.csv");
        assert!(loader.get().is_err());
        assert!(!loader.is_loaded());
    }

    #[test]
    fn test_json_records() {
        let table = read_json(
            r#"[{"Name": "A, Mr. B", "Age": 22, "Fare": 7},
                {"Name": "C, Mrs. D", "Age": null, "Fare": 7.5}]"#,
        )
        .unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.column("Age").unwrap().dtype, ColumnType::Int64);
        assert_eq!(table.column("Fare").unwrap().dtype, ColumnType::Float64);
        assert_eq!(table.value(0, "Fare"), &CellValue::Float(7.0));
        assert!(table.value(1, "Age").is_null());
    }

    #[test]
    fn test_json_rejects_non_array() {
        assert!(matches!(read_json("{}"), Err(DataError::Schema(_))));
    }
}
