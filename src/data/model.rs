use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the CSV dtypes we infer.
/// Grouping code keys `BTreeMap`s and `HashMap`s on it, so equality,
/// ordering and hashing all go through [`Ord::cmp`] and agree.
#[derive(Debug, Clone)]
pub enum CellValue {
    Str(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so we can sort and group on CellValue --

/// Every NaN is one value and `-0.0` is `0.0`.
fn canonical(v: f64) -> f64 {
    if v.is_nan() {
        f64::NAN
    } else if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Str(_) => 3,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (Integer(a), Float(b)) => (*a as f64)
                .total_cmp(&canonical(*b))
                .then(std::cmp::Ordering::Less),
            (Float(a), Integer(b)) => canonical(*a)
                .total_cmp(&(*b as f64))
                .then(std::cmp::Ordering::Greater),
            (Str(a), Str(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Str(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => canonical(*f).to_bits().hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Str(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Integral floats keep one decimal so "22.0" reads as a float.
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "null"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` (numeric cells only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Text form used for substring matching; `None` for null cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Str(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Rough in-memory footprint, used for the overview size metric.
    fn estimated_size(&self) -> usize {
        match self {
            CellValue::Str(s) => s.len(),
            CellValue::Integer(_) | CellValue::Float(_) => 8,
            CellValue::Null => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Column / Table – the loaded dataset
// ---------------------------------------------------------------------------

/// Column dtype, inferred once at load time from the non-empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
    Utf8,
    /// Every cell in the column was empty.
    Null,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int64 => "Int64",
            ColumnType::Float64 => "Float64",
            ColumnType::Utf8 => "String",
            ColumnType::Null => "Null",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<CellValue>,
}

/// An immutable columnar table. All analyses read from it and produce
/// derived values (row index lists, aggregates); nothing writes back.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// Build a table from columns of equal length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, super::DataError> {
        let height = columns.first().map_or(0, |c| c.values.len());
        if let Some(bad) = columns.iter().find(|c| c.values.len() != height) {
            return Err(super::DataError::Schema(format!(
                "column '{}' has {} values, expected {height}",
                bad.name,
                bad.values.len()
            )));
        }
        Ok(Self { columns, height })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Cell at (`row`, `column`); `Null` for an unknown column.
    pub fn value(&self, row: usize, column: &str) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.column(column)
            .and_then(|c| c.values.get(row))
            .unwrap_or(&NULL)
    }

    /// `(name, dtype)` pairs in column order.
    pub fn schema(&self) -> Vec<(String, ColumnType)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.dtype))
            .collect()
    }

    /// Approximate bytes held by the cell data.
    pub fn estimated_size(&self) -> usize {
        self.columns
            .iter()
            .flat_map(|c| c.values.iter())
            .map(CellValue::estimated_size)
            .sum()
    }

    /// Every row index, in file order.
    pub fn all_rows(&self) -> Vec<usize> {
        (0..self.height).collect()
    }
}
