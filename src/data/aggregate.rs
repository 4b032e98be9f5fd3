use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::model::{CellValue, Table};
use super::DataError;

// ---------------------------------------------------------------------------
// Frequency counts
// ---------------------------------------------------------------------------

/// Count each distinct value, most frequent first. Equal counts keep the
/// order in which the values first appeared. Null is a group of its own.
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> Vec<(CellValue, usize)> {
    let mut out: Vec<(CellValue, usize)> = Vec::new();
    let mut slot: HashMap<&CellValue, usize> = HashMap::new();
    for v in values {
        let i = *slot.entry(v).or_insert_with(|| {
            out.push((v.clone(), 0));
            out.len() - 1
        });
        out[i].1 += 1;
    }
    // `sort_by` is stable, so ties stay in first-appearance order.
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// [`value_counts`] over one column restricted to `rows`.
pub fn column_counts(
    table: &Table,
    rows: &[usize],
    column: &str,
) -> Result<Vec<(CellValue, usize)>, DataError> {
    let col = table
        .column(column)
        .ok_or_else(|| DataError::MissingColumn(column.to_string()))?;
    Ok(value_counts(rows.iter().map(|&r| &col.values[r])))
}

/// Share of the total for each count, sorted by proportion descending.
pub fn proportions(counts: &[(CellValue, usize)]) -> Vec<(CellValue, f64)> {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }
    let mut out: Vec<(CellValue, f64)> = counts
        .iter()
        .map(|(v, n)| (v.clone(), *n as f64 / total as f64))
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1));
    out
}

/// Distinct values of a column in first-appearance order.
pub fn unique_values(table: &Table, column: &str) -> Result<Vec<CellValue>, DataError> {
    let col = table
        .column(column)
        .ok_or_else(|| DataError::MissingColumn(column.to_string()))?;
    let mut seen = BTreeSet::new();
    Ok(col
        .values
        .iter()
        .filter(|v| seen.insert(*v))
        .cloned()
        .collect())
}

// ---------------------------------------------------------------------------
// Grouped means and pivots
// ---------------------------------------------------------------------------

/// Mean of `value` per distinct `group`, sorted by group key. Null values
/// are skipped; a group with no numeric values is omitted.
pub fn group_mean(
    table: &Table,
    rows: &[usize],
    group: &str,
    value: &str,
) -> Result<Vec<(CellValue, f64)>, DataError> {
    require(table, &[group, value])?;
    let mut acc: BTreeMap<&CellValue, (f64, usize)> = BTreeMap::new();
    for &r in rows {
        if let Some(x) = table.value(r, value).as_f64() {
            let slot = acc.entry(table.value(r, group)).or_insert((0.0, 0));
            slot.0 += x;
            slot.1 += 1;
        }
    }
    Ok(acc
        .into_iter()
        .map(|(k, (sum, n))| (k.clone(), sum / n as f64))
        .collect())
}

/// How pivot cells are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotAgg {
    /// Number of rows in the cell.
    Len,
    /// Mean of the value column over the cell's non-null values.
    Mean,
}

/// A two-way aggregate: `cells[i][j]` belongs to `index_keys[i]` and
/// `column_keys[j]`; `None` marks an empty combination.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub index_name: String,
    pub index_keys: Vec<CellValue>,
    pub column_keys: Vec<CellValue>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    pub fn get(&self, index: &CellValue, column: &CellValue) -> Option<f64> {
        let i = self.index_keys.iter().position(|k| k == index)?;
        let j = self.column_keys.iter().position(|k| k == column)?;
        self.cells[i][j]
    }

    /// Largest and smallest populated cell, used to scale heatmaps.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Cross-tabulate `value` by `index` (rows) and `on` (columns). Keys on
/// both axes are sorted ascending.
pub fn pivot(
    table: &Table,
    rows: &[usize],
    index: &str,
    on: &str,
    value: &str,
    agg: PivotAgg,
) -> Result<PivotTable, DataError> {
    require(table, &[index, on, value])?;
    let mut acc: BTreeMap<(&CellValue, &CellValue), (f64, usize)> = BTreeMap::new();
    let mut index_keys = BTreeSet::new();
    let mut column_keys = BTreeSet::new();

    for &r in rows {
        let (i, c) = (table.value(r, index), table.value(r, on));
        index_keys.insert(i);
        column_keys.insert(c);
        let slot = acc.entry((i, c)).or_insert((0.0, 0));
        match agg {
            PivotAgg::Len => slot.1 += 1,
            PivotAgg::Mean => {
                if let Some(x) = table.value(r, value).as_f64() {
                    slot.0 += x;
                    slot.1 += 1;
                }
            }
        }
    }

    let cells = index_keys
        .iter()
        .map(|&i| {
            column_keys
                .iter()
                .map(|&c| match (acc.get(&(i, c)), agg) {
                    (Some(&(_, n)), PivotAgg::Len) if n > 0 => Some(n as f64),
                    (Some(&(sum, n)), PivotAgg::Mean) if n > 0 => Some(sum / n as f64),
                    _ => None,
                })
                .collect()
        })
        .collect();

    Ok(PivotTable {
        index_name: index.to_string(),
        index_keys: index_keys.into_iter().cloned().collect(),
        column_keys: column_keys.into_iter().cloned().collect(),
        cells,
    })
}

// ---------------------------------------------------------------------------
// Distribution summaries
// ---------------------------------------------------------------------------

/// Five-number summary for a box plot. Whiskers reach the furthest data
/// point within 1.5 IQR of the quartiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub count: usize,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|&x| x >= lo_fence)
        .unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|&x| x <= hi_fence)
        .unwrap_or(q3);

    Some(BoxStats {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        count: sorted.len(),
    })
}

/// Linear-interpolated quantile of sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Value rewriting
// ---------------------------------------------------------------------------

/// Full port name for a single-letter embarkation code; unknown codes and
/// nulls pass through unchanged.
pub fn port_name(code: &CellValue) -> CellValue {
    match code.as_str() {
        Some("C") => CellValue::Str("Cherbourg".into()),
        Some("S") => CellValue::Str("Southampton".into()),
        Some("Q") => CellValue::Str("Queenstown".into()),
        _ => code.clone(),
    }
}

/// Uppercase the first letter of every word, lowercase the rest.
pub fn titlecase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut start = true;
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            if start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            start = false;
        } else {
            out.push(ch);
            start = true;
        }
    }
    out
}

fn require(table: &Table, columns: &[&str]) -> Result<(), DataError> {
    match columns.iter().find(|c| !table.has_column(c)) {
        Some(missing) => Err(DataError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    fn s(v: &str) -> CellValue {
        CellValue::Str(v.into())
    }

    #[test]
    fn test_sex_counts_and_proportions() {
        let table = fixtures::from_csv("Sex\nmale\nmale\nfemale\n");
        let counts = column_counts(&table, &table.all_rows(), "Sex").unwrap();
        assert_eq!(counts, vec![(s("male"), 2), (s("female"), 1)]);

        let props = proportions(&counts);
        assert_eq!(props[0].0, s("male"));
        assert!((props[0].1 - 0.667).abs() < 1e-3);
        assert!((props[1].1 - 0.333).abs() < 1e-3);
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let vals = [s("b"), s("a"), s("a"), s("b"), s("c")];
        let counts = value_counts(vals.iter());
        assert_eq!(counts, vec![(s("b"), 2), (s("a"), 2), (s("c"), 1)]);
    }

    #[test]
    fn test_null_is_counted() {
        let table = fixtures::manifest();
        let counts = column_counts(&table, &table.all_rows(), "Embarked").unwrap();
        assert_eq!(counts[0], (s("S"), 8));
        assert!(counts.contains(&(CellValue::Null, 1)));
    }

    #[test]
    fn test_nan_cells_group_together() {
        let table = fixtures::from_csv("Embarked\n1\nNaN\nNaN\n");
        let counts = column_counts(&table, &table.all_rows(), "Embarked").unwrap();
        assert_eq!(counts.len(), 2);
        assert!(counts[0].0.as_f64().is_some_and(f64::is_nan));
        assert_eq!(counts[0].1, 2);
        assert_eq!(counts[1], (CellValue::Float(1.0), 1));
    }

    #[test]
    fn test_proportions_sum_to_one() {
        let table = fixtures::manifest();
        for column in ["Sex", "Embarked", "Pclass", "Survived"] {
            let counts = column_counts(&table, &table.all_rows(), column).unwrap();
            let total: f64 = proportions(&counts).iter().map(|(_, p)| p).sum();
            assert!((total - 1.0).abs() < 1e-9, "{column}: {total}");
        }
    }

    #[test]
    fn test_proportions_of_nothing() {
        assert!(proportions(&[]).is_empty());
    }

    #[test]
    fn test_unique_values_first_appearance() {
        let table = fixtures::manifest();
        let ports = unique_values(&table, "Embarked").unwrap();
        assert_eq!(ports, vec![s("S"), s("C"), s("Q"), CellValue::Null]);
    }

    #[test]
    fn test_group_mean_survival_by_class() {
        let table = fixtures::manifest();
        let rates = group_mean(&table, &table.all_rows(), "Pclass", "Survived").unwrap();
        let keys: Vec<_> = rates.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)]
        );
        // Class 1: rows 2,4,7,10,11,12 → survived 1,1,0,0,1,1
        assert!((rates[0].1 - 4.0 / 6.0).abs() < 1e-9);
        assert!((rates[1].1 - 1.0).abs() < 1e-9);
        assert!((rates[2].1 - 1.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_pivot_counts() {
        let table = fixtures::manifest();
        let p = pivot(
            &table,
            &table.all_rows(),
            "Pclass",
            "Survived",
            "PassengerId",
            PivotAgg::Len,
        )
        .unwrap();
        assert_eq!(p.column_keys, vec![CellValue::Integer(0), CellValue::Integer(1)]);
        assert_eq!(p.get(&CellValue::Integer(3), &CellValue::Integer(0)), Some(4.0));
        assert_eq!(p.get(&CellValue::Integer(2), &CellValue::Integer(0)), None);
        let total: f64 = p.cells.iter().flatten().flatten().sum();
        assert_eq!(total as usize, table.height());
    }

    #[test]
    fn test_pivot_mean_by_sex() {
        let table = fixtures::manifest();
        let p = pivot(
            &table,
            &table.all_rows(),
            "Pclass",
            "Sex",
            "Survived",
            PivotAgg::Mean,
        )
        .unwrap();
        assert_eq!(p.get(&CellValue::Integer(1), &s("female")), Some(1.0));
        assert_eq!(p.get(&CellValue::Integer(1), &s("male")), Some(0.0));
        assert_eq!(p.value_range(), Some((0.0, 1.0)));
    }

    #[test]
    fn test_pivot_missing_column() {
        let table = fixtures::manifest();
        let err = pivot(&table, &[], "Deck", "Sex", "Survived", PivotAgg::Mean).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == "Deck"));
    }

    #[test]
    fn test_box_stats() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);

        let with_outlier = box_stats(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(with_outlier.upper_whisker, 4.0);
        assert!(box_stats(&[]).is_none());
    }

    #[test]
    fn test_port_names_and_titlecase() {
        assert_eq!(port_name(&s("C")), s("Cherbourg"));
        assert_eq!(port_name(&CellValue::Null), CellValue::Null);
        assert_eq!(titlecase("male"), "Male");
        assert_eq!(titlecase("the countess"), "The Countess");
    }
}
