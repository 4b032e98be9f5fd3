use std::time::{Duration, Instant};

use super::model::Table;

// ---------------------------------------------------------------------------
// Substring filter: literal containment over one column
// ---------------------------------------------------------------------------

/// Criteria for the overview's row filter. Built from the widgets each
/// frame and discarded after producing a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstringFilter {
    pub column: Option<String>,
    pub query: String,
    pub case_sensitive: bool,
}

/// Rows kept by a filter plus how long the filtering took.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub rows: Vec<usize>,
    pub elapsed: Duration,
    /// `false` when the criteria were idle and every row was returned.
    pub applied: bool,
}

impl SubstringFilter {
    /// Whether these criteria narrow the table at all.
    ///
    /// An unset column, an empty query, or a column the table doesn't have
    /// all mean "no filter".
    pub fn is_active(&self, table: &Table) -> bool {
        !self.query.is_empty()
            && self
                .column
                .as_deref()
                .is_some_and(|c| table.has_column(c))
    }

    /// Return indices of rows whose cell, as text, contains the query.
    ///
    /// * Matching is literal, never a pattern.
    /// * Case-insensitive mode lowercases both sides.
    /// * Null cells never match.
    pub fn apply(&self, table: &Table) -> FilterOutcome {
        let column = match self.column.as_deref().and_then(|c| table.column(c)) {
            Some(col) if self.is_active(table) => col,
            _ => {
                return FilterOutcome {
                    rows: table.all_rows(),
                    elapsed: Duration::ZERO,
                    applied: false,
                }
            }
        };

        let start = Instant::now();
        let needle = if self.case_sensitive {
            self.query.clone()
        } else {
            self.query.to_lowercase()
        };
        let rows: Vec<usize> = column
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| {
                v.as_text().is_some_and(|text| {
                    if self.case_sensitive {
                        text.contains(&needle)
                    } else {
                        text.to_lowercase().contains(&needle)
                    }
                })
            })
            .map(|(i, _)| i)
            .collect();
        let elapsed = start.elapsed();

        log::debug!(
            "substring filter {:?} on '{}': {} rows in {:?}",
            self.query,
            column.name,
            rows.len(),
            elapsed
        );
        FilterOutcome {
            rows,
            elapsed,
            applied: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Range filter: inclusive age and fare bounds
// ---------------------------------------------------------------------------

/// Inclusive age and fare ranges chosen with the sliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub age: (i64, i64),
    pub fare: (f64, f64),
}

/// Observed extent of Age and Fare over non-null values. A column with no
/// values collapses to `[0, 0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBounds {
    pub age: (i64, i64),
    pub fare: (f64, f64),
}

impl RangeBounds {
    pub fn from_table(table: &Table) -> Self {
        let age = numeric_extent(table, "Age")
            .map(|(lo, hi)| (lo as i64, hi as i64))
            .unwrap_or((0, 0));
        let fare = numeric_extent(table, "Fare").unwrap_or((0.0, 0.0));
        Self { age, fare }
    }

    /// Upper limit offered by the fare slider.
    pub fn fare_limit(&self, fare_cap: f64) -> f64 {
        self.fare.1.min(fare_cap)
    }

    /// Criteria shown on first render: adults only, and fares up to the
    /// cap so a few outliers don't flatten the scatter.
    pub fn default_criteria(&self, min_default_age: i64, fare_cap: f64) -> RangeFilter {
        RangeFilter {
            age: (self.age.0.max(min_default_age), self.age.1),
            fare: (self.fare.0, self.fare_limit(fare_cap)),
        }
    }
}

fn numeric_extent(table: &Table, column: &str) -> Option<(f64, f64)> {
    table
        .column(column)?
        .values
        .iter()
        .filter_map(|v| v.as_f64())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((f64::min(lo, x), f64::max(hi, x))),
        })
}

impl RangeFilter {
    /// Whether a row lies inside both ranges. Nulls fail the test.
    pub fn contains(&self, table: &Table, row: usize) -> bool {
        let age = table.value(row, "Age").as_f64();
        let fare = table.value(row, "Fare").as_f64();
        match (age, fare) {
            (Some(age), Some(fare)) => {
                (self.age.0 as f64..=self.age.1 as f64).contains(&age)
                    && (self.fare.0..=self.fare.1).contains(&fare)
            }
            _ => false,
        }
    }

    /// Return indices of rows inside both ranges, in table order.
    pub fn apply(&self, table: &Table) -> Vec<usize> {
        (0..table.height())
            .filter(|&row| self.contains(table, row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::data::model::CellValue;

    fn by_name(query: &str, case_sensitive: bool) -> SubstringFilter {
        SubstringFilter {
            column: Some("Name".into()),
            query: query.into(),
            case_sensitive,
        }
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let table = fixtures::manifest();
        let out = by_name("", false).apply(&table);
        assert_eq!(out.rows.len(), table.height());
        assert!(!out.applied);
        assert_eq!(out.elapsed, Duration::ZERO);
    }

    #[test]
    fn test_unset_or_unknown_column_returns_everything() {
        let table = fixtures::manifest();
        let unset = SubstringFilter {
            column: None,
            query: "mr".into(),
            case_sensitive: false,
        };
        assert_eq!(unset.apply(&table).rows.len(), table.height());

        let unknown = SubstringFilter {
            column: Some("Deck".into()),
            ..unset
        };
        assert!(!unknown.is_active(&table));
        assert_eq!(unknown.apply(&table).rows.len(), table.height());
    }

    #[test]
    fn test_case_insensitive_match() {
        let table = fixtures::manifest();
        let out = by_name("MRS.", false).apply(&table);
        assert!(out.applied);
        assert_eq!(out.rows, vec![1, 3, 8]);
    }

    #[test]
    fn test_case_sensitive_match() {
        let table = fixtures::manifest();
        assert!(by_name("MRS.", true).apply(&table).rows.is_empty());
        assert_eq!(by_name("Mrs.", true).apply(&table).rows, vec![1, 3, 8]);
    }

    #[test]
    fn test_match_is_literal() {
        let table = fixtures::manifest();
        // Regex metacharacters are plain text here.
        assert!(by_name("(.", false).apply(&table).rows.is_empty());
        assert_eq!(by_name("(", false).apply(&table).rows, vec![1, 3, 8, 11]);
    }

    #[test]
    fn test_numeric_column_matches_text_form() {
        let table = fixtures::manifest();
        let f = SubstringFilter {
            column: Some("Fare".into()),
            query: "71.".into(),
            case_sensitive: false,
        };
        assert_eq!(f.apply(&table).rows, vec![1, 9]);
    }

    #[test]
    fn test_null_cells_never_match() {
        let table = fixtures::manifest();
        let f = SubstringFilter {
            column: Some("Embarked".into()),
            query: "null".into(),
            case_sensitive: false,
        };
        assert!(f.apply(&table).rows.is_empty());
    }

    #[test]
    fn test_substring_filter_idempotent() {
        let table = fixtures::manifest();
        let criteria = by_name("an", false);
        let once = criteria.apply(&table).rows;

        // Rebuild the reduced table and filter it again.
        let csv = fixtures::MANIFEST.lines().collect::<Vec<_>>();
        let mut reduced = String::from(csv[0]);
        reduced.push('\n');
        for &r in &once {
            reduced.push_str(csv[r + 1]);
            reduced.push('\n');
        }
        let sub = fixtures::from_csv(&reduced);
        let twice = criteria.apply(&sub).rows;

        let ids = |t: &Table, rows: &[usize]| -> Vec<CellValue> {
            rows.iter()
                .map(|&r| t.value(r, "PassengerId").clone())
                .collect()
        };
        assert!(!once.is_empty());
        assert_eq!(ids(&sub, &twice), ids(&table, &once));
    }

    #[test]
    fn test_bounds_over_non_null_values() {
        let table = fixtures::manifest();
        let bounds = RangeBounds::from_table(&table);
        assert_eq!(bounds.age, (2, 70));
        assert_eq!(bounds.fare, (7.25, 86.5));
    }

    #[test]
    fn test_bounds_collapse_without_values() {
        let table = fixtures::from_csv("Age,Fare\n,\n,\n");
        let bounds = RangeBounds::from_table(&table);
        assert_eq!(bounds.age, (0, 0));
        assert_eq!(bounds.fare, (0.0, 0.0));
        let criteria = bounds.default_criteria(18, 300.0);
        assert!(criteria.apply(&table).is_empty());
    }

    #[test]
    fn test_default_criteria() {
        let table = fixtures::from_csv("Age,Fare\n5,10\n60,512.33\n");
        let bounds = RangeBounds::from_table(&table);
        let criteria = bounds.default_criteria(18, 300.0);
        assert_eq!(criteria.age, (18, 60));
        assert_eq!(criteria.fare, (10.0, 300.0));

        let old = fixtures::from_csv("Age,Fare\n30,10\n60,20\n");
        let criteria = RangeBounds::from_table(&old).default_criteria(18, 300.0);
        assert_eq!(criteria.age, (30, 60));
        assert_eq!(criteria.fare, (10.0, 20.0));
    }

    #[test]
    fn test_range_filter_partitions_rows() {
        let table = fixtures::manifest();
        let criteria = RangeFilter {
            age: (18, 40),
            fare: (7.0, 60.0),
        };
        let kept = criteria.apply(&table);
        assert_eq!(kept, vec![0, 2, 3, 4]);

        for row in 0..table.height() {
            let age = table.value(row, "Age").as_f64();
            let fare = table.value(row, "Fare").as_f64();
            let inside = matches!((age, fare), (Some(a), Some(f))
                if (18.0..=40.0).contains(&a) && (7.0..=60.0).contains(&f));
            assert_eq!(kept.contains(&row), inside, "row {row}");
        }
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let table = fixtures::manifest();
        let criteria = RangeFilter {
            age: (22, 22),
            fare: (7.25, 7.25),
        };
        assert_eq!(criteria.apply(&table), vec![0]);
    }
}
