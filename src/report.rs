//! Per-analysis computations, independent of rendering.
//!
//! Each `*Report::compute` turns the loaded table (plus any criteria) into
//! the numbers one dashboard section shows. The UI layer only draws them.

use crate::data::aggregate::{
    column_counts, group_mean, pivot, port_name, proportions, titlecase, unique_values, BoxStats,
    PivotAgg, PivotTable,
};
use crate::data::filter::RangeFilter;
use crate::data::model::{CellValue, ColumnType, Table};
use crate::data::titles::{find_captains, title_counts};
use crate::data::{aggregate, DataError};

/// Counts and shares of one categorical column.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub counts: Vec<(CellValue, usize)>,
    pub proportions: Vec<(CellValue, f64)>,
}

impl Distribution {
    fn new(counts: Vec<(CellValue, usize)>) -> Self {
        let proportions = proportions(&counts);
        Self {
            counts,
            proportions,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OverviewReport {
    pub total_rows: usize,
    pub total_columns: usize,
    pub size_kb: f64,
    pub schema: Vec<(String, ColumnType)>,
}

impl OverviewReport {
    pub fn compute(table: &Table) -> Self {
        Self {
            total_rows: table.height(),
            total_columns: table.width(),
            size_kb: table.estimated_size() as f64 / 1024.0,
            schema: table.schema(),
        }
    }
}

// ---------------------------------------------------------------------------
// Passenger sex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SexReport {
    pub sex: Distribution,
}

impl SexReport {
    pub fn compute(table: &Table) -> Result<Self, DataError> {
        let counts = column_counts(table, &table.all_rows(), "Sex")?;
        Ok(Self {
            sex: Distribution::new(counts),
        })
    }
}

// ---------------------------------------------------------------------------
// Passenger class
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ClassReport {
    /// Passenger count by class (rows) and survival flag (columns).
    pub by_survival: PivotTable,
    /// Mean of `Survived` per class, sorted by class.
    pub survival_rates: Vec<(CellValue, f64)>,
}

impl ClassReport {
    pub fn compute(table: &Table) -> Result<Self, DataError> {
        let rows = table.all_rows();
        Ok(Self {
            by_survival: pivot(
                table,
                &rows,
                "Pclass",
                "Survived",
                "PassengerId",
                PivotAgg::Len,
            )?,
            survival_rates: group_mean(table, &rows, "Pclass", "Survived")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Embarkation port
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PortReport {
    /// Raw port codes in first-appearance order.
    pub unique_codes: Vec<CellValue>,
    /// Distribution over full port names.
    pub ports: Distribution,
}

impl PortReport {
    pub fn compute(table: &Table) -> Result<Self, DataError> {
        let unique_codes = unique_values(table, "Embarked")?;
        let named: Vec<CellValue> = table
            .all_rows()
            .into_iter()
            .map(|r| port_name(table.value(r, "Embarked")))
            .collect();
        Ok(Self {
            unique_codes,
            ports: Distribution::new(aggregate::value_counts(named.iter())),
        })
    }
}

// ---------------------------------------------------------------------------
// Passenger names
// ---------------------------------------------------------------------------

/// One row of the captain lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptainInfo {
    pub name: CellValue,
    pub age: CellValue,
    pub pclass: CellValue,
}

#[derive(Debug, Clone)]
pub struct NameReport {
    pub titles: Vec<(String, usize)>,
    pub captains: Vec<CaptainInfo>,
}

impl NameReport {
    pub fn compute(table: &Table, top_n: usize) -> Result<Self, DataError> {
        let captains = find_captains(table)?
            .into_iter()
            .map(|r| CaptainInfo {
                name: table.value(r, "Name").clone(),
                age: table.value(r, "Age").clone(),
                pclass: table.value(r, "Pclass").clone(),
            })
            .collect();
        Ok(Self {
            titles: title_counts(table, top_n)?,
            captains,
        })
    }
}

// ---------------------------------------------------------------------------
// Age vs fare
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AgeFareReport {
    pub criteria: RangeFilter,
    /// `(class, [age, fare])` per passenger inside the ranges.
    pub points: Vec<(CellValue, [f64; 2])>,
    /// Age distribution per class over the filtered passengers.
    pub age_by_class: Vec<(CellValue, BoxStats)>,
}

impl AgeFareReport {
    pub fn compute(table: &Table, criteria: RangeFilter) -> Result<Self, DataError> {
        for column in ["Age", "Fare", "Pclass"] {
            if !table.has_column(column) {
                return Err(DataError::MissingColumn(column.to_string()));
            }
        }
        let rows = criteria.apply(table);

        let points: Vec<(CellValue, [f64; 2])> = rows
            .iter()
            .filter_map(|&r| {
                let age = table.value(r, "Age").as_f64()?;
                let fare = table.value(r, "Fare").as_f64()?;
                Some((table.value(r, "Pclass").clone(), [age, fare]))
            })
            .collect();

        let mut classes: Vec<CellValue> = points.iter().map(|(c, _)| c.clone()).collect();
        classes.sort();
        classes.dedup();
        let age_by_class = classes
            .into_iter()
            .filter_map(|class| {
                let ages: Vec<f64> = points
                    .iter()
                    .filter(|(c, _)| *c == class)
                    .map(|(_, [age, _])| *age)
                    .collect();
                aggregate::box_stats(&ages).map(|stats| (class, stats))
            })
            .collect();

        Ok(Self {
            criteria,
            points,
            age_by_class,
        })
    }

    pub fn passenger_count(&self) -> usize {
        self.points.len()
    }

    /// Caption summarising the active ranges, with `$` made safe.
    pub fn caption(&self) -> String {
        let RangeFilter { age, fare } = self.criteria;
        crate::data::text::fullwidth_dollar(&format!(
            "Filtered Passengers (Age: {}-{}, Fare: ${:.2}-${:.2}): {} passengers",
            age.0,
            age.1,
            fare.0,
            fare.1,
            self.passenger_count()
        ))
    }
}

// ---------------------------------------------------------------------------
// Survival by sex and class
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SurvivalReport {
    /// Mean survival by class (rows) and titlecased sex (columns).
    pub rates: PivotTable,
}

impl SurvivalReport {
    pub fn compute(table: &Table) -> Result<Self, DataError> {
        let mut rates = pivot(
            table,
            &table.all_rows(),
            "Pclass",
            "Sex",
            "Survived",
            PivotAgg::Mean,
        )?;
        rates.index_name = "Passenger Class".to_string();
        for key in &mut rates.column_keys {
            if let CellValue::Str(s) = key {
                *s = titlecase(s);
            }
        }
        Ok(Self { rates })
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
    fn test_overview_metrics() {
        let table = fixtures::manifest();
        let report = OverviewReport::compute(&table);
        assert_eq!(report.total_rows, 12);
        assert_eq!(report.total_columns, 12);
        assert!(report.size_kb > 0.0);
        assert_eq!(report.schema[0].0, "PassengerId");
    }

    #[test]
    fn test_sex_report() {
        let table = fixtures::manifest();
        let report = SexReport::compute(&table).unwrap();
        assert_eq!(report.sex.counts, vec![(s("male"), 6), (s("female"), 6)]);
        let total: f64 = report.sex.proportions.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_port_report_uses_full_names() {
        let table = fixtures::manifest();
        let report = PortReport::compute(&table).unwrap();
        assert_eq!(report.unique_codes.len(), 4);
        assert_eq!(report.ports.counts[0], (s("Southampton"), 8));
        assert_eq!(report.ports.counts[1], (s("Cherbourg"), 2));
        assert!(report.ports.counts.contains(&(CellValue::Null, 1)));
    }

    #[test]
    fn test_name_report_finds_captain() {
        let table = fixtures::manifest();
        let report = NameReport::compute(&table, 10).unwrap();
        assert_eq!(report.titles[0].0, "Mr");
        assert_eq!(
            report.captains,
            vec![CaptainInfo {
                name: s("Crosby, Capt. Edward Gifford"),
                age: CellValue::Integer(70),
                pclass: CellValue::Integer(1),
            }]
        );
    }

    #[test]
    fn test_name_report_without_captain() {
        let table = fixtures::from_csv("Name,Age,Pclass\n\"A, Mr. B\",30,3\n");
        assert!(NameReport::compute(&table, 10).unwrap().captains.is_empty());
    }

    #[test]
    fn test_age_fare_report() {
        let table = fixtures::manifest();
        let criteria = RangeFilter {
            age: (18, 40),
            fare: (7.0, 60.0),
        };
        let report = AgeFareReport::compute(&table, criteria).unwrap();
        assert_eq!(report.passenger_count(), 4);
        // Kept rows: three class-3 passengers and one class-1.
        let classes: Vec<_> = report.age_by_class.iter().map(|(c, _)| c.clone()).collect();
        assert_eq!(classes, vec![CellValue::Integer(1), CellValue::Integer(3)]);
        assert_eq!(report.age_by_class[1].1.count, 3);
    }

    #[test]
    fn test_age_fare_caption_escapes_dollar() {
        let table = fixtures::manifest();
        let criteria = RangeFilter {
            age: (18, 40),
            fare: (7.0, 60.0),
        };
        let caption = AgeFareReport::compute(&table, criteria).unwrap().caption();
        assert_eq!(
            caption,
            "Filtered Passengers (Age: 18-40, Fare: ＄7.00-＄60.00): 4 passengers"
        );
    }

    #[test]
    fn test_survival_report_titlecases_sex() {
        let table = fixtures::manifest();
        let report = SurvivalReport::compute(&table).unwrap();
        assert_eq!(report.rates.column_keys, vec![s("Female"), s("Male")]);
        assert_eq!(report.rates.index_name, "Passenger Class");
        assert_eq!(
            report.rates.get(&CellValue::Integer(3), &s("Female")),
            Some(1.0)
        );
    }

    #[test]
    fn test_class_report() {
        let table = fixtures::manifest();
        let report = ClassReport::compute(&table).unwrap();
        assert_eq!(report.survival_rates.len(), 3);
        assert_eq!(
            report.by_survival.get(&CellValue::Integer(1), &CellValue::Integer(1)),
            Some(4.0)
        );
    }

    #[test]
    fn test_missing_column_surfaces() {
        let table = fixtures::from_csv("Name\n\"A, Mr. B\"\n");
        assert!(SexReport::compute(&table).is_err());
        assert!(ClassReport::compute(&table).is_err());
        assert!(AgeFareReport::compute(
            &table,
            RangeFilter {
                age: (0, 1),
                fare: (0.0, 1.0)
            }
        )
        .is_err());
    }
}
