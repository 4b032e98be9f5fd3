use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::Analysis;
use crate::config::AppConfig;
use crate::data::filter::{FilterOutcome, RangeBounds, RangeFilter, SubstringFilter};
use crate::data::loader::CachedLoader;
use crate::data::model::Table;
use crate::data::DataError;
use crate::report::{
    AgeFareReport, ClassReport, NameReport, OverviewReport, PortReport, SexReport, SurvivalReport,
};

// ---------------------------------------------------------------------------
// Reports derived from the dataset alone
// ---------------------------------------------------------------------------

/// Section results that depend only on the table, computed once per load.
pub struct Reports {
    pub overview: OverviewReport,
    pub sex: Result<SexReport, DataError>,
    pub class: Result<ClassReport, DataError>,
    pub ports: Result<PortReport, DataError>,
    pub names: Result<NameReport, DataError>,
    pub survival: Result<SurvivalReport, DataError>,
}

impl Reports {
    fn compute(table: &Table, config: &AppConfig) -> Self {
        Self {
            overview: OverviewReport::compute(table),
            sex: SexReport::compute(table),
            class: ClassReport::compute(table),
            ports: PortReport::compute(table),
            names: NameReport::compute(table, config.title_top_n),
            survival: SurvivalReport::compute(table),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Widgets edit the criteria fields directly; the `refresh_*` methods
/// recompute the matching derived view when its criteria changed.
pub struct AppState {
    pub config: AppConfig,
    loader: CachedLoader,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Table>>,
    pub reports: Option<Reports>,

    /// Current menu selection.
    pub selection: Analysis,

    /// Overview row filter as edited in the UI.
    pub substring: SubstringFilter,
    /// Criteria that produced `filter_outcome`.
    applied_substring: Option<SubstringFilter>,
    pub filter_outcome: FilterOutcome,

    /// Slider extents for the age/fare analysis.
    pub range_bounds: Option<RangeBounds>,
    /// Slider positions; seeded from the bounds on first render.
    pub range: Option<RangeFilter>,
    pub age_fare: Option<Result<AgeFareReport, DataError>>,
    applied_range: Option<RangeFilter>,

    /// Load error shown in place of every analysis.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let loader = CachedLoader::new(config.data_path.clone());
        Self {
            config,
            loader,
            dataset: None,
            reports: None,
            selection: Analysis::default(),
            substring: SubstringFilter::default(),
            applied_substring: None,
            filter_outcome: FilterOutcome::default(),
            range_bounds: None,
            range: None,
            age_fare: None,
            applied_range: None,
            status_message: None,
        }
    }

    /// Load the configured dataset through the cache.
    pub fn load(&mut self) {
        let result = self.loader.get();
        self.handle_load(result);
    }

    /// Switch to another dataset file (File → Open…).
    pub fn open_path(&mut self, path: PathBuf) {
        let result = self.loader.reload_from(path);
        self.handle_load(result);
    }

    pub fn data_path(&self) -> &std::path::Path {
        self.loader.path()
    }

    fn handle_load(&mut self, result: Result<Arc<Table>, DataError>) {
        match result {
            Ok(table) => self.set_dataset(table),
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.dataset = None;
                self.reports = None;
                self.status_message = Some(format!("Error loading dataset: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset every derived view.
    pub fn set_dataset(&mut self, table: Arc<Table>) {
        self.reports = Some(Reports::compute(&table, &self.config));
        self.range_bounds = Some(RangeBounds::from_table(&table));
        self.range = None;
        self.applied_range = None;
        self.age_fare = None;
        self.applied_substring = None;
        if self.substring.column.is_none() && table.has_column("Name") {
            self.substring.column = Some("Name".to_string());
        } else if self.substring.column.is_none() {
            self.substring.column = table.column_names().next().map(str::to_string);
        }
        self.dataset = Some(table);
        self.status_message = None;
        self.refresh_substring();
        self.refresh_range();
    }

    /// Change the menu selection.
    pub fn select(&mut self, analysis: Analysis) {
        if self.selection != analysis {
            log::info!("Showing {analysis}");
            self.selection = analysis;
        }
    }

    /// Recompute the overview rows if the substring criteria changed.
    pub fn refresh_substring(&mut self) {
        let Some(table) = &self.dataset else {
            return;
        };
        if self.applied_substring.as_ref() == Some(&self.substring) {
            return;
        }
        self.filter_outcome = self.substring.apply(table);
        self.applied_substring = Some(self.substring.clone());
    }

    /// Seed the sliders on first use and recompute the age/fare view if
    /// they moved.
    pub fn refresh_range(&mut self) {
        let (Some(table), Some(bounds)) = (&self.dataset, self.range_bounds) else {
            return;
        };
        let criteria = *self.range.get_or_insert_with(|| {
            bounds.default_criteria(self.config.min_default_age, self.config.fare_cap)
        });
        if self.applied_range == Some(criteria) {
            return;
        }
        self.age_fare = Some(AgeFareReport::compute(table, criteria));
        self.applied_range = Some(criteria);
    }

    /// Rows the overview table currently shows.
    pub fn visible_rows(&self) -> &[usize] {
        &self.filter_outcome.rows
    }
}
