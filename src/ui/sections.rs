use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::analysis::Section;
use crate::color::ColorMap;
use crate::config::image_source;
use crate::data::model::CellValue;
use crate::data::DataError;
use crate::state::AppState;
use crate::ui::plot::{self, BarSpec};
use crate::ui::table;

const IMAGE_WIDTH: f32 = 400.0;

/// Render one dashboard section.
pub fn section(ui: &mut Ui, state: &mut AppState, section: Section) {
    match section {
        Section::Overview => overview(ui, state),
        Section::Sex => sex(ui, state),
        Section::Class => class(ui, state),
        Section::Ports => ports(ui, state),
        Section::Names => names(ui, state),
        Section::AgeFare => age_fare(ui, state),
        Section::Survival => survival(ui, state),
    }
    ui.add_space(12.0);
    ui.separator();
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Show an image if the file exists; otherwise a warning in its place.
pub fn image_if_exists(ui: &mut Ui, path: &Path) {
    match image_source(path) {
        Ok(uri) => {
            ui.add(egui::Image::new(uri).max_width(IMAGE_WIDTH));
        }
        Err(warning) => {
            ui.colored_label(Color32::from_rgb(0xd4, 0xa0, 0x17), warning);
        }
    }
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).heading());
    });
}

fn section_error(ui: &mut Ui, err: &DataError) {
    ui.colored_label(Color32::RED, format!("Cannot compute this analysis: {err}"));
}

fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

fn class_colors() -> ColorMap {
    let classes = [1, 2, 3].map(CellValue::Integer);
    ColorMap::new(classes.iter())
}

// ---------------------------------------------------------------------------
// Dataset overview
// ---------------------------------------------------------------------------

fn overview(ui: &mut Ui, state: &mut AppState) {
    let (Some(dataset), Some(reports)) = (state.dataset.clone(), &state.reports) else {
        return;
    };
    let report = &reports.overview;

    ui.heading("📊 Dataset Overview");
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total Passengers", report.total_rows.to_string());
        metric(&mut cols[1], "Total Columns", report.total_columns.to_string());
        metric(&mut cols[2], "Memory Usage", format!("{:.1} KB", report.size_kb));
    });

    ui.add_space(8.0);
    ui.strong("Dataset Schema");
    let schema_rows: Vec<Vec<String>> = report
        .schema
        .iter()
        .map(|(name, dtype)| vec![name.clone(), dtype.to_string()])
        .collect();
    table::string_table(ui, "schema", &["Column", "Type"], &schema_rows);

    ui.add_space(8.0);
    ui.strong("All Rows");
    ui.horizontal(|ui: &mut Ui| {
        let current = state.substring.column.clone().unwrap_or_default();
        egui::ComboBox::from_label("Filter column")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for name in dataset.column_names() {
                    if ui.selectable_label(current == name, name).clicked() {
                        state.substring.column = Some(name.to_string());
                    }
                }
            });
        ui.separator();
        ui.label("Filter value (substring match)");
        ui.text_edit_singleline(&mut state.substring.query);
        ui.checkbox(&mut state.substring.case_sensitive, "Case sensitive match");
    });
    state.refresh_substring();

    let outcome = &state.filter_outcome;
    metric(
        ui,
        "Filter time (seconds)",
        format!("{:.6}", outcome.elapsed.as_secs_f64()),
    );
    if outcome.applied {
        ui.label(format!("Filtered rows: {}", outcome.rows.len()));
    }
    table::data_table(ui, "all_rows", &dataset, state.visible_rows());
}

// ---------------------------------------------------------------------------
// Passenger sex
// ---------------------------------------------------------------------------

fn sex(ui: &mut Ui, state: &AppState) {
    let Some(reports) = &state.reports else {
        return;
    };
    ui.heading("👥 Passenger Sex Analysis");
    let report = match &reports.sex {
        Ok(r) => r,
        Err(e) => return section_error(ui, e),
    };

    ui.columns(2, |cols| {
        cols[0].strong("Count by Sex:");
        let rows: Vec<Vec<String>> = report
            .sex
            .counts
            .iter()
            .map(|(v, n)| vec![v.to_string(), n.to_string()])
            .collect();
        table::string_table(&mut cols[0], "sex_counts", &["Sex", "count"], &rows);

        cols[1].strong("Proportion by Sex:");
        let rows: Vec<Vec<String>> = report
            .sex
            .proportions
            .iter()
            .map(|(v, p)| vec![v.to_string(), format!("{p:.6}")])
            .collect();
        table::string_table(&mut cols[1], "sex_props", &["Sex", "proportion"], &rows);
    });

    let colors = ColorMap::new(report.sex.counts.iter().map(|(v, _)| v))
        .with(CellValue::Str("male".into()), Color32::from_rgb(0x1f, 0x77, 0xb4))
        .with(CellValue::Str("female".into()), Color32::from_rgb(0xff, 0x7f, 0x0e));
    let bars: Vec<BarSpec> = report
        .sex
        .counts
        .iter()
        .map(|(v, n)| BarSpec {
            label: v.to_string(),
            value: *n as f64,
            color: colors.color_for(v),
        })
        .collect();
    plot::bar_chart(ui, "sex_bar", "Number of Passengers by Sex", "Sex", "count", &bars);
}

// ---------------------------------------------------------------------------
// Passenger class
// ---------------------------------------------------------------------------

fn class(ui: &mut Ui, state: &AppState) {
    let Some(reports) = &state.reports else {
        return;
    };
    ui.heading("🏛️ Passenger Class Analysis");
    image_if_exists(ui, &state.config.image("titanic_classes.jpg"));
    let report = match &reports.class {
        Ok(r) => r,
        Err(e) => return section_error(ui, e),
    };

    ui.strong("Passenger Count by Class and Survival:");
    table::pivot_table(ui, "class_survival", &report.by_survival, |v| format!("{v:.0}"));

    ui.strong("Survival Rate by Class:");
    let rows: Vec<Vec<String>> = report
        .survival_rates
        .iter()
        .map(|(c, r)| vec![c.to_string(), format!("{r:.6}")])
        .collect();
    table::string_table(ui, "class_rates", &["Pclass", "Survival_Rate"], &rows);

    let colors = class_colors();
    let bars: Vec<BarSpec> = report
        .survival_rates
        .iter()
        .map(|(c, r)| BarSpec {
            label: format!("Class {c} ({})", percent(*r)),
            value: r * 100.0,
            color: colors.color_for(c),
        })
        .collect();
    plot::bar_chart(
        ui,
        "class_rate_bar",
        "Survival Rate by Passenger Class",
        "Passenger Class",
        "Survival Rate (%)",
        &bars,
    );
}

// ---------------------------------------------------------------------------
// Embarkation port
// ---------------------------------------------------------------------------

fn ports(ui: &mut Ui, state: &AppState) {
    let Some(reports) = &state.reports else {
        return;
    };
    ui.heading("🚢 Embarkation Port Analysis");
    image_if_exists(ui, &state.config.image("titanic_route.png"));
    let report = match &reports.ports {
        Ok(r) => r,
        Err(e) => return section_error(ui, e),
    };

    ui.strong("Unique Ports:");
    let rows: Vec<Vec<String>> = report
        .unique_codes
        .iter()
        .map(|c| vec![c.to_string()])
        .collect();
    table::string_table(ui, "unique_ports", &["Embarked"], &rows);

    ui.columns(2, |cols| {
        cols[0].strong("Passengers by Port:");
        let rows: Vec<Vec<String>> = report
            .ports
            .counts
            .iter()
            .map(|(v, n)| vec![v.to_string(), n.to_string()])
            .collect();
        table::string_table(&mut cols[0], "port_counts", &["Embarked", "count"], &rows);

        cols[1].strong("Proportion by Port:");
        let rows: Vec<Vec<String>> = report
            .ports
            .proportions
            .iter()
            .map(|(v, p)| vec![v.to_string(), format!("{p:.6}")])
            .collect();
        table::string_table(&mut cols[1], "port_props", &["Embarked", "proportion"], &rows);
    });

    let slices: Vec<(String, f64)> = report
        .ports
        .counts
        .iter()
        .map(|(v, n)| (v.to_string(), *n as f64))
        .collect();
    plot::pie_chart(
        ui,
        "port_pie",
        "Passenger Distribution by Embarkation Port",
        &slices,
    );
}

// ---------------------------------------------------------------------------
// Passenger names
// ---------------------------------------------------------------------------

fn names(ui: &mut Ui, state: &AppState) {
    let Some(reports) = &state.reports else {
        return;
    };
    ui.heading("👨‍✈️ Passenger Name Analysis");
    image_if_exists(ui, &state.config.image("titanic_captain.jpg"));
    let report = match &reports.names {
        Ok(r) => r,
        Err(e) => return section_error(ui, e),
    };

    ui.strong("Passenger Titles Distribution:");
    let rows: Vec<Vec<String>> = report
        .titles
        .iter()
        .map(|(t, n)| vec![t.clone(), n.to_string()])
        .collect();
    table::string_table(ui, "titles", &["Title", "count"], &rows);

    // Darker blue for larger counts.
    let max = report.titles.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1) as f32;
    let bars: Vec<BarSpec> = report
        .titles
        .iter()
        .map(|(t, n)| {
            let shade = 0.25 + 0.75 * (*n as f32 / max);
            BarSpec {
                label: t.clone(),
                value: *n as f64,
                color: Color32::from_rgb(
                    (222.0 * (1.0 - shade)) as u8,
                    (235.0 * (1.0 - shade) + 80.0 * shade) as u8,
                    (247.0 * (1.0 - shade) + 160.0 * shade) as u8,
                ),
            }
        })
        .collect();
    plot::bar_chart(
        ui,
        "titles_bar",
        "Passenger Titles Distribution",
        "Title",
        "Number of Passengers",
        &bars,
    );

    if report.captains.is_empty() {
        ui.label("No captain found in the dataset");
    } else {
        ui.strong("Titanic Captain Information:");
        let rows: Vec<Vec<String>> = report
            .captains
            .iter()
            .map(|c| vec![c.name.to_string(), c.age.to_string(), c.pclass.to_string()])
            .collect();
        table::string_table(ui, "captain", &["Name", "Age", "Pclass"], &rows);
    }
}

// ---------------------------------------------------------------------------
// Age vs fare
// ---------------------------------------------------------------------------

fn age_fare(ui: &mut Ui, state: &mut AppState) {
    let Some(bounds) = state.range_bounds else {
        return;
    };
    ui.heading("📈 Age vs Fare Analysis");
    state.refresh_range();

    let fare_limit = bounds.fare_limit(state.config.fare_cap);
    if let Some(range) = &mut state.range {
        ui.columns(2, |cols| {
            cols[0].label("Select Age Range:");
            cols[0].add(
                egui::Slider::new(&mut range.age.0, bounds.age.0..=bounds.age.1)
                    .step_by(1.0)
                    .text("from"),
            );
            cols[0].add(
                egui::Slider::new(&mut range.age.1, bounds.age.0..=bounds.age.1)
                    .step_by(1.0)
                    .text("to"),
            );

            cols[1].label("Select Fare Range:");
            cols[1].add(
                egui::Slider::new(&mut range.fare.0, bounds.fare.0..=fare_limit)
                    .step_by(1.0)
                    .text("from"),
            );
            cols[1].add(
                egui::Slider::new(&mut range.fare.1, bounds.fare.0..=fare_limit)
                    .step_by(1.0)
                    .text("to"),
            );
        });
        range.age.1 = range.age.1.max(range.age.0);
        range.fare.1 = range.fare.1.max(range.fare.0);
    }
    state.refresh_range();

    let report = match &state.age_fare {
        Some(Ok(r)) => r,
        Some(Err(e)) => return section_error(ui, e),
        None => return,
    };
    ui.strong(report.caption());

    let colors = class_colors();
    plot::scatter(
        ui,
        "age_fare_scatter",
        "Titanic Passengers - Interactive Filtering",
        ("Age", "Fare"),
        &report.points,
        &colors,
    );
    plot::box_plot(
        ui,
        "age_box",
        "Age Distribution by Passenger Class (Filtered)",
        ("Passenger Class", "Age"),
        &report.age_by_class,
        &colors,
    );
}

// ---------------------------------------------------------------------------
// Survival by sex and class
// ---------------------------------------------------------------------------

fn survival(ui: &mut Ui, state: &AppState) {
    let Some(reports) = &state.reports else {
        return;
    };
    ui.heading("💀 Survival Analysis by Sex and Class");
    image_if_exists(ui, &state.config.image("titanic_door.jpg"));
    let report = match &reports.survival {
        Ok(r) => r,
        Err(e) => return section_error(ui, e),
    };

    ui.strong("Survival Rate by Sex and Class:");
    table::pivot_table(ui, "survival_pivot", &report.rates, |v| format!("{v:.6}"));
    plot::heatmap(
        ui,
        "survival_heatmap",
        "Survival Rate Heatmap (Sex vs Class)",
        "Sex",
        &report.rates,
    );
}
