use std::f64::consts::TAU;

use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};

use crate::color::{red_yellow_green, ColorMap};
use crate::data::aggregate::{BoxStats, PivotTable};
use crate::data::model::CellValue;

const CHART_HEIGHT: f32 = 300.0;

/// A labelled bar: category, height, fill.
pub struct BarSpec {
    pub label: String,
    pub value: f64,
    pub color: Color32,
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong());
}

/// Axis coordinate for the `i`-th category: numeric keys (class 1, 2, 3)
/// sit at their own value, anything else at its index.
fn axis_position(key: &CellValue, i: usize) -> f64 {
    key.as_f64().filter(|v| v.is_finite()).unwrap_or(i as f64)
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// One bar per category; each is its own legend entry so the category
/// names read off the legend.
pub fn bar_chart(ui: &mut Ui, id: &str, title: &str, x_label: &str, y_label: &str, bars: &[BarSpec]) {
    chart_title(ui, title);
    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .height(CHART_HEIGHT)
        .include_y(0.0)
        .allow_scroll(false)
        .allow_drag(false)
        .show(ui, |plot_ui| {
            for (i, spec) in bars.iter().enumerate() {
                let bar = Bar::new(i as f64, spec.value)
                    .width(0.6)
                    .name(&spec.label)
                    .fill(spec.color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(&spec.label).color(spec.color));
            }
        });
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Slices start at twelve o'clock and run clockwise, in input order.
pub fn pie_chart(ui: &mut Ui, id: &str, title: &str, slices: &[(String, f64)]) {
    chart_title(ui, title);
    let total: f64 = slices.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        ui.label("Nothing to chart.");
        return;
    }
    let palette = crate::color::generate_palette(slices.len());

    Plot::new(id)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_drag(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for ((label, value), color) in slices.iter().zip(palette) {
                let sweep = value / total * TAU;
                let steps = ((sweep / TAU) * 90.0).ceil().max(2.0) as usize;
                let mut points = vec![[0.0, 0.0]];
                points.extend((0..=steps).map(|k| {
                    let angle = start + sweep * k as f64 / steps as f64;
                    [angle.sin(), angle.cos()]
                }));

                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(points))
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE))
                        .name(format!("{label} ({:.1}%)", value / total * 100.0)),
                );

                let mid = start + sweep / 2.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.65 * mid.sin(), 0.65 * mid.cos()),
                        RichText::new(format!("{:.1}%", value / total * 100.0)).color(Color32::BLACK),
                    )
                    .anchor(Align2::CENTER_CENTER),
                );
                start += sweep;
            }
        });
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

/// Draw a pivot as coloured cells, rows bottom-up by index key, with each
/// cell's value printed in its centre.
pub fn heatmap(ui: &mut Ui, id: &str, title: &str, x_label: &str, pivot: &PivotTable) {
    chart_title(ui, title);
    let (lo, hi) = pivot.value_range().unwrap_or((0.0, 1.0));
    let span = if (hi - lo).abs() < f64::EPSILON { 1.0 } else { hi - lo };

    Plot::new(id)
        .x_axis_label(x_label)
        .y_axis_label(&pivot.index_name)
        .show_grid(false)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_drag(false)
        .show(ui, |plot_ui| {
            for (i, key) in pivot.index_keys.iter().enumerate() {
                let y = axis_position(key, i);
                for (j, col) in pivot.column_keys.iter().enumerate() {
                    let x = axis_position(col, j);
                    let Some(v) = pivot.cells[i][j] else {
                        continue;
                    };
                    let rect = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(rect))
                            .fill_color(red_yellow_green((v - lo) / span))
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(format!("{key} / {col}")),
                    );
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(x, y),
                            RichText::new(format!("{col}, {key}: {v:.3}")).color(Color32::BLACK),
                        )
                        .anchor(Align2::CENTER_CENTER),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter and box plots
// ---------------------------------------------------------------------------

/// Scatter of `[x, y]` points coloured by category.
pub fn scatter(
    ui: &mut Ui,
    id: &str,
    title: &str,
    axes: (&str, &str),
    points: &[(CellValue, [f64; 2])],
    colors: &ColorMap,
) {
    chart_title(ui, title);
    let mut categories: Vec<&CellValue> = points.iter().map(|(c, _)| c).collect();
    categories.sort();
    categories.dedup();

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(axes.0)
        .y_axis_label(axes.1)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for category in categories {
                let series: Vec<[f64; 2]> = points
                    .iter()
                    .filter(|(c, _)| c == category)
                    .map(|(_, p)| *p)
                    .collect();
                plot_ui.points(
                    Points::new(series)
                        .radius(3.0)
                        .color(colors.color_for(category))
                        .name(format!("Class {category}")),
                );
            }
        });
}

/// One box per category, placed at the category's value on the x axis.
pub fn box_plot(
    ui: &mut Ui,
    id: &str,
    title: &str,
    axes: (&str, &str),
    boxes: &[(CellValue, BoxStats)],
    colors: &ColorMap,
) {
    chart_title(ui, title);
    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(axes.0)
        .y_axis_label(axes.1)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (category, stats)) in boxes.iter().enumerate() {
                let color = colors.color_for(category);
                let elem = BoxElem::new(
                    axis_position(category, i),
                    BoxSpread::new(
                        stats.lower_whisker,
                        stats.q1,
                        stats.median,
                        stats.q3,
                        stats.upper_whisker,
                    ),
                )
                .box_width(0.5)
                .name(format!("Class {category} (n={})", stats.count))
                .fill(color.linear_multiply(0.4))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(format!("Class {category}")));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_sit_at_their_own_value() {
        let classes = [1, 2, 3].map(CellValue::Integer);
        let xs: Vec<f64> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| axis_position(c, i))
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_text_keys_fall_back_to_index() {
        let sexes = [CellValue::Str("Female".into()), CellValue::Str("Male".into())];
        assert_eq!(axis_position(&sexes[0], 0), 0.0);
        assert_eq!(axis_position(&sexes[1], 1), 1.0);
        assert_eq!(axis_position(&CellValue::Null, 4), 4.0);
    }
}
