use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::PivotTable;
use crate::data::model::Table;

const ROW_HEIGHT: f32 = 18.0;

/// Small read-only table of preformatted cells.
pub fn string_table(ui: &mut Ui, id: &str, headers: &[&str], rows: &[Vec<String>]) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(80.0), headers.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for h in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        for cell in row {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}

/// A pivot with its index column first, `value_fmt` formatting the cells.
pub fn pivot_table(ui: &mut Ui, id: &str, pivot: &PivotTable, value_fmt: impl Fn(f64) -> String) {
    let mut headers: Vec<String> = vec![pivot.index_name.clone()];
    headers.extend(pivot.column_keys.iter().map(|k| k.to_string()));
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

    let rows: Vec<Vec<String>> = pivot
        .index_keys
        .iter()
        .zip(&pivot.cells)
        .map(|(key, cells)| {
            std::iter::once(key.to_string())
                .chain(
                    cells
                        .iter()
                        .map(|c| c.map_or_else(|| "null".to_string(), &value_fmt)),
                )
                .collect()
        })
        .collect();
    string_table(ui, id, &header_refs, &rows);
}

/// Scrollable view of the given rows of the dataset, every column shown.
pub fn data_table(ui: &mut Ui, id: &str, table: &Table, rows: &[usize]) {
    let columns = table.columns();
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .max_scroll_height(360.0)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(40.0).clip(true), columns.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(&col.name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut table_row| {
                    let row = rows[table_row.index()];
                    for col in columns {
                        table_row.col(|ui: &mut Ui| {
                            ui.label(col.values[row].to_string());
                        });
                    }
                });
            });
    });
}
