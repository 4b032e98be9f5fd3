use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::analysis::Analysis;
use crate::state::AppState;
use crate::ui::sections;

// ---------------------------------------------------------------------------
// Left side panel – analysis menu
// ---------------------------------------------------------------------------

/// Render the single-select analysis menu.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Choose Analysis Type:");
    ui.separator();

    for analysis in Analysis::MENU {
        let selected = state.selection == analysis;
        let label = egui::SelectableLabel::new(selected, analysis.label());
        if ui.add_sized([ui.available_width(), 24.0], label).clicked() {
            state.select(analysis);
        }
    }
}

// ---------------------------------------------------------------------------
// Central panel – selected analyses
// ---------------------------------------------------------------------------

/// Render the page: header image, selected sections, footer.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("🚢 Titanic Dataset Analysis").size(26.0));
            sections::image_if_exists(ui, &state.config.image("titanic.jpg"));
            ui.add_space(8.0);

            if let Some(msg) = &state.status_message {
                ui.label(RichText::new(format!("❌ {msg}")).color(Color32::RED));
                return;
            }
            if state.dataset.is_none() {
                ui.label("No dataset loaded.  (File → Open…)");
                return;
            }

            for section in state.selection.sections() {
                sections::section(ui, state, section);
            }

            footer(ui);
        });
}

/// `(label, link text, url)` lines under the last section.
const FOOTER_LINKS: [(&str, &str, &str); 3] = [
    ("Data Source:", "Kaggle Titanic Dataset", "https://www.kaggle.com/c/titanic/data"),
    ("Powered by:", "aifab.xyz", "https://aifab.xyz"),
    ("GitHub:", "truevis/aifab-titanic", "https://github.com/truevis/aifab-titanic"),
];

fn footer(ui: &mut Ui) {
    for (label, text, url) in FOOTER_LINKS {
        ui.horizontal(|ui: &mut Ui| {
            ui.strong(label);
            ui.hyperlink_to(text, url);
        });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                let path = state.data_path().to_path_buf();
                state.open_path(path);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{}: {} passengers, {} shown in overview",
                state.data_path().display(),
                ds.height(),
                state.visible_rows().len()
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open passenger manifest")
        .add_filter("Supported files", &["gz", "csv", "json"])
        .add_filter("Compressed CSV", &["gz"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_credits_source_and_repository() {
        let labels: Vec<&str> = FOOTER_LINKS.iter().map(|(label, _, _)| *label).collect();
        assert_eq!(labels, vec!["Data Source:", "Powered by:", "GitHub:"]);
        assert!(FOOTER_LINKS.iter().all(|(_, _, url)| url.starts_with("https://")));
    }
}
