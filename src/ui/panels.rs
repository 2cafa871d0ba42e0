use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::ChartScope;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – batter selector
// ---------------------------------------------------------------------------

/// Render the left selector panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.strong("Select a Batter:");
    let mut chosen = None;
    egui::ComboBox::from_id_salt("batter_select")
        .selected_text(state.selection.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &state.batter_options {
                if ui
                    .selectable_label(state.selection == *option, option.to_string())
                    .clicked()
                {
                    chosen = Some(option.clone());
                }
            }
        });
    if let Some(selection) = chosen {
        state.select_batter(selection);
    }

    ui.add_space(8.0);
    let mut follow = state.scope == ChartScope::SelectedBatter;
    if ui
        .checkbox(&mut follow, "Apply batter filter to all charts")
        .on_hover_text("By default the velocity and launch-angle charts use every batter.")
        .changed()
    {
        state.set_scope(if follow {
            ChartScope::SelectedBatter
        } else {
            ChartScope::FullDataset
        });
    }

    ui.separator();

    // ---- Rows feeding each chart ----
    if let Some(charts) = &state.charts {
        ui.strong("Rows per chart");
        let tables = &charts.tables;
        ui.label(format!(
            "Distribution: {}",
            tables.distribution.iter().map(|c| c.count).sum::<usize>()
        ));
        ui.label(format!(
            "Exit velocity: {}",
            tables.velocity.iter().map(|r| r.samples).sum::<usize>()
        ));
        ui.label(format!("Launch angle: {}", tables.launch.len()));
        ui.label(format!("{} outcomes", state.color_map.len()));
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
                // Errors already land in the status bar.
                let _ = state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let name = ds
                .source
                .as_deref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if ds.is_empty() {
                ui.label(RichText::new(format!("{name}: no rows")).weak());
            } else {
                ui.label(format!(
                    "{name}: {} events, {} batters",
                    ds.len(),
                    state.batter_options.len().saturating_sub(1)
                ));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open batted ball data")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let source = state.source.with_path(path);
        // Errors already land in the status bar.
        let _ = state.load(source);
    }
}
