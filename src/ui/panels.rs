use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use claim_template::data::variant::SchemaVariant;
use claim_template::export;

use crate::state::{AppState, VariantChoice};

const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 40);

// ---------------------------------------------------------------------------
// Left side panel – layout, notifications, summary, export
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Claim Data Raw to Template");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Layout selector ----
            ui.strong("Raw layout");
            let mut choice = state.variant;
            egui::ComboBox::from_id_salt("raw_layout")
                .selected_text(choice.label())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut choice, VariantChoice::Auto, "Auto-detect");
                    for &variant in SchemaVariant::all() {
                        ui.selectable_value(&mut choice, VariantChoice::Fixed(variant), variant.name)
                            .on_hover_text(variant.description);
                    }
                });
            state.set_variant(choice);
            if let (VariantChoice::Auto, Some(v)) = (state.variant, state.effective_variant()) {
                ui.label(format!("Detected: {}", v.name));
            }
            ui.separator();

            let Some(outcome) = &state.outcome else {
                ui.label("No data processed.");
                return;
            };

            ui.label(format!(
                "{} rows read, {} ready, {} in template",
                outcome.input_rows,
                outcome.ready_rows,
                outcome.table.len()
            ));

            // ---- Duplicates ----
            let dup_header = format!("Duplicated Claim No values ({})", outcome.duplicates.keys.len());
            egui::CollapsingHeader::new(RichText::new(dup_header).strong())
                .id_salt("duplicates")
                .default_open(!outcome.duplicates.is_empty())
                .show(ui, |ui: &mut Ui| {
                    if outcome.duplicates.is_empty() {
                        ui.label("None");
                    }
                    for key in &outcome.duplicates.keys {
                        ui.label(key.to_string());
                    }
                });

            // ---- Warnings ----
            let warn_header = format!("Warnings ({})", outcome.warnings.len());
            egui::CollapsingHeader::new(RichText::new(warn_header).strong())
                .id_salt("warnings")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    if outcome.warnings.is_empty() {
                        ui.label("None");
                    }
                    for warning in &outcome.warnings {
                        ui.label(RichText::new(warning.to_string()).color(WARNING_COLOR));
                    }
                });

            // ---- Summary ----
            ui.separator();
            ui.strong("Claim Summary");
            for line in outcome.summary.lines() {
                ui.label(format!("- {line}"));
            }

            // ---- Export ----
            ui.separator();
            ui.strong("Excel file name (without extension)");
            ui.text_edit_singleline(&mut state.export_name);
            if ui.button("Export…").clicked() {
                save_file_dialog(state);
            }
        });
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
            let can_export = state.outcome.is_some();
            if ui.add_enabled(can_export, egui::Button::new("Export…")).clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(path) = &state.source_path {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(name);
        }

        if let Some(msg) = &state.error_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if let Some(msg) = &state.status_message {
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload your CSV file")
        .add_filter("CSV", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        match claim_template::data::loader::load_file(&path) {
            Ok(raw) => {
                log::info!("Loaded {} rows with columns {:?}", raw.len(), raw.headers);
                state.set_raw_table(raw, Some(path));
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.error_message = Some(format!("Error: {e}"));
            }
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let Some(outcome) = &state.outcome else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export template")
        .set_file_name(state.export_file_name())
        .add_filter("Excel workbook", &["xlsx"])
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export::export_file(&outcome.table, &path) {
            Ok(()) => {
                state.status_message = Some(format!("Saved {}", path.display()));
                state.error_message = None;
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.error_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
