use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use claim_template::data::model::CellValue;

use crate::state::AppState;

/// Rows shown in the preview table; the export always has all of them.
const PREVIEW_ROWS: usize = 200;

// ---------------------------------------------------------------------------
// Template preview (central panel)
// ---------------------------------------------------------------------------

/// Render the transformed-data preview in the central panel.
pub fn template_preview(ui: &mut Ui, state: &AppState) {
    let Some(outcome) = &state.outcome else {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.raw.is_some() {
                ui.heading("The upload does not match the selected layout.");
            } else {
                ui.heading("Upload a claim export to start  (File → Open…)");
            }
        });
        return;
    };

    let table = &outcome.table;
    let shown = table.len().min(PREVIEW_ROWS);
    ui.strong(format!(
        "Transformed Data Preview ({shown} of {} rows, layout '{}')",
        table.len(),
        outcome.variant.name
    ));
    ui.add_space(4.0);

    let headers = table.headers();
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(48.0), headers.len())
            .header(20.0, |mut header| {
                for name in &headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, shown, |mut row| {
                    let record = &table.rows[row.index()];
                    for cell in &record.cells {
                        row.col(|ui: &mut Ui| {
                            cell_label(ui, cell);
                        });
                    }
                });
            });
    });
}

/// Unparseable dates are shown in red so they stand out before export.
fn cell_label(ui: &mut Ui, cell: &CellValue) {
    match cell {
        CellValue::InvalidDate(raw) => {
            ui.label(RichText::new(raw).color(Color32::RED));
        }
        other => {
            ui.label(other.to_string());
        }
    }
}
