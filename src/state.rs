use std::path::PathBuf;

use claim_template::data::model::RawTable;
use claim_template::data::pipeline::{self, PipelineOutcome};
use claim_template::data::variant::SchemaVariant;
use claim_template::export::DEFAULT_EXPORT_NAME;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which raw layout the pipeline runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantChoice {
    /// Detect from the uploaded headers.
    Auto,
    Fixed(&'static SchemaVariant),
}

impl VariantChoice {
    pub fn label(&self) -> String {
        match self {
            VariantChoice::Auto => "Auto-detect".to_string(),
            VariantChoice::Fixed(v) => v.name.to_string(),
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Uploaded export (None until the user opens a file).
    pub raw: Option<RawTable>,

    /// Path of the uploaded file.
    pub source_path: Option<PathBuf>,

    /// Selected raw layout.
    pub variant: VariantChoice,

    /// Result of the last successful run.
    pub outcome: Option<PipelineOutcome>,

    /// Export file name without extension.
    pub export_name: String,

    /// Error message shown in red in the top bar.
    pub error_message: Option<String>,

    /// Informational message (e.g. last export path).
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            raw: None,
            source_path: None,
            variant: VariantChoice::Auto,
            outcome: None,
            export_name: DEFAULT_EXPORT_NAME.to_string(),
            error_message: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded export and run the pipeline on it.
    pub fn set_raw_table(&mut self, raw: RawTable, path: Option<PathBuf>) {
        self.raw = Some(raw);
        self.source_path = path;
        self.status_message = None;
        self.rerun();
    }

    /// Switch layout and re-run on the held upload.
    pub fn set_variant(&mut self, choice: VariantChoice) {
        if self.variant != choice {
            self.variant = choice;
            self.rerun();
        }
    }

    /// Layout the next run will use.
    pub fn effective_variant(&self) -> Option<&'static SchemaVariant> {
        match self.variant {
            VariantChoice::Fixed(v) => Some(v),
            VariantChoice::Auto => self
                .raw
                .as_ref()
                .and_then(|raw| SchemaVariant::detect(&raw.headers)),
        }
    }

    /// Run the pipeline on the held upload. Failures clear the previous result.
    pub fn rerun(&mut self) {
        let Some(raw) = &self.raw else {
            return;
        };
        let result = match self.variant {
            VariantChoice::Fixed(v) => pipeline::run(raw, v),
            VariantChoice::Auto => pipeline::run_detected(raw),
        };
        match result {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                self.error_message = None;
            }
            Err(e) => {
                log::error!("Pipeline failed: {e}");
                self.outcome = None;
                self.error_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Export file name with the `.xlsx` extension appended.
    pub fn export_file_name(&self) -> String {
        let name = self.export_name.trim();
        let name = if name.is_empty() { DEFAULT_EXPORT_NAME } else { name };
        format!("{name}.xlsx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim_template::data::loader::load_csv_bytes;
    use claim_template::data::variant::{PASCAL, STANDARD};

    fn standard_upload() -> RawTable {
        let header = STANDARD.required_columns().join(",");
        load_csv_bytes(format!("{header}\n").as_bytes()).unwrap()
    }

    #[test]
    fn auto_detect_runs_on_load() {
        let mut state = AppState::default();
        state.set_raw_table(standard_upload(), None);
        assert_eq!(state.effective_variant(), Some(&STANDARD));
        assert!(state.outcome.is_some());
        assert!(state.error_message.is_none());
    }

    #[test]
    fn wrong_layout_reports_missing_columns() {
        let mut state = AppState::default();
        state.set_raw_table(standard_upload(), None);
        state.set_variant(VariantChoice::Fixed(&PASCAL));
        assert!(state.outcome.is_none());
        let msg = state.error_message.clone().unwrap();
        assert!(msg.contains("ClaimStatus"), "{msg}");
    }

    #[test]
    fn export_name_defaults() {
        let mut state = AppState::default();
        assert_eq!(state.export_file_name(), "Transformed_Claim_Data.xlsx");
        state.export_name = "  march  ".into();
        assert_eq!(state.export_file_name(), "march.xlsx");
        state.export_name = " ".into();
        assert_eq!(state.export_file_name(), "Transformed_Claim_Data.xlsx");
    }
}
