//! Raw insurance-claim export → fixed reporting template.
//!
//! [`data`] holds the loader and the filter/dedup/mapping pipeline,
//! [`export`] writes the resulting template as a spreadsheet.

pub mod data;
pub mod export;

pub use data::error::{LoadError, PipelineError};
pub use data::pipeline::{run, run_detected, PipelineOutcome, Summary};
pub use data::variant::{SchemaVariant, TemplateField};
