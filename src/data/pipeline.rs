use serde::Serialize;

use super::dedup::{self, DuplicateReport};
use super::error::PipelineError;
use super::filter;
use super::model::{RawTable, TemplateTable};
use super::template::{self, DataWarning};
use super::variant::{SchemaVariant, TemplateField};

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregates over the output set, shown to the user before export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_claims: usize,
    pub total_billed: f64,
    pub total_accepted: f64,
    pub total_excess: f64,
    pub total_unpaid: f64,
    /// Only for layouts that carry the paid-claim amount.
    pub total_claim_paid: Option<f64>,
}

impl Summary {
    pub fn from_table(table: &TemplateTable) -> Self {
        let sum = |field: TemplateField| -> f64 {
            table.column(field).iter().filter_map(|v| v.as_f64()).sum()
        };
        Summary {
            total_claims: table.len(),
            total_billed: sum(TemplateField::Billed),
            total_accepted: sum(TemplateField::Accepted),
            total_excess: sum(TemplateField::ExcessTotal),
            total_unpaid: sum(TemplateField::Unpaid),
            total_claim_paid: table
                .column_index(TemplateField::ClaimPaid)
                .map(|_| sum(TemplateField::ClaimPaid)),
        }
    }

    /// Human-readable lines, e.g. `"Total Billed: 1,250.00"`.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total Claims: {}", group_thousands(&self.total_claims.to_string())),
            format!("Total Billed: {}", format_amount(self.total_billed)),
            format!("Total Accepted: {}", format_amount(self.total_accepted)),
            format!("Total Excess: {}", format_amount(self.total_excess)),
            format!("Total Unpaid: {}", format_amount(self.total_unpaid)),
        ];
        if let Some(paid) = self.total_claim_paid {
            lines.push(format!("Total Claim Paid: {}", format_amount(paid)));
        }
        lines
    }
}

/// Two decimals with thousands separators: `1234567.5` → `"1,234,567.50"`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{}.{frac}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub variant: &'static SchemaVariant,
    pub table: TemplateTable,
    pub duplicates: DuplicateReport,
    pub warnings: Vec<DataWarning>,
    pub summary: Summary,
    /// Rows in the upload.
    pub input_rows: usize,
    /// Rows left after the status filter.
    pub ready_rows: usize,
}

/// Serializable view of the notifications of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub variant: &'static str,
    pub input_rows: usize,
    pub ready_rows: usize,
    pub output_rows: usize,
    pub duplicates: &'a DuplicateReport,
    pub warnings: &'a [DataWarning],
    pub summary: &'a Summary,
}

impl PipelineOutcome {
    pub fn report(&self) -> RunReport<'_> {
        RunReport {
            variant: self.variant.name,
            input_rows: self.input_rows,
            ready_rows: self.ready_rows,
            output_rows: self.table.len(),
            duplicates: &self.duplicates,
            warnings: &self.warnings,
            summary: &self.summary,
        }
    }
}

/// Run filter → dedup → template mapping over one upload.
///
/// Fails before touching any record when a required column is missing.
pub fn run(raw: &RawTable, variant: &'static SchemaVariant) -> Result<PipelineOutcome, PipelineError> {
    let missing = variant.missing_columns(&raw.headers);
    if !missing.is_empty() {
        log::error!("Layout '{}' is missing columns {:?}", variant.name, missing);
        return Err(PipelineError::MissingFields {
            variant: variant.name,
            fields: missing,
        });
    }
    if variant.upper_case.is_empty() {
        log::warn!(
            "Layout '{}' does not upper-case free-text fields",
            variant.name
        );
    }

    let ready = filter::ready_records(&raw.records, variant.status_column);
    let ready_rows = ready.len();
    log::info!("{ready_rows} of {} rows are ready", raw.len());

    let (duplicates, resolved) = dedup::resolve(ready, variant.claim_column());
    if !duplicates.is_empty() {
        log::info!(
            "{} duplicated claim numbers, {} rows superseded",
            duplicates.keys.len(),
            duplicates.superseded_rows
        );
    }

    let (table, warnings) = template::map_records(&resolved, variant);
    for warning in &warnings {
        log::warn!("{warning}");
    }
    let summary = Summary::from_table(&table);
    log::info!("Mapped {} rows into the '{}' template", table.len(), variant.name);

    Ok(PipelineOutcome {
        variant,
        table,
        duplicates,
        warnings,
        summary,
        input_rows: raw.len(),
        ready_rows,
    })
}

/// Like [`run`], picking the variant from the headers first.
/// Falls back to the standard layout so the missing columns get reported.
pub fn run_detected(raw: &RawTable) -> Result<PipelineOutcome, PipelineError> {
    let variant = SchemaVariant::detect(&raw.headers).unwrap_or(&super::variant::STANDARD);
    run(raw, variant)
}
