use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

use crate::data::model::{CellValue, TemplateTable};

/// Worksheet name of the exported template.
pub const SHEET_NAME: &str = "SC";

/// File name (without extension) offered for downloads.
pub const DEFAULT_EXPORT_NAME: &str = "Transformed_Claim_Data";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Write the template to `path`.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` – single worksheet [`SHEET_NAME`], bold header row
/// * `.csv`  – same header and cells as plain text
pub fn export_file(table: &TemplateTable, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" => {
            let mut workbook = build_workbook(table)?;
            workbook
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        "csv" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_csv(table, file)?;
        }
        other => bail!("Unsupported export extension: .{other}"),
    }
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

/// The `.xlsx` workbook serialized to memory instead of a file.
pub fn xlsx_bytes(table: &TemplateTable) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(table)?;
    workbook.save_to_buffer().context("serializing workbook")
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

fn build_workbook(table: &TemplateTable) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in table.headers().into_iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }
    for (idx, record) in table.rows.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, cell) in record.cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell, &date_format)
                .with_context(|| format!("writing row {row}, column {col}"))?;
        }
    }
    worksheet.autofit();

    Ok(workbook)
}

/// Missing values and unparseable dates are left blank.
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    date_format: &Format,
) -> Result<()> {
    match cell {
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Integer(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(v) => {
            worksheet.write_number(row, col, *v)?;
        }
        CellValue::Date(d) => {
            let date = ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8)?;
            worksheet.write_datetime_with_format(row, col, &date, date_format)?;
        }
        CellValue::InvalidDate(_) | CellValue::Null => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

pub fn write_csv<W: Write>(table: &TemplateTable, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(table.headers()).context("writing CSV header")?;
    for record in &table.rows {
        let cells = record.cells.iter().map(|cell| match cell {
            CellValue::InvalidDate(_) => String::new(),
            other => other.to_string(),
        });
        out.write_record(cells).context("writing CSV row")?;
    }
    out.flush().context("flushing CSV")?;
    Ok(())
}
