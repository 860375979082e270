use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use super::error::LoadError;
use super::model::{CellValue, RawRecord, RawTable};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a raw claim export from a file.  Dispatch by extension.
///
/// Only `.csv` (and `.txt` exports saved as comma-separated) are supported.
pub fn load_file(path: &Path) -> Result<RawTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => {
            let file = std::fs::File::open(path)?;
            load_csv_reader(file)
        }
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Load an export already held in memory (e.g. an uploaded buffer).
pub fn load_csv_bytes(bytes: &[u8]) -> Result<RawTable, LoadError> {
    load_csv_reader(bytes)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one claim per row.
///
/// Fields are decoded as UTF-8 with a Latin-1 fallback, since exports come
/// out of legacy systems in either encoding. Rows shorter than the header are
/// padded with nulls; longer rows are rejected.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let raw_headers = reader.byte_headers()?.clone();
    let decoded: Vec<String> = raw_headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let s = decode_field(h);
            if i == 0 {
                s.trim_start_matches('\u{feff}').to_string()
            } else {
                s
            }
        })
        .collect();
    if decoded.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::NoHeader);
    }
    let headers = disambiguate_headers(decoded);

    let mut records = Vec::new();
    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(LoadError::RaggedRow {
                row: row_no,
                found: record.len(),
                expected: headers.len(),
            });
        }

        let mut fields = BTreeMap::new();
        for (col_idx, col_name) in headers.iter().enumerate() {
            let value = record
                .get(col_idx)
                .map(|raw| CellValue::guess(&decode_field(raw)))
                .unwrap_or(CellValue::Null);
            fields.insert(col_name.clone(), value);
        }

        records.push(RawRecord {
            row: row_no,
            fields,
        });
    }

    log::info!(
        "Read {} rows with {} columns",
        records.len(),
        headers.len()
    );
    Ok(RawTable { headers, records })
}

/// UTF-8 if valid, otherwise every byte is taken as a Latin-1 code point.
fn decode_field(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) => s.to_string(),
        Err(_) => raw.iter().map(|&b| b as char).collect(),
    }
}

/// Repeated header names get `.1`, `.2`, … suffixes so no column is lost.
fn disambiguate_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    headers
        .into_iter()
        .map(|h| {
            let count = seen.entry(h.clone()).or_insert(0);
            let name = if *count == 0 {
                h.clone()
            } else {
                format!("{h}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_typed_cells() {
        let csv = "Claim No,Claim Status,Billed,Room Option\n100,R,1500.5, on plan \n101,P,,NaN\n";
        let table = load_csv_bytes(csv.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["Claim No", "Claim Status", "Billed", "Room Option"]);
        assert_eq!(table.len(), 2);
        let first = &table.records[0];
        assert_eq!(first.row, 0);
        assert_eq!(first.get("Claim No"), Some(&CellValue::Integer(100)));
        assert_eq!(first.get("Billed"), Some(&CellValue::Float(1500.5)));
        assert_eq!(first.get("Room Option"), Some(&CellValue::Text(" on plan ".into())));
        let second = &table.records[1];
        assert_eq!(second.get("Billed"), Some(&CellValue::Null));
        assert_eq!(second.get("Room Option"), Some(&CellValue::Text("NaN".into())));
    }

    #[test]
    fn latin1_fallback() {
        let mut bytes = b"Patient Name\n".to_vec();
        bytes.extend_from_slice(&[b'J', 0xE9, b'r', 0xF4, b'm', b'e', b'\n']);
        let table = load_csv_bytes(&bytes).unwrap();
        assert_eq!(
            table.records[0].get("Patient Name"),
            Some(&CellValue::Text("Jérôme".into()))
        );
    }

    #[test]
    fn strips_bom_and_renames_duplicate_headers() {
        let csv = "\u{feff}Claim No,Area,Area\n1,North,South\n";
        let table = load_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Claim No", "Area", "Area.1"]);
        assert_eq!(table.records[0].get("Area.1"), Some(&CellValue::Text("South".into())));
    }

    #[test]
    fn short_rows_are_padded() {
        let table = load_csv_bytes(b"A,B,C\n1,2\n").unwrap();
        assert_eq!(table.records[0].get("C"), Some(&CellValue::Null));
    }

    #[test]
    fn rejects_long_rows_and_missing_header() {
        assert!(matches!(
            load_csv_bytes(b"A,B\n1,2,3\n"),
            Err(LoadError::RaggedRow { row: 0, found: 3, expected: 2 })
        ));
        assert!(matches!(load_csv_bytes(b""), Err(LoadError::NoHeader)));
    }

    #[test]
    fn rejects_unknown_extension() {
        assert!(matches!(
            load_file(Path::new("claims.xlsx")),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }
}
