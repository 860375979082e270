use super::model::{CellValue, RawRecord};

// ---------------------------------------------------------------------------
// Status filter
// ---------------------------------------------------------------------------

/// Status code of claims that are ready for reporting.
pub const READY_STATUS: &str = "R";

/// Return the records whose `status_field` is exactly `code`, in input order.
///
/// Records where the field is missing, blank, numeric or any other text are
/// dropped. This is routine filtering and never an error.
pub fn filter_by_status<'a>(
    records: &'a [RawRecord],
    status_field: &str,
    code: &str,
) -> Vec<&'a RawRecord> {
    records
        .iter()
        .filter(|rec| matches!(rec.get(status_field), Some(CellValue::Text(s)) if s == code))
        .collect()
}

/// Records with status [`READY_STATUS`].
pub fn ready_records<'a>(records: &'a [RawRecord], status_field: &str) -> Vec<&'a RawRecord> {
    filter_by_status(records, status_field, READY_STATUS)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn record(row: usize, status: CellValue) -> RawRecord {
        let mut fields = BTreeMap::new();
        fields.insert("Claim Status".to_string(), status);
        fields.insert("Claim No".to_string(), CellValue::Integer(row as i64));
        RawRecord { row, fields }
    }

    #[test]
    fn keeps_only_ready_rows_in_order() {
        let records = vec![
            record(0, CellValue::Text("R".into())),
            record(1, CellValue::Text("P".into())),
            record(2, CellValue::Null),
            record(3, CellValue::Text("R".into())),
            record(4, CellValue::Text("r".into())),
            record(5, CellValue::Text("R ".into())),
        ];
        let rows: Vec<usize> = ready_records(&records, "Claim Status")
            .iter()
            .map(|r| r.row)
            .collect();
        assert_eq!(rows, vec![0, 3]);
    }

    #[test]
    fn absent_status_column_drops_everything() {
        let records = vec![record(0, CellValue::Text("R".into()))];
        assert!(ready_records(&records, "Status").is_empty());
    }

    #[test]
    fn custom_code() {
        let records = vec![
            record(0, CellValue::Text("R".into())),
            record(1, CellValue::Text("P".into())),
        ];
        let pending = filter_by_status(&records, "Claim Status", "P");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].row, 1);
    }
}
