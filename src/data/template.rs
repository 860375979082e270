//! Template mapping: date coercion, text normalization and projection of the
//! resolved records into the fixed output columns.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::dates::ParsedDate;
use super::model::{CellValue, RawRecord, TemplateRecord, TemplateTable};
use super::normalize::{is_empty_like, normalize_room_option, upper_text};
use super::variant::{SchemaVariant, TemplateField};

// ---------------------------------------------------------------------------
// Data-quality warnings
// ---------------------------------------------------------------------------

/// Recoverable data-quality problem, reported by template field name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// A date field had unparseable or missing values.
    InvalidDates {
        field: String,
        source_column: String,
        invalid_rows: usize,
        missing_rows: usize,
    },
    /// A text field had empty-like values collapsed to the empty marker.
    EmptyText {
        field: String,
        source_column: String,
        rows: usize,
    },
}

impl DataWarning {
    pub fn field(&self) -> &str {
        match self {
            DataWarning::InvalidDates { field, .. } | DataWarning::EmptyText { field, .. } => field,
        }
    }
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::InvalidDates {
                field,
                invalid_rows,
                missing_rows,
                ..
            } => write!(
                f,
                "Invalid date values detected in column '{field}' ({invalid_rows} unparseable, {missing_rows} missing)"
            ),
            DataWarning::EmptyText { field, rows, .. } => {
                write!(f, "Empty values in column '{field}' ({rows} rows)")
            }
        }
    }
}

#[derive(Default)]
struct DateTally {
    invalid: usize,
    missing: usize,
}

// ---------------------------------------------------------------------------
// Mapper
// ---------------------------------------------------------------------------

/// Project resolved records into the variant's template columns.
///
/// Assumes the variant's columns were checked against the header beforehand;
/// an absent column reads as missing here.
pub fn map_records(records: &[&RawRecord], variant: &SchemaVariant) -> (TemplateTable, Vec<DataWarning>) {
    let fields = variant.output_fields();
    let mut table = TemplateTable::new(fields.clone());
    let mut date_tallies: BTreeMap<TemplateField, DateTally> = BTreeMap::new();
    let mut empty_rooms = 0usize;

    for (idx, rec) in records.iter().enumerate() {
        let mut primary_date: Option<NaiveDate> = None;
        let mut cells = Vec::with_capacity(fields.len());

        for &field in &fields {
            let cell = match field {
                TemplateField::RowNumber => CellValue::Integer(idx as i64 + 1),
                TemplateField::Year => primary_date
                    .map(|d| CellValue::Integer(d.year() as i64))
                    .unwrap_or(CellValue::Null),
                TemplateField::Month => primary_date
                    .map(|d| CellValue::Integer(d.month() as i64))
                    .unwrap_or(CellValue::Null),
                TemplateField::RoomOption => {
                    let raw = source_value(rec, variant, field);
                    if is_empty_like(raw) {
                        empty_rooms += 1;
                    }
                    let product = source_value(rec, variant, TemplateField::ProductType);
                    let promote = product
                        .as_text()
                        .map(|p| variant.promotes_unknown_room(p))
                        .unwrap_or(false);
                    normalize_room_option(raw, variant.upper_cases(field), promote).into()
                }
                _ => {
                    let raw = source_value(rec, variant, field);
                    if let Some(policy) = variant.date_policy(field) {
                        let parsed = policy.coerce(raw);
                        let tally = date_tallies.entry(field).or_default();
                        match &parsed {
                            ParsedDate::Valid(d) => {
                                if field == TemplateField::Date {
                                    primary_date = Some(*d);
                                }
                            }
                            ParsedDate::Missing => tally.missing += 1,
                            ParsedDate::Invalid(_) => tally.invalid += 1,
                        }
                        parsed.into()
                    } else if variant.upper_cases(field) {
                        upper_text(raw)
                    } else {
                        raw.clone()
                    }
                }
            };
            cells.push(cell);
        }

        table.rows.push(TemplateRecord { cells });
    }

    let mut warnings = Vec::new();
    for (field, _) in variant.dates {
        let (Some(tally), Some(src)) = (date_tallies.get(field), variant.source(*field)) else {
            continue;
        };
        if tally.invalid > 0 || tally.missing > 0 {
            warnings.push(DataWarning::InvalidDates {
                field: field.header().to_string(),
                source_column: src.to_string(),
                invalid_rows: tally.invalid,
                missing_rows: tally.missing,
            });
        }
    }
    if empty_rooms > 0 {
        if let Some(src) = variant.source(TemplateField::RoomOption) {
            warnings.push(DataWarning::EmptyText {
                field: TemplateField::RoomOption.header().to_string(),
                source_column: src.to_string(),
                rows: empty_rooms,
            });
        }
    }

    (table, warnings)
}

fn source_value<'r>(rec: &'r RawRecord, variant: &SchemaVariant, field: TemplateField) -> &'r CellValue {
    match variant.source(field) {
        Some(col) => rec.value(col),
        None => &CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::variant::{EXTENDED, STANDARD};

    fn standard_record(row: usize, overrides: &[(&str, CellValue)]) -> RawRecord {
        let mut fields: BTreeMap<String, CellValue> = STANDARD
            .required_columns()
            .into_iter()
            .map(|c| (c.to_string(), CellValue::Text(format!("{c} value"))))
            .collect();
        fields.insert("Claim Status".into(), CellValue::Text("R".into()));
        fields.insert("Claim No".into(), CellValue::Integer(row as i64));
        fields.insert("Treatment Start".into(), CellValue::Text("2024-01-02".into()));
        fields.insert("Treatment Finish".into(), CellValue::Text("2024-01-05".into()));
        fields.insert("Date".into(), CellValue::Text("15/03/2024".into()));
        fields.insert("Room Option".into(), CellValue::Text(" on plan ".into()));
        fields.insert("Product Type".into(), CellValue::Text("IP".into()));
        for (col, val) in overrides {
            fields.insert(col.to_string(), val.clone());
        }
        RawRecord { row, fields }
    }

    #[test]
    fn row_counter_and_derived_period() {
        let records = vec![
            standard_record(0, &[]),
            standard_record(1, &[("Date", CellValue::Text("01/12/2023".into()))]),
        ];
        let refs: Vec<&RawRecord> = records.iter().collect();
        let (table, warnings) = map_records(&refs, &STANDARD);

        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(table.column(TemplateField::RowNumber), vec![&CellValue::Integer(1), &CellValue::Integer(2)]);
        assert_eq!(table.value(0, TemplateField::Year), Some(&CellValue::Integer(2024)));
        assert_eq!(table.value(0, TemplateField::Month), Some(&CellValue::Integer(3)));
        assert_eq!(table.value(1, TemplateField::Year), Some(&CellValue::Integer(2023)));
        assert_eq!(table.value(1, TemplateField::Month), Some(&CellValue::Integer(12)));
        assert_eq!(
            table.value(1, TemplateField::Date),
            Some(&CellValue::Date(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap()))
        );
    }

    #[test]
    fn text_fields_are_normalized() {
        let records = vec![standard_record(0, &[("Patient Name", CellValue::Text("budi santoso".into()))])];
        let refs: Vec<&RawRecord> = records.iter().collect();
        let (table, _) = map_records(&refs, &STANDARD);

        assert_eq!(
            table.value(0, TemplateField::PatientName),
            Some(&CellValue::Text("BUDI SANTOSO".into()))
        );
        assert_eq!(
            table.value(0, TemplateField::RoomOption),
            Some(&CellValue::Text("ONPLAN".into()))
        );
        // Emp Name is copied untouched.
        assert_eq!(
            table.value(0, TemplateField::EmpName),
            Some(&CellValue::Text("Emp Name value".into()))
        );
    }

    #[test]
    fn empty_room_option_depends_on_product_type() {
        let records = vec![
            standard_record(0, &[("Room Option", CellValue::Text("NaN".into()))]),
            standard_record(
                1,
                &[
                    ("Room Option", CellValue::Null),
                    ("Product Type", CellValue::Text("OP".into())),
                ],
            ),
        ];
        let refs: Vec<&RawRecord> = records.iter().collect();
        let (table, warnings) = map_records(&refs, &STANDARD);

        assert_eq!(
            table.value(0, TemplateField::RoomOption),
            Some(&CellValue::Text("Unknown".into()))
        );
        assert_eq!(table.value(1, TemplateField::RoomOption), Some(&CellValue::Null));
        assert_eq!(
            warnings,
            vec![DataWarning::EmptyText {
                field: "Room Option".into(),
                source_column: "Room Option".into(),
                rows: 2,
            }]
        );
    }

    #[test]
    fn unparseable_start_date_warns_and_keeps_row() {
        let records = vec![
            standard_record(0, &[("Treatment Start", CellValue::Text("yesterday".into()))]),
            standard_record(1, &[]),
        ];
        let refs: Vec<&RawRecord> = records.iter().collect();
        let (table, warnings) = map_records(&refs, &STANDARD);

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.value(0, TemplateField::TreatmentStart),
            Some(&CellValue::InvalidDate("yesterday".into()))
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field(), "Treatment Start");
        assert_eq!(
            warnings[0],
            DataWarning::InvalidDates {
                field: "Treatment Start".into(),
                source_column: "Treatment Start".into(),
                invalid_rows: 1,
                missing_rows: 0,
            }
        );
    }

    #[test]
    fn invalid_primary_date_blanks_period() {
        let records = vec![standard_record(0, &[("Date", CellValue::Text("2024-03-15".into()))])];
        let refs: Vec<&RawRecord> = records.iter().collect();
        let (table, warnings) = map_records(&refs, &STANDARD);

        assert_eq!(table.value(0, TemplateField::Year), Some(&CellValue::Null));
        assert_eq!(table.value(0, TemplateField::Month), Some(&CellValue::Null));
        assert_eq!(warnings[0].field(), "Date");
    }

    #[test]
    fn extended_variant_keeps_case() {
        let mut fields: BTreeMap<String, CellValue> = EXTENDED
            .required_columns()
            .into_iter()
            .map(|c| (c.to_string(), CellValue::Text(format!("{c} value"))))
            .collect();
        fields.insert("Treatment Start".into(), CellValue::Text("02/01/2024".into()));
        fields.insert("Treatment Finish".into(), CellValue::Text("05/01/2024".into()));
        fields.insert("Date".into(), CellValue::Text("05/01/2024".into()));
        fields.insert("Room Option".into(), CellValue::Text(" on plan ".into()));
        let record = RawRecord { row: 0, fields };
        let (table, warnings) = map_records(&[&record], &EXTENDED);

        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(
            table.value(0, TemplateField::PatientName),
            Some(&CellValue::Text("Patient Name value".into()))
        );
        assert_eq!(
            table.value(0, TemplateField::RoomOption),
            Some(&CellValue::Text("onplan".into()))
        );
        assert_eq!(
            table.value(0, TemplateField::TreatmentStart),
            Some(&CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()))
        );
        assert!(table.column_index(TemplateField::SecondaryDiagnosis).is_some());
    }

    #[test]
    fn extended_start_date_is_strict_day_first() {
        let mut fields: BTreeMap<String, CellValue> = EXTENDED
            .required_columns()
            .into_iter()
            .map(|c| (c.to_string(), CellValue::Text(format!("{c} value"))))
            .collect();
        fields.insert("Treatment Start".into(), CellValue::Text("2024-01-02".into()));
        fields.insert("Treatment Finish".into(), CellValue::Text("05/01/2024".into()));
        fields.insert("Date".into(), CellValue::Text("05/01/2024".into()));
        let record = RawRecord { row: 0, fields };
        let (table, warnings) = map_records(&[&record], &EXTENDED);

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.value(0, TemplateField::TreatmentStart),
            Some(&CellValue::InvalidDate("2024-01-02".into()))
        );
        assert_eq!(
            warnings,
            vec![DataWarning::InvalidDates {
                field: "Treatment Start".into(),
                source_column: "Treatment Start".into(),
                invalid_rows: 1,
                missing_rows: 0,
            }]
        );

        let standard = standard_record(0, &[]);
        let (table, warnings) = map_records(&[&standard], &STANDARD);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(
            table.value(0, TemplateField::TreatmentStart),
            Some(&CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()))
        );
    }
}
