use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use super::variant::TemplateField;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the raw export or of the template
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, mirroring what a spreadsheet column holds.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    /// A date field whose raw text could not be parsed. The raw text is kept
    /// for display only; exporters write it as a blank cell.
    InvalidDate(String),
    /// Missing value. Also the canonical empty marker of the room option.
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::InvalidDate(raw) => write!(f, "{raw}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw CSV field.
    ///
    /// Numbers with a leading zero (`"007"`) stay text so that policy and
    /// member numbers survive intact. `"NaN"`/`"inf"` are text, never floats.
    pub fn guess(raw: &str) -> CellValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let leading_zero = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
        if !leading_zero {
            if let Ok(i) = trimmed.parse::<i64>() {
                return CellValue::Integer(i);
            }
            if trimmed.bytes().any(|b| b.is_ascii_digit()) {
                if let Ok(f) = trimmed.parse::<f64>() {
                    if f.is_finite() {
                        return CellValue::Float(f);
                    }
                }
            }
        }
        CellValue::Text(raw.to_string())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as an amount. Text amounts with thousands
    /// separators (`"1,250.00"`) are accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
            }
            _ => None,
        }
    }

    /// Canonical text used to compare identifiers across cell types:
    /// `100`, `100.0` and `" 100 "` all render as `"100"`.
    pub fn key_text(&self) -> String {
        match self {
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                format!("{}", *v as i64)
            }
            CellValue::Text(s) | CellValue::InvalidDate(s) => s.trim().to_string(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// RawRecord / RawTable – the uploaded export
// ---------------------------------------------------------------------------

/// One row of the uploaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 0-based position of the row in the source file (header excluded).
    pub row: usize,
    /// Column name → value.
    pub fields: BTreeMap<String, CellValue>,
}

impl RawRecord {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    /// Value of `column`, `Null` when the column is absent.
    pub fn value(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&CellValue::Null)
    }
}

/// The full parsed upload.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names in file order.
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ClaimKey – the dedup key
// ---------------------------------------------------------------------------

/// Opaque claim identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct ClaimKey(pub String);

impl From<&CellValue> for ClaimKey {
    fn from(value: &CellValue) -> Self {
        ClaimKey(value.key_text())
    }
}

impl fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<missing>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateTable – the fixed-schema output
// ---------------------------------------------------------------------------

/// One output row, aligned with [`TemplateTable::fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRecord {
    pub cells: Vec<CellValue>,
}

/// The output record set handed to the export boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateTable {
    /// Output columns in order.
    pub fields: Vec<TemplateField>,
    pub rows: Vec<TemplateRecord>,
}

impl TemplateTable {
    pub fn new(fields: Vec<TemplateField>) -> Self {
        TemplateTable {
            fields,
            rows: Vec::new(),
        }
    }

    /// Column headers, verbatim as they appear in the exported sheet.
    pub fn headers(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.header()).collect()
    }

    pub fn column_index(&self, field: TemplateField) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    /// Cell of `field` in row `row`, `None` if either is out of range.
    pub fn value(&self, row: usize, field: TemplateField) -> Option<&CellValue> {
        let col = self.column_index(field)?;
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// All values of one column, in row order.
    pub fn column(&self, field: TemplateField) -> Vec<&CellValue> {
        match self.column_index(field) {
            Some(col) => self.rows.iter().filter_map(|r| r.cells.get(col)).collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_types() {
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess("   "), CellValue::Null);
        assert_eq!(CellValue::guess("100"), CellValue::Integer(100));
        assert_eq!(CellValue::guess("-5"), CellValue::Integer(-5));
        assert_eq!(CellValue::guess("1250.5"), CellValue::Float(1250.5));
        assert_eq!(CellValue::guess("0.5"), CellValue::Float(0.5));
        assert_eq!(CellValue::guess("0"), CellValue::Integer(0));
        assert_eq!(CellValue::guess("007"), CellValue::Text("007".into()));
        assert_eq!(CellValue::guess("NaN"), CellValue::Text("NaN".into()));
        assert_eq!(CellValue::guess("inf"), CellValue::Text("inf".into()));
        assert_eq!(CellValue::guess(" on plan "), CellValue::Text(" on plan ".into()));
    }

    #[test]
    fn key_text_is_type_independent() {
        assert_eq!(CellValue::Integer(100).key_text(), "100");
        assert_eq!(CellValue::Float(100.0).key_text(), "100");
        assert_eq!(CellValue::Text(" 100 ".into()).key_text(), "100");
        assert_eq!(CellValue::Null.key_text(), "");
        assert_eq!(ClaimKey::from(&CellValue::Null).to_string(), "<missing>");
    }

    #[test]
    fn amounts_accept_separators() {
        assert_eq!(CellValue::Text("1,250.50".into()).as_f64(), Some(1250.5));
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Text("n/a".into()).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }

    #[test]
    fn display_renders_null_as_blank() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(CellValue::Date(d).to_string(), "2024-03-09");
        assert_eq!(CellValue::Null.to_string(), "");
    }
}
