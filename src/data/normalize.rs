//! Text normalization for free-text template fields.

use super::model::CellValue;

/// Label given to an empty room option for product types that require one.
pub const UNKNOWN_ROOM: &str = "Unknown";

/// Values that mean "nothing here" in exported room options.
const EMPTY_SENTINELS: &[&str] = &["nan", "none"];

/// Normalized accommodation option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomOption {
    Value(String),
    /// Canonical empty marker.
    Empty,
    /// Empty option promoted to [`UNKNOWN_ROOM`].
    Unknown,
}

impl From<RoomOption> for CellValue {
    fn from(option: RoomOption) -> Self {
        match option {
            RoomOption::Value(s) => CellValue::Text(s),
            RoomOption::Empty => CellValue::Null,
            RoomOption::Unknown => CellValue::Text(UNKNOWN_ROOM.to_string()),
        }
    }
}

/// Whether a cell holds nothing meaningful: missing, blank, or a `NaN`/`None`
/// sentinel in any case.
pub fn is_empty_like(value: &CellValue) -> bool {
    match value {
        CellValue::Null => true,
        CellValue::Text(s) => {
            let t = s.trim();
            t.is_empty() || EMPTY_SENTINELS.iter().any(|e| t.eq_ignore_ascii_case(e))
        }
        _ => false,
    }
}

/// Normalize a room option: drop all whitespace, optionally upper-case,
/// collapse empty-like values, and promote empty to `Unknown` when
/// `promote_unknown` holds for the record's product type.
pub fn normalize_room_option(
    value: &CellValue,
    upper_case: bool,
    promote_unknown: bool,
) -> RoomOption {
    if is_empty_like(value) {
        return if promote_unknown {
            RoomOption::Unknown
        } else {
            RoomOption::Empty
        };
    }
    let compact: String = value
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if upper_case {
        RoomOption::Value(compact.to_uppercase())
    } else {
        RoomOption::Value(compact)
    }
}

/// Upper-case text cells; other cell types pass through.
pub fn upper_text(value: &CellValue) -> CellValue {
    match value {
        CellValue::Text(s) => CellValue::Text(s.to_uppercase()),
        other => other.clone(),
    }
}
