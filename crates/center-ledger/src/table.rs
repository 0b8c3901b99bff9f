//! Grid → typed table.
//!
//! Promotes the header row, coerces the monetary columns to 만원, parses dates
//! and derives year/month. Rows whose date cannot be parsed are dropped and
//! reported as a count; a missing value column degrades to zeros with a warning.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::constants::{self, MANWON};
use crate::source::Grid;

/// Fatal problems: the grid cannot be turned into a dated table at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("worksheet is empty (no header row)")]
    EmptyGrid,
    #[error("날짜 변환 오류: column '{0}' not found in header")]
    MissingDateColumn(String),
}

/// Problems that leave the rest of the table usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NormalizeWarning {
    MissingColumn { column: String },
    DateParseFailure { count: usize },
    InvalidNumber { column: String, row: usize, raw: String },
}

impl fmt::Display for NormalizeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column } => match Center::from_column(column) {
                Some(center) => write!(f, "'{}' 컬럼이 없습니다.", center.display_name()),
                None => write!(f, "'{}' 컬럼이 없습니다.", column),
            },
            Self::DateParseFailure { count } => write!(f, "날짜를 해석할 수 없는 행 {}개를 제외했습니다.", count),
            Self::InvalidNumber { column, row, raw } => {
                write!(f, "{}행 '{}' 값 '{}'을(를) 숫자로 바꿀 수 없어 0으로 처리했습니다.", row, column, raw)
            }
        }
    }
}

/// One of the two logistics centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Center {
    One,
    Two,
}

impl Center {
    pub const ALL: [Center; 2] = [Center::One, Center::Two];

    /// Column key in the sheet (also used as the tab key)
    pub fn column(&self) -> &'static str {
        match self {
            Self::One => constants::CENTER_1_COLUMN,
            Self::Two => constants::CENTER_2_COLUMN,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::One => "동탄1센터",
            Self::Two => "동탄2센터",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        match column {
            constants::CENTER_1_COLUMN => Some(Self::One),
            constants::CENTER_2_COLUMN => Some(Self::Two),
            _ => None,
        }
    }
}

/// Daily volume counts (kg or 건), not rescaled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Volumes {
    pub center_1_goods: f64,
    pub center_1_army: f64,
    pub center_1_label: f64,
    pub center_2_goods: f64,
    pub center_2_label: f64,
}

/// One dated row with profit/loss already in 만원.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub center_1: f64,
    pub center_2: f64,
    pub volumes: Volumes,
}

impl Record {
    pub fn new(date: NaiveDate, center_1: f64, center_2: f64, volumes: Volumes) -> Self {
        Self {
            date,
            year: date.year(),
            month: date.month(),
            center_1,
            center_2,
            volumes,
        }
    }

    pub fn center(&self, center: Center) -> f64 {
        match center {
            Center::One => self.center_1,
            Center::Two => self.center_2,
        }
    }

    /// Both centers' profit/loss for the day
    pub fn combined(&self) -> f64 {
        self.center_1 + self.center_2
    }
}

/// Normalized table, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A data row that was excluded because its date did not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 1-based row number in the sheet (header is row 1)
    pub row: usize,
    pub raw_date: String,
}

/// Result of a successful normalization pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    pub table: Table,
    pub rejected: Vec<RejectedRow>,
    pub warnings: Vec<NormalizeWarning>,
}

/// Value columns and whether they are monetary (rescaled to 만원).
const VALUE_COLUMNS: [(&str, bool); 7] = [
    (constants::CENTER_1_COLUMN, true),
    (constants::CENTER_2_COLUMN, true),
    (constants::CENTER_1_GOODS_COLUMN, false),
    (constants::CENTER_1_ARMY_COLUMN, false),
    (constants::CENTER_1_LABEL_COLUMN, false),
    (constants::CENTER_2_GOODS_COLUMN, false),
    (constants::CENTER_2_LABEL_COLUMN, false),
];

/// Turn a raw grid into the typed table.
pub fn normalize(grid: &Grid) -> Result<Normalized, NormalizeError> {
    let Some((header_row, data_rows)) = grid.split_first() else {
        return Err(NormalizeError::EmptyGrid);
    };

    let header: Vec<String> = header_row.iter().map(|h| h.trim().to_string()).collect();

    // Column name → index, skipping the stray index column an export may carry.
    // First occurrence wins on duplicate names.
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, name) in header.iter().enumerate() {
        if is_index_column(name) {
            continue;
        }
        index.entry(name.as_str()).or_insert(i);
    }

    let Some(&date_idx) = index.get(constants::DATE_COLUMN) else {
        return Err(NormalizeError::MissingDateColumn(constants::DATE_COLUMN.to_string()));
    };

    let mut warnings = Vec::new();
    let mut value_idx: HashMap<&str, usize> = HashMap::new();
    for (column, _) in VALUE_COLUMNS {
        match index.get(column) {
            Some(&i) => {
                value_idx.insert(column, i);
            }
            None => {
                warn!(column, "expected column missing; values read as 0");
                warnings.push(NormalizeWarning::MissingColumn {
                    column: column.to_string(),
                });
            }
        }
    }

    let mut records = Vec::with_capacity(data_rows.len());
    let mut rejected = Vec::new();

    for (offset, row) in data_rows.iter().enumerate() {
        let sheet_row = offset + 2;
        let cell = move |i: usize| row.get(i).map(String::as_str).unwrap_or("");

        let raw_date = cell(date_idx);
        let Some(date) = parse_date(raw_date) else {
            rejected.push(RejectedRow {
                row: sheet_row,
                raw_date: raw_date.to_string(),
            });
            continue;
        };

        let mut value = |column: &str| -> f64 {
            let Some(&i) = value_idx.get(column) else {
                return 0.0;
            };
            let monetary = VALUE_COLUMNS.iter().any(|(c, m)| *c == column && *m);
            let parsed = if monetary { parse_manwon(cell(i)) } else { parse_number(cell(i)) };
            match parsed {
                Some(v) => v,
                None => {
                    warnings.push(NormalizeWarning::InvalidNumber {
                        column: column.to_string(),
                        row: sheet_row,
                        raw: cell(i).to_string(),
                    });
                    0.0
                }
            }
        };

        let center_1 = value(constants::CENTER_1_COLUMN);
        let center_2 = value(constants::CENTER_2_COLUMN);
        let volumes = Volumes {
            center_1_goods: value(constants::CENTER_1_GOODS_COLUMN),
            center_1_army: value(constants::CENTER_1_ARMY_COLUMN),
            center_1_label: value(constants::CENTER_1_LABEL_COLUMN),
            center_2_goods: value(constants::CENTER_2_GOODS_COLUMN),
            center_2_label: value(constants::CENTER_2_LABEL_COLUMN),
        };

        records.push(Record::new(date, center_1, center_2, volumes));
    }

    if !rejected.is_empty() {
        warn!(count = rejected.len(), "dropped rows with unparseable dates");
        warnings.push(NormalizeWarning::DateParseFailure { count: rejected.len() });
    }

    Ok(Normalized {
        table: Table::new(records),
        rejected,
        warnings,
    })
}

fn is_index_column(name: &str) -> bool {
    name.is_empty() || name.starts_with("Unnamed:")
}

/// Parse a formatted number such as `"1,234,500"` or `"-50,000"`.
///
/// Blank cells count as zero; `None` means the text is not a number.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a monetary cell straight to 만원.
pub fn parse_manwon(raw: &str) -> Option<f64> {
    parse_number(raw).map(|v| v / MANWON)
}

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Best-effort calendar date parse; the time of day, if any, is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Korean locale display: "2024. 1. 5." → "2024.1.5"
    let compact: String = trimmed.trim_end_matches('.').split_whitespace().collect();

    for candidate in [trimmed, compact.as_str()] {
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
                return Some(date);
            }
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn full_header() -> Vec<&'static str> {
        vec![
            "date",
            "center_1",
            "center_2",
            "center_1_goods",
            "center_1_army",
            "center_1_label",
            "center_2_goods",
            "center_2_label",
        ]
    }

    #[test]
    fn test_monetary_string_rescaled_to_manwon() {
        assert_eq!(parse_manwon("1,234,500"), Some(123.45));
        assert_eq!(parse_manwon("-50,000"), Some(-5.0));
        assert_eq!(parse_manwon(" 0 "), Some(0.0));
    }

    #[test]
    fn test_parse_number_blank_and_garbage() {
        assert_eq!(parse_number(""), Some(0.0));
        assert_eq!(parse_number("   "), Some(0.0));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("12.5"), Some(12.5));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        for raw in [
            "2024-01-05",
            "2024/01/05",
            "2024.01.05",
            "2024. 1. 5",
            "2024. 1. 5.",
            "20240105",
            "01/05/2024",
            "2024-01-05 13:45:00",
            "2024-01-05T13:45:00",
            "2024-01-05T13:45:00+09:00",
            "  2024-01-05  ",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "failed on {:?}", raw);
        }
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("합계"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_normalize_full_row() {
        let mut header = full_header();
        header.insert(0, "");
        let g = grid(&[
            &header,
            &["0", "2024-01-05", "100,000", "-50,000", "10", "2", "3", "4", "5"],
        ]);

        let normalized = normalize(&g).unwrap();
        assert!(normalized.warnings.is_empty());
        assert_eq!(normalized.table.len(), 1);

        let rec = &normalized.table.records[0];
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!((rec.year, rec.month), (2024, 1));
        assert_eq!(rec.center_1, 10.0);
        assert_eq!(rec.center_2, -5.0);
        assert_eq!(rec.combined(), 5.0);
        assert_eq!(rec.volumes.center_1_goods, 10.0);
        assert_eq!(rec.volumes.center_2_label, 5.0);
    }

    #[test]
    fn test_header_whitespace_trimmed_and_unnamed_dropped() {
        let g = grid(&[
            &["Unnamed: 0", " date ", " center_1", "center_2 "],
            &["x", "2024-03-01", "30,000", "10,000"],
        ]);

        let normalized = normalize(&g).unwrap();
        let rec = &normalized.table.records[0];
        assert_eq!(rec.center_1, 3.0);
        assert_eq!(rec.center_2, 1.0);
    }

    #[test]
    fn test_missing_monetary_column_is_warning() {
        let g = grid(&[&["date", "center_1"], &["2024-01-05", "20,000"]]);

        let normalized = normalize(&g).unwrap();
        assert_eq!(normalized.table.len(), 1);
        assert_eq!(normalized.table.records[0].center_2, 0.0);
        assert!(normalized.warnings.contains(&NormalizeWarning::MissingColumn {
            column: "center_2".into()
        }));
        assert_eq!(
            NormalizeWarning::MissingColumn {
                column: "center_2".into()
            }
            .to_string(),
            "'동탄2센터' 컬럼이 없습니다."
        );
    }

    #[test]
    fn test_missing_date_column_is_error() {
        let g = grid(&[&["day", "center_1"], &["2024-01-05", "1"]]);
        assert_eq!(
            normalize(&g).unwrap_err(),
            NormalizeError::MissingDateColumn("date".into())
        );
    }

    #[test]
    fn test_empty_grid_is_error() {
        assert_eq!(normalize(&Grid::new()).unwrap_err(), NormalizeError::EmptyGrid);
    }

    #[test]
    fn test_unparseable_dates_dropped_and_counted() {
        let header = full_header();
        let g = grid(&[
            &header,
            &["2024-01-05", "100,000", "0", "0", "0", "0", "0", "0"],
            &["합계", "999,999", "0", "0", "0", "0", "0", "0"],
            &["", "1", "1", "0", "0", "0", "0", "0"],
        ]);

        let normalized = normalize(&g).unwrap();
        assert_eq!(normalized.table.len(), 1);
        assert_eq!(normalized.rejected.len(), 2);
        assert_eq!(normalized.rejected[0].row, 3);
        assert_eq!(normalized.rejected[0].raw_date, "합계");
        assert!(normalized
            .warnings
            .contains(&NormalizeWarning::DateParseFailure { count: 2 }));
    }

    #[test]
    fn test_only_unparseable_dates_yields_empty_table() {
        let g = grid(&[&["date", "center_1", "center_2"], &["abc", "1", "2"], &["", "3", "4"]]);

        let normalized = normalize(&g).unwrap();
        assert!(normalized.table.is_empty());
        assert_eq!(normalized.rejected.len(), 2);
    }

    #[test]
    fn test_short_rows_padded() {
        let g = grid(&[&["date", "center_1", "center_2"], &["2024-01-05", "10,000"]]);

        let normalized = normalize(&g).unwrap();
        assert_eq!(normalized.table.records[0].center_1, 1.0);
        assert_eq!(normalized.table.records[0].center_2, 0.0);
    }

    #[test]
    fn test_invalid_number_reported_with_row() {
        let g = grid(&[&["date", "center_1", "center_2"], &["2024-01-05", "#REF!", "10,000"]]);

        let normalized = normalize(&g).unwrap();
        assert_eq!(normalized.table.records[0].center_1, 0.0);
        assert!(normalized.warnings.contains(&NormalizeWarning::InvalidNumber {
            column: "center_1".into(),
            row: 2,
            raw: "#REF!".into(),
        }));
    }
}
