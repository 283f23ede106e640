use chrono::{Datelike, NaiveDate};

/// Days from 0001-01-01 (CE) to 1970-01-01, the Arrow `Date32` epoch.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;
/// Days from 0001-01-01 (CE) to 1899-12-30, day zero of spreadsheet serial dates.
const SPREADSHEET_EPOCH_FROM_CE: i32 = 693_594;
/// Serial number of 9999-12-31.
const MAX_SPREADSHEET_SERIAL: f64 = 2_958_465.0;

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

pub fn to_date32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_FROM_CE
}

pub fn from_date32(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_FROM_CE)?)
}

/// Parse a raw date cell from a source file.
///
/// Accepts, in order:
/// - spreadsheet serial day numbers (`45292`, `45292.5`), time of day dropped
/// - ISO `YYYY-MM-DD`, optionally followed by `T..` or ` ..` time
/// - US `M/D/YYYY`
pub fn parse_cell_date(raw: &str) -> Option<NaiveDate> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    if let Ok(serial) = s.parse::<f64>() {
        return from_spreadsheet_serial(serial);
    }
    parse_iso_date(s).or_else(|| NaiveDate::parse_from_str(s, "%m/%d/%Y").ok())
}

fn from_spreadsheet_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    if !(0.0..=MAX_SPREADSHEET_SERIAL).contains(&days) {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(SPREADSHEET_EPOCH_FROM_CE + days as i32)
}

/// `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`; the time part is ignored.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let head = s.get(..10)?;
    let rest = &s[10..];
    if !rest.is_empty() && !rest.starts_with(['T', ' ']) {
        return None;
    }
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

pub fn month_abbreviation(date: NaiveDate) -> &'static str {
    MONTH_ABBREVIATIONS[date.month0() as usize]
}

/// Calendar index (1..=12) of a three-letter month abbreviation.
pub fn month_number(abbreviation: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbreviation.trim()))
        .map(|i| i as u32 + 1)
}

/// `"Jan 2024"`
pub fn month_year_label(date: NaiveDate) -> String {
    format!("{} {}", month_abbreviation(date), date.year())
}
