//! Formats the 8-digit `YYYYMMDD` dates carried by diary entries, both as
//! ISO `YYYY-MM-DD` text and as a kanji calendar transcription with the
//! day of week.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Kanji numerals indexed by digit. Index 0 is empty so that composed
/// forms like 三十 (30) fall out of plain concatenation.
const DIGITS: [&str; 10] = [
    "", "一", "二", "三", "四", "五", "六", "七", "八", "九",
];

/// Month names indexed by zero-based month.
const MONTHS: [&str; 12] = [
    "一月",
    "二月",
    "三月",
    "四月",
    "五月",
    "六月",
    "七月",
    "八月",
    "九月",
    "十月",
    "十一月",
    "十二月",
];

/// Weekday characters indexed by ISO weekday (Monday = 0).
const WEEKDAYS: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

/// Parses an 8-digit `YYYYMMDD` date field into a calendar date. Fails
/// with [`Error::MalformedDate`] if the field is not exactly 8 decimal
/// digits or does not name a real Gregorian date.
pub fn parse(date: &str) -> Result<NaiveDate> {
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedDate(date.to_owned()));
    }
    NaiveDate::parse_from_str(date, "%Y%m%d")
        .map_err(|_| Error::MalformedDate(date.to_owned()))
}

/// Formats an 8-digit date field as `YYYY-MM-DD`.
pub fn format_iso(date: &str) -> Result<String> {
    Ok(parse(date)?.format("%Y-%m-%d").to_string())
}

/// Formats an 8-digit date field as a kanji transcription of its month,
/// day, and weekday, e.g. `20240101` becomes `一月一日（月）`.
pub fn format_kanji(date: &str) -> Result<String> {
    let parsed = parse(date)?;
    Ok(format!(
        "{}{}（{}）",
        MONTHS[parsed.month0() as usize],
        kanji_day(parsed.day()),
        WEEKDAYS[parsed.weekday().num_days_from_monday() as usize],
    ))
}

/// Transcribes a day of month into kanji. Round tens and 31 take their
/// whole-word forms; 1-9 read straight from the numeral table; teens and
/// twenties compose around 十 and 二十.
fn kanji_day(day: u32) -> String {
    match day {
        10 => "十日".to_owned(),
        20 => "二十日".to_owned(),
        30 => "三十日".to_owned(),
        31 => "三十一日".to_owned(),
        1..=9 => format!("{}日", DIGITS[day as usize]),
        11..=19 => format!("十{}日", DIGITS[(day % 10) as usize]),
        21..=29 => format!("二十{}日", DIGITS[(day % 10) as usize]),
        _ => format!(
            "{}十{}日",
            DIGITS[(day / 10) as usize],
            DIGITS[(day % 10) as usize]
        ),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a date field that could not be interpreted.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when a date field is not exactly 8 decimal digits or does
    /// not name a real calendar date.
    MalformedDate(String),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedDate(date) => {
                write!(f, "Malformed date `{}`: expected a valid YYYYMMDD date", date)
            }
        }
    }
}

impl std::error::Error for Error {}
