use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::common::Displayable;

/// Display labels indexed by days since Sunday.
pub const WEEKDAY_LABELS: [&str; 7] = ["週日", "週一", "週二", "週三", "週四", "週五", "週六"];

/// ISO key format shared by the itinerary map and import/export files.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// One calendar day of the trip. Labels are derived from the date on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateEntry {
    date: NaiveDate,
}

impl DateEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// `YYYY-MM-DD`, the unique key of this day.
    pub fn full_date(&self) -> String {
        self.date.format(DATE_KEY_FORMAT).to_string()
    }

    pub fn weekday_label(&self) -> &'static str {
        WEEKDAY_LABELS[self.date.weekday().num_days_from_sunday() as usize]
    }

    /// Zero-padded day of month.
    pub fn day_number(&self) -> String {
        format!("{:02}", self.date.day())
    }

    pub fn labels(&self) -> DateLabels {
        DateLabels {
            full: self.full_date(),
            day: self.weekday_label(),
            date: self.day_number(),
        }
    }
}

impl From<NaiveDate> for DateEntry {
    fn from(date: NaiveDate) -> Self {
        Self::new(date)
    }
}

impl Displayable for DateEntry {
    fn display_label(&self) -> String {
        format!("{} ({})", self.full_date(), self.weekday_label())
    }
}

/// The three strings a day tab shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLabels {
    pub full: String,
    pub day: &'static str,
    pub date: String,
}

/// Parses a `YYYY-MM-DD` key.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_KEY_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> DateEntry {
        DateEntry::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn labels_match_true_weekday() {
        let labels = ymd(2026, 2, 21).labels();
        assert_eq!(labels.full, "2026-02-21");
        assert_eq!(labels.day, "週六");
        assert_eq!(labels.date, "21");
        assert_eq!(ymd(2026, 2, 22).weekday_label(), "週日");
        assert_eq!(ymd(2026, 2, 20).weekday_label(), "週五");
    }

    #[test]
    fn pads_month_and_day() {
        let entry = ymd(2027, 1, 3);
        assert_eq!(entry.full_date(), "2027-01-03");
        assert_eq!(entry.day_number(), "03");
    }

    #[test]
    fn parses_keys_leniently_around_whitespace() {
        assert_eq!(
            parse_date_key(" 2026-03-01 "),
            Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
        );
        assert_eq!(parse_date_key("2026-13-01"), None);
    }
}
