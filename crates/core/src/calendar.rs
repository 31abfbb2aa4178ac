use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

/// A calendar month and day, rendered as `"MM-DD"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Returns `None` for months outside `1..=12` or days outside `1..=31`.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some(Self { month, day })
    }

    /// Drops the year from `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Today in the display's local time zone.
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Month, `1..=12`.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of month, `1..=31`.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Exact match against a stored `"MM-DD"` string.
    pub fn matches(&self, stored: &str) -> bool {
        stored == self.to_string()
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_padded() {
        let md = MonthDay::new(3, 5).unwrap();
        assert_eq!(md.to_string(), "03-05");
        assert!(md.matches("03-05"));
        assert!(!md.matches("3-5"));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(MonthDay::new(0, 1).is_none());
        assert!(MonthDay::new(13, 1).is_none());
        assert!(MonthDay::new(1, 32).is_none());
    }

    #[test]
    fn from_naive_date() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(MonthDay::from(date).to_string(), "12-31");
    }
}
