//! Clocks and Indonesian date formatting
//!
//! Business timestamps are naive local times, as printed on receipts.
//! The engine reads time through a [`Clock`] so tests can pin it.

use crate::error::{NiagaError, NiagaResult};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;

/// Indonesian month names, January first.
pub const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    at: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// Clock reading `at` until changed.
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at: Mutex::new(at) }
    }

    /// Move the clock.
    pub fn set(&self, at: NaiveDateTime) {
        *self.at.lock() = at;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.at.lock()
    }
}

/// `16 Oktober 2026`
pub fn format_date_indonesian(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_ID[date.month0() as usize],
        date.year()
    )
}

/// `16/10/2026`
pub fn format_date_short(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `16/10/2026 14:30`
pub fn format_datetime_short(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

/// `20261016`, used in document file names.
pub fn format_date_compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> NiagaResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| NiagaError::invalid_input(format!("invalid date '{}', expected YYYY-MM-DD", input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_indonesian_long_date() {
        assert_eq!(format_date_indonesian(date(2026, 10, 16)), "16 Oktober 2026");
        assert_eq!(format_date_indonesian(date(2025, 1, 3)), "3 Januari 2025");
        assert_eq!(format_date_indonesian(date(2025, 5, 31)), "31 Mei 2025");
    }

    #[test]
    fn test_short_formats() {
        let at = date(2025, 8, 3).and_hms_opt(14, 30, 15).unwrap();
        assert_eq!(format_date_short(at.date()), "03/08/2025");
        assert_eq!(format_datetime_short(at), "03/08/2025 14:30");
        assert_eq!(format_date_compact(at.date()), "20250803");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-08-03").unwrap(), date(2025, 8, 3));
        assert_eq!(parse_date(" 2025-08-03 ").unwrap(), date(2025, 8, 3));
        assert!(parse_date("03/08/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn test_fixed_clock_moves() {
        let start = date(2025, 1, 1).and_hms_opt(8, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        let later = date(2025, 1, 2).and_hms_opt(9, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.today(), date(2025, 1, 2));
    }
}
