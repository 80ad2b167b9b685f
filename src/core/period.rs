use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::core::{AppError, Result};

/// Reporting timezone offset (Asia/Jakarta, UTC+7).
/// All timestamps are stored as UTC; billing months follow Jakarta wall clock.
const JAKARTA_OFFSET_SECS: i32 = 7 * 3600;

/// A calendar-month billing window for one client.
///
/// The window is half-open `[start, end)`: the first instant of the month
/// up to (excluding) the first instant of the next month, both taken at
/// Jakarta wall clock and converted to UTC for querying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    pub month: u32,
    pub year: i32,
}

impl BillingPeriod {
    /// Create a validated billing period
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::validation(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        if !(2000..=2200).contains(&year) {
            return Err(AppError::validation(format!(
                "Year {} is out of the supported range",
                year
            )));
        }
        Ok(Self { month, year })
    }

    /// Period containing the given UTC instant
    pub fn containing(instant: DateTime<Utc>) -> Self {
        use chrono::Datelike;
        let local = instant.with_timezone(&jakarta());
        Self {
            month: local.month(),
            year: local.year(),
        }
    }

    /// UTC bounds of the half-open window `[start, end)`
    pub fn utc_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start_local = first_of_month(self.year, self.month);
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        let end_local = first_of_month(next_year, next_month);

        (
            start_local.with_timezone(&Utc),
            end_local.with_timezone(&Utc),
        )
    }

    /// True when the UTC instant falls inside this period
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let (start, end) = self.utc_range();
        instant >= start && instant < end
    }

    /// Period label used on invoices and reference ids, e.g. "2026-08"
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

fn jakarta() -> FixedOffset {
    FixedOffset::east_opt(JAKARTA_OFFSET_SECS).expect("valid offset")
}

fn first_of_month(year: i32, month: u32) -> DateTime<FixedOffset> {
    let date = NaiveDate::from_ymd_opt(year, month, 1).expect("valid first of month");
    jakarta()
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).expect("valid midnight"))
        .single()
        .expect("fixed offset has no DST gaps")
}
