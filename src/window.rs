// src/window.rs
//! Month scoping: which calendar month a request targets, and the inclusive
//! instant range that month covers in the configured zone.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Target month. `month0` is 0-indexed (January = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthScope {
    pub month0: u32,
    pub year: i32,
}

impl MonthScope {
    /// Resolve a 1-indexed month and a year from the request boundary.
    /// Missing parts fall back to `now`; a month outside 1..=12 counts as missing.
    pub fn resolve(month: Option<u32>, year: Option<i32>, now: DateTime<FixedOffset>) -> Self {
        let month0 = month
            .filter(|m| (1..=12).contains(m))
            .map(|m| m - 1)
            .unwrap_or_else(|| now.month0());
        Self {
            month0,
            year: year.unwrap_or_else(|| now.year()),
        }
    }

    pub fn current(tz: FixedOffset) -> Self {
        Self::resolve(None, None, Utc::now().with_timezone(&tz))
    }

    /// 1-indexed month, for logs and upstream parameters.
    pub fn month(&self) -> u32 {
        self.month0 + 1
    }

    pub fn window(&self, tz: FixedOffset) -> Option<MonthWindow> {
        MonthWindow::for_scope(*self, tz)
    }
}

/// `[first instant of day 1, 23:59:59 on the last day]` in one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl MonthWindow {
    pub fn for_scope(scope: MonthScope, tz: FixedOffset) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(scope.year, scope.month(), 1)?;
        let next_first = if scope.month0 == 11 {
            NaiveDate::from_ymd_opt(scope.year.checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(scope.year, scope.month() + 1, 1)?
        };
        let last = next_first - Duration::days(1);

        let start = tz.from_local_datetime(&first.and_hms_opt(0, 0, 0)?).single()?;
        let end = tz.from_local_datetime(&last.and_hms_opt(23, 59, 59)?).single()?;
        Some(Self { start, end })
    }

    /// Inclusive interval overlap, not containment.
    pub fn overlaps(&self, start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> bool {
        *start <= self.end && *end >= self.start
    }

    /// Window bounds as UTC ISO-8601 with millisecond precision, e.g.
    /// `2024-03-01T00:00:00.000Z`.
    pub fn upstream_range(&self) -> (String, String) {
        (
            self.start
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            self.end
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }
}
