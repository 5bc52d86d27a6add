//! Silence-duration expression parsing.
//!
//! Report-type configs express silence windows as `"<n> <unit>"` strings
//! ("1 month", "21 days"). Month and year windows are calendar-aware: adding
//! one month to Jan 31 lands on the last day of February, not 30 fixed days
//! later.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Months, Utc};
use regex::Regex;

static DURATION_EXPR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s*(minute|hour|day|week|month|year)s?\s*$").unwrap()
});

/// A parsed silence window, addable to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SilenceWindow {
    /// Fixed-length span (minutes through weeks).
    Fixed(Duration),
    /// Calendar months (years are expressed as 12n months).
    CalendarMonths(u32),
}

impl SilenceWindow {
    /// The end of the window starting at `instant`.
    pub fn add_to(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Fixed(span) => instant + *span,
            Self::CalendarMonths(n) => instant
                .checked_add_months(Months::new(*n))
                .unwrap_or(instant),
        }
    }
}

/// Parse a silence-duration expression. Unparseable input yields `None`;
/// the caller then collapses the window to the reference instant alone.
pub fn parse_duration(expr: &str) -> Option<SilenceWindow> {
    let caps = DURATION_EXPR.captures(expr)?;
    let n: u32 = caps[1].parse().ok()?;
    let window = match &caps[2] {
        "minute" => SilenceWindow::Fixed(Duration::minutes(i64::from(n))),
        "hour" => SilenceWindow::Fixed(Duration::hours(i64::from(n))),
        "day" => SilenceWindow::Fixed(Duration::days(i64::from(n))),
        "week" => SilenceWindow::Fixed(Duration::weeks(i64::from(n))),
        "month" => SilenceWindow::CalendarMonths(n),
        "year" => SilenceWindow::CalendarMonths(n.checked_mul(12)?),
        _ => unreachable!("unit constrained by the pattern"),
    };
    Some(window)
}
