//! Client-side appointment filters
//!
//! Pure predicates over loaded rows, re-evaluated on every change:
//! - Status: exact match, or `all`
//! - Date bucket relative to the client's local "now"
//! - Free-text search (case-insensitive)

use crate::appointment::AppointmentRow;
use crate::error::ValidationError;
use crate::status::AppointmentStatus;
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};
use std::fmt;
use std::str::FromStr;

/// Status filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every status
    #[default]
    All,
    /// Exactly this status
    Only(AppointmentStatus),
}

impl StatusFilter {
    /// Whether `status` passes
    #[inline]
    #[must_use]
    pub fn matches(&self, status: &AppointmentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        match AppointmentStatus::parse(s) {
            AppointmentStatus::Other(raw) => Err(ValidationError::unrecognized("status filter", raw)),
            known => Ok(StatusFilter::Only(known)),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

/// Date bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateFilter {
    /// Same calendar day as now
    Today,
    /// Rolling seven days ending today, inclusive
    ThisWeek,
    /// Same calendar month and year as now
    ThisMonth,
    /// No date restriction
    #[default]
    All,
}

impl DateFilter {
    /// Whether a row dated `date` falls in the bucket relative to `today`
    #[must_use]
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::Today => date == today,
            DateFilter::ThisWeek => {
                let start = today.checked_sub_days(Days::new(6)).unwrap_or(NaiveDate::MIN);
                date >= start && date <= today
            }
            DateFilter::ThisMonth => date.year() == today.year() && date.month() == today.month(),
        }
    }

    /// Like [`DateFilter::contains`]; an undated row passes only `All`
    #[must_use]
    pub fn admits(&self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        date.map_or(*self == DateFilter::All, |date| self.contains(date, today))
    }
}

impl FromStr for DateFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateFilter::Today),
            "this-week" | "week" => Ok(DateFilter::ThisWeek),
            "this-month" | "month" => Ok(DateFilter::ThisMonth),
            "all" => Ok(DateFilter::All),
            other => Err(ValidationError::unrecognized("date filter", other)),
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateFilter::Today => "today",
            DateFilter::ThisWeek => "this-week",
            DateFilter::ThisMonth => "this-month",
            DateFilter::All => "all",
        })
    }
}

/// Combined filter state of an appointments page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    /// Status predicate
    pub status: StatusFilter,
    /// Date bucket
    pub date: DateFilter,
    /// Search text; blank matches everything
    pub search: String,
}

impl AppointmentFilter {
    /// Create a filter that lets everything through
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With status filter
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// With date bucket
    #[inline]
    #[must_use]
    pub fn with_date(mut self, date: DateFilter) -> Self {
        self.date = date;
        self
    }

    /// With search text
    #[inline]
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Whether `row` passes every predicate, with dates taken in `now`'s zone
    pub fn matches<Tz: TimeZone>(&self, row: &AppointmentRow, now: &DateTime<Tz>) -> bool {
        let today = now.date_naive();
        self.status.matches(&row.status)
            && self.date.admits(row.local_date(&now.timezone()), today)
            && matches_search(row, &self.search)
    }

    /// Rows passing the filter, in their original order
    pub fn apply<'a, Tz: TimeZone>(
        &self,
        rows: &'a [AppointmentRow],
        now: &DateTime<Tz>,
    ) -> Vec<&'a AppointmentRow> {
        rows.iter().filter(|row| self.matches(row, now)).collect()
    }
}

fn matches_search(row: &AppointmentRow, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        row.patient_name.as_str(),
        row.doctor_name.as_str(),
        row.problem.as_str(),
        row.appointment_code.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}
