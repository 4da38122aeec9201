use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date range used by store queries and report parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Everything through `as_of`, used for as-of balance rollups.
    pub fn through(as_of: NaiveDate) -> Self {
        Self {
            start: NaiveDate::MIN,
            end: as_of,
        }
    }

    /// The trailing twelve months ending at `today`, the conventional default
    /// reporting window.
    pub fn trailing_year(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(365),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The same-length range immediately preceding this one, for
    /// period-over-period trend comparisons.
    pub fn preceding(&self) -> Self {
        let span = self.end - self.start;
        Self {
            start: self.start - span,
            end: self.start,
        }
    }

    /// Splits the range into calendar-month sub-ranges, clipped at both ends.
    pub fn calendar_months(&self) -> Vec<MonthWindow> {
        let mut months = Vec::new();
        let mut cursor = self.start;
        while cursor <= self.end {
            let month_end = last_day_of_month(cursor).min(self.end);
            months.push(MonthWindow {
                label: format!("{:04}-{:02}", cursor.year(), cursor.month()),
                range: DateRange::new(cursor, month_end),
            });
            cursor = month_end + Duration::days(1);
        }
        months
    }
}

/// One calendar-month slice of a larger range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthWindow {
    /// `YYYY-MM` label.
    pub label: String,
    pub range: DateRange,
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // The first of next month always exists.
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first - Duration::days(1))
        .unwrap_or(date)
}
