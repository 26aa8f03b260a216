use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use crate::common::Error;

/// A calendar month in local time, e.g. 2026-10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct YearMonth {
    year: i32,
    /// 1..=12
    month: u32,
}

impl YearMonth {
    /// The month that local "now" falls in
    pub(crate) fn current() -> YearMonth {
        let today = Local::now();
        YearMonth { year: today.year(), month: today.month() }
    }

    /// Month of a stored timestamp, seen in local time
    pub(crate) fn of(date: &DateTime<Utc>) -> YearMonth {
        let local = date.with_timezone(&Local);
        YearMonth { year: local.year(), month: local.month() }
    }

    pub(crate) fn contains(&self, date: &DateTime<Utc>) -> bool {
        YearMonth::of(date) == *self
    }

    pub(crate) fn previous(&self) -> YearMonth {
        if self.month == 1 {
            YearMonth { year: self.year - 1, month: 12 }
        } else {
            YearMonth { year: self.year, month: self.month - 1 }
        }
    }

    /// Local noon on `day` of this month, `None` when the day does not exist
    pub(crate) fn at_day(&self, day: u32) -> Option<DateTime<Utc>> {
        let noon = NaiveDate::from_ymd_opt(self.year, self.month, day)?.and_hms_opt(12, 0, 0)?;
        Local.from_local_datetime(&noon).earliest().map(|date| date.with_timezone(&Utc))
    }

    /// The `count` months ending with this one, oldest first
    pub(crate) fn trailing(&self, count: usize) -> Vec<YearMonth> {
        let mut months = Vec::with_capacity(count);
        let mut month = *self;
        for _ in 0..count {
            months.push(month);
            month = month.previous();
        }
        months.reverse();
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parse `YYYY-MM`
impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first_day = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .map_err(|_| Error::Parse(format!("Invalid month '{s}', expected YYYY-MM")))?;
        Ok(YearMonth { year: first_day.year(), month: first_day.month() })
    }
}
