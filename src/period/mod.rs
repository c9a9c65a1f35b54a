//! Report period calculation.
//!
//! All "today" computations use a fixed UTC offset (UTC+8 by default) so that a
//! report run late on Sunday evening still lands in the right week.

use chrono::{
    Datelike, Days, FixedOffset, Months, NaiveDate, NaiveDateTime, TimeDelta, Utc, Weekday,
};
use serde::Serialize;

use crate::error::PeriodError;

/// Default offset used for report dates, in hours east of UTC.
pub const DEFAULT_OFFSET_HOURS: i32 = 8;

/// Inclusive calendar window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start of the first day, local time.
    pub fn since(&self) -> NaiveDateTime {
        self.start.and_time(chrono::NaiveTime::MIN)
    }

    /// Start of the day after `end`, local time (exclusive bound).
    pub fn until(&self) -> NaiveDateTime {
        self.end
            .checked_add_days(Days::new(1))
            .unwrap_or(self.end)
            .and_time(chrono::NaiveTime::MIN)
    }

    /// `"YYYY-MM-DD ~ YYYY-MM-DD"`.
    pub fn display(&self) -> String {
        format_date_range(self.start, self.end)
    }
}

/// Build the fixed offset for `hours` east of UTC.
pub fn offset_from_hours(hours: i32) -> Result<FixedOffset, PeriodError> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or(PeriodError::InvalidOffset(hours))
}

/// Today's date in the given offset.
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Monday..Sunday of the week `offset` weeks from the one containing `today`
/// (0 = this week, -1 = last week). The end never goes past `today`.
///
/// Offsets that leave chrono's calendar range are rejected.
pub fn week_range(offset: i64, today: NaiveDate) -> Result<DateWindow, PeriodError> {
    let out_of_range = || PeriodError::WeekOffsetOutOfRange(offset);
    let days_since_monday = u64::from(today.weekday().num_days_from_monday());

    let current_monday = today
        .checked_sub_days(Days::new(days_since_monday))
        .ok_or_else(out_of_range)?;
    let target_monday = TimeDelta::try_weeks(offset)
        .and_then(|delta| current_monday.checked_add_signed(delta))
        .ok_or_else(out_of_range)?;
    // A Sunday past the calendar end is later than any `today`.
    let end = target_monday
        .checked_add_days(Days::new(6))
        .map_or(today, |sunday| sunday.min(today));

    Ok(DateWindow {
        start: target_monday,
        end,
    })
}

/// The six calendar months leading up to `today`.
pub fn semester_range(today: NaiveDate) -> DateWindow {
    let start = today.checked_sub_months(Months::new(6)).unwrap_or(today);
    DateWindow { start, end: today }
}

/// Validate a user-picked week: start ≤ end, no future dates, starts on Monday.
pub fn validate_week_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<DateWindow, PeriodError> {
    let window = validate_custom_range(start, end, today)?;
    if start.weekday() != Weekday::Mon {
        return Err(PeriodError::StartNotMonday(start));
    }
    Ok(window)
}

/// Validate a free-form period: start ≤ end and no future dates.
pub fn validate_custom_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<DateWindow, PeriodError> {
    let window = DateWindow::new(start, end)?;
    if end > today {
        return Err(PeriodError::FutureDate { end, today });
    }
    Ok(window)
}

/// Whether `[start, end]` is exactly one Monday-to-Sunday week.
pub fn is_valid_week(start: NaiveDate, end: NaiveDate) -> bool {
    start.weekday() == Weekday::Mon
        && end.weekday() == Weekday::Sun
        && (end - start).num_days() == 6
}

/// ISO week number (1-53).
pub fn week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// ISO year and week used to file a weekly report starting at `start`.
pub fn iso_year_week(start: NaiveDate) -> (i32, u32) {
    let iso = start.iso_week();
    (iso.year(), iso.week())
}

pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} ~ {}", start, end)
}

/// A selectable recent week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekChoice {
    pub offset: i64,
    pub window: DateWindow,
    pub label: String,
}

impl WeekChoice {
    pub fn display(&self) -> String {
        format!("{} ({})", self.label, self.window.display())
    }
}

/// The `count` most recent weeks, newest first. Stops early at the start of
/// chrono's calendar range.
pub fn available_weeks(count: usize, today: NaiveDate) -> Vec<WeekChoice> {
    (0..count as i64)
        .map_while(|i| {
            let window = week_range(-i, today).ok()?;
            let label = match i {
                0 => "本周".to_string(),
                1 => "上周".to_string(),
                n => format!("{} 周前", n),
            };
            Some(WeekChoice {
                offset: -i,
                window,
                label,
            })
        })
        .collect()
}
