//! Event form state and its validation before submission.

use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::FormDefaults;
use crate::day::DayWindow;
use crate::error::{Result, SlotError};
use crate::event::Interval;

/// Shortest accepted title, after blank titles are replaced by the default.
pub const MIN_TITLE_LEN: usize = 3;

/// What the user has typed into the event form.
///
/// The form edits a single date with a start and end time on that date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl EventDraft {
    /// A fresh form for `date` using the configured default times.
    pub fn for_date(date: NaiveDate, defaults: &FormDefaults) -> Result<Self> {
        Ok(Self {
            title: String::new(),
            description: None,
            date,
            start_time: defaults.start_time()?,
            end_time: defaults.end_time()?,
        })
    }

    /// Trimmed title, or `untitled` when the title is blank.
    pub fn normalized_title<'a>(&'a self, untitled: &'a str) -> &'a str {
        match self.title.trim() {
            "" => untitled,
            title => title,
        }
    }

    /// Description with blank input treated as absent.
    pub fn normalized_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// # Errors
    /// `SlotError::InvalidInterval` when the end time is not after the start
    /// time, `SlotError::InvalidEvent` when the normalized title is shorter
    /// than [`MIN_TITLE_LEN`] characters.
    pub fn validate(&self, defaults: &FormDefaults) -> Result<()> {
        if self.end_time <= self.start_time {
            return Err(SlotError::InvalidInterval {
                start: self.start_time.format("%H:%M").to_string(),
                end: self.end_time.format("%H:%M").to_string(),
            });
        }
        let title = self.normalized_title(&defaults.untitled_title);
        if title.chars().count() < MIN_TITLE_LEN {
            return Err(SlotError::InvalidEvent(format!(
                "title '{}' must be at least {} characters",
                title, MIN_TITLE_LEN
            )));
        }
        Ok(())
    }

    /// The draft's time range as absolute instants in `tz`.
    pub fn interval(&self, tz: Tz) -> Result<Interval> {
        let window = DayWindow::new(self.date, tz);
        let start = window.instant_at(minute_of(self.start_time))?;
        let end = window.instant_at(minute_of(self.end_time))?;
        Interval::new(start, end)
    }
}

fn minute_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
