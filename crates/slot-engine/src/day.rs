//! Project absolute instants onto one local calendar day.
//!
//! Slot search and the timeline work in local minute-of-day (0..1440). A
//! [`DayWindow`] pins a calendar date to an IANA timezone so events stored as
//! absolute instants can be clipped to that day and converted to minutes.

use std::collections::BTreeSet;
use std::ops::Range;

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike,
};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Result, SlotError};
use crate::event::{Event, Interval};

/// Number of minutes in a calendar day as seen by the slot finder and timeline.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Longest local-time gap we step over when resolving a nonexistent wall time.
const MAX_DST_GAP_MINUTES: i64 = 180;

/// A half-open range of minutes `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MinuteRange {
    pub start: u32,
    pub end: u32,
}

impl MinuteRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, minute: u32) -> bool {
        self.start <= minute && minute < self.end
    }

    pub fn as_range(&self) -> Range<u32> {
        self.start..self.end
    }
}

/// One calendar date in one timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    date: NaiveDate,
    tz: Tz,
}

impl DayWindow {
    pub fn new(date: NaiveDate, tz: Tz) -> Self {
        Self { date, tz }
    }

    /// Build a window from a `YYYY-MM-DD` date and an IANA timezone name.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidDateTime` for a malformed date and
    /// `SlotError::InvalidTimezone` for an unknown zone.
    pub fn parse(date: &str, timezone: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            SlotError::InvalidDateTime {
                input: date.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self::new(date, parse_timezone(timezone)?))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Local midnight at the start of the day.
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.resolve(self.date.and_time(NaiveTime::MIN))
    }

    /// Local midnight at the start of the following day.
    pub fn end(&self) -> DateTime<FixedOffset> {
        let next = self.date.succ_opt().unwrap_or(self.date);
        self.resolve(next.and_time(NaiveTime::MIN))
    }

    /// The whole day as an interval.
    pub fn as_interval(&self) -> Result<Interval> {
        Interval::new(self.start(), self.end())
    }

    /// Local wall-clock minute of `instant`, clamped to `0..=1440` for
    /// instants before or after this day.
    pub fn minute_of_day(&self, instant: DateTime<FixedOffset>) -> u32 {
        let local = instant.with_timezone(&self.tz);
        let local_date = local.date_naive();
        if local_date < self.date {
            0
        } else if local_date > self.date {
            MINUTES_PER_DAY
        } else {
            local.hour() * 60 + local.minute()
        }
    }

    /// Clip `interval` to this day and express it in local minutes.
    ///
    /// Returns `None` when the interval does not touch the day. Parts before
    /// local midnight clip to minute 0; parts after the next midnight clip to
    /// 1440.
    pub fn minute_range(&self, interval: &Interval) -> Option<MinuteRange> {
        let (day_start, day_end) = (self.start(), self.end());
        if !(interval.start() < day_end && interval.end() > day_start) {
            return None;
        }

        let start = if interval.start() <= day_start {
            0
        } else {
            self.minute_of_day(interval.start())
        };
        let end = if interval.end() >= day_end {
            MINUTES_PER_DAY
        } else {
            self.minute_of_day(interval.end())
        };

        // On a fall-back day the repeated hour folds wall minutes, so the
        // range may come out short, empty or inverted. It must still cover
        // as many minutes as the event really lasts on this day.
        let clipped = interval.end().min(day_end) - interval.start().max(day_start);
        let real_minutes = u32::try_from(clipped.num_minutes().max(1)).unwrap_or(MINUTES_PER_DAY);
        let end = end
            .max(start.saturating_add(real_minutes))
            .min(MINUTES_PER_DAY);
        Some(MinuteRange::new(start, end))
    }

    /// The absolute instant of local minute `minute` on this day.
    ///
    /// Minute 1440 is the next local midnight.
    pub fn instant_at(&self, minute: u32) -> Result<DateTime<FixedOffset>> {
        if minute > MINUTES_PER_DAY {
            return Err(SlotError::InvalidDateTime {
                input: format!("{} minute {}", self.date, minute),
                reason: "minute of day out of range".to_string(),
            });
        }
        let naive = self.date.and_time(NaiveTime::MIN) + Duration::minutes(minute as i64);
        Ok(self.resolve(naive))
    }

    /// Map a minute range of this day back to an absolute interval.
    pub fn interval_for(&self, range: &MinuteRange) -> Result<Interval> {
        Interval::new(self.instant_at(range.start)?, self.instant_at(range.end)?)
    }

    /// Resolve a local wall time in this zone. Ambiguous times take the
    /// earlier instant; nonexistent times shift forward to the first valid
    /// minute after the gap.
    fn resolve(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.fixed_offset(),
            LocalResult::None => (1..=MAX_DST_GAP_MINUTES)
                .find_map(|m| {
                    self.tz
                        .from_local_datetime(&(naive + Duration::minutes(m)))
                        .earliest()
                })
                .unwrap_or_else(|| self.tz.from_utc_datetime(&naive))
                .fixed_offset(),
        }
    }
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// The set of occupied minute-of-day values (0..1440) for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusyMinutes(BTreeSet<u32>);

impl BusyMinutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of the minutes covered by `events` on `day`.
    ///
    /// Events that do not touch the day contribute nothing.
    pub fn from_events<'a, I>(events: I, day: &DayWindow) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        events
            .into_iter()
            .filter_map(|event| day.minute_range(&event.interval()))
            .collect()
    }

    /// Mark every minute of `range` busy. Minutes past the end of the day are ignored.
    pub fn insert_range(&mut self, range: MinuteRange) {
        self.0.extend(range.start..range.end.min(MINUTES_PER_DAY));
    }

    pub fn insert(&mut self, minute: u32) {
        if minute < MINUTES_PER_DAY {
            self.0.insert(minute);
        }
    }

    pub fn contains(&self, minute: u32) -> bool {
        self.0.contains(&minute)
    }

    /// The earliest busy minute inside `range`, if any.
    pub fn first_in(&self, range: Range<u32>) -> Option<u32> {
        self.0.range(range).next().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<MinuteRange> for BusyMinutes {
    fn from_iter<T: IntoIterator<Item = MinuteRange>>(iter: T) -> Self {
        let mut busy = BusyMinutes::new();
        for range in iter {
            busy.insert_range(range);
        }
        busy
    }
}

impl FromIterator<u32> for BusyMinutes {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        let mut busy = BusyMinutes::new();
        for minute in iter {
            busy.insert(minute);
        }
        busy
    }
}
