//! Calendar events and the intervals they occupy.
//!
//! Both [`Event`] and [`Interval`] enforce `start < end` when they are built,
//! whether through a constructor or through deserialization. Inverted or
//! empty ranges are rejected, never swapped or widened.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Opaque, caller-assigned event identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A half-open time range `[start, end)` between two absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: String,
    end: String,
}

impl TryFrom<RawInterval> for Interval {
    type Error = SlotError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(parse_datetime(&raw.start)?, parse_datetime(&raw.end)?)
    }
}

impl Interval {
    /// Build an interval, rejecting `start >= end`.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidInterval` when `end` is not strictly after `start`.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds with [`parse_datetime`] and build the interval.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_datetime(start)?, parse_datetime(end)?)
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Half-open overlap test: `self.start < other.end && self.end > other.start`.
    ///
    /// Intervals that only share a boundary instant do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Minutes of overlap with `other`, or 0 when they do not overlap.
    pub fn overlap_minutes(&self, other: &Interval) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).num_minutes()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A calendar event as supplied by the data-fetch layer.
///
/// Serializes with the REST layer's camelCase keys (`startDate`, `endDate`,
/// `userId`). Extra keys such as `createdAt` are ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEvent")]
pub struct Event {
    id: EventId,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    start_date: DateTime<FixedOffset>,
    end_date: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    start_date: String,
    end_date: String,
    #[serde(default)]
    user_id: Option<String>,
}

impl TryFrom<RawEvent> for Event {
    type Error = SlotError;

    fn try_from(raw: RawEvent) -> Result<Self> {
        let interval = Interval::parse(&raw.start_date, &raw.end_date)?;
        let mut event = Event::new(raw.id, raw.title, interval)?;
        event.description = raw.description;
        event.user_id = raw.user_id;
        Ok(event)
    }
}

impl Event {
    /// Build an event occupying `interval`.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidEvent` if `id` is empty.
    pub fn new(id: impl Into<EventId>, title: impl Into<String>, interval: Interval) -> Result<Self> {
        let id = id.into();
        if id.as_str().is_empty() {
            return Err(SlotError::InvalidEvent("event id must not be empty".to_string()));
        }
        Ok(Self {
            id,
            title: title.into(),
            description: None,
            start_date: interval.start,
            end_date: interval.end,
            user_id: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_owner(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start_date
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end_date
    }

    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

/// Parse a JSON array of events in the REST wire format.
pub fn parse_events_json(json: &str) -> Result<Vec<Event>> {
    serde_json::from_str(json).map_err(|e| SlotError::InvalidEvent(e.to_string()))
}

/// Parse an ISO 8601 datetime string into `DateTime<FixedOffset>`.
///
/// Accepts RFC 3339 with an offset (e.g., "2026-03-01T09:00:00-03:00") and
/// naive datetimes with or without seconds (e.g., "2026-03-01T09:00"), which
/// are interpreted as UTC.
pub fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map(|ndt| ndt.and_utc().fixed_offset())
        .map_err(|e| SlotError::InvalidDateTime {
            input: s.to_string(),
            reason: e.to_string(),
        })
}
