//! Minute-resolution occupancy timeline for one day.
//!
//! Each event touching the day is turned into a paint operation over its
//! local minute range. The paints are folded, in input order, over a fresh
//! all-free day (later paints win), and the resulting 1440 cells are
//! run-length-encoded into segments.
//!
//! Runs are grouped by the owning event, not by color. Colors repeat every
//! `palette.len()` events, so two neighbouring events can share a color and
//! must still come out as separate segments.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::day::{DayWindow, MinuteRange, MINUTES_PER_DAY};
use crate::error::{Result, SlotError};
use crate::event::{Event, EventId};

pub const DEFAULT_EVENT_COLORS: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#06b6d4", "#f97316",
];

pub const DEFAULT_FREE_COLOR: &str = "#e5e7eb";

/// Event colors plus the color of free time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub colors: Vec<String>,
    pub free: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_EVENT_COLORS.iter().map(|c| c.to_string()).collect(),
            free: DEFAULT_FREE_COLOR.to_string(),
        }
    }
}

impl Palette {
    /// # Errors
    /// Returns `SlotError::Config` if `colors` is empty.
    pub fn new(colors: Vec<String>, free: impl Into<String>) -> Result<Self> {
        let palette = Self {
            colors,
            free: free.into(),
        };
        palette.validate()?;
        Ok(palette)
    }

    pub fn validate(&self) -> Result<()> {
        if self.colors.is_empty() {
            return Err(SlotError::Config("palette needs at least one color".to_string()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for the event at `index` in its list: `colors[index % len]`.
    ///
    /// An empty palette falls back to the free color.
    pub fn color_for(&self, index: usize) -> &str {
        match self.colors.len() {
            0 => &self.free,
            len => &self.colors[index % len],
        }
    }
}

/// A maximal run of minutes owned by the same event (or free).
///
/// `end_minute` is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSegment<'a> {
    pub start_minute: u32,
    pub end_minute: u32,
    pub color: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<&'a Event>,
}

impl TimelineSegment<'_> {
    pub fn minutes(&self) -> u32 {
        self.end_minute - self.start_minute + 1
    }

    pub fn is_free(&self) -> bool {
        self.event.is_none()
    }

    pub fn event_id(&self) -> Option<&EventId> {
        self.event.map(Event::id)
    }
}

/// One event's claim on a minute range. `owner` is the event's index in the
/// input list, which also selects its color.
#[derive(Debug, Clone, Copy)]
struct Paint {
    range: MinuteRange,
    owner: usize,
}

/// Build the occupancy timeline of `day` from `events`.
///
/// Events that do not touch the day are skipped but keep their list index,
/// so colors stay stable across days. The segments cover minutes 0..=1439
/// with no gaps; a day without events is a single free segment.
pub fn build_timeline<'a>(
    events: &'a [Event],
    day: &DayWindow,
    palette: &'a Palette,
) -> Vec<TimelineSegment<'a>> {
    let paints = events.iter().enumerate().filter_map(|(owner, event)| {
        day.minute_range(&event.interval())
            .map(|range| Paint { range, owner })
    });

    let cells = paint_day(paints);
    let segments = encode_runs(&cells, events, palette);
    trace!(date = %day.date(), segments = segments.len(), "timeline built");
    segments
}

fn paint_day(paints: impl Iterator<Item = Paint>) -> Vec<Option<usize>> {
    paints.fold(vec![None; MINUTES_PER_DAY as usize], |mut cells, paint| {
        cells[paint.range.start as usize..paint.range.end as usize].fill(Some(paint.owner));
        cells
    })
}

fn encode_runs<'a>(
    cells: &[Option<usize>],
    events: &'a [Event],
    palette: &'a Palette,
) -> Vec<TimelineSegment<'a>> {
    let mut start = 0u32;
    cells
        .chunk_by(|a, b| a == b)
        .map(|run| {
            let owner = run[0];
            let len = run.len() as u32;
            let segment = TimelineSegment {
                start_minute: start,
                end_minute: start + len - 1,
                color: owner.map_or(palette.free.as_str(), |i| palette.color_for(i)),
                event: owner.map(|i| &events[i]),
            };
            start += len;
            segment
        })
        .collect()
}
