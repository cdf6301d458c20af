//! # slot-engine
//!
//! Scheduling core for a personal calendar: conflict detection, free-slot
//! search and day-occupancy timelines.
//!
//! Every operation is a pure function over a borrowed snapshot of events. No
//! state is kept between calls, so the functions can be called from any
//! thread without coordination.
//!
//! ## Modules
//!
//! - [`event`]: `Event`, `EventId`, `Interval` and the JSON wire format
//! - [`conflict`]: Events overlapping a candidate interval
//! - [`day`]: Local day windows, minute-of-day projection, busy minutes
//! - [`freeslot`]: Next free slot, free ranges, "jump to next free slot"
//! - [`timeline`]: Run-length-encoded day occupancy
//! - [`agenda`]: List-view ordering and calendar colors
//! - [`draft`]: Event form state and validation
//! - [`config`]: TOML engine configuration
//! - [`error`]: Error types

pub mod agenda;
pub mod config;
pub mod conflict;
pub mod day;
pub mod draft;
pub mod error;
pub mod event;
pub mod freeslot;
pub mod timeline;

pub use agenda::{agenda, event_color};
pub use config::EngineConfig;
pub use conflict::{find_conflicts, find_overlapping_pairs, Conflict};
pub use day::{BusyMinutes, DayWindow, MinuteRange, MINUTES_PER_DAY};
pub use draft::EventDraft;
pub use error::SlotError;
pub use event::{parse_datetime, parse_events_json, Event, EventId, Interval};
pub use freeslot::{
    find_next_free_slot, find_next_free_slot_within, free_ranges, suggest_next_slot,
    SlotSuggestion,
};
pub use timeline::{build_timeline, Palette, TimelineSegment};
