//! Search a day's busy minutes for free time.
//!
//! The search runs in local minute-of-day and never wraps past midnight into
//! the following day.

use serde::Serialize;
use tracing::debug;

use crate::conflict::find_conflicts;
use crate::day::{BusyMinutes, DayWindow, MinuteRange, MINUTES_PER_DAY};
use crate::error::{Result, SlotError};
use crate::event::{Event, EventId, Interval};

/// Outcome of the "jump to next free slot" action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotSuggestion {
    /// The candidate conflicts with nothing; keep it.
    Clear,
    /// The earliest free slot of the same length after the candidate.
    Moved(MinuteRange),
    /// No free slot of that length remains today.
    DayFull,
}

/// Find the earliest free slot of `duration_minutes` starting at or after
/// `search_start` within a full 1440-minute day.
///
/// See [`find_next_free_slot_within`].
pub fn find_next_free_slot(
    duration_minutes: i64,
    busy: &BusyMinutes,
    search_start: u32,
) -> Result<Option<MinuteRange>> {
    find_next_free_slot_within(duration_minutes, busy, search_start, MINUTES_PER_DAY)
}

/// Find the earliest slot `[s, s + duration)` with `s >= search_start` that
/// contains no busy minute and ends by `day_length_minutes`.
///
/// When a busy minute `m` is found inside the window under test, the next
/// candidate start is `m + 1`, so each minute is skipped over at most once.
/// Returns `Ok(None)` once the window would run past the end of the day.
///
/// # Errors
/// Returns `SlotError::InvalidDuration` for `duration_minutes <= 0` and
/// `SlotError::InvalidDayLength` unless `1 <= day_length_minutes <= 1440`.
pub fn find_next_free_slot_within(
    duration_minutes: i64,
    busy: &BusyMinutes,
    search_start: u32,
    day_length_minutes: u32,
) -> Result<Option<MinuteRange>> {
    if duration_minutes <= 0 {
        return Err(SlotError::InvalidDuration(duration_minutes));
    }
    check_day_length(day_length_minutes)?;

    // Anything longer than a day can never fit.
    let Ok(duration) = u32::try_from(duration_minutes) else {
        return Ok(None);
    };

    let mut start = search_start;
    while let Some(end) = start
        .checked_add(duration)
        .filter(|&end| end <= day_length_minutes)
    {
        match busy.first_in(start..end) {
            Some(minute) => start = minute + 1,
            None => {
                debug!(duration, search_start, start, end, "free slot found");
                return Ok(Some(MinuteRange::new(start, end)));
            }
        }
    }

    debug!(duration, search_start, "no free slot left in day");
    Ok(None)
}

/// All maximal free runs of the day, in chronological order.
///
/// # Errors
/// Returns `SlotError::InvalidDayLength` unless `1 <= day_length_minutes <= 1440`.
pub fn free_ranges(busy: &BusyMinutes, day_length_minutes: u32) -> Result<Vec<MinuteRange>> {
    check_day_length(day_length_minutes)?;

    let mut free = Vec::new();
    let mut cursor = 0;

    for minute in busy.iter().take_while(|&m| m < day_length_minutes) {
        if cursor < minute {
            free.push(MinuteRange::new(cursor, minute));
        }
        cursor = minute + 1;
    }

    // Trailing free run after the last busy minute.
    if cursor < day_length_minutes {
        free.push(MinuteRange::new(cursor, day_length_minutes));
    }

    Ok(free)
}

/// Suggest where to move `candidate` when it clashes with existing events.
///
/// With no conflicts the answer is [`SlotSuggestion::Clear`]. Otherwise every
/// event on `day` except `exclude` counts as busy, and the search looks for a
/// slot of the candidate's length starting from the candidate's end minute.
///
/// The busy set is the whole day, not only the events that conflict with
/// `candidate`. A later event that the candidate does not touch still pushes
/// the suggestion past it, so a `Moved` slot never clashes with any event
/// other than `exclude`.
///
/// # Errors
/// Returns `SlotError::InvalidDuration` if the candidate is shorter than a minute.
pub fn suggest_next_slot(
    events: &[Event],
    candidate: &Interval,
    exclude: Option<&EventId>,
    day: &DayWindow,
) -> Result<SlotSuggestion> {
    if find_conflicts(events, candidate, exclude).is_empty() {
        return Ok(SlotSuggestion::Clear);
    }

    let busy = BusyMinutes::from_events(
        events.iter().filter(|event| exclude != Some(event.id())),
        day,
    );
    let search_start = day.minute_of_day(candidate.end());

    let suggestion = match find_next_free_slot(candidate.duration_minutes(), &busy, search_start)? {
        Some(slot) => SlotSuggestion::Moved(slot),
        None => SlotSuggestion::DayFull,
    };
    debug!(date = %day.date(), ?suggestion, "slot suggestion");
    Ok(suggestion)
}

fn check_day_length(day_length_minutes: u32) -> Result<()> {
    if day_length_minutes == 0 || day_length_minutes > MINUTES_PER_DAY {
        return Err(SlotError::InvalidDayLength(day_length_minutes));
    }
    Ok(())
}
