//! Detect events that overlap a candidate interval.
//!
//! Intervals are half-open, so an event ending exactly when the candidate
//! starts (or starting exactly when it ends) is NOT a conflict. Adjacent
//! bookings are legal.

use serde::Serialize;
use tracing::debug;

use crate::event::{Event, EventId, Interval};

/// Two events of the same list that overlap in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict<'a> {
    pub event_a: &'a Event,
    pub event_b: &'a Event,
    pub overlap_minutes: i64,
}

/// Find every event overlapping `candidate`.
///
/// An event `E` conflicts with `candidate` iff
/// `candidate.start < E.end && candidate.end > E.start`. When `exclude` is
/// given, the event with that id is dropped before testing, which is how an
/// event being edited is checked against the *other* events.
///
/// The result keeps the order of `events`; it is never re-sorted by time.
/// The `start < end` precondition on the candidate is guaranteed by
/// [`Interval::new`](crate::event::Interval::new).
pub fn find_conflicts<'a>(
    events: &'a [Event],
    candidate: &Interval,
    exclude: Option<&EventId>,
) -> Vec<&'a Event> {
    let conflicts: Vec<&Event> = events
        .iter()
        .filter(|event| exclude != Some(event.id()))
        .filter(|event| candidate.overlaps(&event.interval()))
        .collect();

    debug!(
        candidate_start = %candidate.start(),
        candidate_end = %candidate.end(),
        excluded = exclude.map(EventId::as_str),
        checked = events.len(),
        conflicts = conflicts.len(),
        "conflict check"
    );

    conflicts
}

/// Find all pairs of overlapping events within one list.
///
/// Pairs are reported as `(events[i], events[j])` with `i < j`, in index
/// order. The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_overlapping_pairs(events: &[Event]) -> Vec<Conflict<'_>> {
    let mut conflicts = Vec::new();

    for (i, a) in events.iter().enumerate() {
        for b in &events[i + 1..] {
            let (ia, ib) = (a.interval(), b.interval());
            if ia.overlaps(&ib) {
                conflicts.push(Conflict {
                    event_a: a,
                    event_b: b,
                    overlap_minutes: ia.overlap_minutes(&ib),
                });
            }
        }
    }

    conflicts
}
