//! Property-based tests for conflicts, free slots and timelines using proptest.
//!
//! These check invariants that must hold for *any* event layout, not just the
//! hand-picked cases in the other test files.

use chrono::{Duration, FixedOffset, TimeZone};
use proptest::prelude::*;
use slot_engine::{
    build_timeline, find_conflicts, find_next_free_slot, BusyMinutes, DayWindow, Event, EventId,
    Interval, MinuteRange, Palette, TimelineSegment,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A `(start_minute, end_minute)` pair inside one day with `start < end`.
fn arb_minute_span() -> impl Strategy<Value = (u32, u32)> {
    (0u32..1439).prop_flat_map(|start| (Just(start), (start + 1)..=1440))
}

fn arb_spans() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec(arb_minute_span(), 0..12)
}

fn arb_duration() -> impl Strategy<Value = i64> {
    1i64..=240
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn minute_interval((start, end): (u32, u32)) -> Interval {
    let midnight = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 1, 0, 0, 0)
        .unwrap();
    Interval::new(
        midnight + Duration::minutes(start as i64),
        midnight + Duration::minutes(end as i64),
    )
    .unwrap()
}

fn events_from(spans: &[(u32, u32)]) -> Vec<Event> {
    spans
        .iter()
        .enumerate()
        .map(|(i, &span)| Event::new(format!("e{}", i), "event", minute_interval(span)).unwrap())
        .collect()
}

fn day() -> DayWindow {
    DayWindow::parse("2026-03-01", "UTC").unwrap()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Conflict result is exactly the overlapping events, once each,
// in input order
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn conflicts_match_overlap_rule(spans in arb_spans(), candidate in arb_minute_span()) {
        let events = events_from(&spans);
        let candidate_interval = minute_interval(candidate);

        let conflicts = find_conflicts(&events, &candidate_interval, None);

        let expected: Vec<&Event> = events
            .iter()
            .zip(&spans)
            .filter(|(_, span)| candidate.0 < span.1 && candidate.1 > span.0)
            .map(|(event, _)| event)
            .collect();
        prop_assert_eq!(conflicts, expected);
    }
}

// ---------------------------------------------------------------------------
// Property 2: Adjacent or disjoint intervals never conflict
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn disjoint_intervals_never_conflict(a in arb_minute_span(), gap in 0u32..120, len in 1u32..120) {
        let b_start = a.1 + gap;
        let b_end = b_start + len;

        let events = events_from(&[a]);
        let later = minute_interval((b_start, b_end));

        prop_assert!(find_conflicts(&events, &later, None).is_empty());
    }
}

// ---------------------------------------------------------------------------
// Property 3: The excluded id never appears in the result
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn excluded_id_never_reported(
        spans in prop::collection::vec(arb_minute_span(), 1..12),
        candidate in arb_minute_span(),
        pick in any::<prop::sample::Index>(),
    ) {
        let events = events_from(&spans);
        let excluded = EventId::new(format!("e{}", pick.index(events.len())));

        let conflicts = find_conflicts(&events, &minute_interval(candidate), Some(&excluded));

        prop_assert!(conflicts.iter().all(|e| e.id() != &excluded));
    }
}

// ---------------------------------------------------------------------------
// Property 4: A returned slot has the requested length, starts at or after
// the search start, fits the day, and contains no busy minute
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn free_slot_is_actually_free(spans in arb_spans(), duration in arb_duration(), from in 0u32..1440) {
        let busy: BusyMinutes = spans.iter().map(|&(s, e)| MinuteRange::new(s, e)).collect();

        if let Some(slot) = find_next_free_slot(duration, &busy, from).unwrap() {
            prop_assert_eq!(slot.len() as i64, duration);
            prop_assert!(slot.start >= from);
            prop_assert!(slot.end <= 1440);
            prop_assert!((slot.start..slot.end).all(|m| !busy.contains(m)));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: The returned slot is the earliest one; "none" means none exists
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn free_slot_is_earliest(spans in arb_spans(), duration in arb_duration(), from in 0u32..1440) {
        let busy: BusyMinutes = spans.iter().map(|&(s, e)| MinuteRange::new(s, e)).collect();
        let d = duration as u32;

        let brute_force = (from..=1440u32.saturating_sub(d))
            .find(|&s| s + d <= 1440 && (s..s + d).all(|m| !busy.contains(m)))
            .map(|s| MinuteRange::new(s, s + d));

        prop_assert_eq!(find_next_free_slot(duration, &busy, from).unwrap(), brute_force);
    }
}

// ---------------------------------------------------------------------------
// Property 6: Timeline covers the day exactly, and every minute is owned by
// the last event painted over it
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn timeline_covers_day_with_last_write_wins(spans in arb_spans()) {
        let events = events_from(&spans);
        let palette = Palette::default();

        let segments = build_timeline(&events, &day(), &palette);

        prop_assert_eq!(segments[0].start_minute, 0);
        prop_assert_eq!(segments[segments.len() - 1].end_minute, 1439);
        let total: u32 = segments.iter().map(TimelineSegment::minutes).sum();
        prop_assert_eq!(total, 1440);

        for pair in segments.windows(2) {
            prop_assert_eq!(pair[0].end_minute + 1, pair[1].start_minute);
            // Maximal runs: neighbours never share an owner.
            prop_assert_ne!(pair[0].event_id(), pair[1].event_id());
        }

        for segment in &segments {
            for minute in segment.start_minute..=segment.end_minute {
                let owner = spans
                    .iter()
                    .rposition(|&(s, e)| s <= minute && minute < e)
                    .map(|i| events[i].id());
                prop_assert_eq!(segment.event_id(), owner);
            }
        }
    }
}
