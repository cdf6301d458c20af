//! WASM bindings for slot-engine.
//!
//! Exposes conflict detection, the free-slot finder and the day timeline to
//! the calendar UI via `wasm-bindgen`. Events cross the boundary as the REST
//! layer's JSON (`id`, `title`, `startDate`, `endDate`, ...) and every result
//! comes back as a JSON string.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use serde::{Deserialize, Serialize};
use slot_engine::{
    BusyMinutes, DayWindow, Event, EventId, Interval, MinuteRange, Palette, SlotSuggestion,
    TimelineSegment,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SegmentDto {
    start_minute: u32,
    end_minute: u32,
    color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
}

impl From<&TimelineSegment<'_>> for SegmentDto {
    fn from(s: &TimelineSegment<'_>) -> Self {
        Self {
            start_minute: s.start_minute,
            end_minute: s.end_minute,
            color: s.color.to_string(),
            event_id: s.event_id().map(|id| id.as_str().to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct FreeRangeDto {
    start: u32,
    end: u32,
    duration_minutes: u32,
}

impl From<&MinuteRange> for FreeRangeDto {
    fn from(r: &MinuteRange) -> Self {
        Self {
            start: r.start,
            end: r.end,
            duration_minutes: r.len(),
        }
    }
}

/// Optional palette override passed from JavaScript; missing keys keep the
/// default colors.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaletteInput {
    colors: Option<Vec<String>>,
    free: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn parse_events(json: &str) -> Result<Vec<Event>, String> {
    slot_engine::parse_events_json(json).map_err(|e| e.to_string())
}

fn parse_day(date: &str, timezone: &str) -> Result<DayWindow, String> {
    DayWindow::parse(date, timezone).map_err(|e| e.to_string())
}

fn parse_palette(json: Option<&str>) -> Result<Palette, String> {
    let input: PaletteInput = match json {
        Some(json) => serde_json::from_str(json)
            .map_err(|e| format!("Invalid palette JSON: {}", e))?,
        None => PaletteInput::default(),
    };
    let defaults = Palette::default();
    Palette::new(
        input.colors.unwrap_or(defaults.colors),
        input.free.unwrap_or(defaults.free),
    )
    .map_err(|e| e.to_string())
}

fn conflicts_json(
    events_json: &str,
    start: &str,
    end: &str,
    exclude_id: Option<&str>,
) -> Result<String, String> {
    let events = parse_events(events_json)?;
    let candidate = Interval::parse(start, end).map_err(|e| e.to_string())?;
    let exclude = exclude_id.map(EventId::from);

    let conflicts = slot_engine::find_conflicts(&events, &candidate, exclude.as_ref());
    to_json(&conflicts)
}

fn next_free_slot_json(
    events_json: &str,
    date: &str,
    timezone: &str,
    duration_minutes: i32,
    search_start_minute: u32,
) -> Result<String, String> {
    let events = parse_events(events_json)?;
    let day = parse_day(date, timezone)?;
    let busy = BusyMinutes::from_events(&events, &day);

    let slot = slot_engine::find_next_free_slot(
        i64::from(duration_minutes),
        &busy,
        search_start_minute,
    )
    .map_err(|e| e.to_string())?;
    to_json(&slot)
}

fn suggestion_json(
    events_json: &str,
    start: &str,
    end: &str,
    date: &str,
    timezone: &str,
    exclude_id: Option<&str>,
) -> Result<String, String> {
    let events = parse_events(events_json)?;
    let candidate = Interval::parse(start, end).map_err(|e| e.to_string())?;
    let day = parse_day(date, timezone)?;
    let exclude = exclude_id.map(EventId::from);

    let suggestion: SlotSuggestion =
        slot_engine::suggest_next_slot(&events, &candidate, exclude.as_ref(), &day)
            .map_err(|e| e.to_string())?;
    to_json(&suggestion)
}

fn timeline_json(
    events_json: &str,
    date: &str,
    timezone: &str,
    palette_json: Option<&str>,
) -> Result<String, String> {
    let events = parse_events(events_json)?;
    let day = parse_day(date, timezone)?;
    let palette = parse_palette(palette_json)?;

    let segments = slot_engine::build_timeline(&events, &day, &palette);
    let dtos: Vec<SegmentDto> = segments.iter().map(SegmentDto::from).collect();
    to_json(&dtos)
}

fn free_ranges_json(events_json: &str, date: &str, timezone: &str) -> Result<String, String> {
    let events = parse_events(events_json)?;
    let day = parse_day(date, timezone)?;
    let busy = BusyMinutes::from_events(&events, &day);

    let ranges = slot_engine::free_ranges(&busy, slot_engine::MINUTES_PER_DAY)
        .map_err(|e| e.to_string())?;
    let dtos: Vec<FreeRangeDto> = ranges.iter().map(FreeRangeDto::from).collect();
    to_json(&dtos)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Find the events that overlap a candidate interval.
///
/// `events_json` is a JSON array of events in the REST wire format. `start`
/// and `end` are ISO 8601 datetimes. `exclude_id` is the id of the event
/// being edited, if any. Returns the overlapping events as a JSON array, in
/// input order.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(
    events_json: &str,
    start: &str,
    end: &str,
    exclude_id: Option<String>,
) -> Result<String, JsValue> {
    conflicts_json(events_json, start, end, exclude_id.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Find the earliest free slot of `duration_minutes` on `date` (local to
/// `timezone`), starting no earlier than `search_start_minute`.
///
/// Returns `{"start": m, "end": m}` in minutes after local midnight, or
/// `null` when nothing fits before the end of the day.
#[wasm_bindgen(js_name = "findNextFreeSlot")]
pub fn find_next_free_slot(
    events_json: &str,
    date: &str,
    timezone: &str,
    duration_minutes: i32,
    search_start_minute: u32,
) -> Result<String, JsValue> {
    next_free_slot_json(
        events_json,
        date,
        timezone,
        duration_minutes,
        search_start_minute,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// The event form's "jump to next free slot" action.
///
/// Returns `{"status": "clear"}`, `{"status": "moved", "start": m, "end": m}`
/// or `{"status": "day_full"}`.
#[wasm_bindgen(js_name = "suggestNextSlot")]
pub fn suggest_next_slot(
    events_json: &str,
    start: &str,
    end: &str,
    date: &str,
    timezone: &str,
    exclude_id: Option<String>,
) -> Result<String, JsValue> {
    suggestion_json(events_json, start, end, date, timezone, exclude_id.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Build the day's occupancy timeline.
///
/// `palette_json` optionally overrides `{"colors": [...], "free": "..."}`.
/// Returns a JSON array of `{start_minute, end_minute, color, event_id?}`
/// segments covering minutes 0 through 1439; `end_minute` is inclusive.
#[wasm_bindgen(js_name = "buildTimeline")]
pub fn build_timeline(
    events_json: &str,
    date: &str,
    timezone: &str,
    palette_json: Option<String>,
) -> Result<String, JsValue> {
    timeline_json(events_json, date, timezone, palette_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// List the day's free ranges as `{start, end, duration_minutes}` objects.
#[wasm_bindgen(js_name = "freeRanges")]
pub fn free_ranges(events_json: &str, date: &str, timezone: &str) -> Result<String, JsValue> {
    free_ranges_json(events_json, date, timezone).map_err(|e| JsValue::from_str(&e))
}
