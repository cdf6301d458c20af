//! List-view ordering and calendar colors.

use crate::day::DayWindow;
use crate::event::{Event, EventId};
use crate::timeline::Palette;

/// Events touching `day`, earliest start first.
///
/// The sort is stable, so events starting together keep their input order.
pub fn agenda<'a>(events: &'a [Event], day: &DayWindow) -> Vec<&'a Event> {
    let mut listed: Vec<&Event> = events
        .iter()
        .filter(|event| day.minute_range(&event.interval()).is_some())
        .collect();
    listed.sort_by_key(|event| event.start());
    listed
}

/// Calendar color of the event with `id`: its position in `events` modulo
/// the palette size. `None` if no event has that id.
pub fn event_color<'p>(events: &[Event], id: &EventId, palette: &'p Palette) -> Option<&'p str> {
    events
        .iter()
        .position(|event| event.id() == id)
        .map(|index| palette.color_for(index))
}
