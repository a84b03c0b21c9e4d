//! Background event handling.

use crate::app::{App, AppEvent};
use crate::river::GateDecision;

/// Apply one background event to the app.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::PollTick => {
            if let GateDecision::Fetched(tag) = app.on_poll_tick() {
                tracing::trace!(seq = tag.seq, "Scheduled poll issued");
                app.needs_redraw = true;
            }
        }
        AppEvent::RiverFetched { tag, result } => {
            app.on_river_fetched(tag, result);
            app.needs_redraw = true;
        }
    }
}
