//! Event dispatcher
//!
//! Maps each event to at most one rendering operation on the owned view.

use super::event::{Event, EventKind};
use super::format::{render, DisplayZone};
use super::view::TranscriptView;

/// What a dispatch did to the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// One line appended and the view scrolled to the bottom
    Appended(EventKind),
    /// Unknown or absent kind; the view was not touched
    Ignored,
}

/// Renders events into a transcript view
pub struct Dispatcher<V> {
    view: V,
    zone: DisplayZone,
}

impl<V: TranscriptView> Dispatcher<V> {
    pub fn new(view: V) -> Self {
        Self::with_zone(view, DisplayZone::Local)
    }

    pub fn with_zone(view: V, zone: DisplayZone) -> Self {
        Self { view, zone }
    }

    /// Render one event
    pub fn dispatch(&mut self, event: &Event) -> Dispatch {
        let kind = match event.event_kind() {
            Ok(kind) => kind,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring event");
                return Dispatch::Ignored;
            }
        };

        let line = render(kind, event, self.zone);
        self.view.append(&line);
        self.view.scroll_to_bottom();
        Dispatch::Appended(kind)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }
}
