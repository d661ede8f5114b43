//! Transcript rendering
//!
//! ## Architecture
//!
//! - **Event**: wire record and the closed set of event kinds
//! - **Format**: `HH:MM` time labels and line rendering
//! - **Dispatcher**: maps events to view mutations
//! - **View**: where rendered lines end up (terminal or memory)

mod dispatcher;
mod event;
mod format;
mod view;

pub use dispatcher::{Dispatch, Dispatcher};
pub use event::{Event, EventKind, UnknownEventKind};
pub use format::{
    format_time, format_time_in, render, sanitize, unescape_html, DisplayZone, MISSING_TIME,
    REPLACEMENT,
};
pub use view::{MemoryView, TerminalView, TranscriptView, DEFAULT_SCROLLBACK};
