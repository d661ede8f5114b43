//! Time labels and fragment rendering

use super::event::{Event, EventKind};
use chrono::{Local, TimeZone, Utc};
use std::fmt;

/// Rendered in place of a time label when the timestamp is absent or out of range
pub const MISSING_TIME: &str = "--:--";

/// Time zone used for time labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayZone {
    /// The viewer's local time zone
    #[default]
    Local,
    Utc,
}

impl DisplayZone {
    /// Format an optional timestamp in this zone
    pub fn label(&self, timestamp: Option<i64>) -> String {
        match (self, timestamp) {
            (_, None) => MISSING_TIME.to_string(),
            (DisplayZone::Local, Some(ts)) => format_time(ts),
            (DisplayZone::Utc, Some(ts)) => format_time_in(ts, &Utc),
        }
    }
}

/// Format seconds since epoch as zero-padded 24-hour `HH:MM` in local time
pub fn format_time(timestamp: i64) -> String {
    format_time_in(timestamp, &Local)
}

/// Format seconds since epoch as zero-padded 24-hour `HH:MM` in `tz`
pub fn format_time_in<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    tz.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| MISSING_TIME.to_string())
}

/// Entities the log server escapes in user names and message text
const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&quot;", '"'),
    ("&apos;", '\''),
    ("&gt;", '>'),
    ("&lt;", '<'),
];

/// Stands in for control characters in rendered text
pub const REPLACEMENT: char = '\u{FFFD}';

/// Decode server-side HTML escaping in a single pass
///
/// `&amp;lt;` decodes to `&lt;`, not `<`. Unrecognized entities are kept.
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Make server-supplied text safe to put on one transcript line
///
/// Entities are decoded first. Every control character (ESC, BEL, CR, LF and
/// the C1 range) is then replaced, so text cannot drive the terminal or
/// break the line.
pub fn sanitize(text: &str) -> String {
    unescape_html(text)
        .chars()
        .map(|c| if c.is_control() { REPLACEMENT } else { c })
        .collect()
}

/// Render one transcript line for an event of a known kind
pub fn render(kind: EventKind, event: &Event, zone: DisplayZone) -> String {
    let time = zone.label(event.timestamp);
    let user = sanitize(event.nick());

    match kind {
        EventKind::Message => format!("[{}] {}: {}", time, user, sanitize(event.text())),
        EventKind::UserJoined => format!("[{}] {} joined", time, user),
        EventKind::UserLeft => format!("[{}] {} left", time, user),
        EventKind::UserQuit => format!("[{}] {} quit", time, user),
    }
}
