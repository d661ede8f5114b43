//! Transcript event types
//!
//! Defines the wire record delivered by the log server and the closed set of
//! event kinds the viewer knows how to render.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One unit of transcript data as delivered by the server
///
/// Events are transient: decoded from a response, dispatched once, dropped.
/// Decoding is lenient; a field of an unexpected type is treated as absent
/// rather than failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "WireEvent")]
pub struct Event {
    /// Event kind as sent on the wire (`command` on older servers)
    pub kind: Option<String>,

    /// Seconds since the Unix epoch, display only
    pub timestamp: Option<i64>,

    /// Originating participant, possibly a full `nick!ident@host` prefix
    pub user: Option<String>,

    /// Message text (`message` on older servers)
    pub body: Option<String>,
}

/// Raw record as it appears on the wire, current and legacy field names alike
#[derive(Debug, Default, Deserialize)]
struct WireEvent {
    #[serde(default)]
    kind: Option<Value>,
    #[serde(default)]
    command: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(default)]
    user: Option<Value>,
    #[serde(default)]
    body: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl From<WireEvent> for Event {
    fn from(wire: WireEvent) -> Self {
        Self {
            kind: wire.kind.and_then(text_value).or_else(|| wire.command.and_then(text_value)),
            timestamp: wire.timestamp.and_then(timestamp_value),
            user: wire.user.and_then(text_value),
            body: wire.body.and_then(text_value).or_else(|| wire.message.and_then(text_value)),
        }
    }
}

/// Strings as-is, numbers and booleans in their JSON spelling, anything else absent
fn text_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whole seconds from an integer, a float, or a numeric string
fn timestamp_value(value: Value) -> Option<i64> {
    let seconds = |f: f64| (f.is_finite() && f.abs() < i64::MAX as f64).then(|| f.trunc() as i64);

    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(seconds)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(seconds))
        }
        _ => None,
    }
}

/// The kinds of event the dispatcher renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Message,
    UserJoined,
    UserLeft,
    UserQuit,
}

/// The event's `kind` was missing or not one of the recognized names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown event kind: {}", .0.as_deref().unwrap_or("<absent>"))]
pub struct UnknownEventKind(pub Option<String>);

impl EventKind {
    /// Parse a wire name. Matching is case-sensitive.
    pub fn parse(name: &str) -> Result<Self, UnknownEventKind> {
        match name {
            "message" | "privmsg" => Ok(EventKind::Message),
            "user_joined" | "userjoined" => Ok(EventKind::UserJoined),
            "user_left" | "userleft" => Ok(EventKind::UserLeft),
            "user_quit" | "userquit" => Ok(EventKind::UserQuit),
            other => Err(UnknownEventKind(Some(other.to_string()))),
        }
    }

    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Message => "message",
            EventKind::UserJoined => "user_joined",
            EventKind::UserLeft => "user_left",
            EventKind::UserQuit => "user_quit",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Event {
    /// Create an event of the given kind
    pub fn new(kind: EventKind, user: &str, timestamp: i64) -> Self {
        Self {
            kind: Some(kind.as_str().to_string()),
            timestamp: Some(timestamp),
            user: Some(user.to_string()),
            body: None,
        }
    }

    /// Create a chat message event
    pub fn message(user: &str, body: &str, timestamp: i64) -> Self {
        Self::new(EventKind::Message, user, timestamp).body(body)
    }

    /// Set the message body
    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Resolve the wire kind against the recognized set
    pub fn event_kind(&self) -> Result<EventKind, UnknownEventKind> {
        match self.kind.as_deref() {
            Some(name) => EventKind::parse(name),
            None => Err(UnknownEventKind(None)),
        }
    }

    /// Display name of the originating user
    ///
    /// IRC prefixes of the form `nick!ident@host` are reduced to `nick`.
    pub fn nick(&self) -> &str {
        let user = self.user.as_deref().unwrap_or_default();
        user.split('!').next().unwrap_or(user)
    }

    /// Message body, empty when absent
    pub fn text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}
