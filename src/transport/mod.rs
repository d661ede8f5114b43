//! Log Server Transport
//!
//! The viewer consumes two operations from the server: the history backlog,
//! fetched once, and the next live event, polled repeatedly.

mod client;
mod error;

pub use client::{decode_history, decode_update, HttpTransport, HttpTransportConfig};
pub use error::{TransportError, TransportResult};

use crate::transcript::Event;
use async_trait::async_trait;

/// Source of transcript events
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the backlog of events that existed before polling began
    async fn fetch_history(&self) -> TransportResult<Vec<Event>>;

    /// Fetch the next event, or `None` when nothing arrived
    async fn fetch_next_event(&self) -> TransportResult<Option<Event>>;
}
