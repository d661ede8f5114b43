//! # ircview
//!
//! Live IRC transcript viewer. Fetches the channel backlog from a log server,
//! replays it, then polls for new messages, joins, leaves and quits and
//! appends them to a scrolling transcript in arrival order.
//!
//! ## Modules
//!
//! - [`transcript`]: Event types, time labels, dispatch and views
//! - [`transport`]: Log server access over HTTP
//! - [`viewer`]: History replay and the live update loop
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ircview::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new(HttpTransportConfig::default())?;
//!     let dispatcher = Dispatcher::new(TerminalView::stdout());
//!     let viewer = Viewer::new(Arc::new(transport), dispatcher, ViewerConfig::default())?;
//!
//!     viewer
//!         .run_until(async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod transcript;
pub mod transport;
pub mod viewer;

pub use transcript::{
    format_time, Dispatch, Dispatcher, DisplayZone, Event, EventKind, MemoryView, TerminalView,
    TranscriptView, UnknownEventKind,
};

pub use transport::{HttpTransport, HttpTransportConfig, Transport, TransportError, TransportResult};

pub use viewer::{PollOutcome, Viewer, ViewerConfig, ViewerError};

pub use config::{Config, ConfigError, LoggingConfig, ServerConfig, ViewerSettings};
