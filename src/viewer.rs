//! Viewer
//!
//! Replays the history backlog once, then polls for live events forever.
//! Only one request is ever in flight, and the next poll is scheduled only
//! after the previous one resolved, so events render in request order.

use crate::transcript::{Dispatch, Dispatcher, TranscriptView};
use crate::transport::Transport;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Configuration for the update loop
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Delay between the end of one poll and the start of the next
    pub poll_interval_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

/// Errors raised while constructing a viewer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    #[error("Poll interval must be a positive number of milliseconds")]
    InvalidPollInterval,
}

/// Result of a single poll, for diagnostics only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// An event arrived and was rendered
    Dispatched,
    /// An event arrived but its kind is not rendered
    Ignored,
    /// The server had nothing new
    Empty,
    /// Transport failure or malformed payload
    Failed,
}

/// Live transcript viewer
pub struct Viewer<V> {
    transport: Arc<dyn Transport>,
    dispatcher: Dispatcher<V>,
    poll_interval: Duration,
}

impl<V: TranscriptView> Viewer<V> {
    /// Create a viewer rendering events from `transport` through `dispatcher`
    pub fn new(
        transport: Arc<dyn Transport>,
        dispatcher: Dispatcher<V>,
        config: ViewerConfig,
    ) -> Result<Self, ViewerError> {
        if config.poll_interval_ms == 0 {
            return Err(ViewerError::InvalidPollInterval);
        }

        Ok(Self {
            transport,
            dispatcher,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    /// Fetch and replay the history backlog in server order
    ///
    /// A failed fetch is treated exactly like an empty history. Returns the
    /// number of lines appended.
    pub async fn load_history(&mut self) -> usize {
        let history = match self.transport.fetch_history().await {
            Ok(history) => history,
            Err(e) => {
                tracing::debug!(error = %e, "History unavailable, starting empty");
                Vec::new()
            }
        };

        let mut appended = 0;
        for event in &history {
            if let Dispatch::Appended(_) = self.dispatcher.dispatch(event) {
                appended += 1;
            }
        }

        tracing::info!(events = history.len(), appended, "Replayed history");
        appended
    }

    /// Request the next event and render it if one arrived
    pub async fn poll_once(&mut self) -> PollOutcome {
        match self.transport.fetch_next_event().await {
            Ok(Some(event)) => match self.dispatcher.dispatch(&event) {
                Dispatch::Appended(_) => PollOutcome::Dispatched,
                Dispatch::Ignored => PollOutcome::Ignored,
            },
            Ok(None) => PollOutcome::Empty,
            Err(e) => {
                tracing::debug!(error = %e, "Poll failed");
                PollOutcome::Failed
            }
        }
    }

    /// Replay history, then poll until `shutdown` resolves
    ///
    /// Every iteration waits the poll interval and then polls, whatever the
    /// previous outcome was. Returns the view once shut down.
    pub async fn run_until<F>(mut self, shutdown: F) -> V
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let cancelled = tokio::select! {
            _ = &mut shutdown => true,
            _ = self.load_history() => false,
        };

        if !cancelled {
            tracing::info!(
                interval_ms = self.poll_interval.as_millis() as u64,
                "Starting update loop"
            );

            loop {
                let cancelled = tokio::select! {
                    _ = &mut shutdown => true,
                    outcome = self.next_iteration() => {
                        tracing::trace!(?outcome, "Poll completed");
                        false
                    }
                };

                if cancelled {
                    break;
                }
            }
        }

        tracing::info!("Viewer stopped");
        self.dispatcher.into_view()
    }

    async fn next_iteration(&mut self) -> PollOutcome {
        tokio::time::sleep(self.poll_interval).await;
        self.poll_once().await
    }

    pub fn view(&self) -> &V {
        self.dispatcher.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{DisplayZone, Event, EventKind, MemoryView};
    use crate::transport::{TransportError, TransportResult};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const INTERVAL_MS: u64 = 1000;

    /// Transport that replays scripted responses and records every request
    struct ScriptedTransport {
        history: Mutex<Option<TransportResult<Vec<Event>>>>,
        updates: Mutex<VecDeque<TransportResult<Option<Event>>>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedTransport {
        fn new(
            history: TransportResult<Vec<Event>>,
            updates: Vec<TransportResult<Option<Event>>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                history: Mutex::new(Some(history)),
                updates: Mutex::new(updates.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn polls(&self) -> usize {
            self.calls().iter().filter(|c| **c == "poll").count()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn fetch_history(&self) -> TransportResult<Vec<Event>> {
            self.calls.lock().unwrap().push("history");
            self.history.lock().unwrap().take().unwrap_or(Ok(Vec::new()))
        }

        async fn fetch_next_event(&self) -> TransportResult<Option<Event>> {
            self.calls.lock().unwrap().push("poll");
            self.updates.lock().unwrap().pop_front().unwrap_or(Ok(None))
        }
    }

    fn viewer(transport: Arc<ScriptedTransport>) -> Viewer<MemoryView> {
        Viewer::new(
            transport,
            Dispatcher::with_zone(MemoryView::new(), DisplayZone::Utc),
            ViewerConfig {
                poll_interval_ms: INTERVAL_MS,
            },
        )
        .unwrap()
    }

    /// Shutdown future firing halfway between poll `n` and poll `n + 1`
    fn after_polls(n: u64) -> impl Future<Output = ()> {
        tokio::time::sleep(Duration::from_millis(n * INTERVAL_MS + INTERVAL_MS / 2))
    }

    fn alice_history() -> Vec<Event> {
        vec![
            Event::new(EventKind::UserJoined, "alice", 60),
            Event::message("alice", "hi", 120),
        ]
    }

    #[test]
    fn test_zero_interval_rejected() {
        let transport = ScriptedTransport::new(Ok(Vec::new()), Vec::new());
        let result = Viewer::new(
            transport,
            Dispatcher::new(MemoryView::new()),
            ViewerConfig { poll_interval_ms: 0 },
        );
        assert_eq!(result.err(), Some(ViewerError::InvalidPollInterval));
    }

    #[tokio::test]
    async fn test_history_replayed_in_order() {
        let transport = ScriptedTransport::new(Ok(alice_history()), Vec::new());
        let mut viewer = viewer(transport.clone());

        assert_eq!(viewer.load_history().await, 2);
        assert_eq!(
            viewer.view().lines(),
            vec!["[00:01] alice joined", "[00:02] alice: hi"]
        );
        assert_eq!(transport.calls(), vec!["history"]);
    }

    #[tokio::test]
    async fn test_history_skips_unknown_kinds() {
        let mut history = alice_history();
        history.insert(1, Event {
            kind: Some("banned".to_string()),
            ..Default::default()
        });
        let transport = ScriptedTransport::new(Ok(history), Vec::new());
        let mut viewer = viewer(transport);

        assert_eq!(viewer.load_history().await, 2);
        assert_eq!(viewer.view().scroll_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_history_equals_empty() {
        let transport = ScriptedTransport::new(Err(TransportError::Unavailable), Vec::new());
        let mut viewer = viewer(transport);

        assert_eq!(viewer.load_history().await, 0);
        assert!(viewer.view().is_empty());
    }

    #[tokio::test]
    async fn test_poll_outcomes() {
        let transport = ScriptedTransport::new(
            Ok(Vec::new()),
            vec![
                Ok(Some(Event::message("bob", "yo", 0))),
                Ok(Some(Event::default())),
                Ok(None),
                Err(TransportError::MalformedPayload("<html>".to_string())),
            ],
        );
        let mut viewer = viewer(transport);

        assert_eq!(viewer.poll_once().await, PollOutcome::Dispatched);
        assert_eq!(viewer.poll_once().await, PollOutcome::Ignored);
        assert_eq!(viewer.poll_once().await, PollOutcome::Empty);
        assert_eq!(viewer.poll_once().await, PollOutcome::Failed);
        assert_eq!(viewer.view().lines(), vec!["[00:00] bob: yo"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_precedes_first_poll() {
        let transport = ScriptedTransport::new(
            Ok(alice_history()),
            vec![Ok(Some(Event::new(EventKind::UserQuit, "alice", 180)))],
        );

        let view = viewer(transport.clone()).run_until(after_polls(1)).await;

        assert_eq!(transport.calls(), vec!["history", "poll"]);
        assert_eq!(
            view.lines(),
            vec!["[00:01] alice joined", "[00:02] alice: hi", "[00:03] alice quit"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_change_cadence() {
        let updates = (0..10).map(|_| Err(TransportError::Timeout)).collect();
        let transport = ScriptedTransport::new(Err(TransportError::Unavailable), updates);

        let view = viewer(transport.clone()).run_until(after_polls(5)).await;

        assert_eq!(transport.polls(), 5);
        assert!(view.is_empty());
        assert_eq!(view.scroll_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_outcomes_keep_polling() {
        let transport = ScriptedTransport::new(
            Ok(Vec::new()),
            vec![
                Err(TransportError::Unavailable),
                Ok(None),
                Ok(Some(Event::message("carol", "back", 0))),
                Err(TransportError::MalformedPayload("{".to_string())),
            ],
        );

        let view = viewer(transport.clone()).run_until(after_polls(7)).await;

        assert_eq!(transport.polls(), 7);
        assert_eq!(view.lines(), vec!["[00:00] carol: back"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrival_order_governs() {
        let transport = ScriptedTransport::new(
            Ok(Vec::new()),
            vec![
                Ok(Some(Event::message("alice", "first", 7200))),
                Ok(Some(Event::message("bob", "second", 60))),
            ],
        );

        let view = viewer(transport).run_until(after_polls(2)).await;

        assert_eq!(
            view.lines(),
            vec!["[02:00] alice: first", "[00:01] bob: second"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_first_poll() {
        let transport = ScriptedTransport::new(Ok(alice_history()), Vec::new());

        let view = viewer(transport.clone())
            .run_until(tokio::time::sleep(Duration::from_millis(INTERVAL_MS / 2)))
            .await;

        assert_eq!(transport.polls(), 0);
        assert_eq!(view.len(), 2);
    }
}
