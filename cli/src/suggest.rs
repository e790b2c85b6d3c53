//! Suggestion client — debounced completion requests.
//!
//! DESIGN
//! ======
//! Every document change calls [`SuggestionClient::schedule`], which aborts the
//! pending debounce timer and arms a new one. Only one timer is ever alive.
//! When a timer runs out it posts the context it captured; the owner picks
//! that up in [`SuggestionClient::next_event`] and starts the fetch. Fetches
//! are detached tasks and are never cancelled once started.
//!
//! A finished fetch is shown only if its captured context still equals the
//! document the owner holds at arrival. Anything else is stale and dropped.
//!
//! ERROR HANDLING
//! ==============
//! Transport and decode failures are logged and end as `Failed`; the
//! suggestion stays absent and nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use frames::{AUTOCOMPLETE_PATH, AutocompleteRequest, AutocompleteResponse};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{ClientConfig, SessionTuning};

// =============================================================================
// SOURCE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("suggestion endpoint returned HTTP {0}")]
    Status(u16),
}

/// Anything that turns a request into one suggested continuation.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, request: &AutocompleteRequest) -> Result<String, SuggestError>;
}

/// `POST /autocomplete` over HTTP.
pub struct HttpSuggestionSource {
    http: reqwest::Client,
    url: String,
}

impl HttpSuggestionSource {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self { http: reqwest::Client::new(), url: config.api_url(AUTOCOMPLETE_PATH) }
    }
}

#[async_trait]
impl SuggestionSource for HttpSuggestionSource {
    async fn suggest(&self, request: &AutocompleteRequest) -> Result<String, SuggestError> {
        let response = self.http.post(&self.url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Status(status.as_u16()));
        }
        Ok(response.json::<AutocompleteResponse>().await?.suggestion)
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Lifecycle of the single outstanding suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionPhase {
    Absent,
    /// At least one fetch is in flight.
    Pending,
    Present(String),
}

/// Outcome of one suspension point handled by [`SuggestionClient::next_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionEvent {
    /// The debounce window elapsed and a fetch was started.
    Requested,
    /// A fresh, non-empty suggestion arrived and is now present.
    Ready(String),
    /// A fetch finished but its result was stale or empty.
    Discarded,
    /// A fetch failed; the error was logged and swallowed.
    Failed,
}

enum Signal {
    Due { generation: u64, context: String },
    Done { context: String, outcome: Result<String, SuggestError> },
}

pub struct SuggestionClient {
    source: Arc<dyn SuggestionSource>,
    debounce: Duration,
    min_context_chars: usize,
    language: String,
    timer: Option<JoinHandle<()>>,
    generation: u64,
    signals_tx: mpsc::UnboundedSender<Signal>,
    signals_rx: mpsc::UnboundedReceiver<Signal>,
    in_flight: usize,
    phase: SuggestionPhase,
}

impl SuggestionClient {
    #[must_use]
    pub fn new(source: Arc<dyn SuggestionSource>, tuning: &SessionTuning) -> Self {
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();
        Self {
            source,
            debounce: tuning.debounce,
            min_context_chars: tuning.min_context_chars,
            language: tuning.language.clone(),
            timer: None,
            generation: 0,
            signals_tx,
            signals_rx,
            in_flight: 0,
            phase: SuggestionPhase::Absent,
        }
    }

    #[must_use]
    pub fn phase(&self) -> &SuggestionPhase {
        &self.phase
    }

    /// The suggestion currently on offer, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        match &self.phase {
            SuggestionPhase::Present(text) => Some(text),
            _ => None,
        }
    }

    /// Whether a debounce timer is armed.
    #[must_use]
    pub fn is_timer_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Restart the debounce window for `text`.
    ///
    /// Short documents cancel the pending timer without arming a new one.
    pub fn schedule(&mut self, text: &str) {
        self.cancel_timer();
        self.generation += 1;

        // Length in UTF-16 units, matching what editor widgets report.
        if text.encode_utf16().count() < self.min_context_chars {
            debug!(len = text.len(), "suggestion skipped: context too short");
            return;
        }

        // Deadline is fixed now, not when the task is first polled.
        let sleep = tokio::time::sleep(self.debounce);
        let tx = self.signals_tx.clone();
        let context = text.to_owned();
        let generation = self.generation;
        self.timer = Some(tokio::spawn(async move {
            sleep.await;
            let _ = tx.send(Signal::Due { generation, context });
        }));
    }

    /// Drop the present suggestion, if any.
    pub fn clear(&mut self) {
        if matches!(self.phase, SuggestionPhase::Present(_)) {
            self.phase = SuggestionPhase::Absent;
        }
    }

    /// Cancel the debounce timer and forget any suggestion. Fetches already in
    /// flight still finish, but their results are never delivered.
    pub fn shutdown(&mut self) {
        self.cancel_timer();
        self.signals_rx.close();
        self.in_flight = 0;
        self.phase = SuggestionPhase::Absent;
    }

    /// Wait for the next timer expiry or fetch completion and apply it.
    ///
    /// `current_text` is the document as it stands when the event is handled;
    /// a completed fetch for any other context is discarded.
    pub async fn next_event(&mut self, current_text: &str) -> SuggestionEvent {
        loop {
            let Some(signal) = self.signals_rx.recv().await else {
                return std::future::pending().await;
            };

            match signal {
                // A timer that fired just before being rescheduled.
                Signal::Due { generation, .. } if generation != self.generation => {}
                Signal::Due { context, .. } => {
                    self.timer = None;
                    self.start_fetch(context);
                    return SuggestionEvent::Requested;
                }
                Signal::Done { context, outcome } => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    return self.finish_fetch(&context, outcome, current_text);
                }
            }
        }
    }

    fn start_fetch(&mut self, context: String) {
        let (cursor_line, cursor_column) = end_cursor(&context);
        let request = AutocompleteRequest { code_context: context, cursor_line, cursor_column, language: self.language.clone() };
        debug!(len = request.code_context.len(), cursor_line, cursor_column, "suggestion requested");

        self.in_flight += 1;
        if !matches!(self.phase, SuggestionPhase::Present(_)) {
            self.phase = SuggestionPhase::Pending;
        }

        let source = Arc::clone(&self.source);
        let tx = self.signals_tx.clone();
        tokio::spawn(async move {
            let outcome = source.suggest(&request).await;
            let _ = tx.send(Signal::Done { context: request.code_context, outcome });
        });
    }

    fn finish_fetch(&mut self, context: &str, outcome: Result<String, SuggestError>, current_text: &str) -> SuggestionEvent {
        let event = match outcome {
            Err(e) => {
                warn!(error = %e, "suggestion fetch failed");
                SuggestionEvent::Failed
            }
            Ok(_) if context != current_text => {
                debug!("suggestion discarded: document changed while fetching");
                SuggestionEvent::Discarded
            }
            Ok(suggestion) if suggestion.is_empty() => SuggestionEvent::Discarded,
            Ok(suggestion) => {
                self.phase = SuggestionPhase::Present(suggestion.clone());
                return SuggestionEvent::Ready(suggestion);
            }
        };

        if self.phase == SuggestionPhase::Pending && self.in_flight == 0 {
            self.phase = SuggestionPhase::Absent;
        }
        event
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SuggestionClient {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Zero-based line and column (in chars) of the end of `text`.
#[must_use]
pub fn end_cursor(text: &str) -> (u32, u32) {
    let line = text.matches('\n').count();
    let column = text.rsplit('\n').next().map_or(0, |tail| tail.chars().count());
    (to_u32(line), to_u32(column))
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "suggest_test.rs"]
mod tests;
