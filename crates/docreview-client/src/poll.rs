//! Retry loop that polls until every resource is available
//!
//! The loop runs as one background task. Each state transition is sent by
//! value over a channel: `loading` first, `waiting` after each failed
//! attempt, and `ready` once a snapshot arrives, after which the task ends.
//! The task is owned through a [`PollHandle`]; cancelling or dropping the
//! handle stops it, and no retry is scheduled afterwards.

use std::sync::Arc;
use std::time::Duration;

use docreview_core::state::DocumentState;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::FetchError;
use crate::fetcher::DocumentFetcher;

pub struct PollLoop {
    fetcher: Arc<DocumentFetcher>,
    interval: Duration,
    /// Fingerprint of the change set reviewed last; an identical snapshot is retried
    previous: Option<String>,
}

impl PollLoop {
    pub fn new(fetcher: Arc<DocumentFetcher>, interval: Duration) -> Self {
        Self {
            fetcher,
            interval,
            previous: None,
        }
    }

    pub fn skip_fingerprint(mut self, fingerprint: Option<String>) -> Self {
        self.previous = fingerprint;
        self
    }

    /// Start polling in the background
    pub fn spawn(self) -> (PollHandle, mpsc::UnboundedReceiver<DocumentState>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            self.run(state_tx, cancel_rx).await;
        });

        let handle = PollHandle {
            cancel: Some(cancel_tx),
            task,
        };
        (handle, state_rx)
    }

    async fn run(
        self,
        states: mpsc::UnboundedSender<DocumentState>,
        mut cancel: oneshot::Receiver<()>,
    ) {
        let mut state = DocumentState::loading();
        if states.send(state.clone()).is_err() {
            return;
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let result = tokio::select! {
                biased;
                _ = &mut cancel => return,
                result = self.attempt() => result,
            };

            match result {
                Ok(next) => {
                    tracing::debug!(attempt, "documents ready");
                    let _ = states.send(next);
                    return;
                }
                Err(e) => {
                    tracing::info!(attempt, reason = %e, "documents not ready, retrying");
                    state = state.waiting(&e);
                    if states.send(state.clone()).is_err() {
                        return;
                    }
                }
            }

            tokio::select! {
                biased;
                _ = &mut cancel => return,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    async fn attempt(&self) -> Result<DocumentState, FetchError> {
        let snapshot = self.fetcher.fetch_snapshot().await?;
        if self.previous.as_deref() == Some(snapshot.fingerprint().as_str()) {
            return Err(FetchError::Stale);
        }
        Ok(DocumentState::ready(snapshot))
    }
}

/// Owner of a running poll loop
pub struct PollHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop the loop. Any in-flight attempt is abandoned.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
        self.task.abort();
    }
}
