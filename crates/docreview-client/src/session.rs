//! Review session: poll, review, submit, and repeat while the producer says so

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use docreview_core::interactive::Verdict;
use docreview_core::model::{ReviewConfig, ReviewMode};
use docreview_core::state::{DocumentState, ReviewSnapshot};

use crate::fetcher::DocumentFetcher;
use crate::poll::PollLoop;
use crate::source::{source_from_location, ResourceSource};
use crate::submit::{Decision, DecisionSubmitter};

/// Whoever looks at a change set and decides on it
#[async_trait]
pub trait Reviewer: Send {
    /// Called for every state the poll loop reports
    fn on_state(&mut self, _state: &DocumentState) {}

    async fn review(&mut self, snapshot: &ReviewSnapshot) -> Result<Verdict>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub reviewed: usize,
    pub approved: usize,
    pub failed_submissions: usize,
}

pub struct ReviewSession {
    fetcher: Arc<DocumentFetcher>,
    submitter: DecisionSubmitter,
    retry_interval: Duration,
}

impl ReviewSession {
    pub fn new(config: &ReviewConfig) -> Result<Self> {
        let source = source_from_location(
            &config.source.location,
            Duration::from_millis(config.submit.timeout_ms),
        )?;
        Ok(Self::with_source(source, config))
    }

    pub fn with_source(source: Arc<dyn ResourceSource>, config: &ReviewConfig) -> Self {
        Self {
            fetcher: Arc::new(DocumentFetcher::new(source, config.source.clone())),
            submitter: DecisionSubmitter::new(&config.submit),
            retry_interval: Duration::from_millis(config.source.retry_interval_ms),
        }
    }

    pub fn mode(&self) -> ReviewMode {
        self.fetcher.mode()
    }

    pub fn describe_source(&self) -> String {
        self.fetcher.describe()
    }

    /// Poll until a snapshot is ready, reporting each state to the reviewer.
    /// A snapshot whose fingerprint equals `skip` counts as not yet replaced.
    pub async fn wait_until_ready<R: Reviewer + ?Sized>(
        &self,
        reviewer: &mut R,
        skip: Option<String>,
    ) -> Result<ReviewSnapshot> {
        let (_handle, mut states) = PollLoop::new(self.fetcher.clone(), self.retry_interval)
            .skip_fingerprint(skip)
            .spawn();

        while let Some(state) = states.recv().await {
            reviewer.on_state(&state);
            if let Some(snapshot) = state.snapshot() {
                return Ok(snapshot);
            }
        }

        bail!("poll loop stopped before the documents were ready")
    }

    /// Run review cycles until the producer signals there is nothing left.
    ///
    /// Full-text mode always ends after one cycle. Edits mode starts another
    /// cycle while the continue flag is non-zero. A failed submission is
    /// logged and counted but never retried.
    pub async fn run<R: Reviewer + ?Sized>(&self, reviewer: &mut R) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut previous: Option<String> = None;

        loop {
            let snapshot = self.wait_until_ready(reviewer, previous.take()).await?;
            let verdict = reviewer.review(&snapshot).await?;

            let decision = Decision::for_snapshot(&snapshot, self.mode(), verdict);
            match self.submitter.submit(&decision).await {
                Ok(response) => {
                    tracing::info!(%response, approved = decision.approved, "decision submitted");
                }
                Err(e) => {
                    tracing::error!(error = %e, url = self.submitter.url(), "failed to submit decision");
                    summary.failed_submissions += 1;
                }
            }

            summary.reviewed += 1;
            if verdict.is_approved() {
                summary.approved += 1;
            }

            if self.mode() == ReviewMode::FullText || !snapshot.should_continue() {
                break;
            }

            tracing::info!("producer has more documents, starting next review cycle");
            previous = Some(snapshot.fingerprint());
        }

        Ok(summary)
    }
}
