//! Sends the reviewer's decision to the approval endpoint

use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;

use docreview_core::interactive::Verdict;
use docreview_core::model::{ReviewMode, SubmitSettings};
use docreview_core::state::ReviewSnapshot;

use crate::error::SubmitError;

/// Wire body of the approval POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    #[serde(rename = "Approved")]
    pub approved: bool,
    #[serde(rename = "Data", skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Decision {
    /// Edits mode always carries `Data`: the merged document when approved,
    /// an empty string when rejected. Full-text mode sends the bare flag.
    pub fn for_snapshot(snapshot: &ReviewSnapshot, mode: ReviewMode, verdict: Verdict) -> Self {
        let approved = verdict.is_approved();
        let data = match mode {
            ReviewMode::Edits if approved => Some(snapshot.merged_text()),
            ReviewMode::Edits => Some(String::new()),
            ReviewMode::FullText => None,
        };
        Self { approved, data }
    }
}

pub struct DecisionSubmitter {
    client: Client,
    url: String,
}

impl DecisionSubmitter {
    pub fn new(settings: &SubmitSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .unwrap_or_default();

        Self {
            client,
            url: settings.approve_url.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the decision once and return the endpoint's JSON response.
    /// A non-success status or a body that is not JSON is an error.
    pub async fn submit(&self, decision: &Decision) -> Result<serde_json::Value, SubmitError> {
        let url = Url::parse(&self.url).map_err(|_| SubmitError::InvalidUrl(self.url.clone()))?;

        tracing::debug!(%url, approved = decision.approved, "submitting decision");
        let response = self.client.post(url).json(decision).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| SubmitError::InvalidResponse { body, source })
    }
}
