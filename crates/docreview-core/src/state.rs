//! Review document state.
//!
//! A [`DocumentState`] is never patched in place: every transition builds a
//! new value from the previous one, so whoever owns the latest value sees a
//! consistent picture of what was fetched.

use sha2::{Digest, Sha256};

use crate::merge::merge_edits;
use crate::model::Edit;

/// Everything one successful poll cycle produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewSnapshot {
    pub current_text: String,
    /// Full replacement document (full-text mode only)
    pub proposed_text: Option<String>,
    pub edits: Vec<Edit>,
    /// Continue sentinel (edits mode only); `None` when absent or not numeric
    pub continue_flag: Option<i64>,
}

impl ReviewSnapshot {
    /// Stable content hash, used to tell a fresh change set from one already reviewed
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.current_text.as_bytes());
        hasher.update([0u8]);
        if let Some(proposed) = &self.proposed_text {
            hasher.update(proposed.as_bytes());
        }
        hasher.update([0u8]);
        for edit in &self.edits {
            hasher.update(edit.start.to_le_bytes());
            hasher.update(edit.end.to_le_bytes());
            hasher.update(edit.replacement.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Text that would be written back if the change set were approved
    pub fn merged_text(&self) -> String {
        match &self.proposed_text {
            Some(proposed) => proposed.clone(),
            None => merge_edits(&self.current_text, &self.edits),
        }
    }

    pub fn should_continue(&self) -> bool {
        self.continue_flag.is_some_and(|flag| flag != 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    pub current_text: String,
    pub proposed_text: Option<String>,
    pub edits: Vec<Edit>,
    pub loading: bool,
    pub error: Option<String>,
    pub continue_flag: Option<i64>,
}

impl DocumentState {
    /// Initial state of a poll cycle
    pub fn loading() -> Self {
        Self {
            current_text: String::new(),
            proposed_text: None,
            edits: Vec::new(),
            loading: true,
            error: None,
            continue_flag: None,
        }
    }

    /// Successor state after a failed attempt. Previously fetched content is kept.
    pub fn waiting(&self, reason: impl std::fmt::Display) -> Self {
        Self {
            loading: true,
            error: Some(format!("Waiting for files... ({})", reason)),
            ..self.clone()
        }
    }

    pub fn ready(snapshot: ReviewSnapshot) -> Self {
        Self {
            current_text: snapshot.current_text,
            proposed_text: snapshot.proposed_text,
            edits: snapshot.edits,
            loading: false,
            error: None,
            continue_flag: snapshot.continue_flag,
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.loading && self.error.is_none()
    }

    /// The fetched content, once the state is ready
    pub fn snapshot(&self) -> Option<ReviewSnapshot> {
        if !self.is_ready() {
            return None;
        }
        Some(ReviewSnapshot {
            current_text: self.current_text.clone(),
            proposed_text: self.proposed_text.clone(),
            edits: self.edits.clone(),
            continue_flag: self.continue_flag,
        })
    }
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::loading()
    }
}
