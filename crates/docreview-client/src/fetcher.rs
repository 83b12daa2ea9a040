// one poll attempt: fetch every resource for the mode, all or nothing

use std::sync::Arc;

use docreview_core::loader::{parse_continue_flag, parse_edit_list, EMPTY_EDIT_LIST};
use docreview_core::model::{ReviewMode, SourceSettings};
use docreview_core::state::ReviewSnapshot;

use crate::error::FetchError;
use crate::source::ResourceSource;

pub struct DocumentFetcher {
    source: Arc<dyn ResourceSource>,
    settings: SourceSettings,
}

impl DocumentFetcher {
    pub fn new(source: Arc<dyn ResourceSource>, settings: SourceSettings) -> Self {
        Self { source, settings }
    }

    pub fn mode(&self) -> ReviewMode {
        self.settings.mode
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Fetch the resources for the configured mode concurrently.
    ///
    /// Fails if any required resource fails. In edits mode the edit list is
    /// optional and falls back to an empty list.
    pub async fn fetch_snapshot(&self) -> Result<ReviewSnapshot, FetchError> {
        match self.settings.mode {
            ReviewMode::Edits => {
                let (current_text, continue_raw, edits_raw) = tokio::try_join!(
                    self.fetch_required(&self.settings.current_doc),
                    self.source.fetch_text(&self.settings.continue_file),
                    self.fetch_edit_list(),
                )?;

                Ok(ReviewSnapshot {
                    current_text,
                    proposed_text: None,
                    edits: parse_edit_list(&edits_raw),
                    continue_flag: parse_continue_flag(&continue_raw),
                })
            }
            ReviewMode::FullText => {
                let (current_text, proposed_text) = tokio::try_join!(
                    self.fetch_required(&self.settings.current_doc),
                    self.fetch_required(&self.settings.new_doc),
                )?;

                Ok(ReviewSnapshot {
                    current_text,
                    proposed_text: Some(proposed_text),
                    edits: Vec::new(),
                    continue_flag: None,
                })
            }
        }
    }

    async fn fetch_required(&self, name: &str) -> Result<String, FetchError> {
        let text = self.source.fetch_text(name).await?;
        if text.trim().is_empty() {
            return Err(FetchError::Empty {
                resource: name.to_string(),
            });
        }
        Ok(text)
    }

    async fn fetch_edit_list(&self) -> Result<String, FetchError> {
        match self.source.fetch_text(&self.settings.edits_file).await {
            Ok(raw) => Ok(raw),
            Err(e) => {
                tracing::debug!(error = %e, "edit list unavailable, using empty list");
                Ok(EMPTY_EDIT_LIST.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DirSource;
    use docreview_core::model::Edit;
    use tempfile::TempDir;

    fn fetcher(dir: &TempDir, mode: ReviewMode) -> DocumentFetcher {
        let settings = SourceSettings {
            location: dir.path().display().to_string(),
            mode,
            ..Default::default()
        };
        DocumentFetcher::new(Arc::new(DirSource::new(dir.path())), settings)
    }

    #[tokio::test]
    async fn test_edits_mode_snapshot() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("current_documentation.md"), "A\nB\nC\nD").unwrap();
        std::fs::write(tmp.path().join("continue_exec.txt"), "1\n").unwrap();
        std::fs::write(
            tmp.path().join("alteracoes.json"),
            r#"{"alteracoes": [{"inicio": 2, "fim": 3, "novo_conteudo": "X"}]}"#,
        )
        .unwrap();

        let snapshot = fetcher(&tmp, ReviewMode::Edits).fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.current_text, "A\nB\nC\nD");
        assert_eq!(snapshot.edits, vec![Edit::new(2, 3, "X")]);
        assert_eq!(snapshot.continue_flag, Some(1));
        assert_eq!(snapshot.merged_text(), "A\nX\nD");
    }

    #[tokio::test]
    async fn test_missing_edit_list_is_empty() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("current_documentation.md"), "A").unwrap();
        std::fs::write(tmp.path().join("continue_exec.txt"), "0").unwrap();

        let snapshot = fetcher(&tmp, ReviewMode::Edits).fetch_snapshot().await.unwrap();
        assert!(snapshot.edits.is_empty());
        assert_eq!(snapshot.continue_flag, Some(0));
    }

    #[tokio::test]
    async fn test_continue_file_is_required() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("current_documentation.md"), "A").unwrap();

        let err = fetcher(&tmp, ReviewMode::Edits).fetch_snapshot().await.unwrap_err();
        assert_eq!(err.to_string(), "file not found: continue_exec.txt");
    }

    #[tokio::test]
    async fn test_empty_current_document_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("current_documentation.md"), "").unwrap();
        std::fs::write(tmp.path().join("new_documentation.md"), "new").unwrap();

        let err = fetcher(&tmp, ReviewMode::FullText).fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, FetchError::Empty { .. }));
    }

    #[tokio::test]
    async fn test_blank_documents_are_retried() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("current_documentation.md"), "  \n\n").unwrap();
        std::fs::write(tmp.path().join("continue_exec.txt"), "0").unwrap();
        std::fs::write(tmp.path().join("new_documentation.md"), "new").unwrap();

        let err = fetcher(&tmp, ReviewMode::Edits).fetch_snapshot().await.unwrap_err();
        assert_eq!(err.to_string(), "empty content: current_documentation.md");

        std::fs::write(tmp.path().join("current_documentation.md"), "old").unwrap();
        std::fs::write(tmp.path().join("new_documentation.md"), "\t \r\n").unwrap();
        let err = fetcher(&tmp, ReviewMode::FullText).fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, FetchError::Empty { ref resource } if resource == "new_documentation.md"));
    }

    #[tokio::test]
    async fn test_full_text_snapshot() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("current_documentation.md"), "old").unwrap();
        std::fs::write(tmp.path().join("new_documentation.md"), "new").unwrap();

        let snapshot = fetcher(&tmp, ReviewMode::FullText).fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.proposed_text.as_deref(), Some("new"));
        assert!(snapshot.continue_flag.is_none());
    }
}
