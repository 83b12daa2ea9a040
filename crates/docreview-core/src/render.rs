//! Rendering adapters for the two review panes.
//!
//! A [`ReviewView`] holds the segments of both panes. Any [`Renderer`] turns
//! it into output; [`render_review`] wraps that call so a failing renderer
//! yields a fallback message instead of aborting the review.

pub mod html;
pub mod terminal;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::merge::segment_edits;
use crate::model::{Segment, ViewMode};
use crate::state::ReviewSnapshot;

pub use html::HtmlRenderer;
pub use terminal::TerminalRenderer;

pub const CURRENT_TITLE: &str = "Current Documentation:";
pub const PROPOSED_TITLE: &str = "Proposed Changes:";
pub const FALLBACK_MESSAGE: &str = "Oops, something went wrong while rendering the review.";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("syntax highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
    #[error("failed to format output: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Segments for both panes of one review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView<'a> {
    pub current: Vec<Segment<'a>>,
    pub proposed: Vec<Segment<'a>>,
}

impl<'a> ReviewView<'a> {
    /// Build both panes. A full replacement document is shown as-is in the
    /// proposed pane; otherwise the edits are overlaid on the current text.
    pub fn from_snapshot(snapshot: &'a ReviewSnapshot) -> Self {
        match &snapshot.proposed_text {
            Some(proposed) => Self {
                current: segment_edits(&snapshot.current_text, &[], ViewMode::Current),
                proposed: segment_edits(proposed, &[], ViewMode::Proposed),
            },
            None => Self {
                current: segment_edits(&snapshot.current_text, &snapshot.edits, ViewMode::Current),
                proposed: segment_edits(&snapshot.current_text, &snapshot.edits, ViewMode::Proposed),
            },
        }
    }

    pub fn panes(&self) -> [(&'static str, &[Segment<'a>]); 2] {
        [
            (CURRENT_TITLE, self.current.as_slice()),
            (PROPOSED_TITLE, self.proposed.as_slice()),
        ]
    }
}

pub trait Renderer {
    fn render(&self, view: &ReviewView<'_>) -> Result<String, RenderError>;
}

/// Result of a guarded render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(String),
    Fallback(String),
}

impl RenderOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Rendered(text) | Self::Fallback(text) => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Render a view, substituting [`FALLBACK_MESSAGE`] when the renderer fails
pub fn render_review(renderer: &dyn Renderer, view: &ReviewView<'_>) -> RenderOutcome {
    match renderer.render(view) {
        Ok(output) => RenderOutcome::Rendered(output),
        Err(e) => {
            tracing::error!(error = %e, "rendering failed, showing fallback");
            RenderOutcome::Fallback(FALLBACK_MESSAGE.to_string())
        }
    }
}

/// Syntax definitions and colour theme shared by the renderers
pub struct Highlighter {
    pub syntax_set: SyntaxSet,
    pub theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let theme_set = ThemeSet::load_defaults();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme: resolve_theme(&theme_set, theme_name),
        }
    }

    /// Syntax for a fenced-code info string; unknown or empty falls back to plain text
    pub fn syntax_for(&self, lang: &str) -> &SyntaxReference {
        let token = lang.split_whitespace().next().unwrap_or("");
        if token.is_empty() {
            return self.syntax_set.find_syntax_plain_text();
        }
        self.syntax_set
            .find_syntax_by_token(token)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

fn resolve_theme(theme_set: &ThemeSet, name: &str) -> Theme {
    if let Some(theme) = theme_set.themes.get(name) {
        return theme.clone();
    }
    tracing::warn!(theme = name, "unknown theme, using {}", crate::model::DEFAULT_THEME);
    if let Some(theme) = theme_set.themes.get(crate::model::DEFAULT_THEME) {
        return theme.clone();
    }
    theme_set
        .themes
        .values()
        .next()
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edit, SegmentKind};

    struct Failing;

    impl Renderer for Failing {
        fn render(&self, _view: &ReviewView<'_>) -> Result<String, RenderError> {
            Err(RenderError::Format(std::fmt::Error))
        }
    }

    #[test]
    fn test_render_review_falls_back() {
        let snapshot = ReviewSnapshot {
            current_text: "A".to_string(),
            ..Default::default()
        };
        let view = ReviewView::from_snapshot(&snapshot);
        let outcome = render_review(&Failing, &view);
        assert!(outcome.is_fallback());
        assert_eq!(outcome.text(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_view_overlays_edits() {
        let snapshot = ReviewSnapshot {
            current_text: "A\nB\nC\nD".to_string(),
            edits: vec![Edit::new(2, 3, "X")],
            ..Default::default()
        };
        let view = ReviewView::from_snapshot(&snapshot);
        assert_eq!(view.current[1].kind, SegmentKind::Removed);
        assert_eq!(view.proposed[1].kind, SegmentKind::Added);
        assert_eq!(view.proposed[1].lines, vec!["X"]);
    }

    #[test]
    fn test_view_full_text_shows_both_documents() {
        let snapshot = ReviewSnapshot {
            current_text: "old".to_string(),
            proposed_text: Some("new".to_string()),
            ..Default::default()
        };
        let view = ReviewView::from_snapshot(&snapshot);
        assert_eq!(view.current, vec![Segment::new(SegmentKind::Unchanged, vec!["old"])]);
        assert_eq!(view.proposed, vec![Segment::new(SegmentKind::Unchanged, vec!["new"])]);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let highlighter = Highlighter::new("no-such-theme");
        assert!(highlighter.theme.settings.background.is_some());
    }

    #[test]
    fn test_syntax_for_unknown_language_is_plain_text() {
        let highlighter = Highlighter::new(crate::model::DEFAULT_THEME);
        assert_eq!(highlighter.syntax_for("not-a-lang").name, "Plain Text");
        assert_eq!(highlighter.syntax_for("rust").name, "Rust");
        assert_eq!(highlighter.syntax_for("").name, "Plain Text");
    }
}
