use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A proposed replacement of a 1-based, inclusive line range in the original document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Edit {
    #[serde(rename = "inicio", alias = "start")]
    pub start: i64,
    #[serde(rename = "fim", alias = "end")]
    pub end: i64,
    #[serde(rename = "novo_conteudo", alias = "replacement", default)]
    pub replacement: String,
}

impl Edit {
    pub fn new(start: i64, end: i64, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }
}

/// Wire envelope of the edit-list resource: `{"alteracoes": [...]}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EditList {
    #[serde(rename = "alteracoes", alias = "edits", default)]
    pub edits: Option<Vec<Edit>>,
}

/// Which pane a segmentation is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Original document with replaced ranges tagged as removed
    Current,
    /// Original document with replacement content tagged as added
    Proposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Unchanged,
    Removed,
    Added,
}

/// A contiguous run of lines tagged for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub lines: Vec<&'a str>,
    pub kind: SegmentKind,
}

impl<'a> Segment<'a> {
    pub fn new(kind: SegmentKind, lines: Vec<&'a str>) -> Self {
        Self { lines, kind }
    }

    /// Joined content of the segment, newline separated
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}

/// Deployment variant: which resources are polled and what gets submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewMode {
    /// Current doc + continue sentinel + JSON edit list; submits merged text
    #[default]
    Edits,
    /// Current doc + full new doc; submits the bare decision
    FullText,
}

impl FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "edits" => Ok(Self::Edits),
            "full-text" | "fulltext" => Ok(Self::FullText),
            other => Err(format!("unknown review mode '{}'. Available: edits, full-text", other)),
        }
    }
}

impl fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edits => write!(f, "edits"),
            Self::FullText => write!(f, "full-text"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// Markdown with highlighted fenced code
    #[default]
    Rich,
    /// Preformatted text, no markdown interpretation
    Plain,
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "rich" => Ok(Self::Rich),
            "plain" => Ok(Self::Plain),
            other => Err(format!("unknown render format '{}'. Available: rich, plain", other)),
        }
    }
}

// Resolved configuration

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewConfig {
    pub source: SourceSettings,
    pub submit: SubmitSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSettings {
    /// Base URL (`http://`/`https://`) or local directory the resources live under
    pub location: String,
    pub mode: ReviewMode,
    pub current_doc: String,
    pub new_doc: String,
    pub continue_file: String,
    pub edits_file: String,
    pub retry_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitSettings {
    pub approve_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderSettings {
    pub format: RenderFormat,
    pub theme: String,
}

pub const DEFAULT_LOCATION: &str = "http://localhost:3000/";
pub const DEFAULT_APPROVE_URL: &str = "http://localhost:5000/approve_changes";
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_SUBMIT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            mode: ReviewMode::Edits,
            current_doc: "current_documentation.md".to_string(),
            new_doc: "new_documentation.md".to_string(),
            continue_file: "continue_exec.txt".to_string(),
            edits_file: "alteracoes.json".to_string(),
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
        }
    }
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            approve_url: DEFAULT_APPROVE_URL.to_string(),
            timeout_ms: DEFAULT_SUBMIT_TIMEOUT_MS,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            format: RenderFormat::Rich,
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            source: SourceSettings::default(),
            submit: SubmitSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

// Config files may be partial; every field is optional and merged by precedence.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialReviewConfig {
    pub source: Option<PartialSource>,
    pub submit: Option<PartialSubmit>,
    pub render: Option<PartialRender>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSource {
    pub location: Option<String>,
    pub mode: Option<ReviewMode>,
    #[serde(rename = "currentDoc")]
    pub current_doc: Option<String>,
    #[serde(rename = "newDoc")]
    pub new_doc: Option<String>,
    #[serde(rename = "continueFile")]
    pub continue_file: Option<String>,
    #[serde(rename = "editsFile")]
    pub edits_file: Option<String>,
    #[serde(rename = "retryIntervalMs")]
    pub retry_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSubmit {
    #[serde(rename = "approveUrl")]
    pub approve_url: Option<String>,
    #[serde(rename = "timeoutMs")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialRender {
    pub format: Option<RenderFormat>,
    pub theme: Option<String>,
}
