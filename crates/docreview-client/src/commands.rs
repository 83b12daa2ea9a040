// review and preview commands: terminal presentation on top of ReviewSession

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

use docreview_core::edits_table;
use docreview_core::interactive::{
    is_interactive, print_error, print_header, print_info, print_success, print_warning,
    prompt_verdict, stdout_supports_color, Verdict,
};
use docreview_core::model::ReviewConfig;
use docreview_core::render::{render_review, HtmlRenderer, ReviewView, TerminalRenderer};
use docreview_core::state::{DocumentState, ReviewSnapshot};

use crate::session::{ReviewSession, Reviewer};

#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    /// Fixed decision for every cycle instead of prompting
    pub decision: Option<Verdict>,
    /// Also write the two-panel HTML page here
    pub html: Option<PathBuf>,
}

/// Reviewer that renders to the terminal and asks on stdin
pub struct TerminalReviewer {
    renderer: TerminalRenderer,
    html: Option<(HtmlRenderer, PathBuf)>,
    decision: Option<Verdict>,
    last_status: Option<String>,
}

impl TerminalReviewer {
    pub fn new(config: &ReviewConfig, options: &ReviewOptions) -> Self {
        let format = config.render.format;
        let theme = &config.render.theme;
        Self {
            renderer: TerminalRenderer::new(format, theme, stdout_supports_color()),
            html: options
                .html
                .clone()
                .map(|path| (HtmlRenderer::new(format, theme), path)),
            decision: options.decision,
            last_status: None,
        }
    }

    /// Render both panes, plus the HTML page when requested
    pub fn present(&self, snapshot: &ReviewSnapshot) -> Result<()> {
        let view = ReviewView::from_snapshot(snapshot);

        print_header("Documentation Review");
        let outcome = render_review(&self.renderer, &view);
        if outcome.is_fallback() {
            print_error(outcome.text());
        } else {
            println!("{}", outcome.text());
        }

        if !snapshot.edits.is_empty() {
            println!("{}", edits_table(&snapshot.edits));
            println!();
        }

        if let Some((renderer, path)) = &self.html {
            let page = render_review(renderer, &view);
            write_page(path, page.text())?;
        }

        Ok(())
    }
}

#[async_trait]
impl Reviewer for TerminalReviewer {
    fn on_state(&mut self, state: &DocumentState) {
        match &state.error {
            Some(message) if self.last_status.as_deref() != Some(message.as_str()) => {
                print_warning(message);
                self.last_status = Some(message.clone());
            }
            None if state.loading => {
                print_info("Loading documents...");
                self.last_status = None;
            }
            _ => {}
        }
    }

    async fn review(&mut self, snapshot: &ReviewSnapshot) -> Result<Verdict> {
        self.present(snapshot)?;

        let verdict = match self.decision {
            Some(verdict) => verdict,
            None if is_interactive() => tokio::task::spawn_blocking(prompt_verdict).await??,
            None => bail!("No decision given. Pass --decision approve|reject when not running in a terminal"),
        };

        match verdict {
            Verdict::Approve => print_success("Changes approved"),
            Verdict::Reject => print_warning("Changes rejected"),
        }
        Ok(verdict)
    }
}

/// Poll, review, and submit until the producer has nothing left
pub async fn cmd_review(config: &ReviewConfig, options: &ReviewOptions) -> Result<()> {
    let session = ReviewSession::new(config)?;
    print_info(&format!(
        "Reviewing {} changes from {}",
        session.mode(),
        session.describe_source()
    ));

    let mut reviewer = TerminalReviewer::new(config, options);
    let summary = session.run(&mut reviewer).await?;

    println!();
    print_success(&format!(
        "Review finished: {} reviewed, {} approved",
        summary.reviewed, summary.approved
    ));
    if summary.failed_submissions > 0 {
        print_warning(&format!(
            "{} decision(s) could not be delivered to {}",
            summary.failed_submissions, config.submit.approve_url
        ));
    }
    Ok(())
}

/// Poll until ready and render, without submitting anything
pub async fn cmd_preview(config: &ReviewConfig, html: Option<&Path>) -> Result<()> {
    let session = ReviewSession::new(config)?;
    let options = ReviewOptions {
        decision: None,
        html: html.map(Path::to_path_buf),
    };
    let mut reviewer = TerminalReviewer::new(config, &options);

    let snapshot = session.wait_until_ready(&mut reviewer, None).await?;
    reviewer.present(&snapshot)
}

fn write_page(path: &Path, page: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, page)
        .with_context(|| format!("Failed to write review page: {}", path.display()))?;
    print_success(&format!("Wrote review page → {}", path.display()));
    Ok(())
}
