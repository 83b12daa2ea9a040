use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use docreview_core::interactive::Verdict;
use docreview_core::model::{RenderFormat, ReviewConfig, ReviewMode};

#[derive(Parser)]
#[command(name = "docreview", version, about = "Review and approve generated documentation changes")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wait for a change set, review it, and submit the decision
    Review {
        #[command(flatten)]
        source: SourceArgs,
        /// Approval endpoint the decision is POSTed to
        #[arg(long, value_name = "URL")]
        approve_url: Option<String>,
        /// Also write the two-panel HTML page to this path
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,
        /// Decide without prompting (approve or reject)
        #[arg(long, value_name = "DECISION")]
        decision: Option<Verdict>,
    },
    /// Wait for a change set and render it without submitting
    Preview {
        #[command(flatten)]
        source: SourceArgs,
        /// Write the two-panel HTML page to this path
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,
    },
    /// Apply an edit list to a local document
    Merge {
        /// Current document
        document: PathBuf,
        /// Edit list JSON ({"alteracoes": [...]})
        edits: PathBuf,
        /// Write the merged document here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the effective configuration
    Status,
}

#[derive(Args)]
struct SourceArgs {
    /// Base URL or local directory holding the review resources
    #[arg(long, value_name = "URL|DIR")]
    source: Option<String>,
    /// Review mode (edits or full-text)
    #[arg(long)]
    mode: Option<ReviewMode>,
    /// Show content as plain text instead of rendered markdown
    #[arg(long)]
    plain: bool,
    /// Milliseconds between poll attempts
    #[arg(long, value_name = "MS")]
    retry_ms: Option<u64>,
}

impl SourceArgs {
    fn apply(&self, config: &mut ReviewConfig) {
        if let Some(source) = &self.source {
            config.source.location = source.clone();
        }
        if let Some(mode) = self.mode {
            config.source.mode = mode;
        }
        if let Some(retry_ms) = self.retry_ms {
            config.source.retry_interval_ms = retry_ms;
        }
        if self.plain {
            config.render.format = RenderFormat::Plain;
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docreview=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Review { source, approve_url, html, decision } => {
            let mut config = docreview_core::config::load_config_with_precedence()?;
            source.apply(&mut config);
            if let Some(url) = approve_url {
                config.submit.approve_url = url;
            }
            let options = docreview_client::ReviewOptions { decision, html };
            docreview_client::cmd_review(&config, &options).await?
        }
        Command::Preview { source, html } => {
            let mut config = docreview_core::config::load_config_with_precedence()?;
            source.apply(&mut config);
            docreview_client::cmd_preview(&config, html.as_deref()).await?
        }
        Command::Merge { document, edits, out } => {
            docreview_core::cmd_merge(&document, &edits, out.as_deref())?
        }
        Command::Status => {
            let config = docreview_core::config::load_config_with_precedence()?;
            docreview_core::cmd_status(&config)?
        }
    }
    Ok(())
}
