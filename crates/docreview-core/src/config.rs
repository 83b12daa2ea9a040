use crate::model::{PartialReviewConfig, ReviewConfig, ReviewMode};
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".docreview";

/// Load config with precedence:
/// 1. User config (~/.docreview/config.toml) - lowest priority
/// 2. Project config (.docreview/config.toml)
/// 3. Local config (.docreview/config.local.toml)
/// 4. Environment variables - highest priority
///
/// Every file is optional. Later sources override earlier ones field-by-field.
pub fn load_config_with_precedence() -> Result<ReviewConfig> {
    load_config_from(Path::new("."), dirs::home_dir().as_deref())
}

/// Same as [`load_config_with_precedence`] with explicit project and home roots
pub fn load_config_from(project_root: &Path, home: Option<&Path>) -> Result<ReviewConfig> {
    let mut files = Vec::new();

    if let Some(home_dir) = home {
        files.push(home_dir.join(CONFIG_DIR).join("config.toml"));
    }
    files.push(project_root.join(CONFIG_DIR).join("config.toml"));
    files.push(project_root.join(CONFIG_DIR).join("config.local.toml"));

    let mut config = ReviewConfig::default();
    for path in files {
        if !path.exists() {
            continue;
        }
        let partial = load_single_config(&path)?;
        apply_partial(&mut config, partial);
        tracing::debug!(path = %path.display(), "applied config file");
    }

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load a single config file as a partial config
fn load_single_config(path: &Path) -> Result<PartialReviewConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: PartialReviewConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(config)
}

/// Merge a partial config over a resolved one; only fields present in `partial` change
fn apply_partial(base: &mut ReviewConfig, partial: PartialReviewConfig) {
    if let Some(source) = partial.source {
        let target = &mut base.source;
        if let Some(location) = source.location {
            target.location = location;
        }
        if let Some(mode) = source.mode {
            target.mode = mode;
        }
        if let Some(current_doc) = source.current_doc {
            target.current_doc = current_doc;
        }
        if let Some(new_doc) = source.new_doc {
            target.new_doc = new_doc;
        }
        if let Some(continue_file) = source.continue_file {
            target.continue_file = continue_file;
        }
        if let Some(edits_file) = source.edits_file {
            target.edits_file = edits_file;
        }
        if let Some(retry) = source.retry_interval_ms {
            target.retry_interval_ms = retry;
        }
    }

    if let Some(submit) = partial.submit {
        if let Some(approve_url) = submit.approve_url {
            base.submit.approve_url = approve_url;
        }
        if let Some(timeout_ms) = submit.timeout_ms {
            base.submit.timeout_ms = timeout_ms;
        }
    }

    if let Some(render) = partial.render {
        if let Some(format) = render.format {
            base.render.format = format;
        }
        if let Some(theme) = render.theme {
            base.render.theme = theme;
        }
    }
}

/// Apply environment variable overrides
fn apply_env_overrides(config: &mut ReviewConfig) -> Result<()> {
    if let Ok(location) = env::var("DOCREVIEW_SOURCE") {
        config.source.location = location;
    }

    if let Ok(mode) = env::var("DOCREVIEW_MODE") {
        config.source.mode = mode
            .parse::<ReviewMode>()
            .map_err(|e| anyhow::anyhow!("DOCREVIEW_MODE: {}", e))?;
    }

    if let Ok(url) = env::var("DOCREVIEW_APPROVE_URL") {
        config.submit.approve_url = url;
    }

    if let Ok(retry) = env::var("DOCREVIEW_RETRY_MS") {
        config.source.retry_interval_ms = retry
            .trim()
            .parse()
            .with_context(|| format!("DOCREVIEW_RETRY_MS must be a number of milliseconds, got '{}'", retry))?;
    }

    Ok(())
}

/// Path of the project config file, for display
pub fn project_config_path() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("config.toml")
}
