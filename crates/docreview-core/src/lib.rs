pub mod config;
pub mod interactive;
pub mod loader;
pub mod merge;
pub mod model;
pub mod render;
pub mod state;

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Row, Table};
use std::fs;
use std::path::Path;

use crate::model::{Edit, ReviewConfig, ReviewMode};

/// Merge an edit list into a local document and print or write the result
pub fn cmd_merge(document: &Path, edits: &Path, out: Option<&Path>) -> Result<()> {
    let (text, edits) = loader::load_local_inputs(document, edits)?;
    let merged = merge::merge_edits(&text, &edits);

    match out {
        Some(path) => {
            fs::write(path, &merged)
                .with_context(|| format!("Failed to write merged document: {}", path.display()))?;
            interactive::print_success(&format!(
                "Applied {} edit(s) → {}",
                edits.len(),
                path.display()
            ));
        }
        None => print!("{}", merged),
    }

    Ok(())
}

/// Show the effective configuration after precedence and overrides
pub fn cmd_status(config: &ReviewConfig) -> Result<()> {
    use owo_colors::OwoColorize;

    println!();
    println!("{} {}", "▸".bright_cyan(), "docreview Status".bright_cyan().bold());
    println!();

    let project_config = config::project_config_path();
    let config_state = if project_config.exists() {
        project_config.display().to_string()
    } else {
        "(defaults)".to_string()
    };

    let mut rows: Vec<(&str, String)> = vec![
        ("Configuration", config_state),
        ("Source", config.source.location.clone()),
        ("Mode", config.source.mode.to_string()),
        ("Current document", config.source.current_doc.clone()),
    ];
    match config.source.mode {
        ReviewMode::Edits => {
            rows.push(("Continue sentinel", config.source.continue_file.clone()));
            rows.push(("Edit list", config.source.edits_file.clone()));
        }
        ReviewMode::FullText => rows.push(("New document", config.source.new_doc.clone())),
    }
    rows.push(("Retry interval", format!("{} ms", config.source.retry_interval_ms)));
    rows.push(("Approval endpoint", config.submit.approve_url.clone()));
    rows.push(("Render format", format!("{:?}", config.render.format).to_lowercase()));
    rows.push(("Theme", config.render.theme.clone()));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    for (label, value) in rows {
        table.add_row(Row::from(vec![
            Cell::new(label).fg(comfy_table::Color::Cyan),
            Cell::new(value).fg(comfy_table::Color::White),
        ]));
    }

    println!("{}", table);
    println!();
    Ok(())
}

/// Tabular summary of an edit set, in document order
pub fn edits_table(edits: &[Edit]) -> Table {
    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by_key(|edit| merge::normalize_line(edit.start));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Lines", "Replacement"]);

    for (idx, edit) in sorted.iter().enumerate() {
        let first_line = edit.replacement.lines().next().unwrap_or("");
        let extra = edit.replacement.lines().count().saturating_sub(1);
        let preview = if extra > 0 {
            format!("{} (+{} more lines)", first_line, extra)
        } else {
            first_line.to_string()
        };

        table.add_row(Row::from(vec![
            Cell::new(idx + 1),
            Cell::new(format!("{}–{}", edit.start, edit.end)).fg(comfy_table::Color::Yellow),
            Cell::new(preview),
        ]));
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_table_lists_in_document_order() {
        let edits = vec![Edit::new(9, 9, "late"), Edit::new(1, 2, "early\nsecond")];
        let rendered = edits_table(&edits).to_string();
        let early = rendered.find("early (+1 more lines)").unwrap();
        let late = rendered.find("late").unwrap();
        assert!(early < late);
        assert!(rendered.contains("1–2"));
    }
}
