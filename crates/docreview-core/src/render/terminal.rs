// ANSI rendering of both panes, one gutter-tagged line at a time

use owo_colors::Style;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::fmt::Write as _;
use syntect::easy::HighlightLines;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

use super::{Highlighter, RenderError, Renderer, ReviewView};
use crate::model::{RenderFormat, SegmentKind};

pub struct TerminalRenderer {
    format: RenderFormat,
    color: bool,
    highlighter: Highlighter,
}

impl TerminalRenderer {
    pub fn new(format: RenderFormat, theme: &str, color: bool) -> Self {
        Self {
            format,
            color,
            highlighter: Highlighter::new(theme),
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            style.style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn gutter(&self, kind: SegmentKind) -> String {
        match kind {
            SegmentKind::Unchanged => self.paint("│", Style::new().bright_black()),
            SegmentKind::Removed => self.paint("-", Style::new().red().bold()),
            SegmentKind::Added => self.paint("+", Style::new().green().bold()),
        }
    }

    fn body_lines(&self, content: &str, kind: SegmentKind) -> Result<Vec<String>, RenderError> {
        match self.format {
            RenderFormat::Plain => {
                let style = match kind {
                    SegmentKind::Unchanged => Style::new(),
                    SegmentKind::Removed => Style::new().red(),
                    SegmentKind::Added => Style::new().green(),
                };
                Ok(content.split('\n').map(|line| self.paint(line, style)).collect())
            }
            RenderFormat::Rich => self.markdown_lines(content),
        }
    }

    fn markdown_lines(&self, source: &str) -> Result<Vec<String>, RenderError> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut writer = LineWriter::new(self);
        for event in Parser::new_ext(source, options) {
            writer.handle(event)?;
        }
        Ok(writer.finish())
    }

    fn highlight_code(&self, lang: &str, code: &str) -> Result<Vec<String>, RenderError> {
        let mut lines = Vec::new();

        if !self.color {
            for line in code.lines() {
                lines.push(format!("  {}", line));
            }
            return Ok(lines);
        }

        let syntax = self.highlighter.syntax_for(lang);
        let mut highlighter = HighlightLines::new(syntax, &self.highlighter.theme);
        for line in LinesWithEndings::from(code) {
            let ranges = highlighter.highlight_line(line, &self.highlighter.syntax_set)?;
            let escaped = as_24_bit_terminal_escaped(&ranges, false);
            let escaped = escaped.trim_end_matches(['\n', '\r']);
            lines.push(format!("  {}\x1b[0m", escaped));
        }
        Ok(lines)
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, view: &ReviewView<'_>) -> Result<String, RenderError> {
        let mut out = String::new();

        for (title, segments) in view.panes() {
            writeln!(out, "{}", self.paint(title, Style::new().bright_cyan().bold()))?;
            writeln!(out, "{}", self.paint(&"─".repeat(70), Style::new().bright_black()))?;

            for segment in segments {
                let gutter = self.gutter(segment.kind);
                for line in self.body_lines(&segment.content(), segment.kind)? {
                    if line.is_empty() {
                        writeln!(out, "{}", gutter)?;
                    } else {
                        writeln!(out, "{} {}", gutter, line)?;
                    }
                }
            }
            writeln!(out)?;
        }

        Ok(out)
    }
}

struct ListState {
    ordered: bool,
    next_index: u64,
}

/// Accumulates markdown events into styled terminal lines
struct LineWriter<'r> {
    renderer: &'r TerminalRenderer,
    lines: Vec<String>,
    current: String,
    heading: Option<HeadingLevel>,
    emphasis: usize,
    strong: usize,
    strikethrough: usize,
    link: usize,
    quote_depth: usize,
    lists: Vec<ListState>,
    code_lang: Option<String>,
    code_buf: String,
    cells_in_row: usize,
}

impl<'r> LineWriter<'r> {
    fn new(renderer: &'r TerminalRenderer) -> Self {
        Self {
            renderer,
            lines: Vec::new(),
            current: String::new(),
            heading: None,
            emphasis: 0,
            strong: 0,
            strikethrough: 0,
            link: 0,
            quote_depth: 0,
            lists: Vec::new(),
            code_lang: None,
            code_buf: String::new(),
            cells_in_row: 0,
        }
    }

    fn style(&self) -> Style {
        let mut style = Style::new();
        if self.heading.is_some() {
            style = style.bright_cyan().bold();
        }
        if self.strong > 0 {
            style = style.bold();
        }
        if self.emphasis > 0 {
            style = style.italic();
        }
        if self.strikethrough > 0 {
            style = style.strikethrough();
        }
        if self.link > 0 {
            style = style.blue().underline();
        }
        style
    }

    fn push_text(&mut self, text: &str) {
        if self.current.is_empty() && self.quote_depth > 0 {
            let bar = self
                .renderer
                .paint(&"│ ".repeat(self.quote_depth), Style::new().bright_black());
            self.current.push_str(&bar);
        }
        let painted = self.renderer.paint(text, self.style());
        self.current.push_str(&painted);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn handle(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag)?,
            Event::Text(text) => {
                if self.code_lang.is_some() {
                    self.code_buf.push_str(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => {
                let painted = self.renderer.paint(&code, Style::new().yellow());
                self.current.push_str(&painted);
            }
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(html.trim_end()),
            Event::SoftBreak => self.current.push(' '),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                let rule = self.renderer.paint(&"─".repeat(40), Style::new().bright_black());
                self.lines.push(rule);
                self.blank();
            }
            Event::TaskListMarker(done) => self.push_text(if done { "[x] " } else { "[ ] " }),
            Event::FootnoteReference(name) => self.push_text(&format!("[^{}]", name)),
            _ => {}
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(level);
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                self.code_lang = Some(match kind {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                });
                self.code_buf.clear();
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(ListState {
                    ordered: start.is_some(),
                    next_index: start.unwrap_or(1),
                });
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(list) if list.ordered => {
                        let marker = format!("{}. ", list.next_index);
                        list.next_index += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.current.push_str(&"  ".repeat(depth));
                let painted = self.renderer.paint(&marker, Style::new().bright_black());
                self.current.push_str(&painted);
            }
            Tag::TableRow | Tag::TableHead => {
                self.flush();
                self.cells_in_row = 0;
            }
            Tag::TableCell => {
                if self.cells_in_row > 0 {
                    let sep = self.renderer.paint(" | ", Style::new().bright_black());
                    self.current.push_str(&sep);
                }
                self.cells_in_row += 1;
            }
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { .. } => self.link += 1,
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) -> Result<(), RenderError> {
        match tag {
            TagEnd::Heading(level) => {
                if level == HeadingLevel::H1 {
                    let underline = "═".repeat(self.current_width());
                    self.flush();
                    let painted = self.renderer.paint(&underline, Style::new().bright_black());
                    self.lines.push(painted);
                }
                self.heading = None;
                self.blank();
            }
            TagEnd::Paragraph => self.blank(),
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank();
            }
            TagEnd::CodeBlock => {
                let lang = self.code_lang.take().unwrap_or_default();
                let code = std::mem::take(&mut self.code_buf);
                let highlighted = self.renderer.highlight_code(&lang, &code)?;
                self.lines.extend(highlighted);
                self.blank();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::TableHead | TagEnd::TableRow => self.flush(),
            TagEnd::Table => self.blank(),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => self.link = self.link.saturating_sub(1),
            _ => {}
        }
        Ok(())
    }

    /// Visible width of the pending line, ignoring escape sequences
    fn current_width(&self) -> usize {
        let mut width = 0;
        let mut in_escape = false;
        for c in self.current.chars() {
            match (in_escape, c) {
                (false, '\x1b') => in_escape = true,
                (true, 'm') => in_escape = false,
                (true, _) => {}
                (false, _) => width += 1,
            }
        }
        width
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edit, DEFAULT_THEME};
    use crate::state::ReviewSnapshot;

    fn snapshot() -> ReviewSnapshot {
        ReviewSnapshot {
            current_text: "A\nB\nC\nD".to_string(),
            edits: vec![Edit::new(2, 3, "X")],
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_render_without_color() {
        let renderer = TerminalRenderer::new(RenderFormat::Plain, DEFAULT_THEME, false);
        let snapshot = snapshot();
        let view = ReviewView::from_snapshot(&snapshot);
        let output = renderer.render(&view).unwrap();

        insta::assert_snapshot!(output, @r"
        Current Documentation:
        ──────────────────────────────────────────────────────────────────────
        │ A
        - B
        - C
        │ D

        Proposed Changes:
        ──────────────────────────────────────────────────────────────────────
        │ A
        + X
        │ D
        ");
    }

    #[test]
    fn test_rich_render_markdown_structure() {
        let renderer = TerminalRenderer::new(RenderFormat::Rich, DEFAULT_THEME, false);
        let lines = renderer
            .markdown_lines("# Title\n\nSome **bold** text.\n\n- one\n- two\n\n```rust\nfn main() {}\n```")
            .unwrap();
        assert_eq!(
            lines,
            vec![
                "Title",
                "═════",
                "",
                "Some bold text.",
                "",
                "• one",
                "• two",
                "",
                "  fn main() {}",
            ]
        );
    }

    #[test]
    fn test_rich_render_with_color_highlights_code() {
        let renderer = TerminalRenderer::new(RenderFormat::Rich, DEFAULT_THEME, true);
        let lines = renderer.markdown_lines("```rust\nlet x = 1;\n```").unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("\x1b[38;2;"));
        assert!(lines[0].ends_with("\x1b[0m"));
    }

    #[test]
    fn test_gutter_marks_each_kind() {
        let renderer = TerminalRenderer::new(RenderFormat::Plain, DEFAULT_THEME, false);
        assert_eq!(renderer.gutter(SegmentKind::Unchanged), "│");
        assert_eq!(renderer.gutter(SegmentKind::Removed), "-");
        assert_eq!(renderer.gutter(SegmentKind::Added), "+");
    }

    #[test]
    fn test_empty_segment_content_renders_bare_gutter() {
        let renderer = TerminalRenderer::new(RenderFormat::Rich, DEFAULT_THEME, false);
        let lines = renderer.markdown_lines("").unwrap();
        assert_eq!(lines, vec![String::new()]);
    }
}
