// standalone two-panel HTML page for reviewing in a browser

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use pulldown_cmark_escape::{escape_html, FmtWriter};
use std::fmt::Write as _;
use syntect::html::highlighted_html_for_string;

use super::{Highlighter, RenderError, Renderer, ReviewView};
use crate::model::{RenderFormat, SegmentKind};

const STYLES: &str = r#"
body { margin: 0; background: #0d1117; color: #c9d1d9; font-family: -apple-system, "Segoe UI", sans-serif; }
.container { display: flex; gap: 24px; padding: 24px; }
.panel { flex: 1; min-width: 0; background: #11151b; border: 1px solid #30363d; border-radius: 12px; overflow: hidden; }
.panel-header { margin: 0; padding: 10px 18px; background: #161b22; border-bottom: 1px solid #30363d; font-size: 1rem; }
.panel-body { padding: 12px 18px; }
.segment { padding: 2px 8px; border-left: 3px solid transparent; }
.segment-removed { background: rgba(248, 81, 73, 0.15); border-left-color: #f85149; }
.segment-added { background: rgba(63, 185, 80, 0.15); border-left-color: #3fb950; }
.segment pre { white-space: pre-wrap; margin: 0; }
"#;

pub struct HtmlRenderer {
    format: RenderFormat,
    highlighter: Highlighter,
}

impl HtmlRenderer {
    pub fn new(format: RenderFormat, theme: &str) -> Self {
        Self {
            format,
            highlighter: Highlighter::new(theme),
        }
    }

    fn segment_body(&self, content: &str) -> Result<String, RenderError> {
        match self.format {
            RenderFormat::Plain => Ok(format!("<pre>{}</pre>", escaped(content)?)),
            RenderFormat::Rich => self.markdown_html(content),
        }
    }

    /// Markdown to HTML, with fenced code swapped for highlighted markup
    fn markdown_html(&self, source: &str) -> Result<String, RenderError> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut events: Vec<Event<'_>> = Vec::new();
        let mut code: Option<(String, String)> = None;

        for event in Parser::new_ext(source, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => lang.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code = Some((lang, String::new()));
                }
                Event::Text(text) if code.is_some() => {
                    if let Some((_, buf)) = code.as_mut() {
                        buf.push_str(&text);
                    }
                }
                // raw HTML in the document is shown, never interpreted
                Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, buf)) = code.take() {
                        let syntax = self.highlighter.syntax_for(&lang);
                        let highlighted = highlighted_html_for_string(
                            &buf,
                            &self.highlighter.syntax_set,
                            syntax,
                            &self.highlighter.theme,
                        )?;
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                other => events.push(other),
            }
        }

        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, view: &ReviewView<'_>) -> Result<String, RenderError> {
        let mut out = String::new();
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>Documentation review</title>")?;
        writeln!(out, "<style>{}</style>", STYLES)?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<div class=\"container\">")?;

        for ((title, segments), side) in view.panes().into_iter().zip(["left", "right"]) {
            writeln!(out, "<div class=\"panel panel-{}\">", side)?;
            writeln!(out, "<h3 class=\"panel-header\">{}</h3>", escaped(title)?)?;
            writeln!(out, "<div class=\"panel-body\">")?;
            for segment in segments {
                writeln!(
                    out,
                    "<div class=\"segment segment-{}\">{}</div>",
                    kind_class(segment.kind),
                    self.segment_body(&segment.content())?
                )?;
            }
            writeln!(out, "</div>")?;
            writeln!(out, "</div>")?;
        }

        writeln!(out, "</div>")?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        Ok(out)
    }
}

fn kind_class(kind: SegmentKind) -> &'static str {
    match kind {
        SegmentKind::Unchanged => "unchanged",
        SegmentKind::Removed => "removed",
        SegmentKind::Added => "added",
    }
}

fn escaped(text: &str) -> Result<String, RenderError> {
    let mut out = String::with_capacity(text.len());
    escape_html(FmtWriter(&mut out), text)?;
    Ok(out)
}
