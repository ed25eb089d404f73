use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::theme::Theme;

/// Render markdown into styled lines for the secondary pane. Only the
/// constructs the pane uses are styled: headings, lists, emphasis and
/// inline code.
pub fn render_markdown(input: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut out = LineBuilder::default();
    let mut list_depth: usize = 0;
    let mut styles: Vec<Style> = Vec::new();

    for event in Parser::new(input) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                out.blank();
                let mark = match level {
                    HeadingLevel::H1 => "",
                    HeadingLevel::H2 => "» ",
                    _ => "· ",
                };
                styles.push(theme.heading);
                out.push(mark, theme.heading);
            }
            Event::End(TagEnd::Heading(_)) => {
                styles.pop();
                out.finish();
                out.blank();
            }
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    out.blank();
                }
            }
            Event::Start(Tag::Item) => {
                out.finish();
                out.push(&"  ".repeat(list_depth.saturating_sub(1)), Style::default());
                out.push("• ", theme.bullet);
            }
            Event::End(TagEnd::Item) => out.finish(),
            Event::Start(Tag::Strong) => {
                styles.push(current(&styles).add_modifier(Modifier::BOLD));
            }
            Event::Start(Tag::Emphasis) => styles.push(theme.emphasis),
            Event::End(TagEnd::Strong) | Event::End(TagEnd::Emphasis) => {
                styles.pop();
            }
            Event::End(TagEnd::Paragraph) => {
                out.finish();
                out.blank();
            }
            Event::Text(t) => out.push(&t, current(&styles)),
            Event::Code(t) => out.push(&t, theme.code),
            Event::SoftBreak | Event::HardBreak => out.finish(),
            Event::Rule => {
                out.finish();
                out.push("───", theme.bullet);
                out.finish();
            }
            _ => {}
        }
    }
    out.finish();
    out.into_lines()
}

fn current(styles: &[Style]) -> Style {
    styles.last().copied().unwrap_or_default()
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
}

impl LineBuilder {
    fn push(&mut self, text: &str, style: Style) {
        if !text.is_empty() {
            self.spans.push(Span::styled(text.to_string(), style));
        }
    }

    fn finish(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    /// Separate blocks by one empty line, never more.
    fn blank(&mut self) {
        self.finish();
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn into_lines(mut self) -> Vec<Line<'static>> {
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}
