use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::domain::{ChoiceSet, ControlOptions};

/// Label line rendered above every control, read-only or not.
pub fn help_block(options: &ControlOptions) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::styled(options.field_label(), label_style)];
    if options.parameter.readonly {
        spans.push(Span::styled(
            "  (read only)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    vec![Line::from(spans)]
}

/// Wrap the help block and the control body into one container.
pub fn control_frame(help: Vec<Line<'static>>, body: &Text<'static>) -> Text<'static> {
    let mut lines = help;
    for line in &body.lines {
        let mut spans = vec![Span::raw("  ")];
        spans.extend(line.spans.iter().cloned());
        lines.push(Line::from(spans).style(line.style));
    }
    Text::from(lines)
}

/// Placeholder shown instead of a control whose choice set cannot be resolved.
pub fn config_error(field_id: &str) -> Text<'static> {
    misconfigured(field_id, "no options are defined")
}

/// Placeholder shown instead of a control whose options do not deserialize.
pub fn config_invalid(field_id: &str) -> Text<'static> {
    misconfigured(field_id, "the field parameters are invalid")
}

fn misconfigured(field_id: &str, reason: &str) -> Text<'static> {
    Text::from(Line::from(Span::styled(
        format!("field {field_id} is not (properly) configured: {reason}."),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )))
}

/// Free text wrapped to `width` columns.
pub fn value_lines(text: &str, width: usize, style: Style) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = wrap(text, width.max(4))
        .into_iter()
        .map(|segment| Line::from(Span::styled(segment.into_owned(), style)))
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(String::new(), style)));
    }
    lines
}

/// How a choice list marks its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMarks {
    /// `( )` / `(*)` markers.
    Radio,
    /// `[ ]` / `[x]` markers.
    Check,
}

impl ChoiceMarks {
    fn mark(self, active: bool) -> &'static str {
        match (self, active) {
            (ChoiceMarks::Radio, true) => "(*)",
            (ChoiceMarks::Radio, false) => "( )",
            (ChoiceMarks::Check, true) => "[x]",
            (ChoiceMarks::Check, false) => "[ ]",
        }
    }
}

/// One line per choice; labels are padded to a common display width so that
/// trailing ids line up. `cursor` highlights the focused entry of an editor.
pub fn choice_lines(
    choices: &ChoiceSet,
    marks: ChoiceMarks,
    is_active: impl Fn(&str) -> bool,
    cursor: Option<usize>,
) -> Vec<Line<'static>> {
    let label_width = choices
        .choices
        .iter()
        .map(|choice| UnicodeWidthStr::width(choice.label()))
        .max()
        .unwrap_or(0);
    choices
        .choices
        .iter()
        .enumerate()
        .map(|(idx, choice)| {
            let active = is_active(&choice.id);
            let focused = cursor == Some(idx);
            let mut label = choice.label().to_string();
            let mut width = UnicodeWidthStr::width(label.as_str());
            while width < label_width {
                label.push(' ');
                width += 1;
            }
            let style = match (focused, active) {
                (true, _) => Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::Gray),
            };
            let mut spans = vec![
                Span::styled(
                    if focused { "» " } else { "  " },
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("{} ", marks.mark(active)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(label, style),
            ];
            if choice.label.is_some() {
                spans.push(Span::styled(
                    format!("  {}", choice.id),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect()
}
