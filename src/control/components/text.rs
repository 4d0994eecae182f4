use crossterm::event::KeyEvent;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use super::helpers::{empty_line, handle_text_edit};
use crate::control::FieldControl;
use crate::domain::{ChoiceSet, FieldValue, PrintParams, ValueKind};
use crate::presentation::{DEFAULT_WRAP_WIDTH, Markup, value_lines};

pub const TEXT_FIELD_TYPE: &str = "text";

#[derive(Debug, Clone, Default)]
pub struct TextControl {
    buffer: String,
}

impl TextControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    fn draw(&self) -> Markup {
        let wrapped = value_lines(&self.buffer, DEFAULT_WRAP_WIDTH, Style::default());
        let inner_width = wrapped
            .iter()
            .map(|line| UnicodeWidthStr::width(line_text(line).as_str()))
            .max()
            .unwrap_or(0);
        let border_style = Style::default().fg(Color::Yellow);
        let value_style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let border_line = "─".repeat(inner_width.saturating_add(2));

        let mut lines = vec![Line::from(Span::styled(
            format!("┌{border_line}┐"),
            border_style,
        ))];
        for line in &wrapped {
            let mut content = line_text(line);
            let mut width = UnicodeWidthStr::width(content.as_str());
            while width < inner_width {
                content.push(' ');
                width += 1;
            }
            lines.push(Line::from(vec![
                Span::styled("│ ", border_style),
                Span::styled(content, value_style),
                Span::styled(" │", border_style),
            ]));
        }
        lines.push(Line::from(Span::styled(
            format!("└{border_line}┘"),
            border_style,
        )));
        Text::from(lines)
    }
}

fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn scalar_text(value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::Scalar(Value::String(text))) => text.clone(),
        Some(FieldValue::Scalar(other)) => other.to_string(),
        _ => String::new(),
    }
}

impl FieldControl for TextControl {
    fn field_type(&self) -> &str {
        TEXT_FIELD_TYPE
    }

    fn title(&self) -> String {
        "Text".to_string()
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Scalar
    }

    fn default_choices(&self) -> Option<ChoiceSet> {
        Some(ChoiceSet::default())
    }

    fn render_print(
        &self,
        _field_id: &str,
        value: Option<&FieldValue>,
        _choices: &ChoiceSet,
        params: Option<&PrintParams>,
    ) -> Markup {
        let text = scalar_text(value);
        if text.is_empty() {
            return Text::from(empty_line());
        }
        let width = params
            .and_then(|params| params.get("width"))
            .and_then(Value::as_u64)
            .map(|width| width as usize)
            .unwrap_or(DEFAULT_WRAP_WIDTH);
        Text::from(value_lines(&text, width, Style::default().fg(Color::White)))
    }

    fn render_editor(
        &mut self,
        _field_id: &str,
        value: Option<&FieldValue>,
        _choices: &ChoiceSet,
    ) -> Markup {
        self.buffer = scalar_text(value);
        self.draw()
    }

    fn redraw(&self, _field_id: &str) -> Option<Markup> {
        Some(self.draw())
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        handle_text_edit(&mut self.buffer, key)
    }

    fn get_value(&self) -> String {
        Value::String(self.buffer.clone()).to_string()
    }

    fn is_same(&self, a: &FieldValue, b: &FieldValue) -> bool {
        scalar_text(Some(a)) == scalar_text(Some(b))
    }

    fn set_value(&mut self, value: &str, _reset: bool) -> bool {
        let next = match ValueKind::Scalar.deserialize(value) {
            Some(parsed) => scalar_text(Some(&parsed)),
            None => value.to_string(),
        };
        if next == self.buffer {
            return false;
        }
        self.buffer = next;
        true
    }
}
