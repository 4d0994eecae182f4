use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span, Text},
};
use serde_json::{Value, json};

use super::helpers::{PrintLayout, empty_line, hint_line, print_layout, step_cursor};
use crate::control::FieldControl;
use crate::domain::{ChoiceSet, FieldValue, PrintParams, ValueKind};
use crate::presentation::{ChoiceMarks, Markup, choice_lines};

pub const CHOICE_FIELD_TYPE: &str = "choice";
const CHOICE_KEY: &str = "choice";

/// Stored as `{"choice": "<id>"}`.
#[derive(Debug, Clone, Default)]
pub struct ChoiceControl {
    default_choices: Option<ChoiceSet>,
    choices: ChoiceSet,
    selected: Option<String>,
    cursor: usize,
}

impl ChoiceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_choices(mut self, choices: ChoiceSet) -> Self {
        self.default_choices = Some(choices);
        self
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: &str) -> bool {
        if self.selected.as_deref() == Some(id) {
            return false;
        }
        if let Some(idx) = self.choices.position(id) {
            self.cursor = idx;
        }
        self.selected = Some(id.to_string());
        true
    }

    fn draw(&self) -> Markup {
        let mut lines = choice_lines(
            &self.choices,
            ChoiceMarks::Radio,
            |id| self.selected.as_deref() == Some(id),
            Some(self.cursor),
        );
        lines.push(hint_line("(Up/Down move, Space selects)"));
        Text::from(lines)
    }
}

fn selected_id(value: Option<&FieldValue>) -> Option<String> {
    value?
        .get(CHOICE_KEY)?
        .as_str()
        .map(str::to_string)
}

impl FieldControl for ChoiceControl {
    fn field_type(&self) -> &str {
        CHOICE_FIELD_TYPE
    }

    fn title(&self) -> String {
        "Choice".to_string()
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Structured
    }

    fn default_choices(&self) -> Option<ChoiceSet> {
        self.default_choices.clone()
    }

    fn render_print(
        &self,
        _field_id: &str,
        value: Option<&FieldValue>,
        choices: &ChoiceSet,
        params: Option<&PrintParams>,
    ) -> Markup {
        let selected = selected_id(value);
        match print_layout(params) {
            PrintLayout::Inline => match selected {
                Some(id) => {
                    let label = choices
                        .choices
                        .iter()
                        .find(|choice| choice.id == id)
                        .map(|choice| choice.label().to_string())
                        .unwrap_or(id);
                    Text::from(Line::from(Span::styled(
                        label,
                        Style::default().fg(Color::White),
                    )))
                }
                None => Text::from(empty_line()),
            },
            PrintLayout::List => Text::from(choice_lines(
                choices,
                ChoiceMarks::Radio,
                |id| selected.as_deref() == Some(id),
                None,
            )),
        }
    }

    fn render_editor(
        &mut self,
        _field_id: &str,
        value: Option<&FieldValue>,
        choices: &ChoiceSet,
    ) -> Markup {
        self.choices = choices.clone();
        self.selected = selected_id(value);
        self.cursor = self
            .selected
            .as_deref()
            .and_then(|id| self.choices.position(id))
            .unwrap_or(0);
        self.draw()
    }

    fn redraw(&self, _field_id: &str) -> Option<Markup> {
        Some(self.draw())
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let len = self.choices.choices.len();
        if len == 0 {
            return false;
        }
        match key.code {
            KeyCode::Up | KeyCode::Left => {
                self.cursor = step_cursor(self.cursor, len, -1);
                true
            }
            KeyCode::Down | KeyCode::Right => {
                self.cursor = step_cursor(self.cursor, len, 1);
                true
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let id = self.choices.choices[self.cursor.min(len - 1)].id.clone();
                self.select(&id);
                true
            }
            _ => false,
        }
    }

    fn get_value(&self) -> String {
        match &self.selected {
            Some(id) => json!({ "choice": id }).to_string(),
            None => Value::Object(Default::default()).to_string(),
        }
    }

    fn is_same(&self, a: &FieldValue, b: &FieldValue) -> bool {
        a.get(CHOICE_KEY) == b.get(CHOICE_KEY)
    }

    fn set_value(&mut self, value: &str, _reset: bool) -> bool {
        let parsed = ValueKind::Structured.deserialize(value);
        match selected_id(parsed.as_ref()) {
            Some(id) => self.select(&id),
            None => self.selected.take().is_some(),
        }
    }
}
