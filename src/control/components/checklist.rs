use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span, Text},
};
use serde_json::Value;

use super::helpers::{PrintLayout, empty_line, hint_line, print_layout, step_cursor};
use crate::control::FieldControl;
use crate::domain::{ChoiceSet, FieldValue, PrintParams, ValueKind};
use crate::presentation::{ChoiceMarks, Markup, choice_lines};

pub const CHECKLIST_FIELD_TYPE: &str = "checklist";

/// Stored as `["a", "b"]`; member order carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct ChecklistControl {
    default_choices: Option<ChoiceSet>,
    choices: ChoiceSet,
    selected: Vec<String>,
    cursor: usize,
}

impl ChecklistControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_choices(mut self, choices: ChoiceSet) -> Self {
        self.default_choices = Some(choices);
        self
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(idx) = self.selected.iter().position(|item| item == id) {
            self.selected.remove(idx);
        } else {
            self.selected.push(id.to_string());
        }
    }

    // unknown ids go last, in selection order
    fn ordered(&self) -> Vec<String> {
        let mut ordered: Vec<String> = self
            .choices
            .choices
            .iter()
            .filter(|choice| self.selected.contains(&choice.id))
            .map(|choice| choice.id.clone())
            .collect();
        for id in &self.selected {
            if !ordered.contains(id) {
                ordered.push(id.clone());
            }
        }
        ordered
    }

    fn draw(&self) -> Markup {
        let mut lines = choice_lines(
            &self.choices,
            ChoiceMarks::Check,
            |id| self.selected.iter().any(|item| item == id),
            Some(self.cursor),
        );
        lines.push(hint_line("(Up/Down move, Space toggles)"));
        Text::from(lines)
    }
}

fn selected_ids(value: Option<&FieldValue>) -> Vec<String> {
    value
        .and_then(FieldValue::as_list)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn member_set(value: &FieldValue) -> BTreeSet<String> {
    selected_ids(Some(value)).into_iter().collect()
}

impl FieldControl for ChecklistControl {
    fn field_type(&self) -> &str {
        CHECKLIST_FIELD_TYPE
    }

    fn title(&self) -> String {
        "Checklist".to_string()
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::List
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
        let selected = selected_ids(value);
        match print_layout(params) {
            PrintLayout::Inline if selected.is_empty() => Text::from(empty_line()),
            PrintLayout::Inline => {
                let labels = selected
                    .iter()
                    .map(|id| {
                        choices
                            .choices
                            .iter()
                            .find(|choice| &choice.id == id)
                            .map(|choice| choice.label().to_string())
                            .unwrap_or_else(|| id.clone())
                    })
                    .collect::<Vec<_>>();
                Text::from(Line::from(Span::styled(
                    labels.join(", "),
                    Style::default().fg(Color::White),
                )))
            }
            PrintLayout::List => Text::from(choice_lines(
                choices,
                ChoiceMarks::Check,
                |id| selected.iter().any(|item| item == id),
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
        self.selected = selected_ids(value);
        self.cursor = 0;
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
                self.toggle(&id);
                true
            }
            _ => false,
        }
    }

    fn get_value(&self) -> String {
        Value::Array(self.ordered().into_iter().map(Value::String).collect()).to_string()
    }

    fn is_same(&self, a: &FieldValue, b: &FieldValue) -> bool {
        member_set(a) == member_set(b)
    }

    fn set_value(&mut self, value: &str, _reset: bool) -> bool {
        let next = selected_ids(ValueKind::List.deserialize(value).as_ref());
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Choice;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn choices() -> ChoiceSet {
        ChoiceSet::new(vec![
            Choice::new("a", "Apple"),
            Choice::new("b", "Banana"),
            Choice::new("c", "Cherry"),
        ])
    }

    #[test]
    fn equality_ignores_order() {
        let control = ChecklistControl::new();
        let left = ValueKind::List.decode(json!(["a", "b"])).unwrap();
        let right = ValueKind::List.decode(json!(["b", "a"])).unwrap();
        let other = ValueKind::List.decode(json!(["a"])).unwrap();
        assert!(control.is_same(&left, &right));
        assert!(!control.is_same(&left, &other));
    }

    #[test]
    fn value_follows_choice_order() {
        let mut control = ChecklistControl::new();
        let seeded = ValueKind::List.decode(json!(["c"])).unwrap();
        control.render_editor("5", Some(&seeded), &choices());
        assert!(control.handle_key(&KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(control.get_value(), "[\"a\",\"c\"]");
    }

    #[test]
    fn toggling_twice_restores_selection() {
        let mut control = ChecklistControl::new();
        control.render_editor("5", None, &choices());
        control.toggle("b");
        control.toggle("b");
        assert!(control.selected().is_empty());
    }
}
