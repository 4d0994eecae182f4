use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use crate::domain::PrintParams;

/// Print layout selected through the `class` print parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrintLayout {
    List,
    Inline,
}

pub(crate) fn print_layout(params: Option<&PrintParams>) -> PrintLayout {
    match params
        .and_then(|params| params.get("class"))
        .and_then(|class| class.as_str())
    {
        Some("inline") => PrintLayout::Inline,
        _ => PrintLayout::List,
    }
}

pub(crate) fn handle_text_edit(buffer: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return false;
            }
            buffer.push(ch);
            true
        }
        KeyCode::Backspace => {
            buffer.pop();
            true
        }
        KeyCode::Delete => {
            buffer.clear();
            true
        }
        _ => false,
    }
}

/// Move a list cursor by `delta`, wrapping at both ends.
pub(crate) fn step_cursor(cursor: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    let next = (cursor as i64 + delta as i64).rem_euclid(len);
    next as usize
}

pub(crate) fn hint_line(hint: &'static str) -> Line<'static> {
    Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))
}

pub(crate) fn empty_line() -> Line<'static> {
    Line::from(Span::styled("-", Style::default().fg(Color::DarkGray)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    #[test]
    fn cursor_wraps_both_ways() {
        assert_eq!(step_cursor(0, 3, -1), 2);
        assert_eq!(step_cursor(2, 3, 1), 0);
        assert_eq!(step_cursor(1, 0, 1), 0);
    }

    #[test]
    fn inline_class_selects_inline_layout() {
        let mut params = Map::new();
        params.insert("class".into(), json!("inline"));
        assert_eq!(print_layout(Some(&params)), PrintLayout::Inline);
        params.insert("class".into(), json!(""));
        assert_eq!(print_layout(Some(&params)), PrintLayout::List);
        assert_eq!(print_layout(None), PrintLayout::List);
    }

    #[test]
    fn control_chars_are_not_inserted() {
        let mut buffer = String::from("ab");
        let key = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(!handle_text_edit(&mut buffer, &key));
        assert!(handle_text_edit(
            &mut buffer,
            &KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)
        ));
        assert_eq!(buffer, "a");
    }
}
