use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use serde_json::Value;

use super::fields::value_lines;
use crate::presentation::DEFAULT_WRAP_WIDTH;

/// Chrome rendered at the top of a settings page.
#[derive(Debug, Clone, Default)]
pub struct PageHeader<'a> {
    pub title: &'a str,
    pub help: Option<&'a str>,
    pub help_url: Option<&'a str>,
    pub show_advanced: bool,
}

pub fn page_header(header: &PageHeader<'_>) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(
        header.title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if header.show_advanced {
        title.push(Span::styled(
            "  [advanced]",
            Style::default().fg(Color::DarkGray),
        ));
    }
    let mut lines = vec![Line::from(title)];
    if let Some(help) = header.help.filter(|help| !help.is_empty()) {
        lines.extend(value_lines(
            help,
            DEFAULT_WRAP_WIDTH,
            Style::default().fg(Color::Gray),
        ));
    }
    if let Some(url) = header.help_url.filter(|url| !url.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("see {url}"),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        )));
    }
    lines
}

/// Generic `key: value` listing of a settings object.
pub fn settings_lines(settings: &Value) -> Vec<Line<'static>> {
    let key_style = Style::default().fg(Color::Yellow);
    match settings {
        Value::Object(map) if map.is_empty() => {
            vec![Line::from(Span::styled(
                "<no settings>",
                Style::default().fg(Color::DarkGray),
            ))]
        }
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                Line::from(vec![
                    Span::styled(format!("{key}: "), key_style),
                    Span::raw(rendered),
                ])
            })
            .collect(),
        other => vec![Line::from(other.to_string())],
    }
}
