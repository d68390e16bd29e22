use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;
use crate::app::App;

pub fn build_help_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Key bindings",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(section_title("Global"));
    lines.extend(section_lines(&[
        "q: Quit",
        "?: Toggle help",
        "f: Toggle time format (MM:SS / HH:MM:SS)",
        "m: Toggle save mode (single file / per day)",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Setup"));
    lines.extend(section_lines(&[
        "Type the project name, Enter to confirm",
        "Tab: Fill in a known project",
        "Up/Down or 1-3: Choose shift, Enter to confirm",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Elements"));
    lines.extend(section_lines(&[
        "a: Add element (Enter adds, Esc closes)",
        "d: Remove selected element",
        "n: Next, start timing",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Timing"));
    lines.extend(section_lines(&[
        "Enter/space: Start selected element",
        "1-9: Start element by number",
        "s: Stop running element",
        "x: Export log",
        "R: Reset timer and clear data",
    ]));

    if let Some(path) = app.log_path() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  Log file: {}", path.display()),
            Style::default().fg(Theme::dim()),
        )));
    }

    Text::from(lines)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(Theme::text()),
            ))
        })
        .collect()
}
