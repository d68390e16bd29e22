use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::element_style;
use super::theme::Theme;
use crate::app::App;

pub fn build_elements_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "  Add a New Work Element",
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    )));
    if app.element_input_active {
        lines.push(Line::from(vec![
            Span::styled("  Element name: ", Style::default().fg(Theme::dim())),
            Span::styled(app.input.as_str(), Style::default().fg(Theme::text())),
            Span::styled("_", Style::default().fg(Theme::highlight())),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "  Press 'a' to add an element.",
            Style::default().fg(Theme::dim()),
        )));
    }
    lines.push(Line::from(""));

    let elements = app.session.elements();
    if elements.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No elements yet. Timing can start without any.",
            Style::default().fg(Theme::dim()),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  Current Elements",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        )));
        for (index, name) in elements.iter().enumerate() {
            let selected = !app.element_input_active && index == app.selected_element_index;
            let marker_style = if selected {
                Style::default().fg(Theme::selection_marker())
            } else {
                Style::default().fg(Theme::dim())
            };
            let mut name_style = element_style(app, name);
            if selected {
                name_style = name_style.add_modifier(Modifier::UNDERLINED);
            }
            lines.push(Line::from(vec![
                Span::styled(if selected { "> " } else { "  " }, marker_style),
                Span::styled(format!("{}. ", index + 1), Style::default().fg(Theme::dim())),
                Span::styled(name, name_style),
            ]));
        }
    }

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {status}"),
            Style::default().fg(Theme::warn()),
        )));
    }
    Text::from(lines)
}
