use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;
use crate::app::App;
use crate::types::Shift;

pub fn build_setup_text(app: &App) -> Text<'_> {
    let mut lines = vec![Line::from(Span::styled(
        "  Please enter project name and shift to begin.",
        Style::default().fg(Theme::dim()),
    ))];
    lines.push(Line::from(""));

    if app.session.project_name().is_empty() {
        lines.push(Line::from(Span::styled(
            "  Enter Project Name",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled("  > ", Style::default().fg(Theme::selection_marker())),
            Span::styled(app.input.as_str(), Style::default().fg(Theme::text())),
            Span::styled("_", Style::default().fg(Theme::highlight())),
        ]));
        if !app.known_projects.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Known projects (Tab to fill in)",
                Style::default().fg(Theme::dim()),
            )));
            for project in &app.known_projects {
                let selected = *project == app.input;
                let style = if selected {
                    Style::default()
                        .fg(Theme::highlight())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Theme::text())
                };
                lines.push(Line::from(vec![
                    Span::styled("  • ", Style::default().fg(Theme::dim())),
                    Span::styled(project.as_str(), style),
                ]));
            }
        }
    } else {
        lines.push(Line::from(vec![
            Span::styled("  Project: ", Style::default().fg(Theme::dim())),
            Span::styled(
                app.session.project_name(),
                Style::default()
                    .fg(Theme::text())
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Select Shift",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        )));
        for (index, shift) in Shift::ALL.iter().enumerate() {
            let selected = index == app.selected_shift_index;
            let marker_style = if selected {
                Style::default()
                    .fg(Theme::selection_marker())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::dim())
            };
            let name_style = if selected {
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::text())
            };
            lines.push(Line::from(vec![
                Span::styled(if selected { "  > " } else { "    " }, marker_style),
                Span::styled(shift.label(), name_style),
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
