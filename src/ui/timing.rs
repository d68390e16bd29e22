use std::time::Instant;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{clamp_name, element_style};
use super::theme::Theme;
use crate::app::App;
use crate::session::{format_duration, format_secs};

const LOG_ROWS: usize = 12;

pub fn build_timing_text(app: &App, now: Instant) -> Text<'_> {
    let format = app.session.time_format;
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("  Total Time: ", Style::default().fg(Theme::dim())),
        Span::styled(
            format_duration(app.session.current_total_at(now), format),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(""));

    let elements = app.session.elements();
    if elements.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No elements to time.",
            Style::default().fg(Theme::dim()),
        )));
    }
    let active = app.session.active_element();
    for (index, name) in elements.iter().enumerate() {
        let selected = index == app.selected_element_index;
        let running = active == Some(name);
        let marker_style = if selected {
            Style::default().fg(Theme::selection_marker())
        } else {
            Style::default().fg(Theme::dim())
        };
        let mut spans = vec![
            Span::styled(if selected { "> " } else { "  " }, marker_style),
            Span::styled(format!("[{}] ", index + 1), Style::default().fg(Theme::dim())),
            Span::styled(name, element_style(app, name)),
        ];
        if running {
            spans.push(Span::styled(
                format!("  ● {}", format_duration(app.session.running_elapsed_at(now), format)),
                Style::default()
                    .fg(Theme::active())
                    .add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::from(spans));
    }

    if let Some(element) = active {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Currently Timing: ", Style::default().fg(Theme::dim())),
            Span::styled(
                element,
                element_style(app, element).add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    let log = app.session.log();
    if !log.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  Time Log ({} entries)", log.len()),
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {:>4} {:<24} {:>12} {:>14}", "#", "Element", "Duration (s)", "Time"),
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        )));
        let skip = log.len().saturating_sub(LOG_ROWS);
        for (index, entry) in log.iter().enumerate().skip(skip) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:>4} ", index + 1),
                    Style::default().fg(Theme::dim()),
                ),
                Span::styled(
                    clamp_name(&entry.element, 24),
                    element_style(app, &entry.element),
                ),
                Span::styled(
                    format!(" {:>12.3}", entry.duration_secs),
                    Style::default().fg(Theme::text()),
                ),
                Span::styled(
                    format!(" {:>14}", format_secs(entry.duration_secs, format)),
                    Style::default().fg(Theme::success()),
                ),
            ]));
        }
    }

    Text::from(lines)
}
