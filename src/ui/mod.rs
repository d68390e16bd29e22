mod elements;
mod help;
mod helpers;
mod setup;
mod theme;
mod timing;

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::session::{Screen, TimerState, format_duration};
use helpers::{element_style, rounded_block};
use theme::Theme;

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let now = Instant::now();
    let area = frame.area();
    let screen = app.session.screen();
    let (title, body_text) = match screen {
        Screen::Setup => (" Setup ", setup::build_setup_text(app)),
        Screen::Elements => (" Work Elements ", elements::build_elements_text(app)),
        Screen::Timing => (" Timing ", timing::build_timing_text(app, now)),
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let header = Paragraph::new(Text::from(header_line(app)))
        .alignment(Alignment::Left)
        .block(rounded_block());
    frame.render_widget(header, layout[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(layout[1]);

    let mut body_lines = vec![
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    body_lines.extend(body_text.lines);
    body_lines.push(Line::from(""));
    body_lines.push(Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(Theme::dim()),
    )));
    body_lines.extend(keybinds_lines(app, screen));
    let body = Paragraph::new(Text::from(body_lines))
        .style(Style::default().fg(Theme::text()))
        .alignment(Alignment::Left)
        .block(rounded_block());
    frame.render_widget(body, columns[0]);

    let sidebar = Paragraph::new(settings_text(app))
        .wrap(Wrap { trim: false })
        .block(rounded_block().title(" Settings "));
    frame.render_widget(sidebar, columns[1]);

    let footer = Paragraph::new(Text::from(footer_line(app, now)))
        .alignment(Alignment::Left)
        .block(rounded_block());
    frame.render_widget(footer, layout[2]);

    if app.show_help {
        render_help_popup(frame, app);
    }
    if let Some(popup) = &app.confirm_popup {
        render_confirm_popup(frame, popup);
    }
}

fn header_line(app: &App) -> Line<'_> {
    let mut spans = vec![
        Span::styled(
            "  Timestudy  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        Span::styled(
            "cyclic work measurement",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        ),
    ];
    let project = app.session.project_name();
    if !project.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            project,
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(shift) = app.session.shift() {
        spans.push(Span::styled(
            format!("  {shift}"),
            Style::default().fg(Theme::accent()),
        ));
    }
    Line::from(spans)
}

fn settings_text(app: &App) -> Text<'_> {
    let label = Style::default().fg(Theme::dim());
    let value = Style::default()
        .fg(Theme::text())
        .add_modifier(Modifier::BOLD);
    let hint = |text: &'static str| {
        if app.settings_keys_active() {
            Line::from(Span::styled(text, label))
        } else {
            Line::from("")
        }
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Time format ", label),
            Span::styled(app.session.time_format.label(), value),
        ]),
        hint("  f: toggle"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Save mode   ", label),
            Span::styled(app.session.save_mode.label(), value),
        ]),
        hint("  m: toggle"),
        Line::from(""),
        Line::from(Span::styled("Log file", label)),
    ];
    let file = app
        .log_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(no project yet)".to_string());
    lines.push(Line::from(Span::styled(
        file,
        Style::default().fg(Theme::accent()),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Autosave    ", label),
        Span::styled(
            match (app.config.autosave, app.autosave_suspended) {
                (true, true) => "paused",
                (true, false) => "on",
                (false, _) => "off",
            },
            value,
        ),
    ]));
    Text::from(lines)
}

fn footer_line(app: &App, now: Instant) -> Line<'_> {
    let format = app.session.time_format;
    let total = format_duration(app.session.current_total_at(now), format);
    match app.session.timer() {
        TimerState::Running { element, .. } => {
            let elapsed = format_duration(app.session.running_elapsed_at(now), format);
            // Animated indicator that cycles with the redraws
            let animation_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let anim_index = (chrono::Local::now().timestamp_subsec_millis() / 100) as usize
                % animation_chars.len();
            Line::from(vec![
                Span::styled(
                    format!("{} ", animation_chars[anim_index]),
                    Style::default()
                        .fg(Theme::active())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{element} > "), element_style(app, element)),
                Span::styled(
                    format!("Running {elapsed}"),
                    Style::default()
                        .fg(Theme::active())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("   Total {total}"), Style::default().fg(Theme::accent())),
            ])
        }
        TimerState::Idle => match &app.status {
            Some(status) => Line::from(Span::styled(
                status.as_str(),
                Style::default().fg(Theme::warn()),
            )),
            None => Line::from(vec![
                Span::styled("● No element running", Style::default().fg(Theme::dim())),
                Span::styled(format!("   Total {total}"), Style::default().fg(Theme::accent())),
            ]),
        },
    }
}

fn keybinds_lines(app: &App, screen: Screen) -> Vec<Line<'static>> {
    let (primary, secondary) = match screen {
        Screen::Setup if app.session.project_name().is_empty() => (
            "Type project name  Enter: Confirm  Tab: Known projects",
            "esc: Quit",
        ),
        Screen::Setup => (
            "Up/Down: Select shift  1-3: Pick  Enter: Confirm",
            "f/m: Settings  ?: Help  q: Quit",
        ),
        Screen::Elements if app.element_input_active => (
            "Type element name  Enter: Add",
            "esc: Done adding",
        ),
        Screen::Elements => (
            "a: Add element  d: Remove selected  Up/Down: Select  n: Next",
            "f/m: Settings  ?: Help  q: Quit",
        ),
        Screen::Timing => (
            "Enter/space: Start selected  1-9: Start  s: Stop  x: Export  R: Reset",
            "f/m: Settings  ?: Help  q: Quit",
        ),
    };
    vec![
        Line::from(Span::styled(primary, Style::default().fg(Theme::highlight()))),
        Line::from(Span::styled(secondary, Style::default().fg(Theme::dim()))),
    ]
}

fn render_help_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(help::build_help_text(app))
        .alignment(Alignment::Left)
        .block(rounded_block().title(" Help "));
    frame.render_widget(popup, area);
}

fn render_confirm_popup(frame: &mut Frame, popup: &crate::app::ConfirmPopup) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "Confirm Action",
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            popup.message.as_str(),
            Style::default().fg(Theme::text()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Theme::dim())),
            Span::styled(
                "Y",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to confirm or ", Style::default().fg(Theme::dim())),
            Span::styled(
                "N",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("/", Style::default().fg(Theme::dim())),
            Span::styled(
                "ESC",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to cancel", Style::default().fg(Theme::dim())),
        ]),
    ];

    let popup_widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(rounded_block().title(" Confirm "));
    frame.render_widget(popup_widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::Shift;
    use ratatui::{Terminal, backend::TestBackend};

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn each_screen_renders() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Config::default(), dir.path().to_path_buf());
        let screen = rendered(&app);
        assert!(screen.contains("Enter Project Name"));
        assert!(!screen.contains("f: toggle"));

        app.prefill(Some("Assembly".into()), Some(Shift::Shift2));
        app.session.add_element("Pick").unwrap();
        let screen = rendered(&app);
        assert!(screen.contains("Current Elements"));
        assert!(screen.contains("f: toggle"));
        assert!(screen.contains("Pick"));

        app.session.proceed().unwrap();
        app.session.start(0).unwrap();
        let screen = rendered(&app);
        assert!(screen.contains("Currently Timing"));
        assert!(screen.contains("Running"));
    }

    #[test]
    fn popups_render_over_the_body() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Config::default(), dir.path().to_path_buf());
        app.show_help = true;
        assert!(rendered(&app).contains("Key bindings"));
        app.show_help = false;
        app.confirm_popup = Some(crate::app::ConfirmPopup {
            message: "Reset?".into(),
            action: crate::app::ConfirmAction::ResetLog,
        });
        assert!(rendered(&app).contains("Confirm Action"));
    }
}
