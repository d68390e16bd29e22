use ratatui::{
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders},
};

use super::theme::Theme;
use crate::app::App;
use crate::types::Rgb;

pub fn clamp_name(value: &str, width: usize) -> String {
    let value_len = value.chars().count();
    if value_len <= width {
        return format!("{value:<width$}", width = width);
    }
    let trimmed = value
        .chars()
        .take(width.saturating_sub(2))
        .collect::<String>();
    format!("{trimmed}..")
}

pub fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Bold text in the element's assigned color, plain text for unknown names.
pub fn element_style(app: &App, element: &str) -> Style {
    match app.session.elements().color_of(element) {
        Some(rgb) => Style::default()
            .fg(rgb_to_color(rgb))
            .add_modifier(Modifier::BOLD),
        None => Style::default().fg(Theme::text()),
    }
}

pub fn rounded_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Theme::secondary()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_name_pads_and_truncates() {
        assert_eq!(clamp_name("Pick", 6), "Pick  ");
        assert_eq!(clamp_name("Inspection", 6), "Insp..");
    }
}
