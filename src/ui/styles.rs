use ratatui::style::{Color, Modifier, Style};

// Color palette
pub const PRIMARY: Color = Color::Rgb(25, 118, 210);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn button_style(enabled: bool, focused: bool) -> Style {
    if !enabled {
        Style::default().fg(MUTED)
    } else if focused {
        Style::default()
            .fg(Color::White)
            .bg(PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}
