//! Dark palette for the form.

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(0x1e, 0x1e, 0x1e);
pub const TEXT: Color = Color::Rgb(0xf0, 0xf0, 0xf0);
pub const BUTTON: Color = Color::Rgb(0x44, 0x44, 0x44);
pub const MUTED: Color = Color::Rgb(0x99, 0x99, 0x99);
pub const ACCENT: Color = Color::Rgb(0xd4, 0xbf, 0xff);
pub const SUCCESS: Color = Color::Rgb(0x3d, 0xd6, 0x8c);
pub const FAILURE: Color = Color::Rgb(0xff, 0x6b, 0x6b);
pub const WARNING: Color = Color::Rgb(0xf0, 0xa5, 0x00);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BACKGROUND)
}

pub fn muted() -> Style {
    base().fg(MUTED)
}

pub fn title() -> Style {
    base().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn highlight() -> Style {
    Style::default().fg(BACKGROUND).bg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn button() -> Style {
    Style::default().fg(Color::White).bg(BUTTON).add_modifier(Modifier::BOLD)
}
