use ratatui::style::{Color, Modifier, Style};

use sheetreport_core::NoticeLevel;

/// Color theme for the TUI.
pub struct Theme {
    pub accent: Color,
    pub text: Color,
    pub dim: Color,
    pub disabled: Color,
    pub error: Color,
    pub info: Color,
    pub ok: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub focus_border: Color,
    pub highlight_bg: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    pub const NAMES: &'static [&'static str] = &["default", "mono"];

    /// Unknown names fall back to the default theme.
    pub fn from_name(name: &str) -> Self {
        match name {
            "mono" => Self::mono(),
            _ => Self::default_theme(),
        }
    }

    /// Teal accents on a dark terminal.
    pub fn default_theme() -> Self {
        Self {
            accent: Color::Rgb(0, 190, 170),
            text: Color::White,
            dim: Color::Rgb(120, 120, 135),
            disabled: Color::Rgb(70, 70, 80),
            error: Color::Rgb(255, 90, 90),
            info: Color::Rgb(90, 170, 255),
            ok: Color::Rgb(0, 200, 90),

            header_fg: Color::Black,
            header_bg: Color::Rgb(0, 190, 170),
            border: Color::Rgb(60, 60, 75),
            focus_border: Color::Rgb(0, 190, 170),
            highlight_bg: Color::Rgb(25, 55, 60),
            spinner: Color::Rgb(0, 190, 170),
            footer_fg: Color::Rgb(120, 120, 135),
            footer_bg: Color::Reset,
        }
    }

    /// No colors beyond the terminal's own; emphasis by modifiers only.
    pub fn mono() -> Self {
        Self {
            accent: Color::Reset,
            text: Color::Reset,
            dim: Color::Reset,
            disabled: Color::DarkGray,
            error: Color::Reset,
            info: Color::Reset,
            ok: Color::Reset,

            header_fg: Color::Reset,
            header_bg: Color::Reset,
            border: Color::Reset,
            focus_border: Color::Reset,
            highlight_bg: Color::Reset,
            spinner: Color::Reset,
            footer_fg: Color::Reset,
            footer_bg: Color::Reset,
        }
    }

    pub fn notice_color(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.info,
            NoticeLevel::Error => self.error,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD | self.reverse_mod())
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.focus_border)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn disabled_style(&self) -> Style {
        Style::default().fg(self.disabled).add_modifier(Modifier::DIM)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }

    /// Mono has no highlight color, so the selected row is shown reversed.
    fn reverse_mod(&self) -> Modifier {
        if self.highlight_bg == Color::Reset {
            Modifier::REVERSED
        } else {
            Modifier::empty()
        }
    }
}
