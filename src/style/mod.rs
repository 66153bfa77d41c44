use colored::{Color, Colorize};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::config::{ColorsConfig, StatusStyles};

/// A terminal display style: either a foreground tint or a background tint.
///
/// Serialized in kebab-case so style tables can live in config files, e.g.
/// `post: on-bright-green`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    OnBlack,
    OnRed,
    OnGreen,
    OnYellow,
    OnBlue,
    OnMagenta,
    OnCyan,
    OnWhite,
    OnBrightBlack,
    OnBrightRed,
    OnBrightGreen,
    OnBrightYellow,
    OnBrightBlue,
    OnBrightMagenta,
    OnBrightCyan,
    OnBrightWhite,
}

impl Style {
    /// Renders `text` with this style applied. Whether escape codes are
    /// actually emitted is decided by `colored` (tty detection, NO_COLOR).
    pub fn paint(self, text: impl fmt::Display) -> String {
        let text = text.to_string();
        match self.terminal_color() {
            (color, false) => text.color(color).to_string(),
            (color, true) => text.on_color(color).to_string(),
        }
    }

    fn terminal_color(self) -> (Color, bool) {
        match self {
            Style::Black => (Color::Black, false),
            Style::Red => (Color::Red, false),
            Style::Green => (Color::Green, false),
            Style::Yellow => (Color::Yellow, false),
            Style::Blue => (Color::Blue, false),
            Style::Magenta => (Color::Magenta, false),
            Style::Cyan => (Color::Cyan, false),
            Style::White => (Color::White, false),
            Style::BrightBlack => (Color::BrightBlack, false),
            Style::BrightRed => (Color::BrightRed, false),
            Style::BrightGreen => (Color::BrightGreen, false),
            Style::BrightYellow => (Color::BrightYellow, false),
            Style::BrightBlue => (Color::BrightBlue, false),
            Style::BrightMagenta => (Color::BrightMagenta, false),
            Style::BrightCyan => (Color::BrightCyan, false),
            Style::BrightWhite => (Color::BrightWhite, false),
            Style::OnBlack => (Color::Black, true),
            Style::OnRed => (Color::Red, true),
            Style::OnGreen => (Color::Green, true),
            Style::OnYellow => (Color::Yellow, true),
            Style::OnBlue => (Color::Blue, true),
            Style::OnMagenta => (Color::Magenta, true),
            Style::OnCyan => (Color::Cyan, true),
            Style::OnWhite => (Color::White, true),
            Style::OnBrightBlack => (Color::BrightBlack, true),
            Style::OnBrightRed => (Color::BrightRed, true),
            Style::OnBrightGreen => (Color::BrightGreen, true),
            Style::OnBrightYellow => (Color::BrightYellow, true),
            Style::OnBrightBlue => (Color::BrightBlue, true),
            Style::OnBrightMagenta => (Color::BrightMagenta, true),
            Style::OnBrightCyan => (Color::BrightCyan, true),
            Style::OnBrightWhite => (Color::BrightWhite, true),
        }
    }
}

/// Underlines `text` (used for the request path in the main line).
pub fn underline(text: impl fmt::Display) -> String {
    text.to_string().underline().to_string()
}

/// Style used for any method not present in the configured table.
pub const DEFAULT_METHOD_STYLE: Style = Style::OnBrightWhite;

/// Default method style table, keyed by lowercase method name.
pub static DEFAULT_METHOD_STYLES: Lazy<HashMap<String, Style>> = Lazy::new(|| {
    HashMap::from([
        ("post".to_string(), Style::OnBrightGreen),
        ("get".to_string(), Style::OnBrightCyan),
        ("head".to_string(), Style::OnBrightBlack),
        ("put".to_string(), Style::OnBrightYellow),
        ("patch".to_string(), Style::OnBrightYellow),
        ("delete".to_string(), Style::OnBrightRed),
        ("connect".to_string(), Style::OnBrightWhite),
        ("options".to_string(), Style::OnBrightWhite),
        ("trace".to_string(), Style::OnBrightWhite),
    ])
});

/// Default status-class style table.
pub static DEFAULT_STATUS_STYLES: Lazy<StatusStyles> = Lazy::new(|| StatusStyles {
    informational: Style::BrightWhite,
    success: Style::BrightGreen,
    redirection: Style::BrightBlue,
    client_error: Style::BrightYellow,
    server_error: Style::BrightRed,
});

/// Looks up the display style for an HTTP method, case-insensitively.
/// Methods missing from the table get [`DEFAULT_METHOD_STYLE`].
pub fn style_for_method(method: &str, colors: &ColorsConfig) -> Style {
    colors
        .methods
        .get(&method.to_ascii_lowercase())
        .copied()
        .unwrap_or(DEFAULT_METHOD_STYLE)
}

/// Resolves the display style for a status code by class band.
///
/// Codes below zero do not fit any of the first four bands and land in the
/// server-error style, matching the band arithmetic of the status table.
pub fn style_for_status(code: i64, colors: &ColorsConfig) -> Style {
    let styles = &colors.status_code;
    if (0..200).contains(&code) {
        styles.informational
    } else if (200..300).contains(&code) {
        styles.success
    } else if (300..400).contains(&code) {
        styles.redirection
    } else if (400..500).contains(&code) {
        styles.client_error
    } else {
        styles.server_error
    }
}
