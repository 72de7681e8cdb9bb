//! Error and alert dialogs

use super::base::{dismiss_hint, render_dialog, DialogConfig};
use ratatui::{style::Color, Frame};

/// Failed submission; the form stays as it was
pub fn render_error_dialog(frame: &mut Frame, error_message: &str) {
    render_dialog(
        frame,
        DialogConfig {
            title: "Erro no envio",
            title_color: Color::Red,
            border_color: Color::Red,
            message: error_message,
            hint: Some(dismiss_hint()),
            max_width: 60,
        },
    );
}

/// Blocking notice raised by a failed submit check
pub fn render_alert_dialog(frame: &mut Frame, message: &str) {
    render_dialog(
        frame,
        DialogConfig {
            title: "Atenção",
            title_color: Color::Yellow,
            border_color: Color::Yellow,
            message,
            hint: Some(dismiss_hint()),
            max_width: 60,
        },
    );
}
