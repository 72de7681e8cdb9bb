//! Loading overlay shown while a submission is in flight

use super::base::{render_dialog, DialogConfig};
use ratatui::{style::Color, Frame};
use std::time::Duration;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const FRAME_TIME: Duration = Duration::from_millis(120);

/// Spinner glyph for the time elapsed since loading started
fn spinner_frame(elapsed: Duration) -> &'static str {
    let step = (elapsed.as_millis() / FRAME_TIME.as_millis()) as usize;
    SPINNER[step % SPINNER.len()]
}

pub fn render_loading(frame: &mut Frame, elapsed: Duration) {
    let message = format!("{} Enviando formulário...", spinner_frame(elapsed));
    render_dialog(
        frame,
        DialogConfig {
            title: "Aguarde",
            title_color: Color::Cyan,
            border_color: Color::Cyan,
            message: &message,
            hint: None,
            max_width: 40,
        },
    );
}
