//! Success dialog component

use super::base::{dismiss_hint, render_dialog, DialogConfig};
use ratatui::{style::Color, Frame};

const SUCCESS_MESSAGE: &str = "Obrigado! Sua ficha de anamnese foi enviada com sucesso.\n\
    O formulário será reiniciado em instantes.";

pub fn render_success_dialog(frame: &mut Frame) {
    render_dialog(
        frame,
        DialogConfig {
            title: "Formulário enviado",
            title_color: Color::Green,
            border_color: Color::Green,
            message: SUCCESS_MESSAGE,
            hint: Some(dismiss_hint()),
            max_width: 64,
        },
    );
}
