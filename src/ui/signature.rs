//! Signature pad rendering

use super::forms::{border_color, draw_error_line};
use super::layout::SIGNATURE_HEIGHT;
use crate::platform::CLEAR_SIGNATURE_SHORTCUT;
use crate::signature::{Segment, SignaturePad};
use crate::state::FormField;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders,
    },
    Frame,
};

/// Canvas line for a stroke segment. The surface has y growing downwards,
/// the canvas upwards.
fn canvas_line(segment: &Segment, height: f64) -> CanvasLine {
    CanvasLine::new(
        segment.from.x,
        height - segment.from.y,
        segment.to.x,
        height - segment.to.y,
        Color::White,
    )
}

pub fn draw_signature(
    frame: &mut Frame,
    slot: Rect,
    field: &FormField,
    pad: &SignaturePad,
    is_active: bool,
) {
    let area = Rect {
        height: SIGNATURE_HEIGHT.min(slot.height),
        ..slot
    };
    let width = f64::from(pad.width());
    let height = f64::from(pad.height());
    let blank = pad.is_blank();

    let block = Block::default()
        .title(format!(" {} * ", field.label))
        .title_bottom(Span::styled(
            format!(" {CLEAR_SIGNATURE_SHORTCUT}: limpar "),
            Style::default().fg(Color::DarkGray),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(field, is_active)));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for segment in pad.segments() {
                ctx.draw(&canvas_line(segment, height));
            }
            if blank {
                ctx.print(
                    width * 0.25,
                    height * 0.5,
                    Span::styled(
                        "Assine aqui arrastando o mouse",
                        Style::default().fg(Color::DarkGray),
                    ),
                );
            }
        });

    frame.render_widget(canvas, area);

    if let Some(error) = &field.error {
        draw_error_line(frame, slot, error);
    }
}
