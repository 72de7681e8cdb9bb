//! Field rendering utilities for forms

use crate::state::{FieldKind, FormField, ValidationState};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Border color: errors win over focus, focus over success
pub fn border_color(field: &FormField, is_active: bool) -> Color {
    match (field.validation, is_active) {
        (ValidationState::Invalid, _) => Color::Red,
        (_, true) => Color::Cyan,
        (ValidationState::Valid, false) => Color::Green,
        (ValidationState::Neutral, false) => Color::DarkGray,
    }
}

/// Field title, with a marker on required fields
pub fn field_title(field: &FormField) -> String {
    if field.is_required {
        format!(" {} * ", field.label)
    } else {
        format!(" {} ", field.label)
    }
}

/// Text shown for an empty field
fn empty_hint(field: &FormField) -> &'static str {
    match field.kind {
        FieldKind::Masked(mask) => mask.placeholder(),
        FieldKind::Choice => "( ) Sim  ( ) Não",
        FieldKind::Checkbox => "[ ]",
        _ => "(vazio)",
    }
}

/// Draw a field box in `slot`, with its inline error on the last row
pub fn draw_field(frame: &mut Frame, slot: Rect, field: &FormField, is_active: bool) {
    let box_area = match field.error {
        Some(_) => Rect {
            height: slot.height.saturating_sub(1),
            ..slot
        },
        None => slot,
    };

    let value_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let cursor_style = Style::default().fg(Color::Cyan);
    let cursor = if is_active && field.kind != FieldKind::Signature {
        "▌"
    } else {
        ""
    };

    let display_value = field.display_value();
    let content = if field.is_empty() && field.kind != FieldKind::Signature {
        Paragraph::new(Line::from(vec![
            Span::styled(empty_hint(field), Style::default().fg(Color::DarkGray)),
            Span::styled(cursor, cursor_style),
        ]))
    } else if field.is_multiline() {
        let mut lines: Vec<Line> = display_value
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), value_style)))
            .collect();
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled(cursor, cursor_style));
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display_value, value_style),
            Span::styled(cursor, cursor_style),
        ]))
    };

    let block = Block::default()
        .title(field_title(field))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(field, is_active)));

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), box_area);

    if let Some(error) = &field.error {
        draw_error_line(frame, slot, error);
    }
}

/// Inline error directly under a field
pub fn draw_error_line(frame: &mut Frame, slot: Rect, error: &str) {
    let line_area = Rect {
        x: slot.x + 1,
        y: slot.bottom().saturating_sub(1),
        width: slot.width.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("✖ {error}"),
            Style::default().fg(Color::Red),
        )),
        line_area,
    );
}
