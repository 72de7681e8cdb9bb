//! Active section of the form

use super::field_renderer::draw_field;
use crate::app::App;
use crate::state::{FieldKind, Form};
use crate::ui::layout::FormLayout;
use crate::ui::signature::draw_signature;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
    Frame,
};

pub fn draw_section(frame: &mut Frame, app: &App, layout: &FormLayout) {
    let controller = &app.controller;
    let form = controller.form();
    let title = form
        .active_section()
        .map(|s| {
            format!(
                " {}/{} · {} ",
                form.current_step() + 1,
                form.step_count(),
                s.title
            )
        })
        .unwrap_or_default();

    let mut block = Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    if layout.max_scroll() > 0 {
        block = block.title_bottom(Span::styled(
            " ↑/↓ rolar ",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(block, layout.body);

    let fields = controller.visible_fields();
    let focused = controller.active_field();
    for (index, slot) in &layout.fields {
        let Some(field) = fields.get(*index) else {
            continue;
        };
        let is_active = *index == focused;
        if field.kind == FieldKind::Signature {
            draw_signature(frame, *slot, field, controller.signature(), is_active);
        } else {
            draw_field(frame, *slot, field, is_active);
        }
    }
}
