//! UI module for rendering the TUI

mod components;
mod forms;
pub mod layout;
mod signature;

use crate::app::App;
use crate::controller::Modal;
use crate::platform::{NEXT_SHORTCUT, PREVIOUS_SHORTCUT, SUBMIT_SHORTCUT};
use components::{
    render_alert_dialog, render_button, render_error_dialog, render_loading, render_success_dialog,
};
use layout::FormLayout;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

const TITLE: &str = " Ficha de Anamnese Odontológica ";

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = layout::compute(frame.area(), &app.controller, app.scroll_offset);

    draw_header(frame, app, layout.header);
    forms::draw_section(frame, app, &layout);
    draw_nav(frame, app, &layout);
    draw_status_bar(frame, app, layout.status);

    // Overlays, most urgent last
    if let Some(modal) = &app.modal {
        match modal {
            Modal::Success => render_success_dialog(frame),
            Modal::Error(message) => render_error_dialog(frame, message),
        }
    }
    if let Some(alert) = &app.alert {
        render_alert_dialog(frame, alert);
    }
    if let Some(elapsed) = app.loading_elapsed() {
        render_loading(frame, elapsed);
    }
}

/// Animated progress gauge
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let ratio = (app.progress.value() / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    TITLE,
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(ratio)
        .label(app.controller.form().progress_label());
    frame.render_widget(gauge, area);
}

fn draw_nav(frame: &mut Frame, app: &App, layout: &FormLayout) {
    let enabled = !app.is_busy();
    if let Some(area) = layout.previous {
        render_button(frame, area, "◀ Anterior", Color::White, enabled);
    }
    if let Some(area) = layout.next {
        render_button(frame, area, "Próxima ▶", Color::Cyan, enabled);
    }
    if let Some(area) = layout.submit {
        render_button(frame, area, "Enviar ✔", Color::Green, enabled);
    }
}

/// Keyboard hints for the current step
fn hints(app: &App) -> String {
    let buttons = app.controller.form().nav_buttons();
    let mut hints = vec!["Tab:campo".to_string()];
    if buttons.previous {
        hints.push(format!("{PREVIOUS_SHORTCUT}:anterior"));
    }
    if buttons.next {
        hints.push(format!("{NEXT_SHORTCUT}:próxima"));
    }
    if buttons.submit {
        hints.push(format!("{SUBMIT_SHORTCUT}:enviar"));
    }
    if app.controller.signature_visible() {
        hints.push("arraste:assinar".to_string());
    }
    hints.join("  ")
}

/// Draw the status bar
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(hints(app), Style::default().fg(Color::Gray)),
    ];

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^C:sair ";
    let quit_area = Rect {
        x: area.right().saturating_sub(quit_hint.len() as u16),
        width: (quit_hint.len() as u16).min(area.width),
        ..area
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}
