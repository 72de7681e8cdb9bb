//! Screen layout and hit-testing
//!
//! `compute` is shared by drawing and mouse handling, so a click always
//! lands on what was drawn under it.

use super::components::BUTTON_HEIGHT;
use crate::controller::FormController;
use crate::state::{FieldKind, FormField};
use ratatui::layout::{Constraint, Direction, Layout, Margin, Position, Rect};

/// Progress gauge rows
pub const HEADER_HEIGHT: u16 = 3;
/// Bordered single-line field
pub const FIELD_HEIGHT: u16 = 3;
pub const MULTILINE_HEIGHT: u16 = 5;
pub const SIGNATURE_HEIGHT: u16 = 10;
const NAV_BUTTON_WIDTH: u16 = 16;

/// Where everything sits for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormLayout {
    pub header: Rect,
    /// Bordered section box
    pub body: Rect,
    pub nav: Rect,
    pub status: Rect,
    /// Slots of the fields that fit, as (visible field index, slot)
    pub fields: Vec<(usize, Rect)>,
    /// Drawing surface of the signature pad, inside its border
    pub signature: Option<Rect>,
    pub previous: Option<Rect>,
    pub next: Option<Rect>,
    pub submit: Option<Rect>,
    /// Height of all field slots stacked
    pub content_height: u16,
}

impl FormLayout {
    /// Visible field index under a cell
    pub fn field_at(&self, column: u16, row: u16) -> Option<usize> {
        self.fields
            .iter()
            .find(|(_, slot)| slot.contains(Position::new(column, row)))
            .map(|(index, _)| *index)
    }

    pub fn in_signature(&self, column: u16, row: u16) -> bool {
        self.signature
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }

    /// Scroll offset that still shows the last field
    pub fn max_scroll(&self) -> u16 {
        let viewport = self.body.height.saturating_sub(2);
        self.content_height.saturating_sub(viewport)
    }
}

/// Rows a field occupies, including its inline error line
pub fn slot_height(field: &FormField) -> u16 {
    let base = match field.kind {
        FieldKind::Multiline => MULTILINE_HEIGHT,
        FieldKind::Signature => SIGNATURE_HEIGHT,
        _ => FIELD_HEIGHT,
    };
    base + u16::from(field.error.is_some())
}

/// Lay out the form for a terminal `area`, scrolled down by `scroll` rows
pub fn compute(area: Rect, controller: &FormController, scroll: u16) -> FormLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Progress
            Constraint::Min(0),                // Section
            Constraint::Length(BUTTON_HEIGHT), // Navigation
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    let mut layout = FormLayout {
        header: chunks[0],
        body: chunks[1],
        nav: chunks[2],
        status: chunks[3],
        ..Default::default()
    };

    let inner = layout.body.inner(Margin::new(1, 1));
    let mut offset: i32 = -i32::from(scroll);
    for (index, field) in controller.visible_fields().into_iter().enumerate() {
        let height = slot_height(field);
        let top = i32::from(inner.y) + offset;
        offset += i32::from(height);

        if top < i32::from(inner.y) || top + i32::from(height) > i32::from(inner.bottom()) {
            continue;
        }
        let slot = Rect {
            x: inner.x,
            y: top as u16,
            width: inner.width,
            height,
        };
        layout.fields.push((index, slot));

        if field.kind == FieldKind::Signature {
            let pad = Rect {
                height: SIGNATURE_HEIGHT,
                ..slot
            };
            layout.signature = Some(pad.inner(Margin::new(1, 1)));
        }
    }
    layout.content_height = u16::try_from(offset + i32::from(scroll)).unwrap_or(u16::MAX);

    let buttons = controller.form().nav_buttons();
    let width = NAV_BUTTON_WIDTH.min(layout.nav.width / 2);
    let left = Rect {
        width,
        ..layout.nav
    };
    let right = Rect {
        x: layout.nav.right().saturating_sub(width),
        width,
        ..layout.nav
    };
    layout.previous = buttons.previous.then_some(left);
    layout.next = buttons.next.then_some(right);
    layout.submit = buttons.submit.then_some(right);

    layout
}
