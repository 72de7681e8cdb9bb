//! Reusable UI components

mod button;
mod dialog;

pub use button::{render_button, BUTTON_HEIGHT};
pub use dialog::{render_alert_dialog, render_error_dialog, render_loading, render_success_dialog};
