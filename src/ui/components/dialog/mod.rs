//! Dialog components for TUI

mod base;
mod error_dialog;
mod loading;
mod success_dialog;

pub use error_dialog::{render_alert_dialog, render_error_dialog};
pub use loading::render_loading;
pub use success_dialog::render_success_dialog;
