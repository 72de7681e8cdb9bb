//! Form rendering module
//!
//! - `field_renderer`: one bordered field plus its inline error
//! - `section_form`: the active section with its visible fields

mod field_renderer;
mod section_form;

pub use field_renderer::{border_color, draw_error_line};
pub use section_form::draw_section;
