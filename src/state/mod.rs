//! Application state module

mod forms;
mod progress_state;

pub use forms::*;
pub use progress_state::*;
