//! Form domain layer
//!
//! This module provides type-safe form handling for the anamnesis wizard:
//! - `field`: single field value objects
//! - `registry`: fields addressed by logical id
//! - `form_state`: section navigation
//! - `conditional`: yes/no follow-up fields
//! - `schema`: the questionnaire itself

mod conditional;
mod field;
mod form_state;
mod registry;
pub mod schema;

pub use conditional::ConditionalManager;
pub use field::{FieldKind, FormField, ValidationState};
pub use form_state::{Form, FormState};
pub use registry::{FieldAccess, FieldRegistry};

#[cfg(test)]
pub use field::{CHECKED, NO, YES};
