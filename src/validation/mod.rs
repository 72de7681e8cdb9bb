//! Field validators
//!
//! - `mask`: digit masks for identification fields
//! - `cpf`: two-stage CPF checksum
//! - `email`: superficial email syntax check

mod cpf;
mod email;
mod mask;

pub use cpf::is_valid_cpf;
pub use email::is_valid_email;
pub use mask::{digits_only, MaskKind};

use thiserror::Error;

/// Reasons a field fails validation. The display text is the inline message
/// shown under the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Campo obrigatório")]
    Required,
    #[error("CPF inválido")]
    InvalidCpf,
    #[error("E-mail inválido")]
    InvalidEmail,
    #[error("Telefone incompleto")]
    IncompletePhone,
    #[error("Data inválida")]
    InvalidDate,
    #[error("CEP incompleto")]
    IncompleteCep,
}
