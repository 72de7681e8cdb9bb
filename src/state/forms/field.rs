//! Form field value objects

use crate::validation::{MaskKind, ValidationError};

/// Sentinel stored by a yes/no choice answered "yes"
pub const YES: &str = "yes";
/// Sentinel stored by a yes/no choice answered "no"
pub const NO: &str = "no";
/// Value of a ticked checkbox; unticked is the empty string
pub const CHECKED: &str = "true";

/// What a field holds and how keystrokes edit it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Masked(MaskKind),
    Email,
    /// Yes/no radio pair
    Choice,
    Checkbox,
    /// Filled by the signature pad, never typed into
    Signature,
}

/// Visual feedback state of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationState {
    #[default]
    Neutral,
    Valid,
    Invalid,
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
    pub is_required: bool,
    pub is_visible: bool,
    pub validation: ValidationState,
    /// Inline message rendered directly under the field
    pub error: Option<String>,
}

impl FormField {
    fn new(id: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            value: String::new(),
            is_required: false,
            is_visible: true,
            validation: ValidationState::Neutral,
            error: None,
        }
    }

    /// Create a new single-line text field
    pub fn text(id: &str, label: &str) -> Self {
        Self::new(id, label, FieldKind::Text)
    }

    /// Create a new multi-line text field
    pub fn multiline(id: &str, label: &str) -> Self {
        Self::new(id, label, FieldKind::Multiline)
    }

    /// Create a new digits-only field with an input mask
    pub fn masked(id: &str, label: &str, mask: MaskKind) -> Self {
        Self::new(id, label, FieldKind::Masked(mask))
    }

    pub fn email(id: &str, label: &str) -> Self {
        Self::new(id, label, FieldKind::Email)
    }

    /// Create a new yes/no question
    pub fn choice(id: &str, label: &str) -> Self {
        Self::new(id, label, FieldKind::Choice)
    }

    pub fn checkbox(id: &str, label: &str) -> Self {
        Self::new(id, label, FieldKind::Checkbox)
    }

    pub fn signature(id: &str, label: &str) -> Self {
        Self::new(id, label, FieldKind::Signature)
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Start hidden and optional; a conditional relation reveals it
    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self.is_required = false;
        self
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::Multiline)
    }

    /// True when the value is blank after trimming
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn is_checked(&self) -> bool {
        self.value == CHECKED
    }

    /// Replace the value, applying the field's mask when it has one
    pub fn set_value(&mut self, value: &str) {
        self.value = match self.kind {
            FieldKind::Masked(mask) => mask.apply(value),
            _ => value.to_string(),
        };
    }

    /// Push a character to the field value.
    ///
    /// Choices accept `y`/`s` (sim) and `n`; space cycles. Checkboxes toggle
    /// on space or `x`. Returns true when the value changed.
    pub fn push_char(&mut self, c: char) -> bool {
        let before = self.value.clone();
        match self.kind {
            FieldKind::Text | FieldKind::Multiline | FieldKind::Email => self.value.push(c),
            FieldKind::Masked(mask) => {
                let mut raw = self.value.clone();
                raw.push(c);
                self.value = mask.apply(&raw);
            }
            FieldKind::Choice => match c.to_ascii_lowercase() {
                'y' | 's' => self.value = YES.to_string(),
                'n' => self.value = NO.to_string(),
                ' ' => {
                    self.value = if self.value == YES { NO } else { YES }.to_string();
                }
                _ => {}
            },
            FieldKind::Checkbox => {
                if c == ' ' || c.eq_ignore_ascii_case(&'x') {
                    self.toggle();
                }
            }
            FieldKind::Signature => {}
        }
        self.value != before
    }

    /// Remove the last character (or digit, for masked fields)
    pub fn pop_char(&mut self) -> bool {
        let before = self.value.clone();
        match self.kind {
            FieldKind::Text | FieldKind::Multiline | FieldKind::Email => {
                self.value.pop();
            }
            FieldKind::Masked(mask) => self.value = mask.pop_digit(&self.value),
            FieldKind::Choice | FieldKind::Checkbox => self.value.clear(),
            FieldKind::Signature => {}
        }
        self.value != before
    }

    pub fn toggle(&mut self) {
        if self.is_checked() {
            self.value.clear();
        } else {
            self.value = CHECKED.to_string();
        }
    }

    pub fn mark_valid(&mut self) {
        self.validation = ValidationState::Valid;
        self.error = None;
    }

    pub fn mark_invalid(&mut self, error: ValidationError) {
        self.validation = ValidationState::Invalid;
        self.error = Some(error.to_string());
    }

    /// Drop any feedback, back to neutral
    pub fn reset_validation(&mut self) {
        self.validation = ValidationState::Neutral;
        self.error = None;
    }

    /// Clear the field value and its feedback
    pub fn clear(&mut self) {
        self.value.clear();
        self.reset_validation();
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self.kind {
            FieldKind::Choice => match self.value.as_str() {
                YES => "(•) Sim  ( ) Não".to_string(),
                NO => "( ) Sim  (•) Não".to_string(),
                _ => "( ) Sim  ( ) Não".to_string(),
            },
            FieldKind::Checkbox => {
                if self.is_checked() {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            FieldKind::Signature => {
                if self.is_empty() {
                    String::new()
                } else {
                    "(assinado)".to_string()
                }
            }
            _ => self.value.clone(),
        }
    }
}
