//! Headless form controller
//!
//! `FormController` owns every piece of form state and reacts to
//! `FormEvent`s. It never touches the terminal or the network: each call to
//! `handle` returns the side effects the host has to carry out as a list of
//! `Command`s.

use crate::signature::{Point, PointerEvent, SignaturePad, TouchPhase};
use crate::state::schema::{self, FormSchema};
use crate::state::{
    ConditionalManager, FieldAccess, FieldKind, FieldRegistry, Form, FormField, FormState,
    ValidationState,
};
use crate::submission::{SubmissionOutcome, SubmissionPayload, SubmissionPhase};
use crate::validation::{is_valid_cpf, is_valid_email, MaskKind, ValidationError};
use chrono::{Local, NaiveDate};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const INCOMPLETE_SECTION_ALERT: &str =
    "Por favor, preencha corretamente todos os campos obrigatórios.";
pub const MISSING_SIGNATURE_ALERT: &str = "Por favor, assine o formulário antes de enviar.";
pub const MISSING_CONSENT_ALERT: &str = "Você precisa aceitar o termo de consentimento.";
pub const SUBMISSION_ERROR: &str = "Não foi possível enviar o formulário. \
    Tente novamente ou entre em contato com a clínica.";

/// Inputs the controller reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FocusNext,
    FocusPrev,
    /// Focus a visible field of the active section by position
    FocusField(usize),
    InputChar(char),
    Backspace,
    /// Replace a field value wholesale (paste, programmatic fill)
    #[allow(dead_code)]
    SetValue { id: String, value: String },
    Next,
    Previous,
    Submit,
    Pointer(PointerEvent),
    /// Touch input for hosts that have it; the terminal only reports mice
    #[allow(dead_code)]
    Touch {
        phase: TouchPhase,
        touches: Vec<Point>,
    },
    ClearSignature,
    SubmissionProgress(SubmissionPhase),
    SubmissionFinished(SubmissionOutcome),
    /// The delay scheduled by `Command::ScheduleReset` ran out
    ResetDue,
}

/// Blocking acknowledgements shown over the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Success,
    Error(String),
}

/// Side effects for the host
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ScrollIntoView { section: String },
    ShowAlert(String),
    ShowModal(Modal),
    SetLoading(bool),
    /// Start the submission pipeline with this payload
    Dispatch(SubmissionPayload),
    /// Send `FormEvent::ResetDue` after this delay
    ScheduleReset(Duration),
    /// A touch gesture was consumed; the host must not scroll
    SuppressDefault,
}

pub struct FormController {
    form: FormState,
    fields: FieldRegistry,
    conditions: ConditionalManager,
    signature: SignaturePad,
    phase: SubmissionPhase,
    /// Index into the visible fields of the active section
    focused: usize,
    reset_delay: Duration,
}

impl FormController {
    pub fn new(schema: FormSchema, signature_size: (u32, u32), reset_delay: Duration) -> Self {
        let mut fields = FieldRegistry::new(schema.fields);
        let conditions = ConditionalManager::new(schema.relations);
        conditions.evaluate_all(&mut fields);

        Self {
            form: FormState::new(schema.sections),
            fields,
            conditions,
            signature: SignaturePad::new(signature_size.0, signature_size.1),
            phase: SubmissionPhase::Idle,
            focused: 0,
            reset_delay,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    #[allow(dead_code)]
    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn signature(&self) -> &SignaturePad {
        &self.signature
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Ids of the visible fields of the active section, in display order
    pub fn visible_ids(&self) -> Vec<String> {
        let Some(section) = self.form.active_section() else {
            return Vec::new();
        };
        section
            .field_ids
            .iter()
            .filter(|id| self.fields.get(id).is_some_and(|f| f.is_visible))
            .cloned()
            .collect()
    }

    /// Visible fields of the active section, in display order
    pub fn visible_fields(&self) -> Vec<&FormField> {
        self.visible_ids()
            .iter()
            .filter_map(|id| self.fields.get(id))
            .collect()
    }

    pub fn focused_field(&self) -> Option<&FormField> {
        let id = self.visible_ids().into_iter().nth(self.focused)?;
        self.fields.get(&id)
    }

    /// Whether the active section shows the signature pad
    pub fn signature_visible(&self) -> bool {
        self.visible_ids().iter().any(|id| id == schema::SIGNATURE)
    }

    pub fn handle(&mut self, event: FormEvent) -> Vec<Command> {
        match event {
            FormEvent::FocusNext => {
                self.blur();
                self.next_field();
                Vec::new()
            }
            FormEvent::FocusPrev => {
                self.blur();
                self.prev_field();
                Vec::new()
            }
            FormEvent::FocusField(index) => {
                if index != self.focused {
                    self.blur();
                    self.set_active_field(index);
                }
                Vec::new()
            }
            FormEvent::InputChar(c) => {
                self.edit_focused(|field| field.push_char(c));
                Vec::new()
            }
            FormEvent::Backspace => {
                self.edit_focused(FormField::pop_char);
                Vec::new()
            }
            FormEvent::SetValue { id, value } => {
                if self.fields.set_value(&id, &value) {
                    self.after_edit(&id);
                } else {
                    debug!("Ignoring value for unknown field {id:?}");
                }
                Vec::new()
            }
            FormEvent::Next => self.next_section(),
            FormEvent::Previous => self.previous_section(),
            FormEvent::Submit => self.submit(),
            FormEvent::Pointer(pointer) => {
                let encoded = self.signature.handle_pointer(pointer);
                self.store_signature(encoded);
                Vec::new()
            }
            FormEvent::Touch { phase, touches } => {
                let (handled, encoded) = self.signature.handle_touch(phase, &touches);
                self.store_signature(encoded);
                if handled {
                    vec![Command::SuppressDefault]
                } else {
                    Vec::new()
                }
            }
            FormEvent::ClearSignature => {
                self.signature.clear();
                self.fields.clear(schema::SIGNATURE);
                Vec::new()
            }
            FormEvent::SubmissionProgress(phase) => {
                debug!(?phase, "Submission progress");
                self.phase = phase;
                Vec::new()
            }
            FormEvent::SubmissionFinished(outcome) => self.finish(outcome),
            FormEvent::ResetDue => self.reset(),
        }
    }

    fn edit_focused<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut FormField) -> bool,
    {
        let Some(id) = self.visible_ids().into_iter().nth(self.focused) else {
            return;
        };
        let changed = self.fields.get_mut(&id).map(edit).unwrap_or(false);
        if changed {
            self.after_edit(&id);
        }
    }

    /// Conditional relations and real-time validation after a value change
    fn after_edit(&mut self, id: &str) {
        if self.conditions.is_trigger(id) {
            self.conditions.on_trigger_changed(id, &mut self.fields);
            self.clamp_focus();
        }

        let Some(field) = self.fields.get(id) else {
            return;
        };
        let revalidate = match field.kind {
            FieldKind::Masked(mask) => {
                mask.is_complete(&field.value) || field.validation == ValidationState::Invalid
            }
            _ => field.validation == ValidationState::Invalid,
        };
        if revalidate {
            self.validate_field(id, today());
        }
    }

    /// Validate the field losing focus; only format-checked fields react
    fn blur(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if matches!(field.kind, FieldKind::Masked(_) | FieldKind::Email) && !field.is_empty() {
            let id = field.id.clone();
            self.validate_field(&id, today());
        }
    }

    fn clamp_focus(&mut self) {
        let count = self.field_count();
        if self.focused >= count {
            self.focused = count.saturating_sub(1);
        }
    }

    /// Check one field and update its feedback. Returns true when it passes.
    fn validate_field(&mut self, id: &str, today: NaiveDate) -> bool {
        let Some(field) = self.fields.get_mut(id) else {
            return true;
        };
        match check_field(field, today) {
            Ok(()) if field.is_empty() => {
                field.reset_validation();
                true
            }
            Ok(()) => {
                field.mark_valid();
                true
            }
            Err(e) => {
                field.mark_invalid(e);
                false
            }
        }
    }

    /// Validate every visible field of the active section, focusing the
    /// first failing one.
    fn validate_section(&mut self) -> bool {
        let today = today();
        let mut first_invalid = None;
        for (i, id) in self.visible_ids().iter().enumerate() {
            if !self.validate_field(id, today) && first_invalid.is_none() {
                first_invalid = Some(i);
            }
        }
        match first_invalid {
            Some(i) => {
                self.focused = i;
                debug!(
                    step = self.form.current_step(),
                    "Section has invalid fields"
                );
                false
            }
            None => true,
        }
    }

    fn scroll_to_active(&self) -> Vec<Command> {
        self.form
            .active_section()
            .map(|s| Command::ScrollIntoView {
                section: s.id.clone(),
            })
            .into_iter()
            .collect()
    }

    fn next_section(&mut self) -> Vec<Command> {
        if self.phase.is_in_flight() || !self.validate_section() {
            return Vec::new();
        }
        if !self.form.advance() {
            return Vec::new();
        }
        self.focused = 0;
        self.scroll_to_active()
    }

    fn previous_section(&mut self) -> Vec<Command> {
        if self.phase.is_in_flight() || !self.form.retreat() {
            return Vec::new();
        }
        self.focused = 0;
        self.scroll_to_active()
    }

    fn submit(&mut self) -> Vec<Command> {
        if self.phase != SubmissionPhase::Idle {
            warn!(phase = ?self.phase, "Submit ignored, a submission is already under way");
            return Vec::new();
        }
        if !self.form.is_last_step() {
            debug!("Submit ignored before the last section");
            return Vec::new();
        }

        self.phase = SubmissionPhase::Validating;
        if let Some(alert) = self.submission_blocker() {
            self.phase = SubmissionPhase::Idle;
            return vec![Command::ShowAlert(alert.to_string())];
        }

        let payload = SubmissionPayload::build(self.fields.trimmed_values(), &Local::now());
        info!(attempt = %payload.attempt_id(), "Form validated, dispatching");
        self.phase = SubmissionPhase::Submitting;
        vec![Command::SetLoading(true), Command::Dispatch(payload)]
    }

    fn submission_blocker(&mut self) -> Option<&'static str> {
        if !self.validate_section() {
            return Some(INCOMPLETE_SECTION_ALERT);
        }
        if self
            .fields
            .get(schema::SIGNATURE)
            .is_none_or(FormField::is_empty)
        {
            return Some(MISSING_SIGNATURE_ALERT);
        }
        if !self
            .fields
            .get(schema::CONSENT)
            .is_some_and(FormField::is_checked)
        {
            return Some(MISSING_CONSENT_ALERT);
        }
        None
    }

    fn finish(&mut self, outcome: SubmissionOutcome) -> Vec<Command> {
        match outcome {
            SubmissionOutcome::Delivered { via_fallback } => {
                info!(via_fallback, "Submission delivered");
                self.phase = SubmissionPhase::Success;
                vec![
                    Command::SetLoading(false),
                    Command::ShowModal(Modal::Success),
                    Command::ScheduleReset(self.reset_delay),
                ]
            }
            SubmissionOutcome::Failed { reason } => {
                warn!("Submission failed: {reason}");
                self.phase = SubmissionPhase::Idle;
                vec![
                    Command::SetLoading(false),
                    Command::ShowModal(Modal::Error(SUBMISSION_ERROR.to_string())),
                ]
            }
        }
    }

    /// Back to a pristine form on the first section
    fn reset(&mut self) -> Vec<Command> {
        self.fields.clear_all();
        self.conditions.evaluate_all(&mut self.fields);
        self.signature.clear();
        self.form.reset();
        self.focused = 0;
        self.phase = SubmissionPhase::Idle;
        info!("Form reset");
        self.scroll_to_active()
    }

    fn store_signature(&mut self, encoded: Option<String>) {
        if let Some(url) = encoded {
            self.fields.set_value(schema::SIGNATURE, &url);
            if let Some(field) = self.fields.get_mut(schema::SIGNATURE) {
                field.mark_valid();
            }
        }
    }
}

impl Form for FormController {
    fn field_count(&self) -> usize {
        self.visible_ids().len()
    }

    fn active_field(&self) -> usize {
        self.focused
    }

    fn set_active_field(&mut self, index: usize) {
        self.focused = index.min(self.field_count().saturating_sub(1));
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Required check first, then the format check for the field's kind
fn check_field(field: &FormField, today: NaiveDate) -> Result<(), ValidationError> {
    if !field.is_visible {
        return Ok(());
    }
    if field.is_empty() {
        return if field.is_required {
            Err(ValidationError::Required)
        } else {
            Ok(())
        };
    }

    let value = field.value.as_str();
    match field.kind {
        FieldKind::Masked(MaskKind::Cpf) if !is_valid_cpf(value) => {
            Err(ValidationError::InvalidCpf)
        }
        FieldKind::Masked(MaskKind::Phone) if !MaskKind::Phone.is_complete(value) => {
            Err(ValidationError::IncompletePhone)
        }
        FieldKind::Masked(MaskKind::BirthDate) if !is_valid_birth_date(value, today) => {
            Err(ValidationError::InvalidDate)
        }
        FieldKind::Masked(MaskKind::Cep) if !MaskKind::Cep.is_complete(value) => {
            Err(ValidationError::IncompleteCep)
        }
        FieldKind::Email if !is_valid_email(value) => Err(ValidationError::InvalidEmail),
        _ => Ok(()),
    }
}

/// Complete `DD/MM/YYYY` naming a real day no later than `today`
fn is_valid_birth_date(value: &str, today: NaiveDate) -> bool {
    MaskKind::BirthDate.is_complete(value)
        && NaiveDate::parse_from_str(value, "%d/%m/%Y").is_ok_and(|date| date <= today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{NO, YES};

    fn controller() -> FormController {
        FormController::new(FormSchema::anamnesis(), (400, 150), Duration::from_secs(3))
    }

    fn set(controller: &mut FormController, id: &str, value: &str) {
        controller.handle(FormEvent::SetValue {
            id: id.to_string(),
            value: value.to_string(),
        });
    }

    fn errors(controller: &FormController) -> Vec<String> {
        controller
            .visible_fields()
            .into_iter()
            .filter(|f| f.error.is_some())
            .map(|f| f.id.clone())
            .collect()
    }

    fn fill_identification(controller: &mut FormController) {
        set(controller, schema::NAME, "  Maria da Silva ");
        set(controller, schema::CPF, "52998224725");
        set(controller, schema::BIRTH_DATE, "15031990");
        set(controller, schema::PHONE, "11987654321");
        set(controller, schema::EMAIL, "maria@example.com");
    }

    fn fill_health(controller: &mut FormController) {
        for id in [
            "em_tratamento",
            "medicamentos",
            "alergias",
            "cirurgias",
            "cardiopatia",
            "hipertensao",
            "diabetes",
            "fumante",
        ] {
            set(controller, id, NO);
        }
    }

    fn fill_dental(controller: &mut FormController) {
        set(controller, "motivo_consulta", "Limpeza");
        for id in [
            "sangramento_gengival",
            "sensibilidade",
            "bruxismo",
            "reacao_anestesia",
        ] {
            set(controller, id, NO);
        }
    }

    fn sign(controller: &mut FormController) {
        for event in [
            PointerEvent::Down(Point::new(10.0, 10.0)),
            PointerEvent::Move(Point::new(60.0, 40.0)),
            PointerEvent::Up,
        ] {
            controller.handle(FormEvent::Pointer(event));
        }
    }

    /// Walk to the last section with everything required filled in
    fn ready_to_submit() -> FormController {
        let mut controller = controller();
        fill_identification(&mut controller);
        controller.handle(FormEvent::Next);
        fill_health(&mut controller);
        controller.handle(FormEvent::Next);
        fill_dental(&mut controller);
        controller.handle(FormEvent::Next);
        set(&mut controller, schema::CONSENT, crate::state::CHECKED);
        sign(&mut controller);
        assert!(controller.form().is_last_step());
        controller
    }

    fn dispatched(commands: &[Command]) -> Option<&SubmissionPayload> {
        commands.iter().find_map(|c| match c {
            Command::Dispatch(payload) => Some(payload),
            _ => None,
        })
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_next_with_empty_required_fields_stays() {
            let mut controller = controller();
            let commands = controller.handle(FormEvent::Next);

            assert!(commands.is_empty());
            assert_eq!(controller.form().current_step(), 0);
            assert_eq!(
                errors(&controller),
                vec![
                    schema::NAME,
                    schema::CPF,
                    schema::BIRTH_DATE,
                    schema::PHONE,
                    schema::EMAIL,
                ]
            );
            for field in controller.visible_fields() {
                if field.error.is_some() {
                    assert_eq!(field.error.as_deref(), Some("Campo obrigatório"));
                }
            }
        }

        #[test]
        fn test_one_error_per_empty_required_field() {
            let mut controller = controller();
            set(&mut controller, schema::NAME, "Maria");
            set(&mut controller, schema::EMAIL, "maria@example.com");
            controller.handle(FormEvent::Next);

            assert_eq!(
                errors(&controller),
                vec![schema::CPF, schema::BIRTH_DATE, schema::PHONE]
            );
            assert_eq!(controller.active_field(), 1);
        }

        #[test]
        fn test_next_with_valid_section_advances_and_scrolls() {
            let mut controller = controller();
            fill_identification(&mut controller);
            let commands = controller.handle(FormEvent::Next);

            assert_eq!(controller.form().current_step(), 1);
            assert_eq!(
                commands,
                vec![Command::ScrollIntoView {
                    section: "saude".to_string(),
                }]
            );
            assert_eq!(controller.active_field(), 0);
        }

        #[test]
        fn test_format_errors_block_next() {
            let mut controller = controller();
            fill_identification(&mut controller);
            set(&mut controller, schema::CPF, "52998224726");
            controller.handle(FormEvent::Next);

            assert_eq!(controller.form().current_step(), 0);
            let cpf = controller.fields().get(schema::CPF).unwrap();
            assert_eq!(cpf.error.as_deref(), Some("CPF inválido"));
        }

        #[test]
        fn test_previous_skips_validation() {
            let mut controller = controller();
            fill_identification(&mut controller);
            controller.handle(FormEvent::Next);
            let commands = controller.handle(FormEvent::Previous);

            assert_eq!(controller.form().current_step(), 0);
            assert_eq!(commands.len(), 1);
            assert!(controller.handle(FormEvent::Previous).is_empty());
        }

        #[test]
        fn test_next_on_last_step_is_noop() {
            let mut controller = ready_to_submit();
            let step = controller.form().current_step();
            assert!(controller.handle(FormEvent::Next).is_empty());
            assert_eq!(controller.form().current_step(), step);
        }

        #[test]
        fn test_focus_wraps_over_visible_fields() {
            let mut controller = controller();
            assert_eq!(controller.field_count(), 7);
            controller.handle(FormEvent::FocusPrev);
            assert_eq!(controller.active_field(), 6);
            controller.handle(FormEvent::FocusNext);
            assert_eq!(controller.active_field(), 0);
        }
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_typing_masks_cpf() {
            let mut controller = controller();
            controller.handle(FormEvent::FocusField(1));
            for c in "529982247259".chars() {
                controller.handle(FormEvent::InputChar(c));
            }
            let cpf = controller.fields().get(schema::CPF).unwrap();
            assert_eq!(cpf.value, "529.982.247-25");
            assert_eq!(cpf.validation, ValidationState::Valid);
        }

        #[test]
        fn test_backspace_remasks() {
            let mut controller = controller();
            set(&mut controller, schema::CPF, "52998224725");
            controller.handle(FormEvent::FocusField(1));
            controller.handle(FormEvent::Backspace);
            controller.handle(FormEvent::Backspace);
            let cpf = controller.fields().get(schema::CPF).unwrap();
            assert_eq!(cpf.value, "529.982.247");
        }

        #[test]
        fn test_complete_invalid_cpf_flags_in_real_time() {
            let mut controller = controller();
            set(&mut controller, schema::CPF, "11111111111");
            let cpf = controller.fields().get(schema::CPF).unwrap();
            assert_eq!(cpf.validation, ValidationState::Invalid);
            assert_eq!(cpf.error.as_deref(), Some("CPF inválido"));
        }

        #[test]
        fn test_email_validated_on_blur() {
            let mut controller = controller();
            set(&mut controller, schema::EMAIL, "maria@");
            controller.handle(FormEvent::FocusField(4));
            assert_eq!(
                controller.fields().get(schema::EMAIL).unwrap().validation,
                ValidationState::Neutral
            );

            controller.handle(FormEvent::FocusNext);
            let email = controller.fields().get(schema::EMAIL).unwrap();
            assert_eq!(email.validation, ValidationState::Invalid);
            assert_eq!(email.error.as_deref(), Some("E-mail inválido"));
        }

        #[test]
        fn test_later_passing_check_removes_error() {
            let mut controller = controller();
            set(&mut controller, schema::EMAIL, "maria@");
            controller.handle(FormEvent::FocusField(4));
            controller.handle(FormEvent::FocusNext);

            set(&mut controller, schema::EMAIL, "maria@example.com");
            let email = controller.fields().get(schema::EMAIL).unwrap();
            assert_eq!(email.validation, ValidationState::Valid);
            assert!(email.error.is_none());
        }

        #[test]
        fn test_required_error_clears_once_filled() {
            let mut controller = controller();
            controller.handle(FormEvent::Next);
            controller.handle(FormEvent::FocusField(0));
            controller.handle(FormEvent::InputChar('M'));
            let name = controller.fields().get(schema::NAME).unwrap();
            assert!(name.error.is_none());
        }

        #[test]
        fn test_unknown_field_is_ignored() {
            let mut controller = controller();
            let commands = controller.handle(FormEvent::SetValue {
                id: "nope".to_string(),
                value: "x".to_string(),
            });
            assert!(commands.is_empty());
        }
    }

    mod conditional {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_yes_reveals_follow_up_in_focus_order() {
            let mut controller = controller();
            fill_identification(&mut controller);
            controller.handle(FormEvent::Next);
            let before = controller.field_count();

            set(&mut controller, "alergias", YES);
            assert_eq!(controller.field_count(), before + 1);
            let details = controller.fields().get("alergias_detalhes").unwrap();
            assert!(details.is_visible);
            assert!(details.is_required);
        }

        #[test]
        fn test_yes_then_no_clears_target() {
            let mut controller = controller();
            set(&mut controller, "alergias", YES);
            set(&mut controller, "alergias_detalhes", "Dipirona");
            set(&mut controller, "alergias", NO);

            let details = controller.fields().get("alergias_detalhes").unwrap();
            assert!(!details.is_required);
            assert!(!details.is_visible);
            assert_eq!(details.value, "");
        }

        #[test]
        fn test_revealed_follow_up_blocks_next() {
            let mut controller = controller();
            fill_identification(&mut controller);
            controller.handle(FormEvent::Next);
            fill_health(&mut controller);
            set(&mut controller, "medicamentos", YES);
            controller.handle(FormEvent::Next);

            assert_eq!(controller.form().current_step(), 1);
            assert_eq!(errors(&controller), vec!["medicamentos_detalhes"]);
        }

        #[test]
        fn test_focus_clamped_when_field_hides() {
            let mut controller = controller();
            fill_identification(&mut controller);
            controller.handle(FormEvent::Next);
            fill_health(&mut controller);
            set(&mut controller, "gestante", YES);
            let last = controller.field_count() - 1;
            controller.handle(FormEvent::FocusField(last));
            set(&mut controller, "gestante", NO);
            assert!(controller.active_field() < controller.field_count());
        }
    }

    mod signature {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_stroke_fills_signature_field() {
            let mut controller = controller();
            sign(&mut controller);
            let value = &controller.fields().get(schema::SIGNATURE).unwrap().value;
            assert!(value.starts_with("data:image/png;base64,"));
        }

        #[test]
        fn test_touch_suppresses_default() {
            let mut controller = controller();
            let commands = controller.handle(FormEvent::Touch {
                phase: TouchPhase::Start,
                touches: vec![Point::new(5.0, 5.0)],
            });
            assert_eq!(commands, vec![Command::SuppressDefault]);
            assert!(controller.signature().is_drawing());
        }

        #[test]
        fn test_clear_empties_value() {
            let mut controller = controller();
            sign(&mut controller);
            controller.handle(FormEvent::ClearSignature);
            assert!(controller.signature().is_blank());
            let signature = controller.fields().get(schema::SIGNATURE).unwrap();
            assert!(signature.is_empty());
        }
    }

    mod submission {
        use super::*;
        use crate::submission::{DispatchOutcome, MockSubmissionTransport, SubmissionPipeline};
        use pretty_assertions::assert_eq;
        use std::collections::BTreeSet;
        use std::sync::Arc;

        #[test]
        fn test_submit_dispatches_payload() {
            let mut controller = ready_to_submit();
            let commands = controller.handle(FormEvent::Submit);

            assert_eq!(commands[0], Command::SetLoading(true));
            let payload = dispatched(&commands).unwrap();
            assert_eq!(payload.fields()[schema::NAME], "Maria da Silva");
            assert_eq!(controller.phase(), SubmissionPhase::Submitting);
        }

        #[test]
        fn test_missing_signature_alerts_without_dispatch() {
            let mut controller = ready_to_submit();
            controller.handle(FormEvent::ClearSignature);
            let commands = controller.handle(FormEvent::Submit);

            assert_eq!(
                commands,
                vec![Command::ShowAlert(MISSING_SIGNATURE_ALERT.to_string())]
            );
            assert_eq!(controller.phase(), SubmissionPhase::Idle);
        }

        #[test]
        fn test_missing_consent_alerts() {
            let mut controller = ready_to_submit();
            set(&mut controller, schema::CONSENT, "");
            let commands = controller.handle(FormEvent::Submit);

            assert_eq!(
                commands,
                vec![Command::ShowAlert(MISSING_CONSENT_ALERT.to_string())]
            );
            assert!(dispatched(&commands).is_none());
            assert_eq!(controller.phase(), SubmissionPhase::Idle);
        }

        #[test]
        fn test_signature_checked_before_consent() {
            let mut controller = ready_to_submit();
            set(&mut controller, schema::CONSENT, "");
            controller.handle(FormEvent::ClearSignature);

            assert_eq!(
                controller.handle(FormEvent::Submit),
                vec![Command::ShowAlert(MISSING_SIGNATURE_ALERT.to_string())]
            );
        }

        #[test]
        fn test_submit_before_last_step_is_ignored() {
            let mut controller = controller();
            assert!(controller.handle(FormEvent::Submit).is_empty());
        }

        #[test]
        fn test_overlapping_submit_rejected() {
            let mut controller = ready_to_submit();
            assert!(dispatched(&controller.handle(FormEvent::Submit)).is_some());
            assert!(controller.handle(FormEvent::Submit).is_empty());
        }

        #[test]
        fn test_failure_keeps_form_for_retry() {
            let mut controller = ready_to_submit();
            controller.handle(FormEvent::Submit);
            let outcome = SubmissionOutcome::Failed {
                reason: "timeout".to_string(),
            };
            let commands = controller.handle(FormEvent::SubmissionFinished(outcome));

            assert_eq!(
                commands,
                vec![
                    Command::SetLoading(false),
                    Command::ShowModal(Modal::Error(SUBMISSION_ERROR.to_string())),
                ]
            );
            assert_eq!(controller.phase(), SubmissionPhase::Idle);
            assert!(controller.form().is_last_step());
            assert!(!controller.signature().is_blank());
            assert!(dispatched(&controller.handle(FormEvent::Submit)).is_some());
        }

        #[tokio::test]
        async fn test_full_run_posts_once_then_resets() {
            let mut controller = ready_to_submit();
            let commands = controller.handle(FormEvent::Submit);
            let payload = dispatched(&commands).unwrap().clone();

            let mut expected: BTreeSet<String> =
                controller.fields().iter().map(|f| f.id.clone()).collect();
            expected.extend(schema::METADATA_KEYS.iter().map(|k| k.to_string()));

            let mut mock = MockSubmissionTransport::new();
            mock.expect_dispatch_primary()
                .times(1)
                .withf(move |p| {
                    let json: serde_json::Value =
                        serde_json::from_str(&p.to_json().unwrap()).unwrap();
                    let keys: BTreeSet<String> =
                        json.as_object().unwrap().keys().cloned().collect();
                    keys == expected
                })
                .returning(|_| DispatchOutcome::Dispatched);
            mock.expect_dispatch_fallback().never();

            let pipeline = SubmissionPipeline::new(Arc::new(mock), Duration::ZERO);
            let mut phases = Vec::new();
            let outcome = pipeline.run(&payload, |p| phases.push(p)).await;
            for phase in phases {
                controller.handle(FormEvent::SubmissionProgress(phase));
            }
            let commands = controller.handle(FormEvent::SubmissionFinished(outcome));

            assert_eq!(
                commands,
                vec![
                    Command::SetLoading(false),
                    Command::ShowModal(Modal::Success),
                    Command::ScheduleReset(Duration::from_secs(3)),
                ]
            );
            assert_eq!(controller.phase(), SubmissionPhase::Success);

            controller.handle(FormEvent::ResetDue);
            assert_eq!(controller.form().current_step(), 0);
            assert_eq!(controller.phase(), SubmissionPhase::Idle);
            assert!(controller.signature().is_blank());
            let signature = controller.fields().get(schema::SIGNATURE).unwrap();
            assert!(signature.is_empty());
            for id in controller.conditions.targets() {
                let field = controller.fields().get(id).unwrap();
                assert!(!field.is_visible, "{id} visible");
                assert!(!field.is_required, "{id} required");
            }
            for field in controller.fields().iter() {
                assert!(field.value.is_empty(), "{} kept a value", field.id);
                assert_eq!(field.validation, ValidationState::Neutral);
            }
        }

        #[test]
        fn test_reset_hides_revealed_targets() {
            let mut controller = ready_to_submit();
            set(&mut controller, "alergias", YES);
            controller.handle(FormEvent::ResetDue);
            let details = controller.fields().get("alergias_detalhes").unwrap();
            assert!(!details.is_visible);
        }
    }

    mod checks {
        use super::*;
        use pretty_assertions::assert_eq;

        fn today() -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        }

        fn masked(mask: MaskKind, value: &str) -> FormField {
            let mut field = FormField::masked("f", "F", mask).required();
            field.set_value(value);
            field
        }

        #[test]
        fn test_hidden_fields_always_pass() {
            let field = FormField::text("f", "F").required().hidden();
            assert_eq!(check_field(&field, today()), Ok(()));
        }

        #[test]
        fn test_optional_empty_passes() {
            let field = FormField::masked("cep", "CEP", MaskKind::Cep);
            assert_eq!(check_field(&field, today()), Ok(()));
        }

        #[test]
        fn test_phone_accepts_landline_length() {
            let landline = masked(MaskKind::Phone, "1133334444");
            assert_eq!(check_field(&landline, today()), Ok(()));
            assert_eq!(
                check_field(&masked(MaskKind::Phone, "113333444"), today()),
                Err(ValidationError::IncompletePhone)
            );
        }

        #[test]
        fn test_birth_date_rules() {
            let birth_date = masked(MaskKind::BirthDate, "15031990");
            assert_eq!(check_field(&birth_date, today()), Ok(()));
            assert_eq!(
                check_field(&masked(MaskKind::BirthDate, "31021990"), today()),
                Err(ValidationError::InvalidDate)
            );
            assert_eq!(
                check_field(&masked(MaskKind::BirthDate, "02062024"), today()),
                Err(ValidationError::InvalidDate)
            );
            assert_eq!(
                check_field(&masked(MaskKind::BirthDate, "0101199"), today()),
                Err(ValidationError::InvalidDate)
            );
        }

        #[test]
        fn test_incomplete_cep() {
            assert_eq!(
                check_field(&masked(MaskKind::Cep, "0131"), today()),
                Err(ValidationError::IncompleteCep)
            );
        }

        #[test]
        fn test_unchecked_required_checkbox() {
            let field = FormField::checkbox("c", "C").required();
            assert_eq!(check_field(&field, today()), Err(ValidationError::Required));
        }
    }
}
