//! Conditional fields
//!
//! A yes/no question can own follow-up fields: answering "yes" reveals the
//! follow-up and makes it required, answering "no" (or not answering) hides
//! it, drops the requirement and wipes whatever was typed there.

use super::field::{NO, YES};
use super::registry::FieldAccess;

/// Links a trigger field to a target field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalRelation {
    pub trigger: String,
    pub target: String,
    /// Trigger value that reveals the target
    pub reveal_value: String,
}

impl ConditionalRelation {
    pub fn new(trigger: &str, target: &str, reveal_value: &str) -> Self {
        Self {
            trigger: trigger.to_string(),
            target: target.to_string(),
            reveal_value: reveal_value.to_string(),
        }
    }

    /// Reveal `target` on "yes", hide it on "no"
    pub fn on_yes(trigger: &str, target: &str) -> Self {
        Self::new(trigger, target, YES)
    }

    /// Whether `value` reveals the target. Only the yes/no sentinels are
    /// recognised; anything else keeps the target hidden.
    fn reveals(&self, value: &str) -> bool {
        matches!(value, YES | NO) && value == self.reveal_value
    }
}

/// Registered relations, evaluated in registration order
#[derive(Debug, Clone, Default)]
pub struct ConditionalManager {
    relations: Vec<ConditionalRelation>,
}

impl ConditionalManager {
    pub fn new(relations: Vec<ConditionalRelation>) -> Self {
        Self { relations }
    }

    #[allow(dead_code)]
    pub fn register(&mut self, relation: ConditionalRelation) {
        self.relations.push(relation);
    }

    #[allow(dead_code)]
    pub fn relations(&self) -> &[ConditionalRelation] {
        &self.relations
    }

    pub fn is_trigger(&self, id: &str) -> bool {
        self.relations.iter().any(|r| r.trigger == id)
    }

    /// Every field that some relation can reveal
    #[allow(dead_code)]
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.relations.iter().map(|r| r.target.as_str())
    }

    /// Evaluate every relation; run once at start-up and after a reset
    pub fn evaluate_all<F: FieldAccess>(&self, fields: &mut F) {
        for relation in &self.relations {
            apply(relation, fields);
        }
    }

    /// Evaluate the relations driven by `trigger` after its value changed
    pub fn on_trigger_changed<F: FieldAccess>(&self, trigger: &str, fields: &mut F) {
        for relation in self.relations.iter().filter(|r| r.trigger == trigger) {
            apply(relation, fields);
        }
    }
}

fn apply<F: FieldAccess>(relation: &ConditionalRelation, fields: &mut F) {
    let Some(value) = fields.value(&relation.trigger) else {
        tracing::debug!("Conditional trigger {:?} not found", relation.trigger);
        return;
    };
    let reveal = relation.reveals(value);

    if fields.value(&relation.target).is_none() {
        tracing::debug!("Conditional target {:?} not found", relation.target);
        return;
    }

    fields.set_visible(&relation.target, reveal);
    fields.set_required(&relation.target, reveal);
    if !reveal {
        fields.clear(&relation.target);
    }
    tracing::debug!(
        trigger = %relation.trigger,
        target = %relation.target,
        reveal,
        "Conditional relation evaluated"
    );
}
