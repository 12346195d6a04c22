// Field validators

use crate::field::Field;
use crate::messages::{
    MessageSource, FIELD_VALID_EMPTY, FIELD_VALID_MAX, FIELD_VALID_MIN, FIELD_VALID_POSSIBLE,
    FIELD_VALID_TYPE,
};
use crate::value::Value;
use std::cmp::Ordering;
use std::rc::Rc;

/// A rule a field's value must satisfy
pub trait Validator {
    fn validate(&self, field: &Field, value: &Value) -> bool;

    /// Why `value` fails, or `None` when it passes
    fn validation_message(&self, field: &Field, value: &Value) -> Option<String>;
}

/// Validator from a closure returning the failure message
pub struct FnValidator<F>(pub F);

impl<F> Validator for FnValidator<F>
where
    F: Fn(&Field, &Value) -> Option<String>,
{
    fn validate(&self, field: &Field, value: &Value) -> bool {
        (self.0)(field, value).is_none()
    }

    fn validation_message(&self, field: &Field, value: &Value) -> Option<String> {
        (self.0)(field, value)
    }
}

/// Rule of `DefaultFieldValidator`, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Kind,
    Maximum,
    Minimum,
    Possible,
    Required,
    Nullable,
}

/// Kind, bounds, possible values, required and nullable checks.
///
/// Rules run in a fixed order and stop at the first one that fails; the
/// message path reports that same rule.
pub struct DefaultFieldValidator {
    messages: Rc<dyn MessageSource>,
}

impl DefaultFieldValidator {
    pub fn new(messages: Rc<dyn MessageSource>) -> Self {
        DefaultFieldValidator { messages }
    }

    /// First rule `value` breaks for `field`
    pub fn failing_rule(&self, field: &Field, value: &Value) -> Option<Rule> {
        if value.kind() != field.kind() {
            return Some(Rule::Kind);
        }
        if let Some(maximum) = field.maximum() {
            if !matches!(value.compare(maximum), Ok(Ordering::Less | Ordering::Equal)) {
                return Some(Rule::Maximum);
            }
        }
        if let Some(minimum) = field.minimum() {
            if !matches!(value.compare(minimum), Ok(Ordering::Greater | Ordering::Equal)) {
                return Some(Rule::Minimum);
            }
        }
        if field.has_possible_values() && !field.is_possible_value(value) {
            return Some(Rule::Possible);
        }
        if field.is_required() && value.is_empty() {
            return Some(Rule::Required);
        }
        if !field.is_nullable() && value.is_null() {
            return Some(Rule::Nullable);
        }
        None
    }

    fn render(&self, rule: Rule, field: &Field, value: &Value) -> String {
        let shown = value.to_string();
        let shown = shown.as_str();
        let name = field.display_text();
        match rule {
            Rule::Kind => self.messages.message(
                FIELD_VALID_TYPE,
                &[shown, name, field.kind().name(), value.kind().name()],
            ),
            Rule::Maximum => {
                let bound = field.maximum().map(Value::to_string).unwrap_or_default();
                self.messages.message(FIELD_VALID_MAX, &[shown, name, bound.as_str()])
            }
            Rule::Minimum => {
                let bound = field.minimum().map(Value::to_string).unwrap_or_default();
                self.messages.message(FIELD_VALID_MIN, &[shown, name, bound.as_str()])
            }
            Rule::Possible => {
                let choices = field
                    .possible_values()
                    .iter()
                    .map(|p| p.value.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                self.messages
                    .message(FIELD_VALID_POSSIBLE, &[shown, name, choices.as_str()])
            }
            Rule::Required | Rule::Nullable => {
                self.messages.message(FIELD_VALID_EMPTY, &[shown, name])
            }
        }
    }
}

impl Validator for DefaultFieldValidator {
    fn validate(&self, field: &Field, value: &Value) -> bool {
        self.failing_rule(field, value).is_none()
    }

    fn validation_message(&self, field: &Field, value: &Value) -> Option<String> {
        self.failing_rule(field, value)
            .map(|rule| self.render(rule, field, value))
    }
}
