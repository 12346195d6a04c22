// Localized message templates for validation feedback

use serde::Deserialize;
use std::collections::HashMap;

pub const FIELD_VALID_TYPE: &str = "fieldValidType";
pub const FIELD_VALID_MAX: &str = "fieldValidMax";
pub const FIELD_VALID_MIN: &str = "fieldValidMin";
pub const FIELD_VALID_POSSIBLE: &str = "fieldValidPossible";
pub const FIELD_VALID_EMPTY: &str = "fieldValidEmpy";

/// Lookup of message templates by key
pub trait MessageSource {
    fn template(&self, key: &str) -> Option<&str>;

    /// Template for `key` with `{n}` replaced by the nth argument
    fn message(&self, key: &str, args: &[&str]) -> String {
        match self.template(key) {
            Some(template) => substitute(template, args),
            None => key.to_string(),
        }
    }
}

/// Replace `{0}`, `{1}`, ... with positional arguments in one pass.
///
/// Substituted text is never scanned again. Placeholders without a matching
/// argument are kept as written.
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let arg = tail.find('}').and_then(|close| {
            let index = tail[1..close].parse::<usize>().ok()?;
            Some((close, *args.get(index)?))
        });
        match arg {
            Some((close, arg)) => {
                out.push_str(arg);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Message templates keyed by name, with English defaults
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "HashMap<String, String>")]
pub struct MessageTemplates {
    templates: HashMap<String, String>,
}

impl MessageTemplates {
    pub fn english() -> Self {
        let templates = [
            (FIELD_VALID_TYPE, "{1}: value {0} is of type {3}, expected {2}"),
            (FIELD_VALID_MAX, "{1}: value {0} is greater than the maximum {2}"),
            (FIELD_VALID_MIN, "{1}: value {0} is less than the minimum {2}"),
            (FIELD_VALID_POSSIBLE, "{1}: value {0} is not one of {2}"),
            (FIELD_VALID_EMPTY, "{1}: a value is required"),
        ]
        .into_iter()
        .map(|(key, template)| (key.to_string(), template.to_string()))
        .collect();
        MessageTemplates { templates }
    }

    /// Parse templates from a JSON object; missing keys keep the English text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn set(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }
}

impl Default for MessageTemplates {
    fn default() -> Self {
        MessageTemplates::english()
    }
}

impl From<HashMap<String, String>> for MessageTemplates {
    fn from(overrides: HashMap<String, String>) -> Self {
        let mut messages = MessageTemplates::english();
        messages.templates.extend(overrides);
        messages
    }
}

impl MessageSource for MessageTemplates {
    fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }
}
