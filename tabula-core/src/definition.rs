// Serializable schema definitions

use crate::error::Error;
use crate::field::Field;
use crate::field_list::FieldList;
use crate::json::value_from_json;
use crate::messages::MessageSource;
use crate::types::Kind;
use crate::validator::DefaultFieldValidator;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleValueDef {
    pub value: serde_json::Value,
    pub label: String,
}

/// Definition of one field as read from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    pub kind: Kind,
    #[serde(default)]
    pub length: u32,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "yes")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default = "yes")]
    pub persistent: bool,
    #[serde(default)]
    pub main_description: bool,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub minimum: Option<serde_json::Value>,
    #[serde(default)]
    pub maximum: Option<serde_json::Value>,
    #[serde(default)]
    pub possible_values: Vec<PossibleValueDef>,
}

impl FieldDef {
    pub fn to_field(&self) -> Result<Field, Error> {
        let bound = |json: &serde_json::Value| {
            value_from_json(self.kind, json).map_err(|e| Error::InvalidValue {
                field: self.name.clone(),
                reason: e.to_string(),
            })
        };

        let mut field = Field::new(&self.name, self.kind);
        if let Some(alias) = &self.alias {
            field.set_alias(alias);
        }
        field.set_length(self.length);
        field.set_decimals(self.decimals);
        field.set_label(self.label.clone());
        field.set_header(self.header.clone());
        field.set_title(self.title.clone());
        field.set_description(self.description.clone());
        field.set_required(self.required);
        field.set_nullable(self.nullable);
        field.set_primary_key(self.primary_key);
        field.set_persistent(self.persistent);
        field.set_main_description(self.main_description);
        field.set_function(self.function.clone());
        field.set_minimum(self.minimum.as_ref().map(bound).transpose()?);
        field.set_maximum(self.maximum.as_ref().map(bound).transpose()?);
        for possible in &self.possible_values {
            field.add_possible_value(bound(&possible.value)?, &possible.label);
        }
        Ok(field)
    }
}

/// Definition of a whole field list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldListDef {
    pub fields: Vec<FieldDef>,
}

impl FieldListDef {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build the field list; with `messages`, every field gets a
    /// `DefaultFieldValidator` reporting through them
    pub fn to_field_list(&self, messages: Option<Rc<dyn MessageSource>>) -> Result<FieldList, Error> {
        let validator = messages.map(|m| Rc::new(DefaultFieldValidator::new(m)));
        let mut fields = FieldList::new();
        for def in &self.fields {
            let mut field = def.to_field()?;
            if let Some(validator) = &validator {
                field.add_validator(validator.clone());
            }
            fields.add_field(field);
        }
        Ok(fields)
    }
}
