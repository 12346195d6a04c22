// End-to-end scenarios over fields, records and validators

use rust_decimal::Decimal;
use std::rc::Rc;
use std::str::FromStr;
use tabula_core::definition::FieldListDef;
use tabula_core::messages::MessageTemplates;
use tabula_core::properties::{self, FieldProperties};
use tabula_core::validator::Rule;
use tabula_core::{DefaultFieldValidator, Field, FieldList, Kind, Record, Validator, Value};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn code_amount() -> Rc<FieldList> {
    Rc::new(FieldList::from_fields(vec![
        Field::new("CODE", Kind::String)
            .with_length(10)
            .with_primary_key(true),
        Field::new("AMOUNT", Kind::Decimal)
            .with_length(10)
            .with_decimals(2),
    ]))
}

/// Defaults are scaled to the field; explicit values keep their own scale
#[test]
fn test_code_amount_record() {
    let fields = code_amount();
    let mut record = Record::new(Rc::clone(&fields));
    assert_eq!(record.value_by_alias("AMOUNT").unwrap().to_string(), "0.00");

    record.set_value_by_alias("CODE", Value::from("X001")).unwrap();
    record
        .set_value_by_alias("AMOUNT", Value::from(dec("12.345")))
        .unwrap();

    let amount = record.value_by_alias("AMOUNT").unwrap().decimal().unwrap();
    assert_eq!(amount.to_string(), "12.345");

    let field = fields.field_by_alias("AMOUNT").unwrap();
    assert_eq!(field.scale(amount).to_string(), "12.35");
    assert_eq!(field.scale(dec("-0.125")).to_string(), "-0.13");

    assert!(record.is_modified(0));
    assert!(record.is_modified(1));
    assert_eq!(record.to_string(), "{CODE='X001', AMOUNT=12.345}");

    let mut key = tabula_core::OrderKey::new();
    key.add(Value::from("X001"), true);
    assert_eq!(record.primary_key(), key);
}

/// The maximum rule fires before the required rule
#[test]
fn test_maximum_fails_first() {
    let mut field = Field::new("QTY", Kind::Integer)
        .with_required(true)
        .with_nullable(false);
    field.set_maximum(Some(Value::from(100)));

    let validator = DefaultFieldValidator::new(Rc::new(MessageTemplates::english()));
    let over = Value::from(150);
    assert_eq!(validator.failing_rule(&field, &over), Some(Rule::Maximum));
    assert!(!validator.validate(&field, &over));
    assert_eq!(
        validator.validation_message(&field, &over),
        Some("QTY: value 150 is greater than the maximum 100".to_string())
    );
    assert!(validator.validate(&field, &Value::from(100)));
}

#[test]
fn test_primary_key_is_never_nullable() {
    let mut field = Field::new("ID", Kind::Long);
    field.set_nullable(true);
    field.set_primary_key(true);
    assert!(!field.is_nullable());

    let field = Field::new("ID", Kind::Long)
        .with_nullable(true)
        .with_primary_key(true);
    assert!(!field.is_nullable());
}

#[test]
fn test_schema_from_json_with_custom_messages() {
    let schema = r#"{
        "fields": [
            {"name": "SKU", "kind": "string", "length": 8, "primary_key": true},
            {"name": "PRICE", "kind": "decimal", "decimals": 2, "maximum": 999.99,
             "header": "Price"},
            {"name": "ADDED", "kind": "date"}
        ]
    }"#;
    let messages =
        MessageTemplates::from_json(r#"{"fieldValidMax": "{1} too high: {0} > {2}"}"#).unwrap();
    let fields = Rc::new(
        FieldListDef::from_json(schema)
            .unwrap()
            .to_field_list(Some(Rc::new(messages)))
            .unwrap(),
    );

    let mut record = Record::new(Rc::clone(&fields));
    record.set_value_by_alias("SKU", Value::from("A-1")).unwrap();
    record
        .set_value_by_alias("PRICE", Value::from(dec("1000")))
        .unwrap();

    let price = fields.field_by_alias("PRICE").unwrap();
    let value = record.value_by_alias("PRICE").unwrap();
    assert_eq!(
        price.validation_message(&value),
        Some("Price too high: 1000 > 999.99".to_string())
    );

    let sku = fields.field_by_alias("SKU").unwrap();
    assert_eq!(
        sku.validation_message(&Value::null(Kind::String)),
        Some("SKU: a value is required".to_string())
    );
}

#[test]
fn test_properties_round_trip() {
    let properties = FieldProperties::new();
    let original = Field::new("NOTE", Kind::String).with_label("Note");
    let mut record = properties.record(&original).unwrap();
    record
        .set_value_by_alias(properties::REQUIRED, Value::from(true))
        .unwrap();

    let mut edited = original.clone();
    properties.apply(&record, &mut edited).unwrap();
    assert!(edited.is_required());
    assert_eq!(edited.display_text(), "Note");
    assert_eq!(edited, original);
}
