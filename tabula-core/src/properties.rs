// Field metadata viewed as a record

use crate::error::Error;
use crate::field::Field;
use crate::field_list::FieldList;
use crate::record::Record;
use crate::types::Kind;
use crate::value::Value;
use std::rc::Rc;

pub const NAME: &str = "NAME";
pub const ALIAS: &str = "ALIAS";
pub const KIND: &str = "KIND";
pub const LENGTH: &str = "LENGTH";
pub const DECIMALS: &str = "DECIMALS";
pub const LABEL: &str = "LABEL";
pub const HEADER: &str = "HEADER";
pub const TITLE: &str = "TITLE";
pub const DESCRIPTION: &str = "DESCRIPTION";
pub const REQUIRED: &str = "REQUIRED";
pub const NULLABLE: &str = "NULLABLE";
pub const PRIMARY_KEY: &str = "PRIMARY_KEY";
pub const PERSISTENT: &str = "PERSISTENT";
pub const FUNCTION: &str = "FUNCTION";

/// Projects field metadata onto a fixed schema so it can be listed and
/// edited like any other record
pub struct FieldProperties {
    fields: Rc<FieldList>,
}

impl FieldProperties {
    pub fn new() -> Self {
        let text = |name: &str| Field::new(name, Kind::String);
        let flag = |name: &str| Field::new(name, Kind::Boolean);
        let fields = FieldList::from_fields(vec![
            text(NAME).with_primary_key(true),
            text(ALIAS),
            text(KIND),
            Field::new(LENGTH, Kind::Long),
            Field::new(DECIMALS, Kind::Long),
            text(LABEL),
            text(HEADER),
            text(TITLE),
            text(DESCRIPTION),
            flag(REQUIRED),
            flag(NULLABLE),
            flag(PRIMARY_KEY),
            flag(PERSISTENT),
            text(FUNCTION),
        ]);
        FieldProperties {
            fields: Rc::new(fields),
        }
    }

    pub fn field_list(&self) -> &Rc<FieldList> {
        &self.fields
    }

    /// Metadata of `field` as a record
    pub fn record(&self, field: &Field) -> Result<Record, Error> {
        let optional = |text: Option<&str>| match text {
            Some(text) => Value::from(text),
            None => Value::null(Kind::String),
        };
        let values = vec![
            Value::from(field.name()),
            Value::from(field.alias()),
            Value::from(field.kind().name()),
            Value::from(i64::from(field.length())),
            Value::from(i64::from(field.decimals())),
            optional(field.label()),
            optional(field.header()),
            optional(field.title()),
            optional(field.description()),
            Value::from(field.is_required()),
            Value::from(field.is_nullable()),
            Value::from(field.is_primary_key()),
            Value::from(field.is_persistent()),
            optional(field.function()),
        ];
        Record::with_values(Rc::clone(&self.fields), values)
    }

    /// Write the editable attributes of `record` back onto `field`
    pub fn apply(&self, record: &Record, field: &mut Field) -> Result<(), Error> {
        let text = |alias: &str| -> Result<Option<String>, Error> {
            Ok(record.value_by_alias(alias)?.string()?.map(str::to_string))
        };
        let flag = |alias: &str| -> Result<bool, Error> {
            Ok(record.value_by_alias(alias)?.boolean()?.unwrap_or(false))
        };

        field.set_label(text(LABEL)?);
        field.set_header(text(HEADER)?);
        field.set_title(text(TITLE)?);
        field.set_description(text(DESCRIPTION)?);
        field.set_required(flag(REQUIRED)?);
        field.set_nullable(flag(NULLABLE)?);
        field.set_primary_key(flag(PRIMARY_KEY)?);
        Ok(())
    }
}

impl Default for FieldProperties {
    fn default() -> Self {
        FieldProperties::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_projection() {
        let properties = FieldProperties::new();
        let field = Field::new("AMOUNT", Kind::Decimal)
            .with_length(10)
            .with_decimals(2)
            .with_label("Amount");
        let record = properties.record(&field).unwrap();
        assert_eq!(record.value_by_alias(KIND).unwrap(), "decimal");
        assert_eq!(record.value_by_alias(DECIMALS).unwrap(), 2i64);
        assert_eq!(record.value_by_alias(LABEL).unwrap(), "Amount");
        assert!(record.value_by_alias(TITLE).unwrap().is_null());
        assert_eq!(record.value_by_alias(PERSISTENT).unwrap(), true);
    }

    #[test]
    fn test_apply_edits() {
        let properties = FieldProperties::new();
        let mut field = Field::new("CODE", Kind::String);
        let mut record = properties.record(&field).unwrap();
        record
            .set_value_by_alias(HEADER, Value::from("Code"))
            .unwrap();
        record
            .set_value_by_alias(NULLABLE, Value::from(true))
            .unwrap();
        record
            .set_value_by_alias(PRIMARY_KEY, Value::from(true))
            .unwrap();
        properties.apply(&record, &mut field).unwrap();

        assert_eq!(field.header(), Some("Code"));
        assert!(field.is_primary_key());
        assert!(!field.is_nullable());
    }

    #[test]
    fn test_records_sort_by_field_name() {
        let properties = FieldProperties::new();
        let a = properties.record(&Field::new("A", Kind::Long)).unwrap();
        let b = properties.record(&Field::new("B", Kind::Long)).unwrap();
        assert!(a < b);
    }
}
