// Rows of values bound to a field list

use crate::error::Error;
use crate::field::Field;
use crate::field_list::FieldList;
use crate::order::{Order, OrderKey};
use crate::types;
use crate::value::Value;
use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Storage collaborator a record was loaded from or is saved through
pub trait Persistor {
    /// Name of the backing table or query
    fn source(&self) -> &str;
}

/// One row: a value per field of a shared field list.
///
/// `values[i]` always belongs to the i-th field. Every write marks its slot
/// modified. Records compare by primary key only.
pub struct Record {
    fields: Rc<FieldList>,
    values: Vec<Value>,
    modified: Vec<bool>,
    persistor: Option<Weak<dyn Persistor>>,
    properties: HashMap<String, Rc<dyn Any>>,
}

impl Record {
    /// Record holding each field's default value
    pub fn new(fields: Rc<FieldList>) -> Self {
        let values = fields.default_values();
        Record::from_parts(fields, values)
    }

    /// Record holding `values`, which must line up with `fields`
    pub fn with_values(fields: Rc<FieldList>, values: Vec<Value>) -> Result<Self, Error> {
        fields.validate_values(&values)?;
        Ok(Record::from_parts(fields, values))
    }

    fn from_parts(fields: Rc<FieldList>, values: Vec<Value>) -> Self {
        let modified = vec![false; values.len()];
        Record {
            fields,
            values,
            modified,
            persistor: None,
            properties: HashMap::new(),
        }
    }

    pub fn field_list(&self) -> &Rc<FieldList> {
        &self.fields
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn field(&self, index: usize) -> Result<&Field, Error> {
        self.fields.field(index)
    }

    fn index_of(&self, alias: &str) -> Result<usize, Error> {
        self.fields
            .index_of(alias)
            .ok_or_else(|| Error::UnknownField(alias.to_string()))
    }

    fn read(&self, index: usize, field: &Field) -> Value {
        match field.calculator() {
            Some(calculator) => calculator.calculate(self),
            None => self.values[index].clone(),
        }
    }

    /// Value at `index`; calculated fields are computed instead of read
    pub fn value(&self, index: usize) -> Result<Value, Error> {
        let field = self.fields.field(index)?;
        Ok(self.read(index, field))
    }

    pub fn value_by_alias(&self, alias: &str) -> Result<Value, Error> {
        self.value(self.index_of(alias)?)
    }

    /// Stored slot at `index`, bypassing any calculator
    pub fn stored_value(&self, index: usize) -> Result<&Value, Error> {
        self.values.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.values.len(),
        })
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Store `value` at `index` and mark it modified; the kind must match the field
    pub fn set_value(&mut self, index: usize, value: Value) -> Result<(), Error> {
        let field = self.fields.field(index)?;
        types::check(field.kind(), value.kind()).map_err(|_| Error::FieldKind {
            field: field.name().to_string(),
            expected: field.kind(),
            actual: value.kind(),
        })?;
        self.values[index] = value;
        self.modified[index] = true;
        Ok(())
    }

    pub fn set_value_by_alias(&mut self, alias: &str, value: Value) -> Result<(), Error> {
        let index = self.index_of(alias)?;
        self.set_value(index, value)
    }

    pub fn set_null(&mut self, index: usize) -> Result<(), Error> {
        let null = self.fields.field(index)?.null_value();
        self.set_value(index, null)
    }

    /// Replace every value at once; all slots become modified
    pub fn set_values(&mut self, values: Vec<Value>) -> Result<(), Error> {
        self.fields.validate_values(&values)?;
        self.values = values;
        self.modified.iter_mut().for_each(|m| *m = true);
        Ok(())
    }

    pub fn is_modified(&self, index: usize) -> bool {
        self.modified.get(index).copied().unwrap_or(false)
    }

    pub fn is_record_modified(&self) -> bool {
        self.modified.iter().any(|&m| m)
    }

    pub fn clear_modified(&mut self) {
        self.modified.iter_mut().for_each(|m| *m = false);
    }

    /// Ascending key over the primary-key fields
    pub fn primary_key(&self) -> OrderKey {
        let mut key = OrderKey::new();
        for &index in self.fields.primary_key_indices() {
            key.add(self.read(index, &self.fields.fields()[index]), true);
        }
        key
    }

    /// Key for `order`, resolving each segment's field by alias
    pub fn order_key(&self, order: &Order) -> Result<OrderKey, Error> {
        let mut key = OrderKey::new();
        for segment in order.segments() {
            let value = self.value_by_alias(segment.field.alias())?;
            key.add(value, segment.ascending);
        }
        Ok(key)
    }

    /// Order by the primary order of this record's field list
    pub fn compare(&self, other: &Record) -> Result<Ordering, Error> {
        let order = self.fields.primary_order();
        self.order_key(order)?.compare(&other.order_key(order)?)
    }

    /// Values of local persistent fields, in field order
    pub fn persistent_values(&self) -> Vec<Value> {
        self.fields
            .persistent_indices()
            .iter()
            .map(|&index| self.read(index, &self.fields.fields()[index]))
            .collect()
    }

    /// Field flagged as main description, else the first one of variable width
    pub fn main_description(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.is_main_description())
            .or_else(|| self.fields.iter().find(|f| !f.is_fixed_width()))
    }

    pub fn has_main_description(&self) -> bool {
        self.main_description().is_some()
    }

    /// Copy sharing this record's field list
    pub fn copy(&self) -> Record {
        Record {
            fields: Rc::clone(&self.fields),
            values: self.values.iter().map(Value::copy).collect(),
            modified: self.modified.clone(),
            persistor: self.persistor.clone(),
            properties: HashMap::new(),
        }
    }

    /// Copy with its own clone of the field list
    pub fn copy_data_and_fields(&self) -> Record {
        let mut copy = self.copy();
        copy.fields = Rc::new(FieldList::clone(&self.fields));
        copy
    }

    pub fn set_persistor(&mut self, persistor: Option<&Rc<dyn Persistor>>) {
        self.persistor = persistor.map(Rc::downgrade);
    }

    pub fn persistor(&self) -> Option<Rc<dyn Persistor>> {
        self.persistor.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_property<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.properties.insert(key.into(), Rc::new(value));
    }

    pub fn property<T: Any>(&self, key: &str) -> Option<&T> {
        self.properties.get(key).and_then(|p| p.downcast_ref::<T>())
    }

    pub fn remove_property(&mut self, key: &str) -> bool {
        self.properties.remove(key).is_some()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Record) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Record) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, field) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", field.alias(), self.read(index, field).literal())?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("values", &self.values)
            .field("modified", &self.modified)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
