// Ordered, alias-indexed collection of fields

use crate::error::Error;
use crate::field::Field;
use crate::order::Order;
use crate::value::Value;
use std::cell::OnceCell;
use std::collections::HashMap;

/// Fields in insertion order, with lazily rebuilt lookups.
///
/// The alias map, primary-key and persistent projections and the primary
/// order are computed on first read and dropped on any structural change.
/// Aliases are expected to be unique; with duplicates, lookups resolve to
/// the first field carrying the alias.
#[derive(Debug, Clone, Default)]
pub struct FieldList {
    fields: Vec<Field>,
    aliases: OnceCell<HashMap<String, usize>>,
    primary_key: OnceCell<Vec<usize>>,
    persistent: OnceCell<Vec<usize>>,
    primary_order: OnceCell<Order>,
}

impl FieldList {
    pub fn new() -> Self {
        FieldList::default()
    }

    pub fn from_fields(fields: Vec<Field>) -> Self {
        FieldList {
            fields,
            ..FieldList::default()
        }
    }

    fn invalidate(&mut self) {
        self.aliases.take();
        self.primary_key.take();
        self.persistent.take();
        self.primary_order.take();
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
        self.invalidate();
    }

    pub fn add_fields(&mut self, fields: impl IntoIterator<Item = Field>) {
        self.fields.extend(fields);
        self.invalidate();
    }

    /// Remove the field with `alias`, returning it if present
    pub fn remove_field(&mut self, alias: &str) -> Option<Field> {
        let index = self.index_of(alias)?;
        let removed = self.fields.remove(index);
        self.invalidate();
        Some(removed)
    }

    pub fn remove_fields(&mut self, aliases: &[&str]) -> Vec<Field> {
        aliases
            .iter()
            .filter_map(|alias| self.remove_field(alias))
            .collect()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.invalidate();
    }

    /// Mutable access to a field; cached projections are rebuilt afterwards
    pub fn field_mut(&mut self, alias: &str) -> Option<&mut Field> {
        let index = self.index_of(alias)?;
        self.invalidate();
        self.fields.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Result<&Field, Error> {
        self.fields.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.fields.len(),
        })
    }

    pub fn field_by_alias(&self, alias: &str) -> Option<&Field> {
        self.index_of(alias).map(|index| &self.fields[index])
    }

    pub fn index_of(&self, alias: &str) -> Option<usize> {
        self.alias_map().get(alias).copied()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.index_of(alias).is_some()
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.fields.iter().map(Field::alias).collect()
    }

    fn alias_map(&self) -> &HashMap<String, usize> {
        self.aliases.get_or_init(|| {
            tracing::trace!(fields = self.fields.len(), "rebuilding alias map");
            let mut map = HashMap::with_capacity(self.fields.len());
            for (index, field) in self.fields.iter().enumerate() {
                map.entry(field.alias().to_string()).or_insert(index);
            }
            map
        })
    }

    /// Indices of local primary-key fields, in insertion order
    pub fn primary_key_indices(&self) -> &[usize] {
        self.primary_key.get_or_init(|| {
            tracing::trace!("rebuilding primary key fields");
            self.indices_where(|f| f.is_primary_key() && f.is_local())
        })
    }

    /// Indices of local persistent fields, in insertion order
    pub fn persistent_indices(&self) -> &[usize] {
        self.persistent.get_or_init(|| {
            tracing::trace!("rebuilding persistent fields");
            self.indices_where(|f| f.is_persistent() && f.is_local())
        })
    }

    fn indices_where(&self, predicate: impl Fn(&Field) -> bool) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| predicate(field))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn primary_key_fields(&self) -> Vec<&Field> {
        self.primary_key_indices()
            .iter()
            .map(|&index| &self.fields[index])
            .collect()
    }

    pub fn persistent_fields(&self) -> Vec<&Field> {
        self.persistent_indices()
            .iter()
            .map(|&index| &self.fields[index])
            .collect()
    }

    /// Primary-key fields, all ascending
    pub fn primary_order(&self) -> &Order {
        self.primary_order.get_or_init(|| {
            tracing::trace!("rebuilding primary order");
            let mut order = Order::new();
            for field in self.primary_key_fields() {
                order.ascending(field.clone());
            }
            order
        })
    }

    pub fn default_values(&self) -> Vec<Value> {
        self.fields.iter().map(Field::default_value).collect()
    }

    /// Check that `values` line up with these fields by count and kind
    pub fn validate_values(&self, values: &[Value]) -> Result<(), Error> {
        if values.len() != self.fields.len() {
            return Err(Error::ValueCount {
                expected: self.fields.len(),
                actual: values.len(),
            });
        }
        for (field, value) in self.fields.iter().zip(values) {
            if field.kind() != value.kind() {
                return Err(Error::FieldKind {
                    field: field.name().to_string(),
                    expected: field.kind(),
                    actual: value.kind(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl FromIterator<Field> for FieldList {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        FieldList::from_fields(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    fn sample() -> FieldList {
        FieldList::from_fields(vec![
            Field::new("REGION", Kind::String).with_primary_key(true),
            Field::new("NAME", Kind::String),
            Field::new("CODE", Kind::Integer).with_primary_key(true),
            Field::new("AMOUNT", Kind::Decimal).with_decimals(2),
        ])
    }

    #[test]
    fn test_alias_lookup() {
        let fields = sample();
        assert_eq!(fields.index_of("CODE"), Some(2));
        assert_eq!(fields.index_of("MISSING"), None);
        assert_eq!(fields.field_by_alias("AMOUNT").map(Field::kind), Some(Kind::Decimal));
        assert!(fields.field(9).is_err());
    }

    #[test]
    fn test_duplicate_alias_resolves_to_first() {
        let mut fields = sample();
        fields.add_field(Field::new("OTHER", Kind::Long).with_alias("NAME"));
        assert_eq!(fields.index_of("NAME"), Some(1));
    }

    #[test]
    fn test_primary_key_fields_keep_insertion_order() {
        let fields = sample();
        let keys: Vec<&str> = fields.primary_key_fields().iter().map(|f| f.alias()).collect();
        assert_eq!(keys, vec!["REGION", "CODE"]);

        let order = fields.primary_order();
        assert_eq!(order.len(), 2);
        assert!(order.segments().iter().all(|s| s.ascending));
    }

    #[test]
    fn test_mutation_invalidates_caches() {
        let mut fields = sample();
        assert_eq!(fields.primary_order().len(), 2);
        assert_eq!(fields.index_of("AMOUNT"), Some(3));

        fields.remove_field("REGION");
        assert_eq!(fields.index_of("AMOUNT"), Some(2));
        assert_eq!(fields.primary_order().len(), 1);

        if let Some(name) = fields.field_mut("NAME") {
            name.set_primary_key(true);
        }
        assert_eq!(fields.primary_key_indices(), &[0, 1]);

        fields.add_field(Field::new("TAG", Kind::String));
        assert_eq!(fields.index_of("TAG"), Some(3));
    }

    #[test]
    fn test_persistent_fields_skip_virtual() {
        let mut fields = sample();
        let mut total = Field::new("TOTAL", Kind::Decimal);
        total.set_function(Some("SUM(AMOUNT)".to_string()));
        fields.add_field(total);
        assert_eq!(fields.persistent_fields().len(), 4);
    }

    #[test]
    fn test_default_values() {
        let defaults = sample().default_values();
        assert_eq!(defaults.len(), 4);
        assert_eq!(defaults[0], "");
        assert_eq!(defaults[2], 0);
        assert_eq!(defaults[3].to_string(), "0.00");
    }

    #[test]
    fn test_validate_values() {
        let fields = sample();
        assert!(fields.validate_values(&fields.default_values()).is_ok());

        let err = fields.validate_values(&[Value::from("x")]).unwrap_err();
        assert_eq!(err, Error::ValueCount { expected: 4, actual: 1 });

        let mut values = fields.default_values();
        values[2] = Value::from(2i64);
        let err = fields.validate_values(&values).unwrap_err();
        assert_eq!(
            err,
            Error::FieldKind {
                field: "CODE".to_string(),
                expected: Kind::Integer,
                actual: Kind::Long,
            }
        );
    }

    #[test]
    fn test_foreign_fields_left_out_of_projections() {
        use crate::record::Record;
        use crate::schema::{ForeignKey, Table, View};
        use std::rc::Rc;

        let mut orders = Table::new("ORDERS");
        orders.foreign_keys.push(ForeignKey {
            name: "FK_CUSTOMER".to_string(),
            foreign_table: "CUSTOMERS".to_string(),
            local_fields: vec!["CUSTOMER_ID".to_string()],
            foreign_fields: vec!["ID".to_string()],
        });
        let mut view = View::new("ORDER_VIEW", "ORDERS");
        view.relations = orders.relations();
        let orders = Rc::new(orders);
        let customers = Rc::new(Table::new("CUSTOMERS"));
        let view = Rc::new(view);

        let mut order_id = Field::new("ID", Kind::Long).with_primary_key(true);
        order_id.set_table(Some(&orders));
        order_id.set_view(Some(&view));
        let mut customer_id = Field::new("CUSTOMER_ID", Kind::Long)
            .with_alias("C_ID")
            .with_primary_key(true);
        customer_id.set_table(Some(&customers));
        customer_id.set_view(Some(&view));
        assert!(customer_id.is_foreign());

        let fields = Rc::new(FieldList::from_fields(vec![order_id, customer_id]));
        let aliases = |list: Vec<&Field>| list.iter().map(|f| f.alias().to_string()).collect::<Vec<_>>();
        assert_eq!(aliases(fields.primary_key_fields()), vec!["ID"]);
        assert_eq!(aliases(fields.persistent_fields()), vec!["ID"]);
        let order = fields
            .primary_order()
            .segments()
            .iter()
            .map(|s| s.field.alias())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["ID"]);

        let mut record = Record::new(Rc::clone(&fields));
        record.set_value(0, Value::from(7i64)).unwrap();
        record.set_value(1, Value::from(99i64)).unwrap();
        let key = record.primary_key();
        assert_eq!(key.len(), 1);
        assert_eq!(key.values().collect::<Vec<_>>(), vec![&Value::from(7i64)]);
    }
}
