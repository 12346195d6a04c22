// Field metadata: kind, constraints, display attributes and validation

use crate::error::Error;
use crate::record::Record;
use crate::schema::{Relation, Table, View};
use crate::types::Kind;
use crate::validator::Validator;
use crate::value::Value;
use bstr::BString;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;
use std::fmt;
use std::rc::{Rc, Weak};

/// Computes the value of a calculated field from the rest of its record
pub trait Calculator {
    fn calculate(&self, record: &Record) -> Value;
}

impl<F> Calculator for F
where
    F: Fn(&Record) -> Value,
{
    fn calculate(&self, record: &Record) -> Value {
        self(record)
    }
}

/// A value a field may take, with its display label
#[derive(Debug, Clone, PartialEq)]
pub struct PossibleValue {
    pub value: Value,
    pub label: String,
}

/// Metadata for one column
#[derive(Clone)]
pub struct Field {
    name: String,
    alias: Option<String>,
    kind: Kind,
    length: u32,
    decimals: u32,
    label: Option<String>,
    header: Option<String>,
    title: Option<String>,
    description: Option<String>,
    display_length: Option<u32>,
    display_decimals: Option<u32>,
    required: bool,
    nullable: bool,
    primary_key: bool,
    persistent: bool,
    main_description: bool,
    fixed_width: Option<bool>,
    minimum: Option<Value>,
    maximum: Option<Value>,
    possible_values: Vec<PossibleValue>,
    function: Option<String>,
    calculator: Option<Rc<dyn Calculator>>,
    table: Option<Weak<Table>>,
    view: Option<Weak<View>>,
    validators: Vec<Rc<dyn Validator>>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Field {
            name: name.into(),
            alias: None,
            kind,
            length: 0,
            decimals: 0,
            label: None,
            header: None,
            title: None,
            description: None,
            display_length: None,
            display_decimals: None,
            required: false,
            nullable: true,
            primary_key: false,
            persistent: true,
            main_description: false,
            fixed_width: None,
            minimum: None,
            maximum: None,
            possible_values: Vec::new(),
            function: None,
            calculator: None,
            table: None,
            view: None,
            validators: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.set_alias(alias);
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.set_length(length);
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.set_decimals(decimals);
        self
    }

    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.set_primary_key(primary_key);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.set_required(required);
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.set_nullable(nullable);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.set_label(Some(label.into()));
        self
    }

    pub fn with_validator(mut self, validator: Rc<dyn Validator>) -> Self {
        self.add_validator(validator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Alias, falling back to the name
    pub fn alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = Some(alias.into());
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: Kind) {
        self.kind = kind;
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn set_length(&mut self, length: u32) {
        self.length = length;
    }

    /// Decimal places; always 0 unless the kind is Decimal or Double
    pub fn decimals(&self) -> u32 {
        match self.kind {
            Kind::Decimal | Kind::Double => self.decimals,
            _ => 0,
        }
    }

    pub fn set_decimals(&mut self, decimals: u32) {
        self.decimals = decimals;
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn set_header(&mut self, header: Option<String>) {
        self.header = header;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// First of label, header, title and description that is set, else the alias
    pub fn display_text(&self) -> &str {
        self.label
            .as_deref()
            .or(self.header.as_deref())
            .or(self.title.as_deref())
            .or(self.description.as_deref())
            .unwrap_or_else(|| self.alias())
    }

    pub fn display_length(&self) -> u32 {
        self.display_length.unwrap_or(self.length)
    }

    pub fn set_display_length(&mut self, display_length: u32) {
        self.display_length = Some(display_length);
    }

    /// Explicit display decimals, else whatever `decimals()` reports
    pub fn display_decimals(&self) -> u32 {
        self.display_decimals.unwrap_or_else(|| self.decimals())
    }

    pub fn set_display_decimals(&mut self, display_decimals: u32) {
        self.display_decimals = Some(display_decimals);
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Primary key fields are never nullable
    pub fn set_primary_key(&mut self, primary_key: bool) {
        self.primary_key = primary_key;
        if primary_key {
            self.nullable = false;
        }
    }

    /// Persistent unless flagged otherwise or virtual
    pub fn is_persistent(&self) -> bool {
        self.persistent && !self.is_virtual()
    }

    pub fn set_persistent(&mut self, persistent: bool) {
        self.persistent = persistent;
    }

    pub fn is_main_description(&self) -> bool {
        self.main_description
    }

    pub fn set_main_description(&mut self, main_description: bool) {
        self.main_description = main_description;
    }

    /// Explicit setting, else every kind but String renders at fixed width
    pub fn is_fixed_width(&self) -> bool {
        self.fixed_width.unwrap_or(!self.kind.is_string())
    }

    pub fn set_fixed_width(&mut self, fixed_width: bool) {
        self.fixed_width = Some(fixed_width);
    }

    pub fn minimum(&self) -> Option<&Value> {
        self.minimum.as_ref()
    }

    pub fn set_minimum(&mut self, minimum: Option<Value>) {
        self.minimum = minimum;
    }

    pub fn maximum(&self) -> Option<&Value> {
        self.maximum.as_ref()
    }

    pub fn set_maximum(&mut self, maximum: Option<Value>) {
        self.maximum = maximum;
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn set_function(&mut self, function: Option<String>) {
        self.function = function;
    }

    /// Virtual fields are computed by a SQL function and have no column
    pub fn is_virtual(&self) -> bool {
        self.function.is_some()
    }

    pub fn calculator(&self) -> Option<&Rc<dyn Calculator>> {
        self.calculator.as_ref()
    }

    pub fn set_calculator(&mut self, calculator: Option<Rc<dyn Calculator>>) {
        self.calculator = calculator;
    }

    pub fn is_calculated(&self) -> bool {
        self.calculator.is_some()
    }
}

/// Possible values
impl Field {
    /// Add a possible value; a value already present is ignored
    pub fn add_possible_value(&mut self, value: Value, label: impl Into<String>) {
        if self.possible_values.iter().any(|p| p.value == value) {
            return;
        }
        self.possible_values.push(PossibleValue {
            value,
            label: label.into(),
        });
    }

    pub fn possible_values(&self) -> &[PossibleValue] {
        &self.possible_values
    }

    pub fn has_possible_values(&self) -> bool {
        !self.possible_values.is_empty()
    }

    pub fn is_possible_value(&self, value: &Value) -> bool {
        self.possible_values.iter().any(|p| p.value == *value)
    }

    pub fn clear_possible_values(&mut self) {
        self.possible_values.clear();
    }

    /// Value registered under `label`
    pub fn possible_value(&self, label: &str) -> Result<&Value, Error> {
        self.possible_values
            .iter()
            .find(|p| p.label == label)
            .map(|p| &p.value)
            .ok_or_else(|| Error::UnknownPossibleValue {
                field: self.alias().to_string(),
                label: label.to_string(),
            })
    }

    pub fn possible_label(&self, value: &Value) -> Option<&str> {
        self.possible_values
            .iter()
            .find(|p| p.value == *value)
            .map(|p| p.label.as_str())
    }
}

/// Validation
impl Field {
    pub fn add_validator(&mut self, validator: Rc<dyn Validator>) {
        self.validators.push(validator);
    }

    pub fn validators(&self) -> &[Rc<dyn Validator>] {
        &self.validators
    }

    pub fn clear_validators(&mut self) {
        self.validators.clear();
    }

    /// Run validators in registration order, stopping at the first failure
    pub fn validate(&self, value: &Value) -> bool {
        self.validators.iter().all(|v| v.validate(self, value))
    }

    /// First non-empty message produced by a validator
    pub fn validation_message(&self, value: &Value) -> Option<String> {
        self.validators
            .iter()
            .filter_map(|v| v.validation_message(self, value))
            .find(|message| !message.is_empty())
    }
}

/// Default and null values
impl Field {
    pub fn default_value(&self) -> Value {
        match self.kind {
            Kind::Boolean => Value::from(false),
            Kind::ByteArray => Value::from(BString::from(Vec::new())),
            Kind::Date | Kind::Time | Kind::Timestamp => Value::null(self.kind),
            Kind::Decimal => Value::from(self.scale(Decimal::ZERO)),
            Kind::Double => Value::from(0.0),
            Kind::Integer => Value::from(0i32),
            Kind::Long => Value::from(0i64),
            Kind::String => Value::from(String::new()),
        }
    }

    pub fn null_value(&self) -> Value {
        Value::null(self.kind)
    }

    /// Round half-up to this field's decimals and pad to that scale
    pub fn scale(&self, decimal: Decimal) -> Decimal {
        let decimals = self.decimals();
        let mut scaled = decimal.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
        scaled.rescale(decimals);
        scaled
    }
}

/// Parent table and view
impl Field {
    pub fn set_table(&mut self, table: Option<&Rc<Table>>) {
        self.table = table.map(Rc::downgrade);
    }

    pub fn table(&self) -> Option<Rc<Table>> {
        self.table.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_view(&mut self, view: Option<&Rc<View>>) {
        self.view = view.map(Rc::downgrade);
    }

    pub fn view(&self) -> Option<Rc<View>> {
        self.view.as_ref().and_then(Weak::upgrade)
    }

    pub fn relations(&self) -> Vec<Relation> {
        if let Some(view) = self.view() {
            view.relations.clone()
        } else if let Some(table) = self.table() {
            table.relations()
        } else {
            Vec::new()
        }
    }

    /// Joined into a view from a table other than the view's master
    pub fn is_foreign(&self) -> bool {
        match (self.table(), self.view()) {
            (Some(table), Some(view)) => {
                view.master_table != table.name && view.joins_foreign(&table.name)
            }
            _ => false,
        }
    }

    pub fn is_local(&self) -> bool {
        !self.is_foreign()
    }
}

/// Column names for SQL construction
impl Field {
    fn qualified_name(&self) -> String {
        match self.table() {
            Some(table) => {
                let qualifier = table.alias.as_deref().unwrap_or(&table.name);
                format!("{}.{}", qualifier, self.name)
            }
            None => self.name.clone(),
        }
    }

    fn function_expression(&self) -> Option<String> {
        self.function.as_ref().map(|f| format!("({})", f))
    }

    pub fn name_select(&self) -> String {
        match self.function_expression() {
            Some(expression) => format!("{} AS {}", expression, self.alias()),
            None if self.alias() != self.name => {
                format!("{} AS {}", self.qualified_name(), self.alias())
            }
            None => self.qualified_name(),
        }
    }

    pub fn name_where(&self) -> String {
        self.function_expression()
            .unwrap_or_else(|| self.qualified_name())
    }

    pub fn name_group_by(&self) -> String {
        self.name_where()
    }

    pub fn name_order_by(&self) -> String {
        self.name_where()
    }

    pub fn name_update(&self) -> String {
        self.name.clone()
    }
}

/// Fields match on alias, kind, length and decimals, regardless of identity
impl PartialEq for Field {
    fn eq(&self, other: &Field) -> bool {
        self.alias() == other.alias()
            && self.kind == other.kind
            && self.length == other.length
            && self.decimals() == other.decimals()
    }
}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Field) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else {
            Some(self.alias().cmp(other.alias()))
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("alias", &self.alias())
            .field("kind", &self.kind)
            .field("length", &self.length)
            .field("decimals", &self.decimals())
            .field("primary_key", &self.primary_key)
            .field("nullable", &self.nullable)
            .field("function", &self.function)
            .field("validators", &self.validators.len())
            .finish_non_exhaustive()
    }
}
