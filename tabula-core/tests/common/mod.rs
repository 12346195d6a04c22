// Test utilities and generators for tabula property-based testing

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::rc::Rc;
use tabula_core::types::Category;
use tabula_core::{Field, FieldList, Kind, Record, Value};

/// Generate any kind
pub fn arb_kind() -> impl Strategy<Value = Kind> {
    prop::sample::select(Kind::ALL.to_vec())
}

/// Generate calendar dates between 1900 and 2100
pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Generate times of day with whole seconds
pub fn arb_time() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap())
}

pub fn arb_timestamp() -> impl Strategy<Value = NaiveDateTime> {
    (arb_date(), arb_time()).prop_map(|(date, time)| date.and_time(time))
}

/// Generate decimals with up to six fractional digits
pub fn arb_decimal() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000i64..1_000_000_000, 0u32..6).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Generate a non-null value of `kind`
pub fn arb_present_value(kind: Kind) -> BoxedStrategy<Value> {
    match kind {
        Kind::Boolean => any::<bool>().prop_map(Value::from).boxed(),
        Kind::String => "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from).boxed(),
        Kind::Decimal => arb_decimal().prop_map(Value::from).boxed(),
        Kind::Double => (-1.0e12f64..1.0e12).prop_map(Value::from).boxed(),
        Kind::Integer => any::<i32>().prop_map(Value::from).boxed(),
        Kind::Long => any::<i64>().prop_map(Value::from).boxed(),
        Kind::Date => arb_date().prop_map(Value::from).boxed(),
        Kind::Time => arb_time().prop_map(Value::from).boxed(),
        Kind::Timestamp => arb_timestamp().prop_map(Value::from).boxed(),
        Kind::ByteArray => prop::collection::vec(any::<u8>(), 0..16)
            .prop_map(Value::from)
            .boxed(),
    }
}

/// Generate a value of `kind`, null about one time in eight
pub fn arb_value_of(kind: Kind) -> BoxedStrategy<Value> {
    prop_oneof![
        1 => Just(Value::null(kind)),
        7 => arb_present_value(kind),
    ]
    .boxed()
}

/// Generate a value of any kind
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_kind().prop_flat_map(arb_value_of)
}

/// Generate two values whose kinds share a category
pub fn arb_comparable_pair() -> impl Strategy<Value = (Value, Value)> {
    arb_kind().prop_flat_map(|left| {
        let partners = Kind::ALL
            .iter()
            .copied()
            .filter(|right| right.category() == left.category())
            .collect::<Vec<_>>();
        (
            arb_value_of(left),
            prop::sample::select(partners).prop_flat_map(arb_value_of),
        )
    })
}

/// Generate two values whose kinds cannot be compared
pub fn arb_incomparable_pair() -> impl Strategy<Value = (Value, Value)> {
    (arb_kind(), arb_kind())
        .prop_filter("kinds share a category", |(a, b)| a.category() != b.category())
        .prop_flat_map(|(a, b)| (arb_value_of(a), arb_value_of(b)))
}

/// Generate sort keys as integers paired with a direction
pub fn arb_key_parts() -> impl Strategy<Value = Vec<(Option<i64>, bool)>> {
    prop::collection::vec((prop::option::of(-50i64..50), any::<bool>()), 0..5)
}

pub fn is_numeric_pair(a: &Value, b: &Value) -> bool {
    a.kind().category() == Category::Numeric && b.kind().category() == Category::Numeric
}

/// Ledger schema keyed by REGION then ID
pub fn ledger_fields() -> Rc<FieldList> {
    Rc::new(FieldList::from_fields(vec![
        Field::new("REGION", Kind::String).with_primary_key(true),
        Field::new("ID", Kind::Long).with_primary_key(true),
        Field::new("AMOUNT", Kind::Decimal).with_decimals(2),
        Field::new("BOOKED", Kind::Date),
    ]))
}

/// Generate ledger records with non-null keys
pub fn arb_ledger_record(fields: Rc<FieldList>) -> impl Strategy<Value = Record> {
    (
        prop::sample::select(vec!["EU", "NA", "APAC"]),
        0i64..20,
        arb_value_of(Kind::Decimal),
        arb_value_of(Kind::Date),
    )
        .prop_map(move |(region, id, amount, booked)| {
            Record::with_values(
                Rc::clone(&fields),
                vec![Value::from(region), Value::from(id), amount, booked],
            )
            .unwrap()
        })
}
