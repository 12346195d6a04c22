// Kind-tagged scalar values

use crate::error::TypeError;
use crate::types::Kind;
use bstr::{BString, ByteSlice};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;

/// Immutable scalar value; `None` payload is the null of that kind
#[derive(Debug, Clone)]
pub enum Value {
    Boolean(Option<bool>),
    String(Option<String>),
    Decimal(Option<Decimal>),
    Double(Option<f64>),
    Integer(Option<i32>),
    Long(Option<i64>),
    Date(Option<NaiveDate>),
    Time(Option<NaiveTime>),
    Timestamp(Option<NaiveDateTime>),
    ByteArray(Option<BString>),
}

/// Numeric payload widened for cross-kind comparison
#[derive(Debug, Clone, Copy)]
enum Number {
    Integral(i64),
    Exact(Decimal),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Integral(n) => n as f64,
            Number::Exact(d) => d.to_f64().unwrap_or(f64::NAN),
            Number::Float(f) => f,
        }
    }

    // Only called on non-float pairs.
    fn as_decimal(self) -> Decimal {
        match self {
            Number::Integral(n) => Decimal::from(n),
            Number::Exact(d) => d,
            Number::Float(f) => Decimal::from_f64(f).unwrap_or_default(),
        }
    }
}

fn compare_numbers(a: Number, b: Number) -> Ordering {
    match (a, b) {
        (Number::Integral(x), Number::Integral(y)) => x.cmp(&y),
        (Number::Float(_), _) | (_, Number::Float(_)) => compare_floats(a.as_f64(), b.as_f64()),
        _ => a.as_decimal().cmp(&b.as_decimal()),
    }
}

/// Total order over doubles, NaN sorts after every number
fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Date a Time value is projected onto when read as a date-time
fn epoch_date() -> NaiveDate {
    NaiveDate::default()
}

impl Value {
    /// The null value of `kind`
    pub fn null(kind: Kind) -> Value {
        match kind {
            Kind::Boolean => Value::Boolean(None),
            Kind::String => Value::String(None),
            Kind::Decimal => Value::Decimal(None),
            Kind::Double => Value::Double(None),
            Kind::Integer => Value::Integer(None),
            Kind::Long => Value::Long(None),
            Kind::Date => Value::Date(None),
            Kind::Time => Value::Time(None),
            Kind::Timestamp => Value::Timestamp(None),
            Kind::ByteArray => Value::ByteArray(None),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Boolean(_) => Kind::Boolean,
            Value::String(_) => Kind::String,
            Value::Decimal(_) => Kind::Decimal,
            Value::Double(_) => Kind::Double,
            Value::Integer(_) => Kind::Integer,
            Value::Long(_) => Kind::Long,
            Value::Date(_) => Kind::Date,
            Value::Time(_) => Kind::Time,
            Value::Timestamp(_) => Kind::Timestamp,
            Value::ByteArray(_) => Kind::ByteArray,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::Boolean(v) => v.is_none(),
            Value::String(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Double(v) => v.is_none(),
            Value::Integer(v) => v.is_none(),
            Value::Long(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::ByteArray(v) => v.is_none(),
        }
    }

    /// Null, an empty string or a numeric zero
    pub fn is_empty(&self) -> bool {
        match self {
            _ if self.is_null() => true,
            Value::String(Some(s)) => s.is_empty(),
            Value::Decimal(Some(d)) => d.is_zero(),
            Value::Double(Some(f)) => *f == 0.0,
            Value::Integer(Some(n)) => *n == 0,
            Value::Long(Some(n)) => *n == 0,
            _ => false,
        }
    }

    /// Empty, or a string made only of whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Value::String(Some(s)) => s.trim().is_empty(),
            _ => self.is_empty(),
        }
    }

    /// Independently owned copy of this value.
    ///
    /// Every payload is owned, so the copy never shares a buffer with
    /// `self`; mutating a copied byte array leaves the original untouched.
    pub fn copy(&self) -> Value {
        self.clone()
    }

    /// Order two values of the same comparable category.
    ///
    /// A null sorts before every non-null of its category and two nulls are
    /// equal. Numbers compare across Decimal, Double, Integer and Long;
    /// dates, times and timestamps compare through their date-time
    /// projection.
    pub fn compare(&self, other: &Value) -> Result<Ordering, TypeError> {
        let (left, right) = (self.kind(), other.kind());
        if !left.is_comparable_with(right) {
            return Err(TypeError::Incomparable { left, right });
        }

        match (self.is_null(), other.is_null()) {
            (true, true) => return Ok(Ordering::Equal),
            (true, false) => return Ok(Ordering::Less),
            (false, true) => return Ok(Ordering::Greater),
            (false, false) => {}
        }

        match (self, other) {
            (Value::Boolean(Some(a)), Value::Boolean(Some(b))) => Ok(a.cmp(b)),
            (Value::String(Some(a)), Value::String(Some(b))) => Ok(a.cmp(b)),
            (Value::ByteArray(Some(a)), Value::ByteArray(Some(b))) => Ok(a.cmp(b)),
            _ if left.is_numeric() => match (self.number(), other.number()) {
                (Some(a), Some(b)) => Ok(compare_numbers(a, b)),
                _ => Err(TypeError::Incomparable { left, right }),
            },
            _ => match (self.temporal("compare")?, other.temporal("compare")?) {
                (Some(a), Some(b)) => Ok(a.cmp(&b)),
                _ => Err(TypeError::Incomparable { left, right }),
            },
        }
    }

    fn number(&self) -> Option<Number> {
        match self {
            Value::Decimal(Some(d)) => Some(Number::Exact(*d)),
            Value::Double(Some(f)) => Some(Number::Float(*f)),
            Value::Integer(Some(n)) => Some(Number::Integral(i64::from(*n))),
            Value::Long(Some(n)) => Some(Number::Integral(*n)),
            _ => None,
        }
    }

    /// Numeric payload; a null number reads as zero
    fn numeric(&self, operation: &'static str) -> Result<Number, TypeError> {
        let kind = self.kind();
        if !kind.is_numeric() {
            return Err(TypeError::Unsupported { operation, kind });
        }
        Ok(self.number().unwrap_or(Number::Integral(0)))
    }

    /// Canonical date-time projection of a temporal value
    fn temporal(&self, operation: &'static str) -> Result<Option<NaiveDateTime>, TypeError> {
        match self {
            Value::Date(d) => Ok(d.map(|d| d.and_time(NaiveTime::MIN))),
            Value::Time(t) => Ok(t.map(|t| epoch_date().and_time(t))),
            Value::Timestamp(ts) => Ok(*ts),
            _ => Err(TypeError::Unsupported {
                operation,
                kind: self.kind(),
            }),
        }
    }

    fn conversion(&self, reason: impl Into<String>) -> TypeError {
        TypeError::Conversion {
            kind: self.kind(),
            reason: reason.into(),
        }
    }
}

/// Type-safe extractors for values
impl Value {
    pub fn boolean(&self) -> Result<Option<bool>, TypeError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(TypeError::Unsupported {
                operation: "boolean",
                kind: self.kind(),
            }),
        }
    }

    pub fn string(&self) -> Result<Option<&str>, TypeError> {
        match self {
            Value::String(s) => Ok(s.as_deref()),
            _ => Err(TypeError::Unsupported {
                operation: "string",
                kind: self.kind(),
            }),
        }
    }

    pub fn byte_array(&self) -> Result<Option<&[u8]>, TypeError> {
        match self {
            Value::ByteArray(b) => Ok(b.as_ref().map(|b| b.as_slice())),
            _ => Err(TypeError::Unsupported {
                operation: "byte_array",
                kind: self.kind(),
            }),
        }
    }

    pub fn decimal(&self) -> Result<Decimal, TypeError> {
        match self.numeric("decimal")? {
            Number::Integral(n) => Ok(Decimal::from(n)),
            Number::Exact(d) => Ok(d),
            Number::Float(f) => {
                Decimal::from_f64(f).ok_or_else(|| self.conversion(format!("{} is not a finite decimal", f)))
            }
        }
    }

    pub fn double(&self) -> Result<f64, TypeError> {
        match self.numeric("double")? {
            Number::Integral(n) => Ok(n as f64),
            Number::Exact(d) => d
                .to_f64()
                .ok_or_else(|| self.conversion(format!("{} does not fit a double", d))),
            Number::Float(f) => Ok(f),
        }
    }

    /// Integer payload, truncating fractions; fails on overflow
    pub fn integer(&self) -> Result<i32, TypeError> {
        let converted = match self.numeric("integer")? {
            Number::Integral(n) => i32::try_from(n).ok(),
            Number::Exact(d) => d.trunc().to_i32(),
            Number::Float(f) => f.to_i32(),
        };
        converted.ok_or_else(|| self.conversion(format!("{} does not fit an integer", self)))
    }

    /// Long payload, truncating fractions; fails on overflow
    pub fn long(&self) -> Result<i64, TypeError> {
        let converted = match self.numeric("long")? {
            Number::Integral(n) => Some(n),
            Number::Exact(d) => d.trunc().to_i64(),
            Number::Float(f) => f.to_i64(),
        };
        converted.ok_or_else(|| self.conversion(format!("{} does not fit a long", self)))
    }

    pub fn date(&self) -> Result<Option<NaiveDate>, TypeError> {
        Ok(self.temporal("date")?.map(|dt| dt.date()))
    }

    pub fn time(&self) -> Result<Option<NaiveTime>, TypeError> {
        Ok(self.temporal("time")?.map(|dt| dt.time()))
    }

    pub fn date_time(&self) -> Result<Option<NaiveDateTime>, TypeError> {
        self.temporal("date_time")
    }

    /// Render for record listings: strings and temporals are single-quoted
    pub fn literal(&self) -> String {
        match self {
            _ if self.is_null() => "null".to_string(),
            Value::String(Some(s)) => format!("'{}'", s.replace('\'', "''")),
            Value::Date(_) | Value::Time(_) | Value::Timestamp(_) => format!("'{}'", self),
            _ => self.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.compare(other) == Ok(Ordering::Equal)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(Some(b)) => write!(f, "{}", b),
            Value::String(Some(s)) => f.write_str(s),
            Value::Decimal(Some(d)) => write!(f, "{}", d),
            Value::Double(Some(d)) => write!(f, "{}", d),
            Value::Integer(Some(n)) => write!(f, "{}", n),
            Value::Long(Some(n)) => write!(f, "{}", n),
            Value::Date(Some(d)) => write!(f, "{}", d),
            Value::Time(Some(t)) => write!(f, "{}", t),
            Value::Timestamp(Some(ts)) => write!(f, "{}", ts),
            // valid UTF-8 as text, anything else as \xNN escapes
            Value::ByteArray(Some(b)) => {
                for chunk in b.utf8_chunks() {
                    f.write_str(chunk.valid())?;
                    for byte in chunk.invalid() {
                        write!(f, "\\x{:02X}", byte)?;
                    }
                }
                Ok(())
            }
            _ => f.write_str("null"),
        }
    }
}

// Construction, one payload type per kind

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(Some(b))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Some(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Some(s))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(Some(d))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(Some(f))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(Some(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(Some(n))
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(Some(d))
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(Some(t))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(Some(ts))
    }
}

impl From<BString> for Value {
    fn from(b: BString) -> Self {
        Value::ByteArray(Some(b))
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::ByteArray(Some(BString::from(b)))
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::ByteArray(Some(BString::from(b)))
    }
}

// Equality against raw payloads coerces the raw side into a value first

macro_rules! impl_raw_eq {
    ($($raw:ty),* $(,)?) => {
        $(
            impl PartialEq<$raw> for Value {
                fn eq(&self, other: &$raw) -> bool {
                    *self == Value::from(other.clone())
                }
            }
        )*
    };
}

impl_raw_eq!(bool, i32, i64, f64, Decimal, String, NaiveDate, NaiveTime, NaiveDateTime);

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        *self == Value::from(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        *self == Value::from(*other)
    }
}

impl PartialEq<[u8]> for Value {
    fn eq(&self, other: &[u8]) -> bool {
        *self == Value::from(other)
    }
}
