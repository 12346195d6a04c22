// Closed set of value kinds and kind inspection helpers

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a value or field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Boolean,
    String,
    Decimal,
    Double,
    Integer,
    Long,
    Date,
    Time,
    Timestamp,
    ByteArray,
}

/// Comparison category; values compare only within one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Boolean,
    Numeric,
    String,
    Temporal,
    Binary,
}

impl Kind {
    pub const ALL: [Kind; 10] = [
        Kind::Boolean,
        Kind::String,
        Kind::Decimal,
        Kind::Double,
        Kind::Integer,
        Kind::Long,
        Kind::Date,
        Kind::Time,
        Kind::Timestamp,
        Kind::ByteArray,
    ];

    pub fn category(self) -> Category {
        match self {
            Kind::Boolean => Category::Boolean,
            Kind::String => Category::String,
            Kind::Decimal | Kind::Double | Kind::Integer | Kind::Long => Category::Numeric,
            Kind::Date | Kind::Time | Kind::Timestamp => Category::Temporal,
            Kind::ByteArray => Category::Binary,
        }
    }

    /// Whether values of the two kinds can be compared with each other
    pub fn is_comparable_with(self, other: Kind) -> bool {
        self.category() == other.category()
    }

    pub fn is_numeric(self) -> bool {
        self.category() == Category::Numeric
    }

    /// Integer or Long
    pub fn is_integral(self) -> bool {
        matches!(self, Kind::Integer | Kind::Long)
    }

    pub fn is_temporal(self) -> bool {
        self.category() == Category::Temporal
    }

    pub fn is_string(self) -> bool {
        self == Kind::String
    }

    pub fn is_boolean(self) -> bool {
        self == Kind::Boolean
    }

    pub fn is_byte_array(self) -> bool {
        self == Kind::ByteArray
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Boolean => "boolean",
            Kind::String => "string",
            Kind::Decimal => "decimal",
            Kind::Double => "double",
            Kind::Integer => "integer",
            Kind::Long => "long",
            Kind::Date => "date",
            Kind::Time => "time",
            Kind::Timestamp => "timestamp",
            Kind::ByteArray => "byte_array",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fail unless `actual` is exactly `expected`
pub fn check(expected: Kind, actual: Kind) -> Result<(), TypeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(TypeError::Mismatch { expected, actual })
    }
}
