// Typed values, field metadata and records

pub mod definition;
pub mod error;
pub mod field;
pub mod field_list;
pub mod json;
pub mod messages;
pub mod order;
pub mod properties;
pub mod record;
pub mod schema;
pub mod types;
pub mod validator;
pub mod value;

pub use error::{Error, ErrorKind, TypeError};
pub use field::{Calculator, Field, PossibleValue};
pub use field_list::FieldList;
pub use order::{Order, OrderKey};
pub use record::{Persistor, Record};
pub use types::{Category, Kind};
pub use validator::{DefaultFieldValidator, Validator};
pub use value::Value;
