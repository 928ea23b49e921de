//! The dataflow engine's value model.
//!
//! A `Datum` is one field of a tuple. Its `Display` form is the engine's text
//! representation, which the default caster also uses as its byte encoding.

use std::collections::BTreeMap;
use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// Type tag of a field, either declared in a schema or inferred from a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Null,
    Boolean,
    #[serde(rename = "int")]
    Integer,
    Long,
    Float,
    Double,
    DateTime,
    ByteArray,
    CharArray,
    BigInteger,
    BigDecimal,
    Map,
    Tuple,
    Bag,
    Error,
}

impl DataType {
    /// Infer the type of a value
    pub fn find_type(datum: &Datum) -> DataType {
        datum.data_type()
    }

    /// The engine's name for this type
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Null => "null",
            DataType::Boolean => "boolean",
            DataType::Integer => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::DateTime => "datetime",
            DataType::ByteArray => "bytearray",
            DataType::CharArray => "chararray",
            DataType::BigInteger => "biginteger",
            DataType::BigDecimal => "bigdecimal",
            DataType::Map => "map",
            DataType::Tuple => "tuple",
            DataType::Bag => "bag",
            DataType::Error => "error",
        }
    }

    /// Parse a type name (case-insensitive)
    pub fn from_name(name: &str) -> Option<DataType> {
        let data_type = match name.trim().to_lowercase().as_str() {
            "null" => DataType::Null,
            "boolean" => DataType::Boolean,
            "int" | "integer" => DataType::Integer,
            "long" => DataType::Long,
            "float" => DataType::Float,
            "double" => DataType::Double,
            "datetime" => DataType::DateTime,
            "bytearray" => DataType::ByteArray,
            "chararray" => DataType::CharArray,
            "biginteger" => DataType::BigInteger,
            "bigdecimal" => DataType::BigDecimal,
            "map" => DataType::Map,
            "tuple" => DataType::Tuple,
            "bag" => DataType::Bag,
            "error" => DataType::Error,
            _ => return None,
        };
        Some(data_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    DateTime(DateTime<FixedOffset>),
    ByteArray(Vec<u8>),
    CharArray(String),
    BigInteger(BigInt),
    BigDecimal(BigDecimal),
    Map(BTreeMap<String, Datum>),
    Tuple(Tuple),
    Bag(DataBag),
}

impl Datum {
    pub fn data_type(&self) -> DataType {
        match self {
            Datum::Null => DataType::Null,
            Datum::Boolean(_) => DataType::Boolean,
            Datum::Integer(_) => DataType::Integer,
            Datum::Long(_) => DataType::Long,
            Datum::Float(_) => DataType::Float,
            Datum::Double(_) => DataType::Double,
            Datum::DateTime(_) => DataType::DateTime,
            Datum::ByteArray(_) => DataType::ByteArray,
            Datum::CharArray(_) => DataType::CharArray,
            Datum::BigInteger(_) => DataType::BigInteger,
            Datum::BigDecimal(_) => DataType::BigDecimal,
            Datum::Map(_) => DataType::Map,
            Datum::Tuple(_) => DataType::Tuple,
            Datum::Bag(_) => DataType::Bag,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Datum::ByteArray(value.into())
    }

    pub fn chars(value: impl Into<String>) -> Self {
        Datum::CharArray(value.into())
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::CharArray(value.to_string())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::CharArray(value)
    }
}

impl From<i32> for Datum {
    fn from(value: i32) -> Self {
        Datum::Integer(value)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Datum::Long(value)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Double(value)
    }
}

impl From<bool> for Datum {
    fn from(value: bool) -> Self {
        Datum::Boolean(value)
    }
}

impl From<Tuple> for Datum {
    fn from(value: Tuple) -> Self {
        Datum::Tuple(value)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => Ok(()),
            Datum::Boolean(v) => write!(f, "{}", v),
            Datum::Integer(v) => write!(f, "{}", v),
            Datum::Long(v) => write!(f, "{}", v),
            Datum::Float(v) => write!(f, "{}", v),
            Datum::Double(v) => write!(f, "{}", v),
            Datum::DateTime(v) => f.write_str(&format_datetime(v)),
            Datum::ByteArray(v) => f.write_str(&String::from_utf8_lossy(v)),
            Datum::CharArray(v) => f.write_str(v),
            Datum::BigInteger(v) => write!(f, "{}", v),
            Datum::BigDecimal(v) => write!(f, "{}", v),
            Datum::Map(map) => {
                f.write_str("[")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}#{}", key, value)?;
                }
                f.write_str("]")
            }
            Datum::Tuple(t) => write!(f, "{}", t),
            Datum::Bag(b) => write!(f, "{}", b),
        }
    }
}

/// Render a datetime the way the engine prints it: RFC 3339 with milliseconds.
/// Sub-millisecond values keep their full fraction so they parse back unchanged.
pub fn format_datetime(value: &DateTime<FixedOffset>) -> String {
    let format = if value.timestamp_subsec_nanos() % 1_000_000 == 0 {
        SecondsFormat::Millis
    } else {
        SecondsFormat::AutoSi
    };
    value.to_rfc3339_opts(format, false)
}

/// An ordered, fixed-arity sequence of fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tuple {
    fields: Vec<Datum>,
}

impl Tuple {
    pub fn new(fields: Vec<Datum>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at `index`, or a `FieldIndex` error
    pub fn get(&self, index: usize) -> Result<&Datum> {
        self.fields.get(index).ok_or(StorageError::FieldIndex {
            index,
            len: self.fields.len(),
        })
    }

    pub fn fields(&self) -> &[Datum] {
        &self.fields
    }

    pub fn push(&mut self, datum: Datum) {
        self.fields.push(datum);
    }

    pub fn into_fields(self) -> Vec<Datum> {
        self.fields
    }
}

impl From<Vec<Datum>> for Tuple {
    fn from(fields: Vec<Datum>) -> Self {
        Self::new(fields)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", field)?;
        }
        f.write_str(")")
    }
}

/// An unordered collection of tuples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataBag {
    tuples: Vec<Tuple>,
}

impl DataBag {
    pub fn new(tuples: Vec<Tuple>) -> Self {
        Self { tuples }
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    pub fn add(&mut self, tuple: Tuple) {
        self.tuples.push(tuple);
    }
}

impl fmt::Display for DataBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, tuple) in self.tuples.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", tuple)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_find_type() {
        assert_eq!(DataType::find_type(&Datum::Null), DataType::Null);
        assert_eq!(DataType::find_type(&Datum::from(1)), DataType::Integer);
        assert_eq!(DataType::find_type(&Datum::from(1_i64)), DataType::Long);
        assert_eq!(DataType::find_type(&Datum::from("x")), DataType::CharArray);
        assert_eq!(
            DataType::find_type(&Datum::bytes(b"x".to_vec())),
            DataType::ByteArray
        );
        assert_eq!(
            DataType::find_type(&Datum::BigDecimal(BigDecimal::from_str("1.5").unwrap())),
            DataType::BigDecimal
        );
        assert_eq!(
            DataType::find_type(&Datum::Bag(DataBag::default())),
            DataType::Bag
        );
    }

    #[test]
    fn test_type_names_round_trip() {
        for data_type in [
            DataType::Null,
            DataType::Boolean,
            DataType::Integer,
            DataType::Long,
            DataType::Float,
            DataType::Double,
            DataType::DateTime,
            DataType::ByteArray,
            DataType::CharArray,
            DataType::BigInteger,
            DataType::BigDecimal,
            DataType::Map,
            DataType::Tuple,
            DataType::Bag,
            DataType::Error,
        ] {
            assert_eq!(DataType::from_name(data_type.name()), Some(data_type));
        }
        assert_eq!(DataType::from_name("INTEGER"), Some(DataType::Integer));
        assert_eq!(DataType::from_name("varchar"), None);
    }

    #[test]
    fn test_display_complex_values() {
        let inner = Tuple::new(vec![Datum::from("a"), Datum::Null, Datum::from(3)]);
        assert_eq!(inner.to_string(), "(a,,3)");

        let bag = DataBag::new(vec![
            Tuple::new(vec![Datum::from(1)]),
            Tuple::new(vec![Datum::from(2), Datum::from("b")]),
        ]);
        assert_eq!(Datum::Bag(bag).to_string(), "{(1),(2,b)}");

        let mut map = BTreeMap::new();
        map.insert("k1".to_string(), Datum::from(1_i64));
        map.insert("k2".to_string(), Datum::Tuple(inner));
        assert_eq!(Datum::Map(map).to_string(), "[k1#1,k2#(a,,3)]");
    }

    #[test]
    fn test_display_datetime_uses_millis() {
        let dt = DateTime::parse_from_rfc3339("2012-01-02T03:04:05+02:00").unwrap();
        assert_eq!(Datum::DateTime(dt).to_string(), "2012-01-02T03:04:05.000+02:00");
    }

    #[test]
    fn test_display_datetime_keeps_sub_millis() {
        let dt = DateTime::parse_from_rfc3339("2020-01-01T00:00:00.123456Z").unwrap();
        assert_eq!(Datum::DateTime(dt).to_string(), "2020-01-01T00:00:00.123456+00:00");
    }

    #[test]
    fn test_tuple_get_out_of_range() {
        let tuple = Tuple::new(vec![Datum::from(1)]);
        assert!(tuple.get(0).is_ok());
        assert!(matches!(
            tuple.get(3),
            Err(StorageError::FieldIndex { index: 3, len: 1 })
        ));
    }
}
