//! Conversion between typed engine values and the store's byte encoding
//!
//! - `LoadCaster` / `StoreCaster`: the per-type byte codecs a caster provides
//! - `Utf8Caster`: the default caster, which writes every type as text
//! - `FieldConverter`: schema-driven conversion of tuple fields to bytes and longs

mod conversion;
mod utf8;

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use num_bigint::BigInt;

use crate::data::{DataBag, Datum, Tuple};
use crate::error::Result;

pub use conversion::{FieldConverter, schema_to_type};
pub use utf8::Utf8Caster;

/// Encodes typed values into cell bytes
pub trait StoreCaster: Send + Sync {
    fn boolean_to_bytes(&self, value: bool) -> Result<Vec<u8>>;
    fn integer_to_bytes(&self, value: i32) -> Result<Vec<u8>>;
    fn long_to_bytes(&self, value: i64) -> Result<Vec<u8>>;
    fn float_to_bytes(&self, value: f32) -> Result<Vec<u8>>;
    fn double_to_bytes(&self, value: f64) -> Result<Vec<u8>>;
    fn datetime_to_bytes(&self, value: &DateTime<FixedOffset>) -> Result<Vec<u8>>;
    fn chararray_to_bytes(&self, value: &str) -> Result<Vec<u8>>;
    fn biginteger_to_bytes(&self, value: &BigInt) -> Result<Vec<u8>>;
    fn bigdecimal_to_bytes(&self, value: &BigDecimal) -> Result<Vec<u8>>;
    fn map_to_bytes(&self, value: &BTreeMap<String, Datum>) -> Result<Vec<u8>>;
    fn tuple_to_bytes(&self, value: &Tuple) -> Result<Vec<u8>>;
    fn bag_to_bytes(&self, value: &DataBag) -> Result<Vec<u8>>;
}

/// Decodes cell bytes back into typed values
pub trait LoadCaster: Send + Sync {
    fn bytes_to_boolean(&self, bytes: &[u8]) -> Result<bool>;
    fn bytes_to_integer(&self, bytes: &[u8]) -> Result<i32>;
    fn bytes_to_long(&self, bytes: &[u8]) -> Result<i64>;
    fn bytes_to_float(&self, bytes: &[u8]) -> Result<f32>;
    fn bytes_to_double(&self, bytes: &[u8]) -> Result<f64>;
    fn bytes_to_datetime(&self, bytes: &[u8]) -> Result<DateTime<FixedOffset>>;
    fn bytes_to_chararray(&self, bytes: &[u8]) -> Result<String>;
    fn bytes_to_biginteger(&self, bytes: &[u8]) -> Result<BigInt>;
    fn bytes_to_bigdecimal(&self, bytes: &[u8]) -> Result<BigDecimal>;
    fn bytes_to_map(&self, bytes: &[u8]) -> Result<BTreeMap<String, Datum>>;
    fn bytes_to_tuple(&self, bytes: &[u8]) -> Result<Tuple>;
    fn bytes_to_bag(&self, bytes: &[u8]) -> Result<DataBag>;
}

/// A caster usable on both the load and the store path
pub trait LoadStoreCaster: LoadCaster + StoreCaster {}

impl<T: LoadCaster + StoreCaster> LoadStoreCaster for T {}
