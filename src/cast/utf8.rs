//! Text encoding of typed values.
//!
//! Scalars are written as their decimal or RFC 3339 text. Complex values use
//! the engine's text form (`(a,b)`, `{(a),(b)}`, `[k#v]`); reading them back
//! yields bytearray fields, with empty fields read as null.

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use num_bigint::BigInt;

use super::{LoadCaster, StoreCaster};
use crate::data::datum::format_datetime;
use crate::data::{DataBag, DataType, Datum, Tuple};
use crate::error::{Result, StorageError};

/// The default caster: every value is stored as UTF-8 text
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Caster;

impl Utf8Caster {
    pub fn new() -> Self {
        Self
    }
}

impl StoreCaster for Utf8Caster {
    fn boolean_to_bytes(&self, value: bool) -> Result<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }

    fn integer_to_bytes(&self, value: i32) -> Result<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }

    fn long_to_bytes(&self, value: i64) -> Result<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }

    fn float_to_bytes(&self, value: f32) -> Result<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }

    fn double_to_bytes(&self, value: f64) -> Result<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }

    fn datetime_to_bytes(&self, value: &DateTime<FixedOffset>) -> Result<Vec<u8>> {
        Ok(format_datetime(value).into_bytes())
    }

    fn chararray_to_bytes(&self, value: &str) -> Result<Vec<u8>> {
        Ok(value.as_bytes().to_vec())
    }

    fn biginteger_to_bytes(&self, value: &BigInt) -> Result<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }

    fn bigdecimal_to_bytes(&self, value: &BigDecimal) -> Result<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }

    fn map_to_bytes(&self, value: &BTreeMap<String, Datum>) -> Result<Vec<u8>> {
        Ok(Datum::Map(value.clone()).to_string().into_bytes())
    }

    fn tuple_to_bytes(&self, value: &Tuple) -> Result<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }

    fn bag_to_bytes(&self, value: &DataBag) -> Result<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }
}

impl LoadCaster for Utf8Caster {
    fn bytes_to_boolean(&self, bytes: &[u8]) -> Result<bool> {
        let text = as_text(bytes, DataType::Boolean)?;
        if text.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(decode_error(DataType::Boolean, bytes, "expected true or false"))
        }
    }

    fn bytes_to_integer(&self, bytes: &[u8]) -> Result<i32> {
        parse_text(bytes, DataType::Integer)
    }

    fn bytes_to_long(&self, bytes: &[u8]) -> Result<i64> {
        parse_text(bytes, DataType::Long)
    }

    fn bytes_to_float(&self, bytes: &[u8]) -> Result<f32> {
        parse_text(bytes, DataType::Float)
    }

    fn bytes_to_double(&self, bytes: &[u8]) -> Result<f64> {
        parse_text(bytes, DataType::Double)
    }

    fn bytes_to_datetime(&self, bytes: &[u8]) -> Result<DateTime<FixedOffset>> {
        let text = as_text(bytes, DataType::DateTime)?;
        DateTime::parse_from_rfc3339(text)
            .map_err(|e| decode_error(DataType::DateTime, bytes, e.to_string()))
    }

    fn bytes_to_chararray(&self, bytes: &[u8]) -> Result<String> {
        Ok(as_text(bytes, DataType::CharArray)?.to_string())
    }

    fn bytes_to_biginteger(&self, bytes: &[u8]) -> Result<BigInt> {
        parse_text(bytes, DataType::BigInteger)
    }

    fn bytes_to_bigdecimal(&self, bytes: &[u8]) -> Result<BigDecimal> {
        parse_text(bytes, DataType::BigDecimal)
    }

    fn bytes_to_map(&self, bytes: &[u8]) -> Result<BTreeMap<String, Datum>> {
        let mut parser = TextParser::new(bytes, DataType::Map);
        let map = parser.parse_map()?;
        parser.finish()?;
        Ok(map)
    }

    fn bytes_to_tuple(&self, bytes: &[u8]) -> Result<Tuple> {
        let mut parser = TextParser::new(bytes, DataType::Tuple);
        let tuple = parser.parse_tuple()?;
        parser.finish()?;
        Ok(tuple)
    }

    fn bytes_to_bag(&self, bytes: &[u8]) -> Result<DataBag> {
        let mut parser = TextParser::new(bytes, DataType::Bag);
        let bag = parser.parse_bag()?;
        parser.finish()?;
        Ok(bag)
    }
}

fn decode_error(data_type: DataType, bytes: &[u8], reason: impl Into<String>) -> StorageError {
    StorageError::Decode {
        data_type,
        literal: String::from_utf8_lossy(bytes).into_owned(),
        reason: reason.into(),
    }
}

fn as_text(bytes: &[u8], data_type: DataType) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| decode_error(data_type, bytes, e.to_string()))
}

fn parse_text<T>(bytes: &[u8], data_type: DataType) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    as_text(bytes, data_type)?
        .parse::<T>()
        .map_err(|e| decode_error(data_type, bytes, e.to_string()))
}

/// Recursive descent reader for the tuple, bag and map text forms
struct TextParser<'a> {
    input: &'a [u8],
    pos: usize,
    data_type: DataType,
}

impl<'a> TextParser<'a> {
    fn new(input: &'a [u8], data_type: DataType) -> Self {
        Self {
            input,
            pos: 0,
            data_type,
        }
    }

    fn error(&self, reason: impl Into<String>) -> StorageError {
        decode_error(self.data_type, self.input, reason)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        match self.next_byte() {
            Some(b) if b == expected => Ok(()),
            _ => Err(self.error(format!(
                "expected '{}' at offset {}",
                expected as char,
                self.pos.saturating_sub(1)
            ))),
        }
    }

    fn finish(&self) -> Result<()> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(self.error(format!("trailing bytes at offset {}", self.pos)))
        }
    }

    fn parse_tuple(&mut self) -> Result<Tuple> {
        self.expect(b'(')?;
        let mut tuple = Tuple::default();

        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(tuple);
        }

        loop {
            let field = self.take_field(&[b',', b')'])?;
            tuple.push(field_datum(field));

            match self.next_byte() {
                Some(b',') => continue,
                Some(b')') => return Ok(tuple),
                _ => return Err(self.error("unterminated tuple")),
            }
        }
    }

    fn parse_bag(&mut self) -> Result<DataBag> {
        self.expect(b'{')?;
        let mut bag = DataBag::default();

        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(bag);
        }

        loop {
            bag.add(self.parse_tuple()?);

            match self.next_byte() {
                Some(b',') => continue,
                Some(b'}') => return Ok(bag),
                _ => return Err(self.error("unterminated bag")),
            }
        }
    }

    fn parse_map(&mut self) -> Result<BTreeMap<String, Datum>> {
        self.expect(b'[')?;
        let mut map = BTreeMap::new();

        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(map);
        }

        loop {
            let key = self.take_key()?;
            let value = self.take_field(&[b',', b']'])?;
            map.insert(key, field_datum(value));

            match self.next_byte() {
                Some(b',') => continue,
                Some(b']') => return Ok(map),
                _ => return Err(self.error("unterminated map")),
            }
        }
    }

    /// Map key up to (and consuming) the `#` separator
    fn take_key(&mut self) -> Result<String> {
        let input = self.input;
        let start = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b'#' => {
                    let key = &input[start..self.pos];
                    self.pos += 1;
                    return std::str::from_utf8(key)
                        .map(str::to_string)
                        .map_err(|e| self.error(e.to_string()));
                }
                b',' | b']' => return Err(self.error("map entry without '#'")),
                _ => self.pos += 1,
            }
        }
        Err(self.error("unexpected end of input"))
    }

    /// Raw field bytes up to the first terminator outside nested brackets
    fn take_field(&mut self, terminators: &[u8]) -> Result<&'a [u8]> {
        let input = self.input;
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(b) = self.peek() {
            match b {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' if depth > 0 => depth -= 1,
                _ if depth == 0 && terminators.contains(&b) => {
                    return Ok(&input[start..self.pos]);
                }
                _ => {}
            }
            self.pos += 1;
        }

        Err(self.error("unexpected end of input"))
    }
}

fn field_datum(bytes: &[u8]) -> Datum {
    if bytes.is_empty() {
        Datum::Null
    } else {
        Datum::ByteArray(bytes.to_vec())
    }
}
