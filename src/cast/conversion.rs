//! Schema-driven conversion of tuple fields.
//!
//! The declared type of a field comes from the schema when one is known and
//! is inferred from the value otherwise. Bytearrays pass through untouched;
//! every other type goes through the configured caster.

use std::fmt;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use tracing::{error, warn};

use super::LoadStoreCaster;
use crate::data::{DataType, Datum, FieldSchema, Tuple};
use crate::error::{Result, StorageError};

/// Declared type of a value: the schema's when given, otherwise inferred
pub fn schema_to_type(datum: &Datum, field: Option<&FieldSchema>) -> DataType {
    match field {
        Some(field) => field.data_type,
        None => DataType::find_type(datum),
    }
}

/// Field `index` of the tuple together with its declared type
fn field_with_type<'t>(
    tuple: &'t Tuple,
    index: usize,
    fields: Option<&[FieldSchema]>,
) -> Result<(&'t Datum, DataType)> {
    let datum = tuple.get(index)?;
    let data_type = match fields {
        Some(fields) => {
            fields
                .get(index)
                .ok_or(StorageError::FieldIndex {
                    index,
                    len: fields.len(),
                })?
                .data_type
        }
        None => DataType::find_type(datum),
    };
    Ok((datum, data_type))
}

/// Converts tuple fields to cell bytes and long integers
#[derive(Clone)]
pub struct FieldConverter {
    caster: Option<Arc<dyn LoadStoreCaster>>,
}

impl fmt::Debug for FieldConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConverter")
            .field("has_caster", &self.caster.is_some())
            .finish()
    }
}

impl FieldConverter {
    pub fn new(caster: Arc<dyn LoadStoreCaster>) -> Self {
        Self {
            caster: Some(caster),
        }
    }

    /// A converter that only handles bytearrays and nulls
    pub fn without_caster() -> Self {
        Self { caster: None }
    }

    pub fn caster(&self) -> Option<&Arc<dyn LoadStoreCaster>> {
        self.caster.as_ref()
    }

    pub fn has_caster(&self) -> bool {
        self.caster.is_some()
    }

    fn require_caster(&self, data_type: DataType) -> Result<&dyn LoadStoreCaster> {
        self.caster
            .as_deref()
            .ok_or(StorageError::MissingCaster { data_type })
    }

    /// Encode a value as declared type `data_type`; nulls encode to `None`
    pub fn obj_to_bytes(&self, datum: &Datum, data_type: DataType) -> Result<Option<Vec<u8>>> {
        if datum.is_null() {
            return Ok(None);
        }

        let bytes = match (data_type, datum) {
            (DataType::ByteArray, Datum::ByteArray(b)) => b.clone(),
            (DataType::Bag, Datum::Bag(b)) => self.require_caster(data_type)?.bag_to_bytes(b)?,
            (DataType::CharArray, Datum::CharArray(s)) => {
                self.require_caster(data_type)?.chararray_to_bytes(s)?
            }
            (DataType::Double, Datum::Double(v)) => {
                self.require_caster(data_type)?.double_to_bytes(*v)?
            }
            (DataType::Float, Datum::Float(v)) => {
                self.require_caster(data_type)?.float_to_bytes(*v)?
            }
            (DataType::Integer, Datum::Integer(v)) => {
                self.require_caster(data_type)?.integer_to_bytes(*v)?
            }
            (DataType::Long, Datum::Long(v)) => self.require_caster(data_type)?.long_to_bytes(*v)?,
            (DataType::BigInteger, Datum::BigInteger(v)) => {
                self.require_caster(data_type)?.biginteger_to_bytes(v)?
            }
            (DataType::BigDecimal, Datum::BigDecimal(v)) => {
                self.require_caster(data_type)?.bigdecimal_to_bytes(v)?
            }
            (DataType::Boolean, Datum::Boolean(v)) => {
                self.require_caster(data_type)?.boolean_to_bytes(*v)?
            }
            (DataType::DateTime, Datum::DateTime(v)) => {
                self.require_caster(data_type)?.datetime_to_bytes(v)?
            }
            (DataType::Map, Datum::Map(m)) => self.require_caster(data_type)?.map_to_bytes(m)?,
            (DataType::Tuple, Datum::Tuple(t)) => {
                self.require_caster(data_type)?.tuple_to_bytes(t)?
            }
            (DataType::Null, _) => return Ok(None),
            (DataType::Error, _) => {
                return Err(StorageError::UndeterminedType {
                    value: datum.to_string(),
                });
            }
            (declared, _) => {
                return Err(StorageError::TypeMismatch {
                    declared,
                    actual: datum.data_type(),
                });
            }
        };

        Ok(Some(bytes))
    }

    /// Like `obj_to_bytes`, but a null value becomes empty text
    pub fn obj_to_text(&self, datum: &Datum, data_type: DataType) -> Result<Vec<u8>> {
        match self.obj_to_bytes(datum, data_type)? {
            Some(bytes) => Ok(bytes),
            None => {
                warn!("Creating empty text from null value");
                Ok(Vec::new())
            }
        }
    }

    pub fn object_to_text(&self, datum: &Datum, field: Option<&FieldSchema>) -> Result<Vec<u8>> {
        self.obj_to_text(datum, schema_to_type(datum, field))
    }

    pub fn tuple_to_bytes(
        &self,
        tuple: &Tuple,
        index: usize,
        fields: Option<&[FieldSchema]>,
    ) -> Result<Option<Vec<u8>>> {
        let (datum, data_type) = field_with_type(tuple, index, fields)?;
        self.obj_to_bytes(datum, data_type)
    }

    pub fn tuple_to_text(
        &self,
        tuple: &Tuple,
        index: usize,
        fields: Option<&[FieldSchema]>,
    ) -> Result<Vec<u8>> {
        let (datum, data_type) = field_with_type(tuple, index, fields)?;
        self.obj_to_text(datum, data_type)
    }

    /// Coerce field `index` into a long
    ///
    /// Narrowing from floating point and big numbers is deterministic; when the
    /// result does not recreate the source value a warning is logged.
    pub fn obj_to_long(
        &self,
        tuple: &Tuple,
        index: usize,
        fields: Option<&[FieldSchema]>,
    ) -> Result<i64> {
        let (datum, data_type) = field_with_type(tuple, index, fields)?;

        match (data_type, datum) {
            (DataType::Long, Datum::Long(v)) => Ok(*v),
            (DataType::CharArray, Datum::CharArray(s)) => parse_long(s, DataType::CharArray),
            (DataType::Double, Datum::Double(v)) => Ok(narrow_double(*v, "Double")),
            (DataType::Float, Datum::Float(v)) => Ok(narrow_double(f64::from(*v), "Float")),
            (DataType::Integer, Datum::Integer(v)) => Ok(i64::from(*v)),
            (DataType::BigInteger, Datum::BigInteger(v)) => Ok(narrow_big_integer(v)),
            (DataType::BigDecimal, Datum::BigDecimal(v)) => Ok(narrow_big_decimal(v)),
            (DataType::ByteArray, Datum::ByteArray(b)) => {
                parse_long(&String::from_utf8_lossy(b), DataType::ByteArray)
            }
            (declared, datum) if declared == datum.data_type() || datum.is_null() => {
                error!(
                    "Could not convert {} of type {} into long.",
                    datum,
                    datum.data_type()
                );
                Err(StorageError::Unconvertible {
                    value: datum.to_string(),
                    data_type: datum.data_type(),
                    target: "long",
                })
            }
            (declared, datum) => Err(StorageError::TypeMismatch {
                declared,
                actual: datum.data_type(),
            }),
        }
    }

    /// Decode cell bytes as `data_type` using the caster's load direction
    pub fn bytes_to_datum(&self, bytes: &[u8], data_type: DataType) -> Result<Datum> {
        let datum = match data_type {
            DataType::Null => Datum::Null,
            DataType::ByteArray => Datum::ByteArray(bytes.to_vec()),
            DataType::Error => {
                return Err(StorageError::UndeterminedType {
                    value: String::from_utf8_lossy(bytes).into_owned(),
                });
            }
            DataType::Boolean => Datum::Boolean(self.require_caster(data_type)?.bytes_to_boolean(bytes)?),
            DataType::Integer => Datum::Integer(self.require_caster(data_type)?.bytes_to_integer(bytes)?),
            DataType::Long => Datum::Long(self.require_caster(data_type)?.bytes_to_long(bytes)?),
            DataType::Float => Datum::Float(self.require_caster(data_type)?.bytes_to_float(bytes)?),
            DataType::Double => Datum::Double(self.require_caster(data_type)?.bytes_to_double(bytes)?),
            DataType::DateTime => {
                Datum::DateTime(self.require_caster(data_type)?.bytes_to_datetime(bytes)?)
            }
            DataType::CharArray => {
                Datum::CharArray(self.require_caster(data_type)?.bytes_to_chararray(bytes)?)
            }
            DataType::BigInteger => {
                Datum::BigInteger(self.require_caster(data_type)?.bytes_to_biginteger(bytes)?)
            }
            DataType::BigDecimal => {
                Datum::BigDecimal(self.require_caster(data_type)?.bytes_to_bigdecimal(bytes)?)
            }
            DataType::Map => Datum::Map(self.require_caster(data_type)?.bytes_to_map(bytes)?),
            DataType::Tuple => Datum::Tuple(self.require_caster(data_type)?.bytes_to_tuple(bytes)?),
            DataType::Bag => Datum::Bag(self.require_caster(data_type)?.bytes_to_bag(bytes)?),
        };
        Ok(datum)
    }
}

fn parse_long(literal: &str, source_type: DataType) -> Result<i64> {
    literal.parse::<i64>().map_err(|source| {
        error!("Could not cast {} into long: {}", source_type, literal);
        StorageError::CastToLong {
            source_type,
            literal: literal.to_string(),
            source,
        }
    })
}

/// Truncate toward zero, saturating at the long bounds (NaN becomes 0)
fn narrow_double(value: f64, type_name: &str) -> i64 {
    let narrowed = value as i64;
    if narrowed as f64 != value {
        warn!(
            "Downcasting {} into Long results in a loss of information. Was {} but is now {}",
            type_name, value, narrowed
        );
    }
    narrowed
}

/// Low 64 bits of the two's complement representation
fn low_order_long(value: &BigInt) -> i64 {
    let (sign, digits) = value.to_u64_digits();
    let low = digits.first().copied().unwrap_or(0);
    match sign {
        Sign::Minus => low.wrapping_neg() as i64,
        _ => low as i64,
    }
}

fn narrow_big_integer(value: &BigInt) -> i64 {
    let narrowed = low_order_long(value);
    if BigInt::from(narrowed) != *value {
        warn!(
            "Downcasting BigInteger into Long results in a change of the original value. Was {} but is now {}",
            value, narrowed
        );
    }
    narrowed
}

fn narrow_big_decimal(value: &BigDecimal) -> i64 {
    let truncated = value.with_scale(0);
    if truncated == *value
        && let Some(exact) = truncated.to_i64()
    {
        return exact;
    }

    let narrowed = low_order_long(&truncated.into_bigint_and_exponent().0);
    warn!(
        "Downcasting BigDecimal into Long results in a loss of information. Was {} but is now {}",
        value, narrowed
    );
    narrowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::Utf8Caster;
    use chrono::DateTime;
    use std::str::FromStr;

    fn converter() -> FieldConverter {
        FieldConverter::new(Arc::new(Utf8Caster::new()))
    }

    fn single(datum: Datum) -> Tuple {
        Tuple::new(vec![datum])
    }

    /// Log sink shared with a scoped subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` and return its result with the warnings it logged
    fn with_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (result, text)
    }

    #[test]
    fn test_obj_to_bytes_by_inferred_type() {
        let conv = converter();

        let cases: Vec<(Datum, &[u8])> = vec![
            (Datum::bytes(vec![0x00, 0xff]), &[0x00, 0xff]),
            (Datum::from("text"), b"text"),
            (Datum::from(42), b"42"),
            (Datum::from(42_i64), b"42"),
            (Datum::Float(1.5), b"1.5"),
            (Datum::from(2.25), b"2.25"),
            (Datum::from(true), b"true"),
            (
                Datum::BigInteger(BigInt::from_str("123456789012345678901234").unwrap()),
                b"123456789012345678901234",
            ),
            (
                Datum::BigDecimal(BigDecimal::from_str("3.14159").unwrap()),
                b"3.14159",
            ),
            (
                Datum::Tuple(Tuple::new(vec![Datum::from(1), Datum::from("a")])),
                b"(1,a)",
            ),
        ];

        for (datum, expected) in cases {
            let data_type = DataType::find_type(&datum);
            let bytes = conv.obj_to_bytes(&datum, data_type).unwrap();
            assert_eq!(bytes.as_deref(), Some(expected), "{:?}", datum);
        }
    }

    #[test]
    fn test_obj_to_bytes_null_is_none() {
        let conv = converter();
        assert_eq!(conv.obj_to_bytes(&Datum::Null, DataType::Long).unwrap(), None);
        assert_eq!(
            conv.obj_to_bytes(&Datum::from(1), DataType::Null).unwrap(),
            None
        );
    }

    #[test]
    fn test_obj_to_text_null_is_empty() {
        let conv = converter();
        assert!(conv.obj_to_text(&Datum::Null, DataType::Null).unwrap().is_empty());
    }

    #[test]
    fn test_obj_to_bytes_error_type() {
        let conv = converter();
        let result = conv.obj_to_bytes(&Datum::from("x"), DataType::Error);
        assert!(matches!(result, Err(StorageError::UndeterminedType { .. })));
    }

    #[test]
    fn test_obj_to_bytes_type_mismatch() {
        let conv = converter();
        let result = conv.obj_to_bytes(&Datum::from("x"), DataType::Long);
        assert!(matches!(
            result,
            Err(StorageError::TypeMismatch {
                declared: DataType::Long,
                actual: DataType::CharArray
            })
        ));
    }

    #[test]
    fn test_obj_to_bytes_without_caster() {
        let conv = FieldConverter::without_caster();
        assert_eq!(
            conv.obj_to_bytes(&Datum::bytes("raw"), DataType::ByteArray)
                .unwrap(),
            Some(b"raw".to_vec())
        );
        assert!(matches!(
            conv.obj_to_bytes(&Datum::from("x"), DataType::CharArray),
            Err(StorageError::MissingCaster {
                data_type: DataType::CharArray
            })
        ));
    }

    #[test]
    fn test_tuple_to_text_uses_schema_types() {
        let conv = converter();
        let tuple = Tuple::new(vec![Datum::from("row"), Datum::from(7_i64)]);
        let fields = vec![
            FieldSchema::new("row", DataType::CharArray),
            FieldSchema::new("n", DataType::Long),
        ];

        assert_eq!(conv.tuple_to_text(&tuple, 0, Some(&fields)).unwrap(), b"row");
        assert_eq!(
            conv.tuple_to_bytes(&tuple, 1, Some(&fields)).unwrap(),
            Some(b"7".to_vec())
        );
        assert!(matches!(
            conv.tuple_to_text(&tuple, 2, Some(&fields)),
            Err(StorageError::FieldIndex { index: 2, .. })
        ));
    }

    #[test]
    fn test_tuple_schema_shorter_than_tuple() {
        let conv = converter();
        let tuple = Tuple::new(vec![Datum::from("a"), Datum::from("b")]);
        let fields = vec![FieldSchema::new("a", DataType::CharArray)];
        assert!(matches!(
            conv.tuple_to_text(&tuple, 1, Some(&fields)),
            Err(StorageError::FieldIndex { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_object_to_text_with_and_without_schema() {
        let conv = converter();
        let datum = Datum::from(5);
        assert_eq!(conv.object_to_text(&datum, None).unwrap(), b"5");

        let field = FieldSchema::new("x", DataType::Integer);
        assert_eq!(conv.object_to_text(&datum, Some(&field)).unwrap(), b"5");
    }

    #[test]
    fn test_obj_to_long_from_string() {
        let conv = converter();
        assert_eq!(conv.obj_to_long(&single(Datum::from("42")), 0, None).unwrap(), 42);

        let err = conv
            .obj_to_long(&single(Datum::from("abc")), 0, None)
            .unwrap_err();
        assert!(matches!(err, StorageError::CastToLong { .. }));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_obj_to_long_from_bytes() {
        let conv = converter();
        assert_eq!(
            conv.obj_to_long(&single(Datum::bytes("-17")), 0, None)
                .unwrap(),
            -17
        );
        let err = conv
            .obj_to_long(&single(Datum::bytes("1.5")), 0, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Could not cast bytearray into long: 1.5");
    }

    #[test]
    fn test_obj_to_long_numeric_sources() {
        let conv = converter();
        assert_eq!(conv.obj_to_long(&single(Datum::from(9_i64)), 0, None).unwrap(), 9);
        assert_eq!(conv.obj_to_long(&single(Datum::from(-3)), 0, None).unwrap(), -3);
        assert_eq!(conv.obj_to_long(&single(Datum::from(2.9)), 0, None).unwrap(), 2);
        assert_eq!(conv.obj_to_long(&single(Datum::from(-2.9)), 0, None).unwrap(), -2);
        assert_eq!(conv.obj_to_long(&single(Datum::Float(7.5)), 0, None).unwrap(), 7);
        assert_eq!(
            conv.obj_to_long(&single(Datum::from(f64::NAN)), 0, None)
                .unwrap(),
            0
        );
        assert_eq!(
            conv.obj_to_long(&single(Datum::from(1e30)), 0, None)
                .unwrap(),
            i64::MAX
        );
    }

    #[test]
    fn test_obj_to_long_big_integer_overflow_wraps() {
        let conv = converter();
        let big = BigInt::from_str("9223372036854775808").unwrap();
        let narrowed = conv
            .obj_to_long(&single(Datum::BigInteger(big.clone())), 0, None)
            .unwrap();

        assert_eq!(narrowed, i64::MIN);
        assert_ne!(BigInt::from(narrowed), big);
    }

    #[test]
    fn test_obj_to_long_big_integer_exact_and_negative() {
        let conv = converter();
        let exact = BigInt::from(-12345_i64);
        assert_eq!(
            conv.obj_to_long(&single(Datum::BigInteger(exact)), 0, None)
                .unwrap(),
            -12345
        );

        // -(2^64 + 5) keeps the low 64 bits: -5
        let big = BigInt::from_str("-18446744073709551621").unwrap();
        assert_eq!(
            conv.obj_to_long(&single(Datum::BigInteger(big)), 0, None)
                .unwrap(),
            -5
        );
    }

    #[test]
    fn test_obj_to_long_big_decimal() {
        let conv = converter();
        let exact = BigDecimal::from_str("42.000").unwrap();
        assert_eq!(
            conv.obj_to_long(&single(Datum::BigDecimal(exact)), 0, None)
                .unwrap(),
            42
        );

        let fractional = BigDecimal::from_str("-7.9").unwrap();
        assert_eq!(
            conv.obj_to_long(&single(Datum::BigDecimal(fractional)), 0, None)
                .unwrap(),
            -7
        );

        let huge = BigDecimal::from_str("9223372036854775808.5").unwrap();
        assert_eq!(
            conv.obj_to_long(&single(Datum::BigDecimal(huge)), 0, None)
                .unwrap(),
            i64::MIN
        );
    }

    #[test]
    fn test_obj_to_long_warns_only_on_lossy_narrowing() {
        let conv = converter();
        let lossy = [
            (Datum::BigInteger(BigInt::from_str("9223372036854775808").unwrap()), i64::MIN),
            (Datum::BigDecimal(BigDecimal::from_str("-7.9").unwrap()), -7),
            (Datum::from(2.9), 2),
        ];
        for (datum, expected) in lossy {
            let (narrowed, logs) = with_warnings(|| conv.obj_to_long(&single(datum.clone()), 0, None));
            assert_eq!(narrowed.unwrap(), expected);
            assert!(logs.contains("WARN"), "no warning for {}", datum);
            assert!(logs.contains("Downcasting"), "no warning for {}", datum);
        }

        let exact = [
            (Datum::BigDecimal(BigDecimal::from_str("42.000").unwrap()), 42),
            (Datum::BigInteger(BigInt::from(-12345_i64)), -12345),
            (Datum::from(-4.0), -4),
        ];
        for (datum, expected) in exact {
            let (narrowed, logs) = with_warnings(|| conv.obj_to_long(&single(datum.clone()), 0, None));
            assert_eq!(narrowed.unwrap(), expected);
            assert!(logs.is_empty(), "unexpected warning for {}: {}", datum, logs);
        }
    }

    #[test]
    fn test_obj_to_text_null_warns() {
        let conv = converter();
        let (text, logs) = with_warnings(|| conv.obj_to_text(&Datum::Null, DataType::CharArray));
        assert!(text.unwrap().is_empty());
        assert!(logs.contains("Creating empty text from null value"));

        let (text, logs) = with_warnings(|| conv.obj_to_text(&Datum::from("v"), DataType::CharArray));
        assert_eq!(text.unwrap(), b"v");
        assert!(logs.is_empty());
    }

    #[test]
    fn test_obj_to_long_unsupported_types() {
        let conv = converter();
        let dt = DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z").unwrap();

        for datum in [Datum::from(true), Datum::DateTime(dt), Datum::Null] {
            let err = conv.obj_to_long(&single(datum), 0, None).unwrap_err();
            assert!(matches!(
                err,
                StorageError::Unconvertible { target: "long", .. }
            ));
        }
    }

    #[test]
    fn test_obj_to_long_declared_type_mismatch() {
        let conv = converter();
        let fields = vec![FieldSchema::new("ts", DataType::Long)];
        let err = conv
            .obj_to_long(&single(Datum::from("42")), 0, Some(&fields))
            .unwrap_err();
        assert!(matches!(err, StorageError::TypeMismatch { .. }));
    }

    #[test]
    fn test_bytes_to_datum_round_trip() {
        let conv = converter();
        let values = vec![
            Datum::from(true),
            Datum::from(-8),
            Datum::from(1_i64 << 40),
            Datum::Float(0.25),
            Datum::from(1e-10),
            Datum::from("chars"),
            Datum::BigInteger(BigInt::from_str("-99999999999999999999").unwrap()),
            Datum::BigDecimal(BigDecimal::from_str("0.000123").unwrap()),
            Datum::DateTime(DateTime::parse_from_rfc3339("1999-12-31T23:59:59.999Z").unwrap()),
            Datum::DateTime(DateTime::parse_from_rfc3339("2020-01-01T00:00:00.123456Z").unwrap()),
            Datum::DateTime(DateTime::parse_from_rfc3339("2020-01-01T00:00:00.000000001+05:30").unwrap()),
            Datum::bytes(vec![1, 2, 3]),
        ];

        for datum in values {
            let data_type = datum.data_type();
            let bytes = conv.obj_to_bytes(&datum, data_type).unwrap().unwrap();
            assert_eq!(conv.bytes_to_datum(&bytes, data_type).unwrap(), datum);
        }
    }

    #[test]
    fn test_bytes_to_datum_needs_caster_for_typed_values() {
        let conv = FieldConverter::without_caster();
        assert_eq!(
            conv.bytes_to_datum(b"x", DataType::ByteArray).unwrap(),
            Datum::bytes("x")
        );
        assert!(matches!(
            conv.bytes_to_datum(b"1", DataType::Integer),
            Err(StorageError::MissingCaster { .. })
        ));
    }
}
