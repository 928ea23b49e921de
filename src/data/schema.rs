use serde::{Deserialize, Serialize};

use super::datum::DataType;
use crate::error::{Result, StorageError};

/// Declared name and type of one tuple field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Inner schema for tuple and bag fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<ResourceSchema>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            schema: None,
        }
    }
}

/// Schema of the tuples handed to the store path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSchema {
    pub fields: Vec<FieldSchema>,
}

impl ResourceSchema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    /// Parse a flat schema like `row:chararray, ts:long, value`
    ///
    /// Fields without a type are bytearrays.
    pub fn parse(s: &str) -> Result<Self> {
        let mut fields = Vec::new();

        if s.trim().is_empty() {
            return Ok(Self { fields });
        }

        for part in s.split(',') {
            let (name, type_name) = match part.split_once(':') {
                Some((name, type_name)) => (name.trim(), type_name.trim()),
                None => (part.trim(), "bytearray"),
            };

            if name.is_empty() {
                return Err(StorageError::InvalidConfigValue {
                    key: "schema".to_string(),
                    value: s.to_string(),
                });
            }

            let data_type =
                DataType::from_name(type_name).ok_or_else(|| StorageError::InvalidConfigValue {
                    key: format!("schema field {}", name),
                    value: type_name.to_string(),
                })?;

            fields.push(FieldSchema::new(name, data_type));
        }

        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema() {
        let schema = ResourceSchema::parse("row:chararray, ts:long,value").unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.fields[0], FieldSchema::new("row", DataType::CharArray));
        assert_eq!(schema.fields[1], FieldSchema::new("ts", DataType::Long));
        assert_eq!(schema.fields[2], FieldSchema::new("value", DataType::ByteArray));
    }

    #[test]
    fn test_parse_empty_schema() {
        assert!(ResourceSchema::parse("  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_schema_unknown_type() {
        let result = ResourceSchema::parse("a:varchar");
        assert!(matches!(
            result,
            Err(StorageError::InvalidConfigValue { ref value, .. }) if value == "varchar"
        ));
    }

    #[test]
    fn test_parse_schema_missing_name() {
        assert!(ResourceSchema::parse(":long").is_err());
    }

    #[test]
    fn test_schema_json_round_trip() {
        let mut nested = FieldSchema::new("t", DataType::Tuple);
        nested.schema = Some(ResourceSchema::parse("a:int,b:chararray").unwrap());
        let schema = ResourceSchema::new(vec![FieldSchema::new("k", DataType::Long), nested]);

        let json = schema.to_json().unwrap();
        assert!(json.contains("\"type\":\"long\""));
        assert!(json.contains("\"type\":\"int\""));
        assert_eq!(ResourceSchema::from_json(&json).unwrap(), schema);
    }
}
