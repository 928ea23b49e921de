//! Error types for the storage adapter.

use std::io;

use thiserror::Error;

use crate::config::EXPECTED_LOCATION_SYNTAX;
use crate::data::DataType;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors raised while binding locations and converting fields.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The location string does not follow the expected syntax.
    #[error("Expected '{}': {reason}", EXPECTED_LOCATION_SYNTAX)]
    InvalidLocation { reason: String },

    /// A connection option needed for binding was not supplied.
    #[error("Location is missing required option '{key}'")]
    MissingOption { key: &'static str },

    /// The scan range would be empty.
    #[error("Start row '{start}' sorts after end row '{end}'")]
    InvalidRange { start: String, end: String },

    /// A format's info block was read before it was set.
    #[error("{prefix} info has not been set on this configuration")]
    NotConfigured { prefix: &'static str },

    /// A job configuration entry holds a value of the wrong shape.
    #[error("Invalid value for configuration key {key}: {value}")]
    InvalidConfigValue { key: String, value: String },

    /// A format's info block may only be set once per configuration.
    #[error("{prefix} info has already been set on this configuration")]
    AlreadyConfigured { prefix: &'static str },

    /// A string or bytearray literal could not be parsed as a long.
    #[error("Could not cast {source_type} into long: {literal}")]
    CastToLong {
        source_type: DataType,
        literal: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// The value's type has no conversion to the requested target.
    #[error("Could not convert {value} of type {data_type} into {target}")]
    Unconvertible {
        value: String,
        data_type: DataType,
        target: &'static str,
    },

    /// The field was declared with the error type.
    #[error("Unable to determine type of {value}")]
    UndeterminedType { value: String },

    /// The schema declares a type the value does not hold.
    #[error("Field declared as {declared} holds a {actual} value")]
    TypeMismatch { declared: DataType, actual: DataType },

    /// Bytes could not be decoded into the requested type.
    #[error("Could not decode {literal:?} as {data_type}: {reason}")]
    Decode {
        data_type: DataType,
        literal: String,
        reason: String,
    },

    /// A tuple or schema has no field at the requested index.
    #[error("No field at index {index}; tuple has {len} fields")]
    FieldIndex { index: usize, len: usize },

    /// A tuple has the wrong number of fields for the write path.
    #[error("Expected a tuple of {expected} fields but got {actual}")]
    Arity { expected: &'static str, actual: usize },

    /// A typed value needs a caster but none is configured.
    #[error("No caster configured to convert {data_type} values")]
    MissingCaster { data_type: DataType },

    /// The configured caster cannot serve both load and store.
    #[error("Bad caster: {reason}")]
    BadCaster { reason: String },

    /// A read or write was attempted before the adapter was prepared.
    #[error("Storage is not prepared for {operation}")]
    NotPrepared { operation: &'static str },

    /// The scan cursor or the write buffer failed, including interruption.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A schema or configuration value failed to (de)serialize.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn invalid_location(reason: impl Into<String>) -> Self {
        StorageError::InvalidLocation {
            reason: reason.into(),
        }
    }

    /// True when the underlying collaborator reported an interruption
    pub fn is_interrupted(&self) -> bool {
        matches!(self, StorageError::Io(e) if e.kind() == io::ErrorKind::Interrupted)
    }
}

impl From<derive_builder::UninitializedFieldError> for StorageError {
    fn from(e: derive_builder::UninitializedFieldError) -> Self {
        StorageError::invalid_location(format!("missing {}", e.field_name()))
    }
}
