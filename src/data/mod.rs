//! Value models on both sides of the adapter: the dataflow engine's typed
//! tuples and the store's keys, values, mutations and scan bounds.

pub mod datum;
pub mod key;
pub mod mutation;
pub mod range;
pub mod schema;
pub mod security;

pub use datum::{DataBag, DataType, Datum, Tuple};
pub use key::{Key, Value};
pub use mutation::{ColumnUpdate, Mutation};
pub use range::Range;
pub use schema::{FieldSchema, ResourceSchema};
pub use security::{Authorizations, ColumnVisibility};
