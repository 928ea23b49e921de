// Public API - the runner, the adapter and the models it moves
pub mod cast;
pub mod data;
pub mod error;
pub mod io;
pub mod job;
pub mod runner;
pub mod storage;

// Internal modules
mod config;

pub use error::{Result, StorageError};
pub use storage::{AccumuloStorage, KeyValueStorage, StorageContext, StorageFunc};
