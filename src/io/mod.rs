//! Collaborator seams: the location string, the store's scan cursor and its
//! mutation write buffer

pub mod cursor;
pub mod uri;
pub mod writer;

pub use cursor::{MemoryCursor, ScanCursor};
pub use uri::{ColumnFilter, Location, LocationBuilder, WriteTuning};
pub use writer::{MemoryWriter, MutationWriter};
