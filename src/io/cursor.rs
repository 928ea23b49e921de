use std::collections::VecDeque;
use std::io;

use crate::data::{Key, Value};

/// Scan cursor handed over by the store's input format for one split
///
/// The cursor owns scan execution; the adapter only pulls one pair at a time.
/// An interrupted scan reports `io::ErrorKind::Interrupted`.
pub trait ScanCursor: Send {
    /// Advance to the next pair, or `None` once the split is exhausted
    fn next_key_value(&mut self) -> io::Result<Option<(Key, Value)>>;
}

impl<C: ScanCursor + ?Sized> ScanCursor for Box<C> {
    fn next_key_value(&mut self) -> io::Result<Option<(Key, Value)>> {
        (**self).next_key_value()
    }
}

/// ScanCursor implementation over pairs already in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    entries: VecDeque<(Key, Value)>,
}

impl MemoryCursor {
    pub fn new(entries: impl IntoIterator<Item = (Key, Value)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.entries.len()
    }
}

impl ScanCursor for MemoryCursor {
    fn next_key_value(&mut self) -> io::Result<Option<(Key, Value)>> {
        Ok(self.entries.pop_front())
    }
}
