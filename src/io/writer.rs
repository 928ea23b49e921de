use std::io;

use crate::data::Mutation;

/// Write buffer handed over by the store's output format
///
/// Buffering, batching and flushing belong to the implementation. An
/// interrupted write reports `io::ErrorKind::Interrupted`.
pub trait MutationWriter: Send {
    /// Queue a mutation for the named table
    fn write(&mut self, table: &str, mutation: Mutation) -> io::Result<()>;
}

impl<W: MutationWriter + ?Sized> MutationWriter for Box<W> {
    fn write(&mut self, table: &str, mutation: Mutation) -> io::Result<()> {
        (**self).write(table, mutation)
    }
}

/// MutationWriter implementation that keeps every mutation in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    written: Vec<(String, Mutation)>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutations in write order, each with its table name
    pub fn written(&self) -> &[(String, Mutation)] {
        &self.written
    }

    pub fn into_written(self) -> Vec<(String, Mutation)> {
        self.written
    }
}

impl MutationWriter for MemoryWriter {
    fn write(&mut self, table: &str, mutation: Mutation) -> io::Result<()> {
        self.written.push((table.to_string(), mutation));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_writer_records_table_and_mutation() {
        let mut writer = MemoryWriter::new();
        let mut mutation = Mutation::new("row");
        mutation.put("cf", "cq", "v");

        writer.write("t1", mutation.clone()).unwrap();
        writer.write("t2", Mutation::new("other")).unwrap();

        let written = writer.written();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].0, "t1");
        assert_eq!(written[0].1, mutation);
        assert_eq!(written[1].0, "t2");
    }
}
