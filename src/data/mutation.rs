use super::security::ColumnVisibility;

/// One cell write (or delete) inside a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnUpdate {
    pub column_family: Vec<u8>,
    pub column_qualifier: Vec<u8>,
    pub column_visibility: ColumnVisibility,
    /// `None` lets the tablet server assign the time
    pub timestamp: Option<i64>,
    pub value: Vec<u8>,
    pub deleted: bool,
}

/// A set of cell writes addressed to one row, applied atomically by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    row: Vec<u8>,
    updates: Vec<ColumnUpdate>,
}

impl Mutation {
    pub fn new(row: impl Into<Vec<u8>>) -> Self {
        Self {
            row: row.into(),
            updates: Vec::new(),
        }
    }

    pub fn row(&self) -> &[u8] {
        &self.row
    }

    pub fn updates(&self) -> &[ColumnUpdate] {
        &self.updates
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn put(
        &mut self,
        column_family: impl Into<Vec<u8>>,
        column_qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) {
        self.push(
            column_family,
            column_qualifier,
            ColumnVisibility::default(),
            None,
            value.into(),
            false,
        );
    }

    pub fn put_with_visibility(
        &mut self,
        column_family: impl Into<Vec<u8>>,
        column_qualifier: impl Into<Vec<u8>>,
        column_visibility: ColumnVisibility,
        value: impl Into<Vec<u8>>,
    ) {
        self.push(
            column_family,
            column_qualifier,
            column_visibility,
            None,
            value.into(),
            false,
        );
    }

    pub fn put_with_timestamp(
        &mut self,
        column_family: impl Into<Vec<u8>>,
        column_qualifier: impl Into<Vec<u8>>,
        column_visibility: ColumnVisibility,
        timestamp: i64,
        value: impl Into<Vec<u8>>,
    ) {
        self.push(
            column_family,
            column_qualifier,
            column_visibility,
            Some(timestamp),
            value.into(),
            false,
        );
    }

    pub fn put_delete(
        &mut self,
        column_family: impl Into<Vec<u8>>,
        column_qualifier: impl Into<Vec<u8>>,
    ) {
        self.push(
            column_family,
            column_qualifier,
            ColumnVisibility::default(),
            None,
            Vec::new(),
            true,
        );
    }

    fn push(
        &mut self,
        column_family: impl Into<Vec<u8>>,
        column_qualifier: impl Into<Vec<u8>>,
        column_visibility: ColumnVisibility,
        timestamp: Option<i64>,
        value: Vec<u8>,
        deleted: bool,
    ) {
        self.updates.push(ColumnUpdate {
            column_family: column_family.into(),
            column_qualifier: column_qualifier.into(),
            column_visibility,
            timestamp,
            value,
            deleted,
        });
    }
}
