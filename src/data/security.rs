use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Result, StorageError};

/// Set of labels a reader presents to see labeled cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authorizations {
    labels: BTreeSet<String>,
}

impl Authorizations {
    /// Empty authorizations, which only see unlabeled cells
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from individual labels, validating each one
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for label in labels {
            let label = label.into();
            if label.is_empty() {
                continue;
            }
            if let Some(c) = label.chars().find(|c| !is_valid_auth_char(*c)) {
                return Err(StorageError::invalid_location(format!(
                    "invalid character '{}' in authorization label '{}'",
                    c, label
                )));
            }
            set.insert(label);
        }
        Ok(Self { labels: set })
    }

    /// Parse a comma separated label list; empty input yields no labels
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::empty());
        }
        Self::new(s.split(','))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Comma joined form used in job configuration entries
    pub fn serialize(&self) -> String {
        self.iter().collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for Authorizations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

fn is_valid_auth_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '/')
}

/// Visibility expression attached to a written cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ColumnVisibility(Vec<u8>);

impl ColumnVisibility {
    pub fn new(expression: impl Into<Vec<u8>>) -> Self {
        Self(expression.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authorizations() {
        let auths = Authorizations::parse("PRIVATE,PUBLIC").unwrap();
        assert_eq!(auths.len(), 2);
        assert!(auths.contains("PRIVATE"));
        assert!(auths.contains("PUBLIC"));
        assert_eq!(auths.serialize(), "PRIVATE,PUBLIC");
    }

    #[test]
    fn test_parse_empty_authorizations() {
        assert!(Authorizations::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_authorizations_deduplicate_and_skip_empty() {
        let auths = Authorizations::parse("B,A,,B").unwrap();
        assert_eq!(auths.iter().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_invalid_authorization_label() {
        let result = Authorizations::parse("GOOD,bad label");
        assert!(matches!(result, Err(StorageError::InvalidLocation { .. })));
    }

    #[test]
    fn test_valid_label_punctuation() {
        assert!(Authorizations::parse("a_b-c:d.e/f").is_ok());
    }
}
