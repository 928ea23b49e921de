use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// Row interval to scan; both ends inclusive, either end may be unbounded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Range {
    start: Option<Vec<u8>>,
    end: Option<Vec<u8>>,
}

impl Range {
    /// Range covering every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Range from `start` to `end`, rejecting a start that sorts after the end
    pub fn new(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Self::from_bytes(
            start.map(|s| s.as_bytes().to_vec()),
            end.map(|s| s.as_bytes().to_vec()),
        )
    }

    pub fn from_bytes(start: Option<Vec<u8>>, end: Option<Vec<u8>>) -> Result<Self> {
        if let (Some(s), Some(e)) = (&start, &end)
            && s > e
        {
            return Err(StorageError::InvalidRange {
                start: String::from_utf8_lossy(s).into_owned(),
                end: String::from_utf8_lossy(e).into_owned(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Option<&[u8]> {
        self.start.as_deref()
    }

    pub fn end(&self) -> Option<&[u8]> {
        self.end.as_deref()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, row: &[u8]) -> bool {
        self.start.as_deref().is_none_or(|s| row >= s) && self.end.as_deref().is_none_or(|e| row <= e)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self
            .start
            .as_deref()
            .map(String::from_utf8_lossy)
            .unwrap_or_else(|| "-inf".into());
        let end = self
            .end
            .as_deref()
            .map(String::from_utf8_lossy)
            .unwrap_or_else(|| "+inf".into());
        write!(f, "[{},{}]", start, end)
    }
}

/// Hex encoded range (JSON serialization format)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RangeJson {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl From<&Range> for RangeJson {
    fn from(range: &Range) -> Self {
        Self {
            start: range.start.as_ref().map(hex::encode),
            end: range.end.as_ref().map(hex::encode),
        }
    }
}

impl TryFrom<RangeJson> for Range {
    type Error = StorageError;

    fn try_from(json: RangeJson) -> Result<Self> {
        let decode = |s: String| {
            hex::decode(&s).map_err(|_| StorageError::InvalidConfigValue {
                key: "range".to_string(),
                value: s,
            })
        };
        let start = json.start.map(decode).transpose()?;
        let end = json.end.map(decode).transpose()?;
        Range::from_bytes(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_bounds_are_unbounded() {
        let range = Range::new(None, None).unwrap();
        assert!(range.is_unbounded());
        assert_eq!(range, Range::all());
        assert!(range.contains(b""));
        assert!(range.contains(b"anything"));
        assert_eq!(range.to_string(), "[-inf,+inf]");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let range = Range::new(Some("b"), Some("d")).unwrap();
        assert!(!range.contains(b"a"));
        assert!(range.contains(b"b"));
        assert!(range.contains(b"c"));
        assert!(range.contains(b"d"));
        assert!(!range.contains(b"da"));
        assert_eq!(range.to_string(), "[b,d]");
    }

    #[test]
    fn test_half_open_range() {
        let range = Range::new(Some("m"), None).unwrap();
        assert!(!range.is_unbounded());
        assert!(range.contains(b"zzz"));
        assert!(!range.contains(b"a"));
        assert_eq!(range.to_string(), "[m,+inf]");
    }

    #[test]
    fn test_start_after_end_rejected() {
        let result = Range::new(Some("z"), Some("a"));
        assert!(matches!(result, Err(StorageError::InvalidRange { .. })));
    }

    #[test]
    fn test_range_json_conversion() {
        let range = Range::new(Some("abc"), None).unwrap();
        let json = RangeJson::from(&range);
        assert_eq!(json.start.as_deref(), Some("616263"));
        assert_eq!(json.end, None);
        assert_eq!(Range::try_from(json).unwrap(), range);
    }
}
