use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StorageError};

/// The job configuration shared by the engine and the store's formats
///
/// Entries are plain strings, ordered by key. Written during binding on the
/// front end and only read by tasks afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobConfiguration {
    entries: BTreeMap<String, String>,
}

impl JobConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn unset(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Parse an entry, failing with `InvalidConfigValue` when it does not parse
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| StorageError::InvalidConfigValue {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Entries whose key starts with `prefix`, in key order
    pub fn entries_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries
            .range(prefix.to_string()..)
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Remove every entry whose key starts with `prefix`; returns how many went
    pub fn unset_prefix(&mut self, prefix: &str) -> usize {
        let stale: Vec<String> = self
            .entries_with_prefix(prefix)
            .map(|(key, _)| key.to_string())
            .collect();

        for key in &stale {
            debug!("Unsetting {} from configuration", key);
            self.entries.remove(key);
        }
        stale.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_unset() {
        let mut conf = JobConfiguration::new();
        assert!(conf.is_empty());

        conf.set("a", "1");
        conf.set("a", "2");
        assert_eq!(conf.get("a"), Some("2"));
        assert_eq!(conf.len(), 1);

        assert_eq!(conf.unset("a"), Some("2".to_string()));
        assert!(!conf.contains("a"));
    }

    #[test]
    fn test_get_parsed() {
        let mut conf = JobConfiguration::new();
        conf.set("threads", "4");
        conf.set("flag", "maybe");

        assert_eq!(conf.get_parsed::<u32>("threads").unwrap(), Some(4));
        assert_eq!(conf.get_parsed::<u32>("missing").unwrap(), None);
        assert!(matches!(
            conf.get_parsed::<bool>("flag"),
            Err(StorageError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_prefix_listing_and_clearing() {
        let mut conf = JobConfiguration::new();
        conf.set("AccumuloInputFormat.tablename", "t");
        conf.set("AccumuloInputFormat.username", "u");
        conf.set("AccumuloOutputFormat.username", "w");
        conf.set("other", "x");

        let keys: Vec<&str> = conf
            .entries_with_prefix("AccumuloInputFormat")
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec!["AccumuloInputFormat.tablename", "AccumuloInputFormat.username"]
        );

        assert_eq!(conf.unset_prefix("AccumuloInputFormat"), 2);
        assert_eq!(conf.len(), 2);
        assert_eq!(conf.get("AccumuloOutputFormat.username"), Some("w"));
    }

    #[test]
    fn test_json_is_a_flat_object() {
        let mut conf = JobConfiguration::new();
        conf.set("k", "v");

        let json = conf.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["k"], "v");

        assert_eq!(JobConfiguration::from_json(&json).unwrap(), conf);
        assert!(JobConfiguration::from_json("[1]").is_err());
    }
}
