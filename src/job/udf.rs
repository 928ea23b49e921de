use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::JobConfiguration;
use crate::config::UDF_CONTEXT_KEY;
use crate::error::Result;

/// Properties handed from the front end to the tasks, scoped by storage
/// function type and signature
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UdfContext {
    scopes: BTreeMap<String, BTreeMap<String, String>>,
}

impl UdfContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Properties of one scope, if anything was ever stored there
    pub fn properties(&self, class: &str, signature: &str) -> Option<&BTreeMap<String, String>> {
        self.scopes.get(&scope(class, signature))
    }

    pub fn properties_mut(&mut self, class: &str, signature: &str) -> &mut BTreeMap<String, String> {
        self.scopes.entry(scope(class, signature)).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Serialize into the job configuration
    pub fn store_into(&self, conf: &mut JobConfiguration) -> Result<()> {
        conf.set(UDF_CONTEXT_KEY, serde_json::to_string(self)?);
        Ok(())
    }

    /// Deserialize from the job configuration; absent means empty
    pub fn load_from(conf: &JobConfiguration) -> Result<Self> {
        match conf.get(UDF_CONTEXT_KEY) {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Self::default()),
        }
    }
}

fn scope(class: &str, signature: &str) -> String {
    format!("{}[{}]", class, signature)
}
