//! Translation of a parsed location into job configuration entries
//!
//! The store's input and output formats read their settings from entries
//! named `<FormatName>.<setting>`. `input` and `output` write those entries
//! and read them back; `udf` carries per-signature properties from the front
//! end to the tasks.

mod conf;
pub mod input;
pub mod output;
mod udf;

pub use conf::JobConfiguration;
pub use input::InputSettings;
pub use output::OutputSettings;
pub use udf::UdfContext;

use crate::error::{Result, StorageError};

const CONFIGURED: &str = "configured";
const INSTANCE_CONFIGURED: &str = "instanceConfigured";
const USERNAME: &str = "username";
const PASSWORD: &str = "password";
const INSTANCE_NAME: &str = "instanceName";
const ZOOKEEPERS: &str = "zooKeepers";

/// Full configuration key for a format setting
pub(crate) fn key(prefix: &str, setting: &str) -> String {
    format!("{}.{}", prefix, setting)
}

/// Connection settings shared by both formats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub username: String,
    pub password: Vec<u8>,
    pub instance_name: Option<String>,
    pub zookeepers: Option<String>,
}

impl ConnectionSettings {
    fn read(conf: &JobConfiguration, prefix: &'static str) -> Result<Self> {
        if !is_set(conf, prefix, CONFIGURED) {
            return Err(StorageError::NotConfigured { prefix });
        }

        let username = required(conf, prefix, USERNAME)?.to_string();
        let password = decode_hex(conf, &key(prefix, PASSWORD))?;

        let (instance_name, zookeepers) = if is_set(conf, prefix, INSTANCE_CONFIGURED) {
            (
                Some(required(conf, prefix, INSTANCE_NAME)?.to_string()),
                Some(required(conf, prefix, ZOOKEEPERS)?.to_string()),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            username,
            password,
            instance_name,
            zookeepers,
        })
    }
}

/// Mark the format's info block as set and record the credentials
fn set_credentials(
    conf: &mut JobConfiguration,
    prefix: &'static str,
    user: &str,
    password: &[u8],
) -> Result<()> {
    if is_set(conf, prefix, CONFIGURED) {
        return Err(StorageError::AlreadyConfigured { prefix });
    }

    conf.set(key(prefix, CONFIGURED), "true");
    conf.set(key(prefix, USERNAME), user);
    conf.set(key(prefix, PASSWORD), hex::encode(password));
    Ok(())
}

fn set_zookeeper_instance(
    conf: &mut JobConfiguration,
    prefix: &'static str,
    instance: &str,
    zookeepers: &str,
) -> Result<()> {
    if is_set(conf, prefix, INSTANCE_CONFIGURED) {
        return Err(StorageError::AlreadyConfigured { prefix });
    }

    conf.set(key(prefix, INSTANCE_CONFIGURED), "true");
    conf.set(key(prefix, INSTANCE_NAME), instance);
    conf.set(key(prefix, ZOOKEEPERS), zookeepers);
    Ok(())
}

fn is_set(conf: &JobConfiguration, prefix: &str, setting: &str) -> bool {
    conf.get(&key(prefix, setting)) == Some("true")
}

fn required<'c>(conf: &'c JobConfiguration, prefix: &str, setting: &str) -> Result<&'c str> {
    let key = key(prefix, setting);
    conf.get(&key).ok_or(StorageError::InvalidConfigValue {
        key,
        value: String::new(),
    })
}

fn decode_hex(conf: &JobConfiguration, key: &str) -> Result<Vec<u8>> {
    let value = conf.get(key).unwrap_or_default();
    hex::decode(value).map_err(|_| StorageError::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
