//! Entries consumed by the store's output format

use super::{CONFIGURED, ConnectionSettings, JobConfiguration, key};
use crate::config::OUTPUT_PREFIX;
use crate::error::Result;
use crate::io::WriteTuning;

const DEFAULT_TABLE: &str = "defaulttable";
const CREATE_TABLES: &str = "createtables";
const MAX_LATENCY: &str = "maxlatency";
const MAX_MEMORY: &str = "maxmemory";
const WRITE_THREADS: &str = "writethreads";

/// Set credentials and the table written when a mutation names none; only
/// once per job
pub fn set_output_info(
    conf: &mut JobConfiguration,
    user: &str,
    password: &[u8],
    create_tables: bool,
    default_table: &str,
) -> Result<()> {
    super::set_credentials(conf, OUTPUT_PREFIX, user, password)?;
    conf.set(key(OUTPUT_PREFIX, CREATE_TABLES), create_tables.to_string());
    conf.set(key(OUTPUT_PREFIX, DEFAULT_TABLE), default_table);
    Ok(())
}

pub fn set_zookeeper_instance(
    conf: &mut JobConfiguration,
    instance: &str,
    zookeepers: &str,
) -> Result<()> {
    super::set_zookeeper_instance(conf, OUTPUT_PREFIX, instance, zookeepers)
}

pub fn set_max_latency(conf: &mut JobConfiguration, millis: u64) {
    conf.set(key(OUTPUT_PREFIX, MAX_LATENCY), millis.to_string());
}

pub fn set_max_mutation_buffer_size(conf: &mut JobConfiguration, bytes: u64) {
    conf.set(key(OUTPUT_PREFIX, MAX_MEMORY), bytes.to_string());
}

pub fn set_max_write_threads(conf: &mut JobConfiguration, threads: u32) {
    conf.set(key(OUTPUT_PREFIX, WRITE_THREADS), threads.to_string());
}

/// True once output info has been set on this configuration
pub fn is_configured(conf: &JobConfiguration) -> bool {
    conf.contains(&key(OUTPUT_PREFIX, CONFIGURED))
}

/// Output format settings as a task sees them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub connection: ConnectionSettings,
    pub default_table: Option<String>,
    pub create_tables: bool,
    /// Entries left unset fall back to the defaults
    pub tuning: WriteTuning,
}

impl OutputSettings {
    pub fn read(conf: &JobConfiguration) -> Result<Self> {
        let connection = ConnectionSettings::read(conf, OUTPUT_PREFIX)?;
        let defaults = WriteTuning::default();

        Ok(Self {
            connection,
            default_table: conf.get(&key(OUTPUT_PREFIX, DEFAULT_TABLE)).map(String::from),
            create_tables: conf
                .get_parsed(&key(OUTPUT_PREFIX, CREATE_TABLES))?
                .unwrap_or(false),
            tuning: WriteTuning {
                max_write_threads: conf
                    .get_parsed(&key(OUTPUT_PREFIX, WRITE_THREADS))?
                    .unwrap_or(defaults.max_write_threads),
                max_mutation_buffer_bytes: conf
                    .get_parsed(&key(OUTPUT_PREFIX, MAX_MEMORY))?
                    .unwrap_or(defaults.max_mutation_buffer_bytes),
                max_latency_ms: conf
                    .get_parsed(&key(OUTPUT_PREFIX, MAX_LATENCY))?
                    .unwrap_or(defaults.max_latency_ms),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    #[test]
    fn test_output_info_entries() {
        let mut conf = JobConfiguration::new();
        assert!(!is_configured(&conf));

        set_output_info(&mut conf, "writer", b"pw", true, "t_out").unwrap();
        set_zookeeper_instance(&mut conf, "inst", "zk:2181").unwrap();
        set_max_latency(&mut conf, 250);
        set_max_mutation_buffer_size(&mut conf, 4096);
        set_max_write_threads(&mut conf, 3);

        assert!(is_configured(&conf));
        assert_eq!(conf.get("AccumuloOutputFormat.username"), Some("writer"));
        assert_eq!(conf.get("AccumuloOutputFormat.createtables"), Some("true"));
        assert_eq!(conf.get("AccumuloOutputFormat.defaulttable"), Some("t_out"));
        assert_eq!(conf.get("AccumuloOutputFormat.maxlatency"), Some("250"));
        assert_eq!(conf.get("AccumuloOutputFormat.maxmemory"), Some("4096"));
        assert_eq!(conf.get("AccumuloOutputFormat.writethreads"), Some("3"));

        let settings = OutputSettings::read(&conf).unwrap();
        assert_eq!(settings.connection.password, b"pw".to_vec());
        assert_eq!(settings.connection.zookeepers.as_deref(), Some("zk:2181"));
        assert_eq!(settings.default_table.as_deref(), Some("t_out"));
        assert!(settings.create_tables);
        assert_eq!(
            settings.tuning,
            WriteTuning {
                max_write_threads: 3,
                max_mutation_buffer_bytes: 4096,
                max_latency_ms: 250,
            }
        );
    }

    #[test]
    fn test_output_info_only_once() {
        let mut conf = JobConfiguration::new();
        set_output_info(&mut conf, "a", b"", false, "t").unwrap();
        assert!(matches!(
            set_output_info(&mut conf, "b", b"", false, "t"),
            Err(StorageError::AlreadyConfigured { .. })
        ));
    }

    #[test]
    fn test_tuning_defaults_when_unset() {
        let mut conf = JobConfiguration::new();
        set_output_info(&mut conf, "a", b"", false, "t").unwrap();

        let settings = OutputSettings::read(&conf).unwrap();
        assert_eq!(settings.tuning, WriteTuning::default());
        assert!(!settings.create_tables);
    }

    #[test]
    fn test_bad_tuning_entry() {
        let mut conf = JobConfiguration::new();
        set_output_info(&mut conf, "a", b"", false, "t").unwrap();
        conf.set("AccumuloOutputFormat.writethreads", "many");

        assert!(matches!(
            OutputSettings::read(&conf),
            Err(StorageError::InvalidConfigValue { key, .. }) if key == "AccumuloOutputFormat.writethreads"
        ));
    }
}
