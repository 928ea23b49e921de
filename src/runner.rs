//! High-level runner API for binding storage locations.
//!
//! This module wraps location parsing, format binding and schema checking
//! behind a small interface that works on a job configuration file. It is the
//! API the CLI is built on.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::data::ResourceSchema;
use crate::io::Location;
use crate::job::{JobConfiguration, UdfContext};
use crate::storage::{AccumuloStorage, KeyValueStorage};

/// Which side of the adapter to bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Load,
    Store,
}

impl Mode {
    /// Parse mode from string (case-insensitive)
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "load" => Ok(Mode::Load),
            "store" => Ok(Mode::Store),
            _ => Err(anyhow!(
                "Unsupported mode: {}. Supported modes: load, store",
                s
            )),
        }
    }
}

/// Arguments for binding a location into a job configuration
#[derive(Debug, Clone)]
pub struct BindArgs {
    pub location: String,
    pub mode: Mode,

    /// Schema of stored tuples, e.g. `row:chararray,cf:chararray,cq:chararray,value`
    pub schema: Option<String>,
    /// UDF context signature; defaults to the table name
    pub signature: Option<String>,

    /// Existing configuration to bind into (JSON object of entries)
    pub config_path: Option<PathBuf>,
    /// Where to write the resulting configuration
    pub output_path: Option<PathBuf>,
    /// Bind in memory only; nothing is written
    pub dry_run: bool,
}

/// Result of a completed binding
#[derive(Debug)]
pub struct BindResult {
    pub table: String,
    pub mode: Mode,
    pub configuration: JobConfiguration,
    /// Entries added, changed or removed by this binding
    pub entries_changed: usize,
    pub schema_recorded: bool,
    /// Path the configuration was written to, if any
    pub written_to: Option<PathBuf>,
}

/// Bind a location into a job configuration
///
/// # Example
///
/// ```no_run
/// use accumulo_storage::runner::{BindArgs, Mode, run_bind};
///
/// # fn example() -> anyhow::Result<()> {
/// let args = BindArgs {
///     location: "accumulo://t1?instance=inst&user=root&password=secret&zookeepers=zk:2181".to_string(),
///     mode: Mode::Load,
///     schema: None,
///     signature: None,
///     config_path: None,
///     output_path: Some("job.json".into()),
///     dry_run: false,
/// };
///
/// let result = run_bind(args)?;
/// println!("Bound {} entries for {}", result.entries_changed, result.table);
/// # Ok(())
/// # }
/// ```
pub fn run_bind(args: BindArgs) -> Result<BindResult> {
    let mut conf = match &args.config_path {
        Some(path) => read_configuration(path)?,
        None => JobConfiguration::new(),
    };
    let before = conf.clone();

    let location = Location::parse(&args.location)?;
    let signature = args
        .signature
        .clone()
        .unwrap_or_else(|| location.table().to_string());

    let mut storage = AccumuloStorage::new(KeyValueStorage);
    let mut schema_recorded = false;

    match args.mode {
        Mode::Load => {
            storage.set_udf_context_signature(&signature);
            storage
                .set_location(&args.location, &mut conf)
                .context("Failed to bind load location")?;
            if args.schema.is_some() {
                warn!("Ignoring schema: only store bindings record a schema");
            }
        }
        Mode::Store => {
            storage.set_store_func_udf_context_signature(&signature);
            storage
                .set_store_location(&args.location, &mut conf)
                .context("Failed to bind store location")?;

            if let Some(schema) = &args.schema {
                let schema = ResourceSchema::parse(schema)
                    .with_context(|| format!("Invalid schema '{}'", schema))?;
                let mut udf = UdfContext::load_from(&conf)?;
                storage.check_schema(&schema, &mut udf)?;
                udf.store_into(&mut conf)?;
                schema_recorded = true;
                info!("Recorded schema of {} fields for {}", schema.len(), signature);
            }
        }
    }

    let entries_changed = count_changes(&before, &conf);

    let written_to = match (&args.output_path, args.dry_run) {
        (Some(path), false) => {
            write_configuration(path, &conf)?;
            Some(path.clone())
        }
        _ => None,
    };

    Ok(BindResult {
        table: location.table().to_string(),
        mode: args.mode,
        configuration: conf,
        entries_changed,
        schema_recorded,
        written_to,
    })
}

/// Human-readable description of a location; the password is never shown
pub fn describe_location(location: &str) -> Result<String> {
    let location = Location::parse(location)?;
    let range = location.range()?;
    let tuning = location.write_tuning();

    let columns: Vec<String> = location.columns().iter().map(|c| c.to_string()).collect();
    let lines = [
        format!("Location: {}", location),
        format!("Table: {}", location.table()),
        format!("Instance: {}", location.instance().unwrap_or("-")),
        format!("ZooKeepers: {}", location.zookeepers().unwrap_or("-")),
        format!("User: {}", location.user().unwrap_or("-")),
        format!(
            "Password: {}",
            if location.password().is_some() {
                "<set>"
            } else {
                "-"
            }
        ),
        format!("Authorizations: {}", location.authorizations()),
        format!(
            "Columns: {}",
            if columns.is_empty() {
                "all".to_string()
            } else {
                columns.join(",")
            }
        ),
        format!("Range: {}", range),
        format!("Write threads: {}", tuning.max_write_threads),
        format!("Write buffer: {} bytes", tuning.max_mutation_buffer_bytes),
        format!("Write latency: {} ms", tuning.max_latency_ms),
    ];

    Ok(lines.join("\n"))
}

/// Entries that differ between two configurations, removals included
fn count_changes(before: &JobConfiguration, after: &JobConfiguration) -> usize {
    let written = after
        .iter()
        .filter(|(key, value)| before.get(key) != Some(*value))
        .count();
    let removed = before.iter().filter(|(key, _)| !after.contains(key)).count();
    written + removed
}

fn read_configuration(path: &Path) -> Result<JobConfiguration> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    JobConfiguration::from_json(&json)
        .with_context(|| format!("Failed to parse configuration {}", path.display()))
}

fn write_configuration(path: &Path, conf: &JobConfiguration) -> Result<()> {
    fs::write(path, conf.to_json_pretty()?)
        .with_context(|| format!("Failed to write configuration {}", path.display()))
}
