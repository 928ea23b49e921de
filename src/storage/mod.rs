//! The load/store adapter between engine tuples and the store's formats
//!
//! `AccumuloStorage` owns the lifecycle the engine drives: bind a location
//! into the job configuration on the front end, then on each task pull
//! tuples from a scan cursor or push mutations into a write buffer. What a
//! tuple looks like is decided by a `StorageFunc`.

mod key_value;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::cast::{FieldConverter, LoadStoreCaster, Utf8Caster};
use crate::config::{INPUT_PREFIX, SCHEMA_PROPERTY_SUFFIX};
use crate::data::{FieldSchema, Key, Mutation, ResourceSchema, Tuple, Value};
use crate::error::{Result, StorageError};
use crate::io::{Location, MutationWriter, ScanCursor};
use crate::job::{JobConfiguration, UdfContext, input, output};

pub use key_value::KeyValueStorage;

/// Mapping between store entries and engine tuples
pub trait StorageFunc: Send {
    /// Build the tuple for one scanned key/value pair
    fn get_tuple(&self, key: &Key, value: &Value, ctx: &StorageContext) -> Result<Tuple>;

    /// Mutations that store one tuple
    fn get_mutations(&self, tuple: &Tuple, ctx: &StorageContext) -> Result<Vec<Mutation>>;

    /// Called after the input format entries are written
    fn configure_input_format(&self, _conf: &mut JobConfiguration) -> Result<()> {
        Ok(())
    }

    /// Called after the output format entries are written
    fn configure_output_format(&self, _conf: &mut JobConfiguration) -> Result<()> {
        Ok(())
    }
}

/// What a `StorageFunc` may consult while converting
#[derive(Debug, Clone)]
pub struct StorageContext {
    converter: FieldConverter,
    schema: Option<ResourceSchema>,
    table: Option<String>,
}

impl StorageContext {
    fn new(converter: FieldConverter) -> Self {
        Self {
            converter,
            schema: None,
            table: None,
        }
    }

    pub fn converter(&self) -> &FieldConverter {
        &self.converter
    }

    pub fn schema(&self) -> Option<&ResourceSchema> {
        self.schema.as_ref()
    }

    /// Declared field types, when a schema has been checked or restored
    pub fn field_schemas(&self) -> Option<&[FieldSchema]> {
        self.schema.as_ref().map(|schema| schema.fields.as_slice())
    }

    /// Table named by the bound location
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }
}

/// Load and store function for the store
pub struct AccumuloStorage<F: StorageFunc> {
    func: F,
    ctx: StorageContext,
    location: Option<Location>,
    signature: Option<String>,
    cursor: Option<Box<dyn ScanCursor>>,
    writer: Option<Box<dyn MutationWriter>>,
}

impl<F: StorageFunc> AccumuloStorage<F> {
    /// Storage using the default UTF-8 text caster
    pub fn new(func: F) -> Self {
        Self::with_caster(func, Arc::new(Utf8Caster::new()))
    }

    pub fn with_caster(func: F, caster: Arc<dyn LoadStoreCaster>) -> Self {
        Self::from_converter(func, FieldConverter::new(caster))
    }

    /// Storage that only moves bytearrays; typed fields fail to convert and
    /// `check_schema` rejects it
    pub fn without_caster(func: F) -> Self {
        Self::from_converter(func, FieldConverter::without_caster())
    }

    fn from_converter(func: F, converter: FieldConverter) -> Self {
        Self {
            func,
            ctx: StorageContext::new(converter),
            location: None,
            signature: None,
            cursor: None,
            writer: None,
        }
    }

    pub fn func(&self) -> &F {
        &self.func
    }

    pub fn context(&self) -> &StorageContext {
        &self.ctx
    }

    /// The most recently bound location
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn load_caster(&self) -> Option<&Arc<dyn LoadStoreCaster>> {
        self.ctx.converter.caster()
    }

    // ========================================================================
    // Front end: binding
    // ========================================================================

    /// Bind a location for loading
    ///
    /// Input format entries left by an earlier binding are cleared first, so
    /// the same configuration can be bound repeatedly.
    pub fn set_location(&mut self, location: &str, conf: &mut JobConfiguration) -> Result<()> {
        let location = Location::parse(location)?;
        let (instance, zookeepers, user, password) = location.connection()?;
        let range = location.range()?;

        let cleared = conf.unset_prefix(INPUT_PREFIX);
        if cleared > 0 {
            debug!("Cleared {} stale input format entries", cleared);
        }

        input::set_input_info(
            conf,
            user,
            password.as_bytes(),
            location.table(),
            location.authorizations(),
        )?;
        input::set_zookeeper_instance(conf, instance, zookeepers)?;
        if !location.columns().is_empty() {
            input::fetch_columns(conf, location.columns());
        }

        info!("Scanning Accumulo for {} for table {}", range, location.table());
        input::set_ranges(conf, std::slice::from_ref(&range))?;

        self.func.configure_input_format(conf)?;

        self.ctx.table = Some(location.table().to_string());
        self.location = Some(location);
        Ok(())
    }

    /// Bind a location for storing
    ///
    /// Does nothing to the configuration when output info is already present.
    pub fn set_store_location(
        &mut self,
        location: &str,
        conf: &mut JobConfiguration,
    ) -> Result<()> {
        let location = Location::parse(location)?;

        if !output::is_configured(conf) {
            let (instance, zookeepers, user, password) = location.connection()?;
            let tuning = location.write_tuning();

            output::set_output_info(conf, user, password.as_bytes(), true, location.table())?;
            output::set_zookeeper_instance(conf, instance, zookeepers)?;
            output::set_max_latency(conf, tuning.max_latency_ms);
            output::set_max_mutation_buffer_size(conf, tuning.max_mutation_buffer_bytes);
            output::set_max_write_threads(conf, tuning.max_write_threads);

            info!("Writing data to {}", location.table());

            self.func.configure_output_format(conf)?;
        }

        self.ctx.table = Some(location.table().to_string());
        self.location = Some(location);
        Ok(())
    }

    /// Locations are absolute already
    pub fn relative_to_absolute_path(&self, location: &str, _cur_dir: &Path) -> String {
        location.to_string()
    }

    pub fn rel_to_abs_path_for_store_location(&self, location: &str, cur_dir: &Path) -> String {
        self.relative_to_absolute_path(location, cur_dir)
    }

    /// Input format entries currently in the configuration
    pub fn input_format_entries(conf: &JobConfiguration) -> Vec<(String, String)> {
        conf.entries_with_prefix(INPUT_PREFIX)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    // ========================================================================
    // Schema and UDF context
    // ========================================================================

    pub fn set_udf_context_signature(&mut self, signature: impl Into<String>) {
        self.signature = Some(signature.into());
    }

    pub fn set_store_func_udf_context_signature(&mut self, signature: impl Into<String>) {
        self.signature = Some(signature.into());
    }

    /// Accept the schema of the tuples about to be stored
    ///
    /// The schema is kept for conversion and recorded in the UDF context so
    /// tasks can restore it.
    pub fn check_schema(&mut self, schema: &ResourceSchema, udf: &mut UdfContext) -> Result<()> {
        if !self.ctx.converter.has_caster() {
            error!("Caster must implement LoadStoreCaster for writing to Accumulo.");
            return Err(StorageError::BadCaster {
                reason: "no load/store caster configured".to_string(),
            });
        }

        let signature = self.signature.as_deref().unwrap_or_default();
        udf.properties_mut(Self::udf_class(), signature)
            .insert(schema_property(signature), schema.to_json()?);

        self.ctx.schema = Some(schema.clone());
        Ok(())
    }

    /// Reload a schema recorded by `check_schema`; false when there is none
    pub fn restore_schema(&mut self, udf: &UdfContext) -> Result<bool> {
        let signature = self.signature.as_deref().unwrap_or_default();
        let json = udf
            .properties(Self::udf_class(), signature)
            .and_then(|props| props.get(&schema_property(signature)));

        match json {
            Some(json) => {
                self.ctx.schema = Some(ResourceSchema::from_json(json)?);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn udf_class() -> &'static str {
        std::any::type_name::<F>()
    }

    // ========================================================================
    // Task side: reading and writing
    // ========================================================================

    pub fn prepare_to_read(&mut self, cursor: impl ScanCursor + 'static) {
        self.cursor = Some(Box::new(cursor));
    }

    /// Next tuple from the cursor, or `None` once it is exhausted
    pub fn get_next(&mut self) -> Result<Option<Tuple>> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or(StorageError::NotPrepared { operation: "read" })?;

        match cursor.next_key_value()? {
            Some((key, value)) => self.func.get_tuple(&key, &value, &self.ctx).map(Some),
            None => Ok(None),
        }
    }

    pub fn prepare_to_write(&mut self, writer: impl MutationWriter + 'static) {
        self.writer = Some(Box::new(writer));
    }

    /// Write every mutation the tuple maps to into the bound table
    pub fn put_next(&mut self, tuple: &Tuple) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or(StorageError::NotPrepared { operation: "write" })?;
        let table = self
            .ctx
            .table
            .as_deref()
            .ok_or(StorageError::NotPrepared { operation: "write" })?;

        for mutation in self.func.get_mutations(tuple, &self.ctx)? {
            writer.write(table, mutation)?;
        }
        Ok(())
    }

    pub fn cleanup_on_failure(&self, _location: &str, _conf: &JobConfiguration) {}

    pub fn cleanup_on_success(&self, _location: &str, _conf: &JobConfiguration) {}
}

impl Default for AccumuloStorage<KeyValueStorage> {
    fn default() -> Self {
        Self::new(KeyValueStorage)
    }
}

fn schema_property(signature: &str) -> String {
    format!("{}{}", signature, SCHEMA_PROPERTY_SUFFIX)
}
