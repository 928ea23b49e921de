//! Configuration constants for the storage adapter
//!
//! This module centralizes the defaults, fixed names and key prefixes used
//! when translating a location string into job configuration entries.

// ============================================================================
// Location Syntax
// ============================================================================

/// Scheme every location string must start with
pub const SCHEME: &str = "accumulo://";

/// Message carried by every location syntax error
pub const EXPECTED_LOCATION_SYNTAX: &str = "accumulo://<table>[?instance=<instanceName>&user=<user>&password=<password>&zookeepers=<zookeepers>&auths=<authorizations>&[start=startRow,end=endRow,fetch_columns=[cf1:cq1,cf2:cq2,...],write_buffer_size_bytes=10000000,write_threads=10,write_latency_ms=30000]]";

// ============================================================================
// Write Tuning Defaults
// ============================================================================

/// Number of threads the store's batch writer uses when none is given
pub const DEFAULT_MAX_WRITE_THREADS: u32 = 10;

/// Bytes of mutations buffered before the writer flushes
///
/// 10 MB (decimal) keeps a task's memory footprint predictable while still
/// letting the writer batch several thousand small mutations per flush.
pub const DEFAULT_MAX_MUTATION_BUFFER_BYTES: u64 = 10 * 1000 * 1000;

/// Longest a buffered mutation may wait before it is sent
pub const DEFAULT_MAX_LATENCY_MS: u64 = 10 * 1000;

// ============================================================================
// Job Configuration Keys
// ============================================================================

/// Prefix of every entry consumed by the store's input format
pub const INPUT_PREFIX: &str = "AccumuloInputFormat";

/// Prefix of every entry consumed by the store's output format
pub const OUTPUT_PREFIX: &str = "AccumuloOutputFormat";

/// Entry holding the serialized UDF context
pub const UDF_CONTEXT_KEY: &str = "accumulo.storage.udf.context";

/// Suffix appended to the signature when storing a checked schema
pub const SCHEMA_PROPERTY_SUFFIX: &str = "_schema";
