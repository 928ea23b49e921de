use derive_builder::Builder;
use std::fmt;

use crate::config::{
    DEFAULT_MAX_LATENCY_MS, DEFAULT_MAX_MUTATION_BUFFER_BYTES, DEFAULT_MAX_WRITE_THREADS, SCHEME,
};
use crate::data::{Authorizations, Range};
use crate::error::{Result, StorageError};

/// A column family, optionally narrowed to one qualifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub family: String,
    pub qualifier: Option<String>,
}

impl ColumnFilter {
    pub fn family(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            qualifier: None,
        }
    }

    pub fn column(family: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            qualifier: Some(qualifier.into()),
        }
    }

    /// Parse a comma separated `cf1:cq1,cf2` list
    pub fn parse_list(s: &str) -> Result<Vec<Self>> {
        let mut filters = Vec::new();

        for segment in s.split(',').filter(|seg| !seg.is_empty()) {
            let filter = match segment.split_once(':') {
                Some((family, qualifier)) => {
                    if qualifier.is_empty() {
                        return Err(StorageError::invalid_location(format!(
                            "empty column qualifier in '{}'",
                            segment
                        )));
                    }
                    Self::column(family, qualifier)
                }
                None => Self::family(segment),
            };

            if filter.family.is_empty() {
                return Err(StorageError::invalid_location(format!(
                    "empty column family in '{}'",
                    segment
                )));
            }

            filters.push(filter);
        }

        Ok(filters)
    }
}

impl fmt::Display for ColumnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}:{}", self.family, qualifier),
            None => f.write_str(&self.family),
        }
    }
}

/// Batch writer tuning passed to the store's output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteTuning {
    pub max_write_threads: u32,
    pub max_mutation_buffer_bytes: u64,
    pub max_latency_ms: u64,
}

impl Default for WriteTuning {
    fn default() -> Self {
        Self {
            max_write_threads: DEFAULT_MAX_WRITE_THREADS,
            max_mutation_buffer_bytes: DEFAULT_MAX_MUTATION_BUFFER_BYTES,
            max_latency_ms: DEFAULT_MAX_LATENCY_MS,
        }
    }
}

/// Parsed location descriptor; immutable once parsed
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(build_fn(error = "StorageError"))]
pub struct Location {
    #[builder(setter(into))]
    table: String,
    #[builder(setter(into, strip_option), default)]
    instance: Option<String>,
    #[builder(setter(into, strip_option), default)]
    zookeepers: Option<String>,
    #[builder(setter(into, strip_option), default)]
    user: Option<String>,
    #[builder(setter(into, strip_option), default)]
    password: Option<String>,
    #[builder(default)]
    authorizations: Authorizations,
    #[builder(default)]
    columns: Vec<ColumnFilter>,
    #[builder(setter(into, strip_option), default)]
    start: Option<String>,
    #[builder(setter(into, strip_option), default)]
    end: Option<String>,
    #[builder(default)]
    write_tuning: WriteTuning,
}

impl Location {
    /// Parse a location string
    ///
    /// ex: `accumulo://table1?instance=myinstance&user=root&password=secret&zookeepers=127.0.0.1:2181&auths=PRIVATE,PUBLIC&fetch_columns=col1:cq1,col2&start=abc&end=z`
    pub fn parse(location: &str) -> Result<Self> {
        let rest = location
            .strip_prefix(SCHEME)
            .ok_or_else(|| StorageError::invalid_location("Bad scheme."))?;

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        let table = path
            .split('/')
            .find(|segment| !segment.is_empty())
            .ok_or_else(|| StorageError::invalid_location("missing table name"))?;

        let mut builder = LocationBuilder::default();
        builder.table(table);

        let mut auths = String::new();
        let mut columns = String::new();
        let mut tuning = WriteTuning::default();

        for param in query.into_iter().flat_map(|q| q.split('&')) {
            let (key, value) = match param.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (param, None),
            };

            if !is_recognized_key(key) {
                continue;
            }

            let value = value.filter(|v| !v.is_empty()).ok_or_else(|| {
                StorageError::invalid_location(format!("missing value for '{}'", key))
            })?;

            match key {
                "instance" => {
                    builder.instance(value);
                }
                "user" => {
                    builder.user(value);
                }
                "password" => {
                    builder.password(value);
                }
                "zookeepers" => {
                    builder.zookeepers(value);
                }
                "auths" => auths = value.to_string(),
                "fetch_columns" => columns = value.to_string(),
                "start" => {
                    builder.start(value);
                }
                "end" => {
                    builder.end(value);
                }
                "write_buffer_size_bytes" => {
                    tuning.max_mutation_buffer_bytes = parse_number(key, value)?
                }
                "write_threads" => tuning.max_write_threads = parse_number(key, value)?,
                "write_latency_ms" => tuning.max_latency_ms = parse_number(key, value)?,
                _ => {}
            }
        }

        builder
            .authorizations(Authorizations::parse(&auths)?)
            .columns(ColumnFilter::parse_list(&columns)?)
            .write_tuning(tuning)
            .build()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    pub fn zookeepers(&self) -> Option<&str> {
        self.zookeepers.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn authorizations(&self) -> &Authorizations {
        &self.authorizations
    }

    pub fn columns(&self) -> &[ColumnFilter] {
        &self.columns
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    pub fn write_tuning(&self) -> WriteTuning {
        self.write_tuning
    }

    /// The single scan range described by `start` and `end`
    pub fn range(&self) -> Result<Range> {
        Range::new(self.start(), self.end())
    }

    /// Connection options needed to bind a format, in the order
    /// (instance, zookeepers, user, password)
    pub fn connection(&self) -> Result<(&str, &str, &str, &str)> {
        let instance = self
            .instance()
            .ok_or(StorageError::MissingOption { key: "instance" })?;
        let zookeepers = self
            .zookeepers()
            .ok_or(StorageError::MissingOption { key: "zookeepers" })?;
        let user = self.user().ok_or(StorageError::MissingOption { key: "user" })?;
        let password = self
            .password()
            .ok_or(StorageError::MissingOption { key: "password" })?;
        Ok((instance, zookeepers, user, password))
    }

    /// Render back to a location string that `parse` accepts
    pub fn to_uri(&self) -> String {
        self.render(true)
    }

    fn render(&self, with_password: bool) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();

        if let Some(instance) = &self.instance {
            params.push(("instance", instance.clone()));
        }
        if let Some(user) = &self.user {
            params.push(("user", user.clone()));
        }
        if let Some(password) = &self.password {
            let shown = if with_password {
                password.clone()
            } else {
                "<redacted>".to_string()
            };
            params.push(("password", shown));
        }
        if let Some(zookeepers) = &self.zookeepers {
            params.push(("zookeepers", zookeepers.clone()));
        }
        if !self.authorizations.is_empty() {
            params.push(("auths", self.authorizations.serialize()));
        }
        if !self.columns.is_empty() {
            let columns: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
            params.push(("fetch_columns", columns.join(",")));
        }
        if let Some(start) = &self.start {
            params.push(("start", start.clone()));
        }
        if let Some(end) = &self.end {
            params.push(("end", end.clone()));
        }

        let defaults = WriteTuning::default();
        if self.write_tuning.max_mutation_buffer_bytes != defaults.max_mutation_buffer_bytes {
            params.push((
                "write_buffer_size_bytes",
                self.write_tuning.max_mutation_buffer_bytes.to_string(),
            ));
        }
        if self.write_tuning.max_write_threads != defaults.max_write_threads {
            params.push((
                "write_threads",
                self.write_tuning.max_write_threads.to_string(),
            ));
        }
        if self.write_tuning.max_latency_ms != defaults.max_latency_ms {
            params.push((
                "write_latency_ms",
                self.write_tuning.max_latency_ms.to_string(),
            ));
        }

        let mut uri = format!("{}{}", SCHEME, self.table);
        if !params.is_empty() {
            let query: Vec<String> = params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            uri.push('?');
            uri.push_str(&query.join("&"));
        }
        uri
    }
}

/// Location string with the password redacted
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

fn is_recognized_key(key: &str) -> bool {
    matches!(
        key,
        "instance"
            | "user"
            | "password"
            | "zookeepers"
            | "auths"
            | "fetch_columns"
            | "start"
            | "end"
            | "write_buffer_size_bytes"
            | "write_threads"
            | "write_latency_ms"
    )
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        StorageError::invalid_location(format!("invalid number for '{}': {}", key, value))
    })
}
