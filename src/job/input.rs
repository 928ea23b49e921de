//! Entries consumed by the store's input format

use tracing::info;

use super::{ConnectionSettings, JobConfiguration, key};
use crate::config::INPUT_PREFIX;
use crate::data::range::RangeJson;
use crate::data::{Authorizations, Range};
use crate::error::{Result, StorageError};
use crate::io::ColumnFilter;

const TABLE_NAME: &str = "tablename";
const AUTHORIZATIONS: &str = "authorizations";
const COLUMNS: &str = "columns";
const RANGES: &str = "ranges";

/// Set credentials, source table and scan authorizations; only once per job
pub fn set_input_info(
    conf: &mut JobConfiguration,
    user: &str,
    password: &[u8],
    table: &str,
    authorizations: &Authorizations,
) -> Result<()> {
    super::set_credentials(conf, INPUT_PREFIX, user, password)?;
    conf.set(key(INPUT_PREFIX, TABLE_NAME), table);
    if !authorizations.is_empty() {
        conf.set(key(INPUT_PREFIX, AUTHORIZATIONS), authorizations.serialize());
    }
    Ok(())
}

pub fn set_zookeeper_instance(
    conf: &mut JobConfiguration,
    instance: &str,
    zookeepers: &str,
) -> Result<()> {
    super::set_zookeeper_instance(conf, INPUT_PREFIX, instance, zookeepers)
}

/// Restrict the scan to the given columns
pub fn fetch_columns(conf: &mut JobConfiguration, columns: &[ColumnFilter]) {
    let encoded: Vec<String> = columns
        .iter()
        .map(|column| match &column.qualifier {
            Some(qualifier) => format!("{}:{}", hex::encode(&column.family), hex::encode(qualifier)),
            None => hex::encode(&column.family),
        })
        .collect();

    info!("Fetching columns {:?}", columns);
    conf.set(key(INPUT_PREFIX, COLUMNS), encoded.join(","));
}

pub fn set_ranges(conf: &mut JobConfiguration, ranges: &[Range]) -> Result<()> {
    let encoded: Vec<RangeJson> = ranges.iter().map(RangeJson::from).collect();
    conf.set(key(INPUT_PREFIX, RANGES), serde_json::to_string(&encoded)?);
    Ok(())
}

/// Input format settings as a task sees them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSettings {
    pub connection: ConnectionSettings,
    pub table: String,
    pub authorizations: Authorizations,
    pub columns: Vec<ColumnFilter>,
    /// Empty means the whole table
    pub ranges: Vec<Range>,
}

impl InputSettings {
    pub fn read(conf: &JobConfiguration) -> Result<Self> {
        let connection = ConnectionSettings::read(conf, INPUT_PREFIX)?;
        let table = super::required(conf, INPUT_PREFIX, TABLE_NAME)?.to_string();

        let authorizations = match conf.get(&key(INPUT_PREFIX, AUTHORIZATIONS)) {
            Some(auths) => Authorizations::parse(auths)?,
            None => Authorizations::empty(),
        };

        let columns = match conf.get(&key(INPUT_PREFIX, COLUMNS)) {
            Some(columns) => decode_columns(columns)?,
            None => Vec::new(),
        };

        let ranges = match conf.get(&key(INPUT_PREFIX, RANGES)) {
            Some(ranges) => serde_json::from_str::<Vec<RangeJson>>(ranges)?
                .into_iter()
                .map(Range::try_from)
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            connection,
            table,
            authorizations,
            columns,
            ranges,
        })
    }
}

fn decode_columns(encoded: &str) -> Result<Vec<ColumnFilter>> {
    let invalid = || StorageError::InvalidConfigValue {
        key: key(INPUT_PREFIX, COLUMNS),
        value: encoded.to_string(),
    };
    let decode = |part: &str| {
        hex::decode(part)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(invalid)
    };

    encoded
        .split(',')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once(':') {
            Some((family, qualifier)) => Ok(ColumnFilter::column(decode(family)?, decode(qualifier)?)),
            None => Ok(ColumnFilter::family(decode(segment)?)),
        })
        .collect()
}
