use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dialect::Dialect;
use crate::error::{GenerationError, Result};

/// Raw group definition: axis name to declared values, as produced by the
/// configuration layer. Values are validated by the Variable Space loader.
pub type GroupSource = Map<String, Value>;

/// How a key type is chosen when partitions require a key clause and the
/// `keys` axis is `undef`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum KeyTypePolicy {
    /// Always the first supported key type (`AGGREGATE`).
    #[default]
    First,
    /// Uniform choice from a per-run generator seeded with `seed`.
    Random {
        #[serde(default)]
        seed: u64,
    },
}

/// Configuration document describing one generation invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GenerationConfig {
    /// Target dialect name (mysql, postgres, sqlite3, doris, default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    /// Key type selection for partitioned tables without a key clause.
    #[serde(default)]
    pub key_type_policy: KeyTypePolicy,
    /// Table axes (rows, charsets, partitions, keys).
    #[serde(default)]
    #[schemars(with = "std::collections::BTreeMap<String, serde_json::Value>")]
    pub tables: GroupSource,
    /// Field axes (types, sign, keys, null).
    #[serde(default)]
    #[schemars(with = "std::collections::BTreeMap<String, serde_json::Value>")]
    pub fields: GroupSource,
}

impl GenerationConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decode any self-describing document (TOML, YAML, ...) that was
    /// already parsed into a JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(GenerationError::Configuration(
                "configuration root must be a table".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
            .as_deref()
            .map(Dialect::parse)
            .unwrap_or_default()
    }
}
