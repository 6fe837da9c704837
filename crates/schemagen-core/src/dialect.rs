use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Target database family. Fixed before a generation run starts and
/// threaded explicitly through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Mysql,
    Postgres,
    Sqlite3,
    Doris,
    #[default]
    Default,
}

/// Template and transform variant selected by a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateFamily {
    /// Single-node engines: charset and hash-partition clauses.
    Standard,
    /// Distributed OLAP engine: key model, range/list partitions, buckets.
    Distributed,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::Mysql,
        Dialect::Postgres,
        Dialect::Sqlite3,
        Dialect::Doris,
        Dialect::Default,
    ];

    /// Parse a declared dialect name. Unknown names fall back to
    /// [`Dialect::Default`] with a warning.
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase();
        match Self::ALL
            .into_iter()
            .find(|dialect| dialect.as_str() == normalized)
        {
            Some(dialect) => dialect,
            None => {
                warn!(dialect = %name, "unknown dialect, using default template");
                Dialect::Default
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite3 => "sqlite3",
            Dialect::Doris => "doris",
            Dialect::Default => "default",
        }
    }

    pub fn family(self) -> TemplateFamily {
        match self {
            Dialect::Doris => TemplateFamily::Distributed,
            Dialect::Mysql | Dialect::Postgres | Dialect::Sqlite3 | Dialect::Default => {
                TemplateFamily::Standard
            }
        }
    }

    pub fn is_distributed(self) -> bool {
        self.family() == TemplateFamily::Distributed
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
