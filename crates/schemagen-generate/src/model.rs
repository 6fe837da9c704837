use serde::{Deserialize, Serialize};

use schemagen_core::{Dialect, GenerationConfig, GenerationError, KeyTypePolicy};

/// Options fixed for the lifetime of a generation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Target dialect; selects templates and partition/key transforms.
    pub dialect: Dialect,
    /// Key type selection when partitions need a key and none is set.
    pub key_type_policy: KeyTypePolicy,
}

impl GenerateOptions {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            dialect: config.dialect(),
            key_type_policy: config.key_type_policy.clone(),
        }
    }
}

/// Statements produced by one run of one group.
///
/// A failing combination stops the run; statements produced before it are
/// kept and the error is carried alongside them.
#[derive(Debug)]
pub struct GroupOutput<S> {
    pub group: &'static str,
    /// Size of the cartesian product that was requested.
    pub combinations: usize,
    pub statements: Vec<S>,
    pub error: Option<GenerationError>,
    /// Raw axis values of the combination that failed.
    pub failed_combination: Option<Vec<String>>,
}

impl<S> GroupOutput<S> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// All-or-nothing view of the run.
    pub fn into_result(self) -> Result<Vec<S>, GenerationError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.statements),
        }
    }
}
