use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::KeyTypePolicy;
use crate::error::{GenerationError, Result};

/// Table key model of the distributed dialect.
///
/// `UNIQUE` is left out: it can reject generated rows as duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyType {
    Aggregate,
    Duplicate,
}

pub const SUPPORTED_KEY_TYPES: [KeyType; 2] = [KeyType::Aggregate, KeyType::Duplicate];

impl KeyType {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyType::Aggregate => "AGGREGATE",
            KeyType::Duplicate => "DUPLICATE",
        }
    }

    /// Resolve the key type a clause starts with, ignoring case.
    ///
    /// `"duplicate key(a)"` resolves to [`KeyType::Duplicate`].
    pub fn from_prefix(text: &str) -> Result<Self> {
        let upper = text.trim().to_ascii_uppercase();
        SUPPORTED_KEY_TYPES
            .into_iter()
            .find(|key_type| upper.starts_with(key_type.as_str()))
            .ok_or_else(|| GenerationError::UnsupportedKeyType {
                text: upper.clone(),
                supported: supported_list(),
            })
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn supported_list() -> String {
    let names: Vec<&str> = SUPPORTED_KEY_TYPES.iter().map(|key| key.as_str()).collect();
    format!("[{}]", names.join(", "))
}

/// Picks a key type when partitioning requires a key clause and none was
/// configured. Owned by a single generation run.
#[derive(Debug, Clone)]
pub struct KeyTypeSelector {
    rng: Option<ChaCha8Rng>,
}

impl KeyTypeSelector {
    pub fn new(policy: &KeyTypePolicy) -> Self {
        let rng = match policy {
            KeyTypePolicy::First => None,
            KeyTypePolicy::Random { seed } => Some(ChaCha8Rng::seed_from_u64(*seed)),
        };
        Self { rng }
    }

    pub fn pick(&mut self) -> KeyType {
        let key_type = match self.rng.as_mut() {
            None => SUPPORTED_KEY_TYPES[0],
            Some(rng) => SUPPORTED_KEY_TYPES[rng.random_range(0..SUPPORTED_KEY_TYPES.len())],
        };
        debug!(key_type = %key_type, "synthesized key type");
        key_type
    }
}
