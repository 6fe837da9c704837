use std::path::Path;

use schemagen_core::{GenerationConfig, GenerationError, KeyTypePolicy};

use crate::CliError;

/// Read a configuration file. `.toml` files are parsed as TOML, anything
/// else as JSON.
pub fn load_config(path: &Path) -> Result<GenerationConfig, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let config = if is_toml {
        let value: serde_json::Value = toml::from_str(&contents)?;
        GenerationConfig::from_value(value)?
    } else {
        GenerationConfig::from_json_str(&contents)?
    };
    Ok(config)
}

/// Command-line overrides applied on top of the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub dialect: Option<String>,
    pub random_keys: Option<bool>,
    pub seed: Option<u64>,
}

/// Apply flag overrides. A seed only means something under the random key
/// policy, so `--seed` with a resulting `first` policy is rejected.
pub fn apply_overrides(
    config: &mut GenerationConfig,
    overrides: &Overrides,
) -> Result<(), CliError> {
    if let Some(dialect) = &overrides.dialect {
        config.dialect = Some(dialect.clone());
    }

    let configured_seed = match config.key_type_policy {
        KeyTypePolicy::Random { seed } => Some(seed),
        KeyTypePolicy::First => None,
    };
    match overrides.random_keys {
        Some(false) => config.key_type_policy = KeyTypePolicy::First,
        Some(true) => {
            config.key_type_policy = KeyTypePolicy::Random {
                seed: overrides.seed.or(configured_seed).unwrap_or(0),
            }
        }
        None => {
            if let (Some(seed), KeyTypePolicy::Random { .. }) =
                (overrides.seed, &config.key_type_policy)
            {
                config.key_type_policy = KeyTypePolicy::Random { seed };
            }
        }
    }

    if overrides.seed.is_some() && config.key_type_policy == KeyTypePolicy::First {
        return Err(GenerationError::Configuration(
            "--seed requires the random key type policy".to_string(),
        )
        .into());
    }
    Ok(())
}
