mod config;
mod registry;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use schemagen_core::{GenerationConfig, GenerationError};
use schemagen_generate::{GenerateOptions, GenerationEngine};
use schemars::schema_for;
use thiserror::Error;
use uuid::Uuid;

use config::{Overrides, apply_overrides, load_config};
use registry::{RunContext, init_run_logging, start_run, write_outputs};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("generation incomplete ({group}): {message}")]
    Incomplete { group: &'static str, message: String },
}

#[derive(Parser, Debug)]
#[command(name = "schemagen", version, about = "Combinatorial DDL generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate table DDL for every combination of configured axes.
    Generate(GenerateArgs),
    /// Print the JSON schema of the configuration document.
    Schema,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyPolicyArg {
    First,
    Random,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Configuration file (.toml or .json).
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
    /// Target dialect (mysql, postgres, sqlite3, doris, default).
    #[arg(long)]
    dialect: Option<String>,
    /// Key type selection for partitioned tables without a key clause.
    #[arg(long, value_enum)]
    key_policy: Option<KeyPolicyArg>,
    /// Seed for the random key policy.
    #[arg(long)]
    seed: Option<u64>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Also print the generated DDL to stdout.
    #[arg(long, default_value_t = false)]
    stdout: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Schema => print_schema(),
    }
}

fn print_schema() -> Result<(), CliError> {
    let schema = schema_for!(GenerationConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        config: config_path,
        dialect,
        key_policy,
        seed,
        run_dir,
        stdout,
    } = args;

    let mut config = load_config(&config_path)?;
    apply_overrides(
        &mut config,
        &Overrides {
            dialect,
            random_keys: key_policy.map(|policy| matches!(policy, KeyPolicyArg::Random)),
            seed,
        },
    )?;
    let options = GenerateOptions::from_config(&config);

    let run_ctx = RunContext {
        run_id: Uuid::new_v4().to_string(),
        started_at: chrono::Utc::now(),
        run_dir,
        config_path,
        dialect: options.dialect,
        key_type_policy: options.key_type_policy.clone(),
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_ctx.run_id,
        dialect = %options.dialect,
        config = %run_ctx.config_path.display()
    );

    let timer = Instant::now();
    let engine = GenerationEngine::new(options);
    let run = engine.run(&config)?;

    let report = write_outputs(&run_paths, &run_ctx, &run)?;
    tracing::info!(
        event = "artifacts_written",
        path = %run_paths.root.display(),
        statements = report.groups.first().map(|group| group.generated).unwrap_or(0)
    );

    if stdout {
        print!("{}", registry::render_sql(&run));
    }

    let failed = [
        (run.tables.group, run.tables.error.as_ref()),
        (run.fields.group, run.fields.error.as_ref()),
    ]
    .into_iter()
    .find_map(|(group, err)| err.map(|err| (group, err.to_string())));

    let duration_ms = timer.elapsed().as_millis();
    if let Some((group, message)) = failed {
        tracing::warn!(
            event = "run_finished",
            status = "partial",
            group,
            duration_ms = duration_ms
        );
        return Err(CliError::Incomplete { group, message });
    }

    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);
    Ok(())
}
