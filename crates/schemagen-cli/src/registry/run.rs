use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use schemagen_core::{Dialect, KeyTypePolicy};
use schemagen_generate::{GenerationRun, GroupOutput};

use super::{RegistryError, RegistryResult};

const STATEMENT_SEPARATOR: &str = ";\n\n";

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
    pub config_path: PathBuf,
    pub dialect: Dialect,
    pub key_type_policy: KeyTypePolicy,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub sql_path: PathBuf,
    pub statements_path: PathBuf,
    pub report_path: PathBuf,
    pub logs_path: PathBuf,
}

/// Per-group summary written to `report.json`.
#[derive(Debug, Serialize)]
pub struct GroupReport {
    pub group: String,
    pub combinations: usize,
    pub generated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_combination: Option<Vec<String>>,
}

impl GroupReport {
    fn from_output<S>(output: &GroupOutput<S>) -> Self {
        Self {
            group: output.group.to_string(),
            combinations: output.combinations,
            generated: output.statements.len(),
            error: output.error.as_ref().map(|err| err.to_string()),
            failed_combination: output.failed_combination.clone(),
        }
    }
}

/// JSON report written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: String,
    pub config: String,
    pub dialect: Dialect,
    pub key_type_policy: KeyTypePolicy,
    pub duration_ms: u64,
    pub groups: Vec<GroupReport>,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx
        .run_dir
        .join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&root)?;

    let paths = RunPaths {
        sql_path: root.join("tables.sql"),
        statements_path: root.join("statements.json"),
        report_path: root.join("report.json"),
        logs_path: root.join("logs.ndjson"),
        root,
    };

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.logs_path)?;

    Ok(paths)
}

/// Write DDL, statement metadata and the run report. Partial runs are
/// written too; the report carries the error.
pub fn write_outputs(
    paths: &RunPaths,
    ctx: &RunContext,
    run: &GenerationRun,
) -> RegistryResult<RunReport> {
    let sql = render_sql(run);
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&paths.sql_path)?;
    file.write_all(sql.as_bytes())?;

    write_json(&paths.statements_path, &run.tables.statements)?;

    let report = RunReport {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        config: ctx.config_path.display().to_string(),
        dialect: ctx.dialect,
        key_type_policy: ctx.key_type_policy.clone(),
        duration_ms: run.duration_ms,
        groups: vec![
            GroupReport::from_output(&run.tables),
            GroupReport::from_output(&run.fields),
        ],
    };
    write_json(&paths.report_path, &report)?;

    Ok(report)
}

/// All assembled statements, each terminated by `;` and a blank line.
pub fn render_sql(run: &GenerationRun) -> String {
    let mut sql = String::new();
    for ddl in run.ddl() {
        sql.push_str(ddl);
        sql.push_str(STATEMENT_SEPARATOR);
    }
    sql
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}
