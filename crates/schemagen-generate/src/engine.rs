use std::time::Instant;

use tracing::info;

use schemagen_core::{GenerationConfig, GenerationError, Result, VariableSpace};

use crate::assemble::assemble_ddl;
use crate::fields::{FieldAxis, FieldStatement, generate_fields};
use crate::model::{GenerateOptions, GroupOutput};
use crate::tables::{TableAxis, TableStatement, generate_tables};

/// Output of a full run: both groups plus assembled table DDL.
#[derive(Debug)]
pub struct GenerationRun {
    pub tables: GroupOutput<TableStatement>,
    pub fields: GroupOutput<FieldStatement>,
    pub duration_ms: u64,
}

impl GenerationRun {
    /// First error across groups, tables first.
    pub fn first_error(&self) -> Option<&GenerationError> {
        self.tables.error.as_ref().or(self.fields.error.as_ref())
    }

    /// Assembled `create table` statements, in generation order.
    pub fn ddl(&self) -> impl Iterator<Item = &str> {
        self.tables
            .statements
            .iter()
            .filter_map(TableStatement::ddl)
    }
}

/// Entry point for generating DDL from configured axes.
///
/// The dialect and key-type policy are fixed at construction; each call
/// owns its own name registries and selector state.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn tables(&self, space: &VariableSpace<TableAxis>) -> GroupOutput<TableStatement> {
        generate_tables(space, &self.options)
    }

    pub fn fields(&self, space: &VariableSpace<FieldAxis>) -> GroupOutput<FieldStatement> {
        generate_fields(space, &self.options)
    }

    /// Load both groups from `config`, generate them, and wrap every table
    /// with the generated fields.
    ///
    /// Configuration errors are returned before anything is generated.
    /// Per-combination errors are carried in the group outputs together
    /// with the statements produced before them.
    pub fn run(&self, config: &GenerationConfig) -> Result<GenerationRun> {
        let start = Instant::now();
        let table_space = VariableSpace::<TableAxis>::load(Some(&config.tables))?;
        let field_space = VariableSpace::<FieldAxis>::load(Some(&config.fields))?;

        info!(
            dialect = %self.options.dialect,
            tables = table_space.combinations(),
            fields = field_space.combinations(),
            "generation started"
        );

        let mut tables = self.tables(&table_space);
        let fields = self.fields(&field_space);
        assemble_ddl(&mut tables.statements, &fields.statements, self.options.dialect);

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            tables = tables.statements.len(),
            fields = fields.statements.len(),
            duration_ms,
            "generation finished"
        );

        Ok(GenerationRun {
            tables,
            fields,
            duration_ms,
        })
    }
}
