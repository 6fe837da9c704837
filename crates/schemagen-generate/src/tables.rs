use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use schemagen_core::{
    AxisKind, Dialect, GenerationError, KeyType, KeyTypeSelector, Result, UNDEF, VariableSpace,
};

use crate::extract::extract_columns;
use crate::model::{GenerateOptions, GroupOutput};
use crate::naming::{NameRegistry, base_name};
use crate::render::{TableTemplate, fill_body};
use crate::traverse::traverse;

const TABLE_PREFIX: &str = "table";
const DEFAULT_KEY_COLUMN: &str = "pk";

/// Axes of the `tables` group, in enumeration order.
///
/// `Keys` comes after `Partitions` so the key transform sees the partition
/// columns of the same combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableAxis {
    Rows,
    Charsets,
    Partitions,
    Keys,
}

impl AxisKind for TableAxis {
    const GROUP: &'static str = "tables";
    const ALL: &'static [Self] = &[
        TableAxis::Rows,
        TableAxis::Charsets,
        TableAxis::Partitions,
        TableAxis::Keys,
    ];

    fn name(self) -> &'static str {
        match self {
            TableAxis::Rows => "rows",
            TableAxis::Charsets => "charsets",
            TableAxis::Partitions => "partitions",
            TableAxis::Keys => "keys",
        }
    }

    fn defaults(self) -> &'static [&'static str] {
        match self {
            TableAxis::Rows => &["0", "1", "2", "10", "100"],
            TableAxis::Charsets | TableAxis::Partitions | TableAxis::Keys => &[UNDEF],
        }
    }

    fn structural(self) -> bool {
        matches!(self, TableAxis::Partitions | TableAxis::Keys)
    }
}

/// Working state of one combination. Created per combination and consumed
/// by [`TableAccumulator::into_statement`].
#[derive(Debug, Default, Clone)]
pub struct TableAccumulator {
    pub row_count: u64,
    pub partition_columns: Vec<String>,
    pub key_columns: Vec<String>,
    pub key_type: Option<KeyType>,
    fragments: HashMap<TableAxis, String>,
}

impl TableAccumulator {
    pub fn fragment(&self, axis: TableAxis) -> &str {
        self.fragments.get(&axis).map(String::as_str).unwrap_or("")
    }

    pub fn set_fragment(&mut self, axis: TableAxis, fragment: String) {
        self.fragments.insert(axis, fragment);
    }

    fn into_statement(self, name: String, format: String) -> TableStatement {
        TableStatement {
            name,
            format,
            row_count: self.row_count,
            partition_columns: self.partition_columns,
            key_columns: self.key_columns,
            key_type: self.key_type,
            ddl: None,
        }
    }
}

/// Per-run collaborators visible to the table transforms.
pub struct TransformContext<'a> {
    pub dialect: Dialect,
    pub key_types: &'a mut KeyTypeSelector,
}

impl TableAxis {
    /// Apply this axis to `raw`, recording side state in `acc` and
    /// returning the template fragment.
    pub fn apply(
        self,
        raw: &str,
        acc: &mut TableAccumulator,
        ctx: &mut TransformContext<'_>,
    ) -> Result<String> {
        match self {
            TableAxis::Rows => apply_rows(raw, acc),
            TableAxis::Charsets => Ok(apply_charsets(raw)),
            TableAxis::Partitions => apply_partitions(raw, acc, ctx.dialect),
            TableAxis::Keys => apply_keys(raw, acc, ctx),
        }
    }
}

fn apply_rows(raw: &str, acc: &mut TableAccumulator) -> Result<String> {
    acc.row_count = raw
        .parse::<u64>()
        .map_err(|err| GenerationError::format("rows", raw, err.to_string()))?;
    Ok(String::new())
}

fn apply_charsets(raw: &str) -> String {
    if raw == UNDEF {
        String::new()
    } else {
        format!("character set {raw}")
    }
}

fn apply_partitions(raw: &str, acc: &mut TableAccumulator, dialect: Dialect) -> Result<String> {
    if raw == UNDEF {
        return Ok(String::new());
    }

    // hash partitioning is unavailable on the distributed engine
    if !dialect.is_distributed() {
        let count = raw
            .parse::<u32>()
            .map_err(|err| GenerationError::format("partitions", raw, err.to_string()))?;
        if count == 0 {
            return Err(GenerationError::format(
                "partitions",
                raw,
                "partition count must be positive",
            ));
        }
        return Ok(format!("\npartition by hash(pk)\npartitions {count}"));
    }

    acc.partition_columns = extract_columns(raw)?;
    Ok(format!("PARTITION BY {raw}"))
}

fn apply_keys(
    raw: &str,
    acc: &mut TableAccumulator,
    ctx: &mut TransformContext<'_>,
) -> Result<String> {
    if !ctx.dialect.is_distributed() {
        return Ok(String::new());
    }

    let raw = raw.trim();
    let (key_type, own_columns) = if raw == UNDEF {
        if acc.partition_columns.is_empty() {
            return Ok(String::new());
        }
        (ctx.key_types.pick(), vec![DEFAULT_KEY_COLUMN.to_string()])
    } else {
        let key_type = KeyType::from_prefix(raw)?;
        let columns = if raw.contains('(') {
            extract_columns(raw)?
        } else {
            vec![DEFAULT_KEY_COLUMN.to_string()]
        };
        (key_type, columns)
    };

    acc.key_type = Some(key_type);
    acc.key_columns = acc.partition_columns.clone();
    acc.key_columns.extend(own_columns);
    Ok(key_clause(key_type, &acc.key_columns))
}

fn key_clause(key_type: KeyType, columns: &[String]) -> String {
    format!("{key_type} KEY({})", columns.join(", "))
}

/// Enforce partition-to-key propagation after every axis has run.
///
/// On the distributed dialect, a combination with partition columns always
/// ends with a key clause whose column list starts with those columns. When
/// the `keys` axis is declared after `partitions` this is already true.
pub fn resolve_dependencies(acc: &mut TableAccumulator, ctx: &mut TransformContext<'_>) {
    if !ctx.dialect.is_distributed() || acc.partition_columns.is_empty() {
        return;
    }

    let key_type = match acc.key_type {
        Some(_) if acc.key_columns.starts_with(&acc.partition_columns) => return,
        Some(key_type) => key_type,
        None => ctx.key_types.pick(),
    };

    let own_columns = if acc.key_columns.is_empty() {
        vec![DEFAULT_KEY_COLUMN.to_string()]
    } else {
        std::mem::take(&mut acc.key_columns)
    };
    let mut columns = acc.partition_columns.clone();
    columns.extend(own_columns);

    let clause = key_clause(key_type, &columns);
    acc.key_type = Some(key_type);
    acc.key_columns = columns;
    acc.set_fragment(TableAxis::Keys, clause);
}

/// One rendered `create table` statement with an open column-body slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStatement {
    pub name: String,
    /// Statement text with [`crate::BODY_SLOT`] left open for columns.
    pub format: String,
    pub row_count: u64,
    pub partition_columns: Vec<String>,
    pub key_columns: Vec<String>,
    pub key_type: Option<KeyType>,
    /// Complete DDL, set by [`TableStatement::wrap_in_table`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddl: Option<String>,
}

impl TableStatement {
    /// Fill the body slot with column definitions joined by `,\n`.
    pub fn wrap_in_table(&mut self, columns: &[String]) {
        self.ddl = Some(fill_body(&self.format, &columns.join(",\n")));
    }

    pub fn ddl(&self) -> Option<&str> {
        self.ddl.as_deref()
    }
}

/// Run the `tables` group over `space`.
///
/// Uses a fresh name registry and key-type selector, so running the same
/// space twice yields identical output.
pub fn generate_tables(
    space: &VariableSpace<TableAxis>,
    options: &GenerateOptions,
) -> GroupOutput<TableStatement> {
    let combinations = space.combinations();
    let template = TableTemplate::for_dialect(options.dialect);
    let mut names = NameRegistry::new();
    let mut key_types = KeyTypeSelector::new(&options.key_type_policy);
    let mut statements = Vec::with_capacity(combinations);
    let mut failed_combination = None;

    info!(
        group = TableAxis::GROUP,
        dialect = %options.dialect,
        combinations,
        "generating statements"
    );

    let result = traverse(space, |combination| {
        let mut acc = TableAccumulator::default();
        let mut ctx = TransformContext {
            dialect: options.dialect,
            key_types: &mut key_types,
        };

        for (axis, raw) in space.kinds().zip(combination) {
            match axis.apply(raw, &mut acc, &mut ctx) {
                Ok(fragment) => acc.set_fragment(axis, fragment),
                Err(err) => {
                    failed_combination =
                        Some(combination.iter().map(|value| value.to_string()).collect());
                    return Err(err);
                }
            }
        }
        resolve_dependencies(&mut acc, &mut ctx);

        let name = names.assign(base_name(TABLE_PREFIX, space, combination));
        let format = template.render(&name, &acc);
        debug!(table = %name, rows = acc.row_count, "table statement rendered");
        statements.push(acc.into_statement(name, format));
        Ok(())
    });

    if let Err(err) = &result {
        warn!(
            group = TableAxis::GROUP,
            generated = statements.len(),
            error = %err,
            "generation stopped"
        );
    } else {
        info!(
            group = TableAxis::GROUP,
            generated = statements.len(),
            "generation completed"
        );
    }

    GroupOutput {
        group: TableAxis::GROUP,
        combinations,
        statements,
        error: result.err(),
        failed_combination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagen_core::KeyTypePolicy;

    fn run(
        axis: TableAxis,
        raw: &str,
        acc: &mut TableAccumulator,
        dialect: Dialect,
    ) -> Result<String> {
        let mut selector = KeyTypeSelector::new(&KeyTypePolicy::First);
        let mut ctx = TransformContext {
            dialect,
            key_types: &mut selector,
        };
        axis.apply(raw, acc, &mut ctx)
    }

    #[test]
    fn rows_records_count_without_fragment() {
        let mut acc = TableAccumulator::default();
        let fragment = run(TableAxis::Rows, "30", &mut acc, Dialect::Mysql);
        assert_eq!(fragment.ok(), Some(String::new()));
        assert_eq!(acc.row_count, 30);

        let err = run(TableAxis::Rows, "ten", &mut acc, Dialect::Mysql).unwrap_err();
        assert!(matches!(err, GenerationError::Format { axis: "rows", .. }));
    }

    #[test]
    fn charsets_undef_contributes_nothing() {
        let mut acc = TableAccumulator::default();
        let fragment = run(TableAxis::Charsets, "undef", &mut acc, Dialect::Mysql);
        assert_eq!(fragment.ok(), Some(String::new()));
        assert_eq!(
            run(TableAxis::Charsets, "utf8mb4", &mut acc, Dialect::Mysql).ok(),
            Some("character set utf8mb4".to_string())
        );
    }

    #[test]
    fn standard_partitions_need_positive_count() {
        let mut acc = TableAccumulator::default();
        assert_eq!(
            run(TableAxis::Partitions, "4", &mut acc, Dialect::Mysql).ok(),
            Some("\npartition by hash(pk)\npartitions 4".to_string())
        );
        assert!(run(TableAxis::Partitions, "0", &mut acc, Dialect::Mysql).is_err());
        let err = run(TableAxis::Partitions, "RANGE(a)", &mut acc, Dialect::Mysql).unwrap_err();
        assert!(matches!(err, GenerationError::Format { axis: "partitions", .. }));
        assert!(acc.partition_columns.is_empty());
    }

    #[test]
    fn distributed_partitions_record_columns() {
        let mut acc = TableAccumulator::default();
        let fragment = run(TableAxis::Partitions, "LIST(`region`) ()", &mut acc, Dialect::Doris)
            .expect("partition fragment");
        assert_eq!(fragment, "PARTITION BY LIST(`region`) ()");
        assert_eq!(acc.partition_columns, vec!["region"]);
    }

    #[test]
    fn keys_prepend_partition_columns_without_dedup() {
        let mut acc = TableAccumulator {
            partition_columns: vec!["a".to_string(), "b".to_string()],
            ..TableAccumulator::default()
        };
        let fragment = run(TableAxis::Keys, "duplicate key(b, c)", &mut acc, Dialect::Doris)
            .expect("key fragment");
        assert_eq!(fragment, "DUPLICATE KEY(a, b, b, c)");
        assert_eq!(acc.key_type, Some(KeyType::Duplicate));
    }

    #[test]
    fn keys_default_to_pk_column() {
        let mut acc = TableAccumulator::default();
        let fragment = run(TableAxis::Keys, "AGGREGATE KEY", &mut acc, Dialect::Doris)
            .expect("key fragment");
        assert_eq!(fragment, "AGGREGATE KEY(pk)");
        assert_eq!(acc.key_columns, vec!["pk"]);
    }

    #[test]
    fn keys_undef_without_partitions_is_empty() {
        let mut acc = TableAccumulator::default();
        let fragment = run(TableAxis::Keys, "undef", &mut acc, Dialect::Doris);
        assert_eq!(fragment.ok(), Some(String::new()));
        assert!(acc.key_type.is_none());
    }

    #[test]
    fn unsupported_key_type_is_reported() {
        let mut acc = TableAccumulator::default();
        let err = run(TableAxis::Keys, "UNIQUE KEY(pk)", &mut acc, Dialect::Doris).unwrap_err();
        assert!(matches!(err, GenerationError::UnsupportedKeyType { .. }));
    }

    #[test]
    fn keys_are_ignored_by_standard_dialect() {
        let mut acc = TableAccumulator::default();
        let fragment = run(TableAxis::Keys, "UNIQUE KEY(pk)", &mut acc, Dialect::Mysql);
        assert_eq!(fragment.ok(), Some(String::new()));
        assert!(acc.key_type.is_none());
    }

    #[test]
    fn resolver_synthesizes_missing_key() {
        let mut selector = KeyTypeSelector::new(&KeyTypePolicy::First);
        let mut ctx = TransformContext {
            dialect: Dialect::Doris,
            key_types: &mut selector,
        };
        let mut acc = TableAccumulator {
            partition_columns: vec!["p1".to_string()],
            ..TableAccumulator::default()
        };
        resolve_dependencies(&mut acc, &mut ctx);
        assert_eq!(acc.key_columns, vec!["p1", "pk"]);
        assert_eq!(acc.fragment(TableAxis::Keys), "AGGREGATE KEY(p1, pk)");

        // already propagated: untouched
        resolve_dependencies(&mut acc, &mut ctx);
        assert_eq!(acc.key_columns, vec!["p1", "pk"]);
    }

    #[test]
    fn resolver_prepends_when_keys_ran_first() {
        let mut selector = KeyTypeSelector::new(&KeyTypePolicy::First);
        let mut ctx = TransformContext {
            dialect: Dialect::Doris,
            key_types: &mut selector,
        };
        let mut acc = TableAccumulator {
            partition_columns: vec!["p1".to_string()],
            key_columns: vec!["k".to_string()],
            key_type: Some(KeyType::Duplicate),
            ..TableAccumulator::default()
        };
        resolve_dependencies(&mut acc, &mut ctx);
        assert_eq!(acc.fragment(TableAxis::Keys), "DUPLICATE KEY(p1, k)");
    }
}
