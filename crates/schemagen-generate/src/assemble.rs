use tracing::debug;

use schemagen_core::{Dialect, KeyType};

use crate::fields::FieldStatement;
use crate::tables::TableStatement;

/// Marker left in distributed-dialect column definitions where an
/// aggregation type goes once the table's key model is known.
pub const AGG_TYPE_PLACEHOLDER: &str = "/*agg_type_placeholder*/";

const VALUE_AGG_TYPE: &str = "REPLACE";

/// Column every generated table is keyed and distributed on.
pub fn primary_key_column(dialect: Dialect) -> &'static str {
    if dialect.is_distributed() {
        "`pk` int"
    } else {
        "`pk` int primary key"
    }
}

/// Column definitions and index clauses for `table`, in body order.
pub fn column_definitions(
    table: &TableStatement,
    fields: &[FieldStatement],
    dialect: Dialect,
) -> Vec<String> {
    let aggregate = table.key_type == Some(KeyType::Aggregate);
    let mut columns = Vec::with_capacity(fields.len() + 1);
    columns.push(primary_key_column(dialect).to_string());

    for field in fields {
        let agg_type = if aggregate && !table.key_columns.contains(&field.name) {
            format!(" {VALUE_AGG_TYPE}")
        } else {
            String::new()
        };
        columns.push(
            field
                .definition
                .replace(&format!(" {AGG_TYPE_PLACEHOLDER}"), &agg_type),
        );
    }

    if !dialect.is_distributed() {
        columns.extend(
            fields
                .iter()
                .filter(|field| field.indexed)
                .map(|field| format!("key (`{}`)", field.name)),
        );
    }

    columns
}

/// Fill the body slot of every table with the generated fields.
pub fn assemble_ddl(tables: &mut [TableStatement], fields: &[FieldStatement], dialect: Dialect) {
    for table in tables.iter_mut() {
        let columns = column_definitions(table, fields, dialect);
        table.wrap_in_table(&columns);
        debug!(table = %table.name, columns = columns.len(), "table ddl assembled");
    }
}
