use schemagen_core::{Dialect, TemplateFamily};

use crate::fields::{FieldAccumulator, FieldAxis};
use crate::tables::{TableAccumulator, TableAxis};

/// Slot left open in rendered table statements for the column body.
pub const BODY_SLOT: &str = "%s";

const BODY_FRAME: &str = "(\n%s\n)";

/// Table statement template selected once per engine from the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableTemplate {
    family: TemplateFamily,
}

impl TableTemplate {
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            family: dialect.family(),
        }
    }

    /// Fill every slot except the column body.
    pub fn render(&self, name: &str, acc: &TableAccumulator) -> String {
        let partitions = acc.fragment(TableAxis::Partitions);
        match self.family {
            TemplateFamily::Standard => {
                let charsets = acc.fragment(TableAxis::Charsets);
                format!("create table {name} {BODY_FRAME} {charsets} {partitions}")
                    .trim_end()
                    .to_string()
            }
            TemplateFamily::Distributed => {
                let keys = acc.fragment(TableAxis::Keys);
                format!(
                    "create table {name} {BODY_FRAME} engine=olap\n\
                     distributed by hash(pk) buckets 10\n\
                     {keys}\n\
                     {partitions}\n\
                     properties('replication_num' = '1')"
                )
            }
        }
    }
}

/// Replace the open body slot of a rendered table statement.
pub fn fill_body(format: &str, body: &str) -> String {
    let framed = format!("(\n{body}\n)");
    match format.find(BODY_FRAME) {
        Some(_) => format.replacen(BODY_FRAME, &framed, 1),
        None => format.replacen(BODY_SLOT, body, 1),
    }
}

/// Render one column definition: `` `name` type [sign] [placeholder] [null] ``.
pub fn render_field(
    dialect: Dialect,
    name: &str,
    acc: &FieldAccumulator,
    agg_placeholder: &str,
) -> String {
    let quoted = format!("`{name}`");
    let placeholder = if dialect.is_distributed() {
        agg_placeholder
    } else {
        ""
    };
    [
        quoted.as_str(),
        acc.fragment(FieldAxis::Types),
        acc.fragment(FieldAxis::Sign),
        placeholder,
        acc.fragment(FieldAxis::Null),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}
