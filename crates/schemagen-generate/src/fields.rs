use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use schemagen_core::{AxisKind, Dialect, GenerationError, Result, UNDEF, VariableSpace};

use crate::assemble::AGG_TYPE_PLACEHOLDER;
use crate::model::{GenerateOptions, GroupOutput};
use crate::naming::{NameRegistry, base_name};
use crate::render::render_field;
use crate::traverse::traverse;

const FIELD_PREFIX: &str = "field";
const DEFAULT_MEMBERS: &str = "('a','b','c','d','e')";
const NUMERIC_TYPES: &[&str] = &[
    "tinyint",
    "smallint",
    "mediumint",
    "int",
    "integer",
    "bigint",
    "decimal",
    "numeric",
    "float",
    "double",
    "real",
];

/// Axes of the `fields` group, in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldAxis {
    Types,
    Sign,
    Keys,
    Null,
}

impl AxisKind for FieldAxis {
    const GROUP: &'static str = "fields";
    const ALL: &'static [Self] = &[
        FieldAxis::Types,
        FieldAxis::Sign,
        FieldAxis::Keys,
        FieldAxis::Null,
    ];

    fn name(self) -> &'static str {
        match self {
            FieldAxis::Types => "types",
            FieldAxis::Sign => "sign",
            FieldAxis::Keys => "keys",
            FieldAxis::Null => "null",
        }
    }

    fn defaults(self) -> &'static [&'static str] {
        match self {
            FieldAxis::Types => &["int", "varchar(20)", "date", "datetime", "decimal(10,2)"],
            FieldAxis::Sign | FieldAxis::Keys | FieldAxis::Null => &[UNDEF],
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct FieldAccumulator {
    /// Lowercased type name without its length/precision arguments.
    pub base_type: String,
    pub indexed: bool,
    fragments: HashMap<FieldAxis, String>,
}

impl FieldAccumulator {
    pub fn fragment(&self, axis: FieldAxis) -> &str {
        self.fragments.get(&axis).map(String::as_str).unwrap_or("")
    }

    pub fn set_fragment(&mut self, axis: FieldAxis, fragment: String) {
        self.fragments.insert(axis, fragment);
    }

    pub fn is_numeric(&self) -> bool {
        NUMERIC_TYPES.contains(&self.base_type.as_str())
    }
}

impl FieldAxis {
    pub fn apply(
        self,
        raw: &str,
        acc: &mut FieldAccumulator,
        dialect: Dialect,
    ) -> Result<String> {
        match self {
            FieldAxis::Types => apply_types(raw, acc),
            FieldAxis::Sign => apply_sign(raw, acc),
            FieldAxis::Keys => apply_keys(raw, acc, dialect),
            FieldAxis::Null => apply_null(raw),
        }
    }
}

fn apply_types(raw: &str, acc: &mut FieldAccumulator) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(GenerationError::format("types", raw, "empty column type"));
    }

    let base = raw
        .split(|ch: char| ch == '(' || ch.is_whitespace())
        .next()
        .unwrap_or(raw)
        .to_ascii_lowercase();
    let rendered = if (base == "enum" || base == "set") && !raw.contains('(') {
        format!("{base}{DEFAULT_MEMBERS}")
    } else {
        raw.to_string()
    };

    acc.base_type = base;
    Ok(rendered)
}

fn apply_sign(raw: &str, acc: &FieldAccumulator) -> Result<String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        UNDEF => Ok(String::new()),
        sign @ ("signed" | "unsigned") if acc.is_numeric() => Ok(sign.to_string()),
        "signed" | "unsigned" => Ok(String::new()),
        _ => Err(GenerationError::format(
            "sign",
            raw,
            "expected signed, unsigned or undef",
        )),
    }
}

fn apply_keys(raw: &str, acc: &mut FieldAccumulator, dialect: Dialect) -> Result<String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        UNDEF => Ok(String::new()),
        // the distributed engine declares keys at table level only
        "key" => {
            acc.indexed = !dialect.is_distributed();
            Ok(String::new())
        }
        _ => Err(GenerationError::format("keys", raw, "expected key or undef")),
    }
}

fn apply_null(raw: &str) -> Result<String> {
    let normalized = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase();
    match normalized.as_str() {
        UNDEF => Ok(String::new()),
        "null" | "not null" => Ok(normalized),
        _ => Err(GenerationError::format(
            "null",
            raw,
            "expected null, not null or undef",
        )),
    }
}

/// One generated column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldStatement {
    pub name: String,
    /// Column definition; carries [`AGG_TYPE_PLACEHOLDER`] on the
    /// distributed dialect until the owning table's key type is known.
    pub definition: String,
    pub base_type: String,
    /// Whether the column gets a secondary index clause.
    pub indexed: bool,
}

/// Run the `fields` group over `space` with a fresh name registry.
pub fn generate_fields(
    space: &VariableSpace<FieldAxis>,
    options: &GenerateOptions,
) -> GroupOutput<FieldStatement> {
    let combinations = space.combinations();
    let mut names = NameRegistry::new();
    let mut statements = Vec::with_capacity(combinations);
    let mut failed_combination = None;

    info!(group = FieldAxis::GROUP, combinations, "generating statements");

    let result = traverse(space, |combination| {
        let mut acc = FieldAccumulator::default();
        for (axis, raw) in space.kinds().zip(combination) {
            match axis.apply(raw, &mut acc, options.dialect) {
                Ok(fragment) => acc.set_fragment(axis, fragment),
                Err(err) => {
                    failed_combination =
                        Some(combination.iter().map(|value| value.to_string()).collect());
                    return Err(err);
                }
            }
        }

        let name = names.assign(base_name(FIELD_PREFIX, space, combination));
        let definition = render_field(options.dialect, &name, &acc, AGG_TYPE_PLACEHOLDER);
        debug!(field = %name, "field statement rendered");
        statements.push(FieldStatement {
            name,
            definition,
            base_type: acc.base_type,
            indexed: acc.indexed,
        });
        Ok(())
    });

    match &result {
        Err(err) => warn!(
            group = FieldAxis::GROUP,
            generated = statements.len(),
            error = %err,
            "generation stopped"
        ),
        Ok(()) => info!(
            group = FieldAxis::GROUP,
            generated = statements.len(),
            "generation completed"
        ),
    }

    GroupOutput {
        group: FieldAxis::GROUP,
        combinations,
        statements,
        error: result.err(),
        failed_combination,
    }
}
