use std::fmt::Debug;

use serde_json::Value;
use tracing::warn;

use crate::config::GroupSource;
use crate::error::{GenerationError, Result};

/// Closed set of axes a generation group understands.
///
/// Implementors are fieldless enums; [`AxisKind::ALL`] fixes the axis order
/// used for enumeration and name concatenation.
pub trait AxisKind: Copy + Eq + Debug + 'static {
    /// Group name as it appears in configuration (`tables`, `fields`).
    const GROUP: &'static str;
    /// Declared axes, in enumeration order.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Values used when the configuration omits the axis or leaves it empty.
    fn defaults(self) -> &'static [&'static str];

    /// Axes whose raw values are clause text rather than identifier
    /// material. Names use `<axis><position>` for them.
    fn structural(self) -> bool {
        false
    }
}

/// A named dimension with its ordered candidate values. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis<A> {
    pub kind: A,
    pub values: Vec<String>,
}

impl<A: AxisKind> Axis<A> {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Ordered axes of one generation group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSpace<A> {
    axes: Vec<Axis<A>>,
}

impl<A: AxisKind> VariableSpace<A> {
    /// Build a space from explicit axes. Axes must be distinct and
    /// non-empty.
    pub fn new(axes: Vec<Axis<A>>) -> Result<Self> {
        for (index, axis) in axes.iter().enumerate() {
            if axis.values.is_empty() {
                return Err(GenerationError::Configuration(format!(
                    "{}: axis '{}' has no values",
                    A::GROUP,
                    axis.name()
                )));
            }
            if axes[..index].iter().any(|other| other.kind == axis.kind) {
                return Err(GenerationError::Configuration(format!(
                    "{}: duplicate axis '{}'",
                    A::GROUP,
                    axis.name()
                )));
            }
        }
        Ok(Self { axes })
    }

    /// Load every declared axis of `A`, taking configured values when
    /// present and non-empty and the built-in defaults otherwise.
    ///
    /// Axis order follows [`AxisKind::ALL`], never the source map. An axis
    /// given as a bare scalar is read as a one-element list; nulls, nested
    /// lists and objects are configuration errors.
    pub fn load(source: Option<&GroupSource>) -> Result<Self> {
        if let Some(source) = source {
            for key in source.keys() {
                if !A::ALL.iter().any(|kind| kind.name() == key) {
                    warn!(group = A::GROUP, axis = %key, "ignoring unknown axis");
                }
            }
        }

        let mut axes = Vec::with_capacity(A::ALL.len());
        for &kind in A::ALL {
            let declared = match source.and_then(|source| source.get(kind.name())) {
                Some(value) => coerce_values(A::GROUP, kind.name(), value)?,
                None => Vec::new(),
            };
            let values = if declared.is_empty() {
                kind.defaults().iter().map(|value| value.to_string()).collect()
            } else {
                declared
            };
            axes.push(Axis { kind, values });
        }

        Self::new(axes)
    }

    pub fn axes(&self) -> &[Axis<A>] {
        &self.axes
    }

    pub fn kinds(&self) -> impl Iterator<Item = A> + '_ {
        self.axes.iter().map(|axis| axis.kind)
    }

    pub fn axis(&self, kind: A) -> Option<&Axis<A>> {
        self.axes.iter().find(|axis| axis.kind == kind)
    }

    /// Number of combinations in the cartesian product, saturating.
    pub fn combinations(&self) -> usize {
        self.axes
            .iter()
            .fold(1usize, |acc, axis| acc.saturating_mul(axis.values.len()))
    }
}

fn coerce_values(group: &str, axis: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                coerce_scalar(item).ok_or_else(|| {
                    GenerationError::Configuration(format!(
                        "{group}.{axis}: values must be a flat list of scalars"
                    ))
                })
            })
            .collect(),
        other => coerce_scalar(other).map(|value| vec![value]).ok_or_else(|| {
            GenerationError::Configuration(format!(
                "{group}.{axis}: expected a list of scalars"
            ))
        }),
    }
}

fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
