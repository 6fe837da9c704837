use std::collections::{HashMap, HashSet};

use schemagen_core::{AxisKind, VariableSpace};

/// Collision counts for the names handed out during one generation run of
/// one group. Grows monotonically; never shared between runs.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    counts: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `base` on its first occurrence, then `base2`, `base3`, ...
    ///
    /// A suffixed candidate that was already handed out (`table_1` + `2`
    /// against a literal `table_12`) is skipped, so every returned name is
    /// unique within the run.
    pub fn assign(&mut self, base: String) -> String {
        let count = self.counts.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 && self.issued.insert(base.clone()) {
            return base;
        }

        *count = (*count).max(2);
        loop {
            let candidate = format!("{base}{count}");
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
            *count += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Concatenate `prefix` with one `_`-separated token per axis. Structural
/// axes contribute `<axis><position>` instead of their raw clause text.
pub fn base_name<A: AxisKind>(
    prefix: &str,
    space: &VariableSpace<A>,
    combination: &[&str],
) -> String {
    let mut name = String::from(prefix);
    for (position, (axis, value)) in space.axes().iter().zip(combination).enumerate() {
        name.push('_');
        if axis.kind.structural() {
            name.push_str(axis.name());
            name.push_str(&position.to_string());
        } else {
            name.push_str(value);
        }
    }
    name
}
