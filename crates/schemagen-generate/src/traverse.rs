use schemagen_core::{AxisKind, VariableSpace};

/// Visit every combination of `space` in nested-loop order: the first axis
/// is the outermost loop, the last axis varies fastest.
///
/// `visit` receives one value per axis, aligned with the space's axis order.
/// The first error stops the traversal and is returned as is; whatever the
/// visitor produced before that stays with the caller.
pub fn traverse<A, E, F>(space: &VariableSpace<A>, mut visit: F) -> Result<(), E>
where
    A: AxisKind,
    F: FnMut(&[&str]) -> Result<(), E>,
{
    let axes = space.axes();
    if axes.iter().any(|axis| axis.values.is_empty()) {
        return Ok(());
    }

    let mut positions = vec![0usize; axes.len()];
    let mut current: Vec<&str> = axes.iter().map(|axis| axis.values[0].as_str()).collect();

    loop {
        visit(&current)?;

        // odometer step, rightmost axis first
        let mut index = axes.len();
        loop {
            if index == 0 {
                return Ok(());
            }
            index -= 1;
            positions[index] += 1;
            if positions[index] < axes[index].values.len() {
                current[index] = axes[index].values[positions[index]].as_str();
                break;
            }
            positions[index] = 0;
            current[index] = axes[index].values[0].as_str();
        }
    }
}
