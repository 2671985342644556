//! Sibling reorder planning.
//!
//! One algorithm serves every ordered sibling list (assemblies under a
//! press, parts under an assembly): remove the element at `from`,
//! reinsert it at `to`, renumber positions `0..len`. The plan is computed
//! here against indices only; persistence applies it in one transaction.

use crate::error::{StoreError, StoreResult};

/// A computed sibling move: `order[new_position] = old_position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    order: Vec<usize>,
}

impl MovePlan {
    /// Positions whose order value changes, as
    /// `(old_position, new_order)` pairs.
    pub fn displaced(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.order
            .iter()
            .enumerate()
            .filter(|(new_pos, old_pos)| *new_pos != **old_pos)
            .map(|(new_pos, old_pos)| (*old_pos, new_pos))
    }
}

/// Plan a move within a sibling list of `len` elements.
///
/// Returns `Ok(None)` when `from == to`: a no-op by contract, and the
/// caller must not open a write transaction for it.
pub fn plan_move(len: usize, from: usize, to: usize) -> StoreResult<Option<MovePlan>> {
    if from >= len {
        return Err(StoreError::InvalidRange { index: from, len });
    }
    if to >= len {
        return Err(StoreError::InvalidRange { index: to, len });
    }
    if from == to {
        return Ok(None);
    }
    let mut order: Vec<usize> = (0..len).collect();
    let moved = order.remove(from);
    order.insert(to, moved);
    Ok(Some(MovePlan { order }))
}
