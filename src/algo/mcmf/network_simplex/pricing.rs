//! Entering edge selection.

use crate::amount::Amount;
use crate::error::Error;

/// The rule used to pick the entering edge in each pivot.
///
/// All rules scan the edges in a fixed cyclic order and break ties in favour of the
/// edge met first, so repeated solves pivot identically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pricing {
    /// The first eligible edge after the previous entering edge.
    FirstEligible,
    /// The most violating edge over all edges (Dantzig's rule).
    BestEligible,
    /// The most violating edge of the first block of edges containing an eligible one.
    #[default]
    BlockSearch,
}

const MIN_BLOCK_SIZE: usize = 10;

#[derive(Clone, Debug)]
pub(super) struct PricingState {
    rule: Pricing,
    num_edges: usize,
    next: usize,
    block_size: usize,
}

impl PricingState {
    pub(super) fn new(rule: Pricing, num_edges: usize) -> Self {
        let block_size = match rule {
            Pricing::BlockSearch => isqrt_ceil(num_edges).max(MIN_BLOCK_SIZE),
            _ => num_edges,
        };
        Self {
            rule,
            num_edges,
            next: 0,
            block_size,
        }
    }

    /// Pick an edge whose `violation` is negative, or `None` if there is none.
    ///
    /// `violation(e)` is the reduced cost of `e` signed so that negative values mean
    /// that pushing flow over `e` in its feasible direction lowers the total cost.
    pub(super) fn select<F, V>(&mut self, mut violation: V) -> Result<Option<usize>, Error>
    where
        F: Amount,
        V: FnMut(usize) -> Result<F, Error>,
    {
        if self.num_edges == 0 {
            return Ok(None);
        }

        let start = self.next;
        let mut best = F::zero();
        let mut entering = None;
        let mut count = self.block_size;

        for k in 0..self.num_edges {
            let e = (start + k) % self.num_edges;
            let v = violation(e)?;
            if v < best {
                best = v;
                entering = Some(e);
                if self.rule == Pricing::FirstEligible {
                    self.next = (e + 1) % self.num_edges;
                    return Ok(entering);
                }
            }

            count -= 1;
            if count == 0 {
                if entering.is_some() {
                    self.next = (e + 1) % self.num_edges;
                    return Ok(entering);
                }
                count = self.block_size;
            }
        }

        Ok(entering)
    }
}

fn isqrt_ceil(m: usize) -> usize {
    let r = m.isqrt();
    if r * r < m { r + 1 } else { r }
}
