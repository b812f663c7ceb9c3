//! The initial basis: an artificial root joined to every vertex by a big-M edge.

use alloc::vec::Vec;

use num_traits::NumCast;

use super::tree::SpanningTree;
use crate::amount::Amount;
use crate::error::Error;
use crate::network::{sum_checked, Network};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum EdgeState {
    /// Non-basic with zero flow.
    Lower,
    /// Non-basic with flow equal to the capacity.
    Upper,
    /// Basic, i.e. an edge of the spanning tree.
    Tree,
}

/// The edge data of a simplex session together with its basis tree.
///
/// Edges `0..num_real` are the edges of the network, edge `num_real + v` is the
/// artificial edge between vertex `v` and the root. A capacity of `F::max_value()`
/// means the edge is unbounded.
#[derive(Clone, Debug)]
pub(super) struct Basis<F> {
    pub(super) sources: Vec<usize>,
    pub(super) targets: Vec<usize>,
    pub(super) costs: Vec<F>,
    pub(super) caps: Vec<F>,
    pub(super) flows: Vec<F>,
    pub(super) states: Vec<EdgeState>,
    pub(super) tree: SpanningTree<F>,
    pub(super) num_real: usize,
}

impl<F> Basis<F>
where
    F: Amount,
{
    /// The capacity of `e`, `None` if it is unbounded.
    pub(super) fn capacity(&self, e: usize) -> Option<F> {
        let cap = self.caps[e];
        (cap != F::max_value()).then_some(cap)
    }

    /// The remaining capacity of `e` in its own direction, `None` if unbounded.
    pub(super) fn slack(&self, e: usize) -> Option<F> {
        self.capacity(e).map(|cap| cap - self.flows[e])
    }

    /// `cost(u, v) - potential[u] + potential[v]` of edge `e = (u, v)`.
    pub(super) fn reduced_cost(&self, e: usize) -> Result<F, Error> {
        let potentials = self.tree.potentials();
        self.costs[e]
            .checked_sub(&potentials[self.sources[e]])
            .and_then(|c| c.checked_add(&potentials[self.targets[e]]))
            .ok_or(Error::NumericOverflow)
    }

    /// The reduced cost of `e` signed by its bound: negative iff `e` may enter.
    pub(super) fn violation(&self, e: usize) -> Result<F, Error> {
        match self.states[e] {
            EdgeState::Lower => self.reduced_cost(e),
            EdgeState::Upper => self
                .reduced_cost(e)?
                .checked_neg()
                .ok_or(Error::NumericOverflow),
            EdgeState::Tree => Ok(F::zero()),
        }
    }

    /// The flows on the artificial edges.
    #[cfg(test)]
    pub(super) fn artificial_flows(&self) -> &[F] {
        &self.flows[self.num_real..]
    }
}

/// The default big-M: `(max |cost| + 1) * n`.
///
/// Any simple path of real edges costs less than this in absolute value, so any
/// cycle through the root (which uses two artificial edges) is more expensive than
/// every alternative on real edges.
pub(super) fn default_artificial_cost<F>(network: &Network<F>) -> Result<F, Error>
where
    F: Amount,
{
    let max_cost = network.edges().iter().try_fold(F::zero(), |acc, e| {
        let abs = if e.cost < F::zero() {
            e.cost.checked_neg().ok_or(Error::NumericOverflow)?
        } else {
            e.cost
        };
        Ok::<_, Error>(acc.max(abs))
    })?;

    let n = <F as NumCast>::from(network.num_vertices()).ok_or(Error::NumericOverflow)?;
    max_cost
        .checked_add(&F::one())
        .and_then(|c| c.checked_mul(&n))
        .ok_or(Error::NumericOverflow)
}

/// Build the starting basis for `network`.
///
/// Real edges start at their lower bound with zero flow. The tree is a star around the
/// artificial root `n`: a vertex with non-negative supply sends it to the root on
/// `v -> root`, a vertex with negative supply receives its demand on `root -> v`.
/// Fails with [`Error::Infeasible`] if the supplies do not sum to zero.
pub(super) fn initial_basis<F>(network: &Network<F>, artificial_cost: F) -> Result<Basis<F>, Error>
where
    F: Amount,
{
    let n = network.num_vertices();
    let m = network.num_edges();

    let total_supply: F = sum_checked(network.supplies().iter().copied())?;
    if !total_supply.is_zero() {
        log::info!("supplies sum to {total_supply}, not zero");
        return Err(Error::Infeasible);
    }

    let root = n;
    let mut basis = Basis {
        sources: Vec::with_capacity(m + n),
        targets: Vec::with_capacity(m + n),
        costs: Vec::with_capacity(m + n),
        caps: Vec::with_capacity(m + n),
        flows: Vec::with_capacity(m + n),
        states: Vec::with_capacity(m + n),
        tree: SpanningTree::new(n + 1),
        num_real: m,
    };

    for edge in network.edges() {
        basis.sources.push(edge.tail);
        basis.targets.push(edge.head);
        basis.costs.push(edge.cost);
        basis.caps.push(edge.capacity);
        basis.flows.push(F::zero());
        basis.states.push(EdgeState::Lower);
    }

    for v in 0..n {
        let supply = network.supply(v);
        let up = supply >= F::zero();
        let (source, target, flow) = if up {
            (v, root, supply)
        } else {
            let demand = supply.checked_neg().ok_or(Error::NumericOverflow)?;
            (root, v, demand)
        };

        basis.sources.push(source);
        basis.targets.push(target);
        basis.costs.push(artificial_cost);
        basis.caps.push(F::max_value());
        basis.flows.push(flow);
        basis.states.push(EdgeState::Tree);
        basis.tree.attach(v, root, m + v, up);
    }

    basis.tree.propagate(root, &basis.costs)?;

    Ok(basis)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn network() -> Network<i64> {
        Network::new(
            vec![3, 0, -1, -2],
            [(0, 1), (1, 2), (1, 3), (2, 3)],
            4,
            &[2, -5, 1, 3],
        )
        .unwrap()
    }

    #[test]
    fn artificial_cost_dominates_real_paths() {
        let g = network();
        assert_eq!(default_artificial_cost(&g), Ok(24));

        let g = Network::new(vec![0i64; 2], Vec::new(), 1, &[]).unwrap();
        assert_eq!(default_artificial_cost(&g), Ok(2));

        let g = Network::new(vec![0i64; 2], [(0, 1)], 1, &[i64::MIN]).unwrap();
        assert_eq!(default_artificial_cost(&g), Err(Error::NumericOverflow));
    }

    #[test]
    fn star_basis_carries_all_supplies() {
        let g = network();
        let basis = initial_basis(&g, 24).unwrap();
        let root = 4;

        assert_eq!(basis.flows[..4], [0, 0, 0, 0]);
        assert!(basis.states[..4].iter().all(|&s| s == EdgeState::Lower));
        assert_eq!(basis.artificial_flows(), &[3, 0, 1, 2]);

        // supply vertices point to the root, demand vertices are fed from it
        assert_eq!((basis.sources[4], basis.targets[4]), (0, root));
        assert_eq!((basis.sources[5], basis.targets[5]), (1, root));
        assert_eq!((basis.sources[6], basis.targets[6]), (root, 2));
        assert_eq!((basis.sources[7], basis.targets[7]), (root, 3));

        for v in 0..4 {
            assert_eq!(basis.tree.parent(v), root);
            assert_eq!(basis.tree.pred(v), 4 + v);
            assert_eq!(basis.reduced_cost(4 + v), Ok(0));
        }
        assert_eq!(basis.tree.potential(root), 0);
        assert_eq!(basis.tree.potential(0), 24);
        assert_eq!(basis.tree.potential(2), -24);
    }

    #[test]
    fn violation_signs_follow_bounds() {
        let g = network();
        let mut basis = initial_basis(&g, 24).unwrap();

        // edge 0 = (0 -> 1): 2 - 24 + 24
        assert_eq!(basis.violation(0), Ok(2));
        // edge 1 = (1 -> 2): -5 - 24 - 24
        assert_eq!(basis.violation(1), Ok(-53));
        basis.states[1] = EdgeState::Upper;
        assert_eq!(basis.violation(1), Ok(53));
        assert_eq!(basis.violation(5), Ok(0));
    }

    #[test]
    fn imbalanced_supplies_are_infeasible() {
        let g = Network::new(vec![1i64, -2], [(0, 1)], 5, &[3]).unwrap();
        assert_eq!(initial_basis(&g, 10).unwrap_err(), Error::Infeasible);
    }

    #[test]
    fn unbounded_capacity_has_no_slack() {
        let g = Network::new(vec![0i64, 0], [(0, 1)], i64::MAX, &[1]).unwrap();
        let basis = initial_basis(&g, 4).unwrap();
        assert_eq!(basis.capacity(0), None);
        assert_eq!(basis.slack(0), None);
        assert_eq!(basis.slack(1), None);
    }
}
