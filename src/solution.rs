use alloc::vec::Vec;

use num_traits::NumCast;
use serde::Serialize;

use crate::amount::Amount;
use crate::error::Error;
use crate::network::Network;

/// Terminal state of the pivot loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolutionState {
    /// No edge can improve the (artificially extended) problem any more
    Optimal,
    /// The problem is infeasible
    Infeasible,
    /// A negative cycle of unbounded capacity exists
    Unbounded,
}

/// An optimal flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Solution<F> {
    flows: Vec<F>,
    total_cost: F,
    potentials: Vec<F>,
    iterations: usize,
}

impl<F> Solution<F>
where
    F: Amount,
{
    /// The flow on every edge, indexed like the edges of the network.
    pub fn flows(&self) -> &[F] {
        &self.flows
    }

    pub fn flow(&self, e: usize) -> F {
        self.flows[e]
    }

    /// `sum(flow[e] * cost[e])` over all edges.
    pub fn total_cost(&self) -> F {
        self.total_cost
    }

    /// Vertex potentials proving optimality: every edge with `flow < capacity` has a
    /// non-negative reduced cost, every edge with `flow > 0` a non-positive one.
    pub fn potentials(&self) -> &[F] {
        &self.potentials
    }

    /// `cost(u, v) - potential[u] + potential[v]` for edge `e = (u, v)` of `network`.
    pub fn reduced_cost(&self, network: &Network<F>, e: usize) -> Result<F, Error> {
        let edge = network.edge(e);
        edge.cost
            .checked_sub(&self.potentials[edge.tail])
            .and_then(|c| c.checked_add(&self.potentials[edge.head]))
            .ok_or(Error::NumericOverflow)
    }

    /// Number of pivots performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// Turn the final state of a simplex run into the externally visible result.
///
/// `flows` holds the real edges of `network` followed by one artificial edge per
/// vertex. Any flow left on an artificial edge proves the real problem infeasible.
pub(crate) fn extract<F>(
    network: &Network<F>,
    state: SolutionState,
    flows: &[F],
    potentials: &[F],
    iterations: usize,
) -> Result<Solution<F>, Error>
where
    F: Amount,
{
    match state {
        SolutionState::Optimal => {}
        SolutionState::Infeasible => return Err(Error::Infeasible),
        SolutionState::Unbounded => return Err(Error::Unbounded),
    }

    let m = network.num_edges();
    let (real, artificial) = flows.split_at(m);
    if let Some(v) = artificial.iter().position(|f| !f.is_zero()) {
        log::info!(
            "vertex {v} still routes {} units through the artificial root",
            artificial[v]
        );
        return Err(Error::Infeasible);
    }

    let flows = real.to_vec();
    let total_cost = total_cost(network, &flows)?;

    debug_assert!((0..network.num_vertices()).all(|v| network.excess(v, &flows) == Ok(F::zero())));

    Ok(Solution {
        flows,
        total_cost,
        potentials: potentials[..network.num_vertices()].to_vec(),
        iterations,
    })
}

/// `sum(flow[e] * cost[e])`, accumulated in `i128` and narrowed back to `F`.
pub fn total_cost<F>(network: &Network<F>, flows: &[F]) -> Result<F, Error>
where
    F: Amount,
{
    let total = network
        .edges()
        .iter()
        .zip(flows)
        .try_fold(0i128, |acc, (edge, &flow)| {
            let cost: i128 = edge.cost.into();
            cost.checked_mul(flow.into())
                .and_then(|c| acc.checked_add(c))
                .ok_or(Error::NumericOverflow)
        })?;
    <F as NumCast>::from(total).ok_or(Error::NumericOverflow)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn network() -> Network<i32> {
        Network::new(vec![2, 0, -2], [(0, 1), (1, 2), (0, 2)], 5, &[1, 1, 3]).unwrap()
    }

    #[test]
    fn extracts_real_flows_and_cost() {
        let g = network();
        let flows = [2, 2, 0, 0, 0, 0];
        let potentials = [7, 6, 5, 0];
        let solution = extract(&g, SolutionState::Optimal, &flows, &potentials, 3).unwrap();
        assert_eq!(solution.flows(), &[2, 2, 0]);
        assert_eq!(solution.total_cost(), 4);
        assert_eq!(solution.potentials(), &[7, 6, 5]);
        assert_eq!(solution.iterations(), 3);
        assert_eq!(solution.reduced_cost(&g, 2), Ok(1));
    }

    #[test]
    fn artificial_flow_means_infeasible() {
        let g = network();
        let flows = [0, 0, 0, 2, 0, 2];
        let potentials = [0; 4];
        assert_eq!(
            extract(&g, SolutionState::Optimal, &flows, &potentials, 0),
            Err(Error::Infeasible)
        );
    }

    #[test]
    fn terminal_failures_pass_through() {
        let g = network();
        let flows = [0; 6];
        let potentials = [0; 4];
        assert_eq!(
            extract(&g, SolutionState::Unbounded, &flows, &potentials, 0),
            Err(Error::Unbounded)
        );
    }

    #[test]
    fn total_cost_detects_narrowing_overflow() {
        let g = Network::new(vec![0i32; 2], [(0, 1), (0, 1)], i32::MAX, &[i32::MAX, 2]).unwrap();
        assert_eq!(total_cost(&g, &[1, 0]), Ok(i32::MAX));
        assert_eq!(total_cost(&g, &[2, 0]), Err(Error::NumericOverflow));
        assert_eq!(total_cost(&g, &[0, 7]), Ok(14));
    }
}
