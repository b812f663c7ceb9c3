//! A primal network simplex implementation.
//!
//! The basis is a spanning tree rooted at an artificial vertex. Each pivot selects a
//! non-tree edge with a profitable reduced cost, pushes as much flow as possible around
//! the cycle it closes with the tree, and replaces the first edge blocking that cycle.
//! Leaving edges are chosen by the strongly feasible tree rule, which keeps degenerate
//! pivots from cycling.

mod init;
mod pricing;
mod tree;

pub use pricing::Pricing;

use crate::algo::mcmf::MinCostFlow;
use crate::amount::Amount;
use crate::error::Error;
use crate::network::Network;
use crate::solution::{self, Solution, SolutionState};

use init::{Basis, EdgeState};
use pricing::PricingState;

/// Network simplex configuration.
#[derive(Clone, Copy, Debug)]
pub struct NetworkSimplex<F> {
    pricing: Pricing,
    artificial_cost: Option<F>,
}

impl<F> Default for NetworkSimplex<F> {
    fn default() -> Self {
        Self {
            pricing: Pricing::default(),
            artificial_cost: None,
        }
    }
}

impl<F> NetworkSimplex<F>
where
    F: Amount,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entering edge rule.
    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    /// Override the cost of the artificial edges.
    ///
    /// Must exceed the cost of any path of real edges, otherwise feasible instances
    /// may be reported as infeasible. The default is `(max |cost| + 1) * n`.
    pub fn with_artificial_cost(mut self, cost: F) -> Self {
        self.artificial_cost = Some(cost);
        self
    }

    /// Solve the min-cost flow problem on `network`.
    pub fn solve(&self, network: &Network<F>) -> Result<Solution<F>, Error> {
        let n = network.num_vertices();
        let m = network.num_edges();

        // check trivial cases
        if n == 0 || m == 0 {
            let state = if network.supplies().iter().all(|s| s.is_zero()) {
                SolutionState::Optimal
            } else {
                SolutionState::Infeasible
            };
            let zeros = alloc::vec![F::zero(); m + n + 1];
            return solution::extract(network, state, &zeros[..m + n], &zeros, 0);
        }

        let artificial_cost = match self.artificial_cost {
            Some(cost) => cost,
            None => init::default_artificial_cost(network)?,
        };
        log::debug!(
            "network simplex on {n} vertices and {m} edges, {:?} pricing, artificial cost {artificial_cost}",
            self.pricing
        );

        let basis = init::initial_basis(network, artificial_cost)?;
        let mut session = Session {
            network,
            pricing: PricingState::new(self.pricing, basis.num_real),
            basis,
            iterations: 0,
        };
        let state = session.run()?;

        let result = solution::extract(
            network,
            state,
            &session.basis.flows,
            session.basis.tree.potentials(),
            session.iterations,
        );
        match &result {
            Ok(solution) => log::info!(
                "optimal after {} pivots, total cost {}",
                solution.iterations(),
                solution.total_cost()
            ),
            Err(e) => log::info!("no optimal flow after {} pivots: {e}", session.iterations),
        }
        result
    }
}

impl<F> MinCostFlow for NetworkSimplex<F>
where
    F: Amount,
{
    type Amount = F;
    type Network = Network<F>;
    type Error = Error;
    type Solution = Solution<F>;

    fn min_cost_flow(&mut self, network: &Self::Network) -> Result<Self::Solution, Self::Error> {
        self.solve(network)
    }
}

/// Which end of the entering edge the leaving edge was found on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    First,
    Second,
}

#[derive(Clone, Copy, Debug)]
struct Leaving {
    /// The tree node whose parent edge leaves the basis.
    node: usize,
    side: Side,
    /// Whether the leaving edge ends up saturated rather than empty.
    to_upper: bool,
}

/// Mutable state of a single solve.
struct Session<'a, F> {
    network: &'a Network<F>,
    basis: Basis<F>,
    pricing: PricingState,
    iterations: usize,
}

impl<F> Session<'_, F>
where
    F: Amount,
{
    /// Pivot until no edge is eligible to enter.
    fn run(&mut self) -> Result<SolutionState, Error> {
        if !self.initial_pivots()? {
            return Ok(SolutionState::Unbounded);
        }

        while let Some(e_in) = self.pricing.select(|e| self.basis.violation(e))? {
            if !self.pivot(e_in)? {
                return Ok(SolutionState::Unbounded);
            }
        }

        Ok(SolutionState::Optimal)
    }

    /// Heuristic initial pivots: bring the cheapest edge into every demand vertex into
    /// the basis if it is profitable.
    ///
    /// Returns `false` if unboundedness has been detected and `true` otherwise.
    fn initial_pivots(&mut self) -> Result<bool, Error> {
        let network = self.network;
        for v in 0..network.num_vertices() {
            if network.supply(v) >= F::zero() {
                continue;
            }
            let cheapest = network
                .incoming(v)
                .iter()
                .copied()
                .min_by_key(|&e| network.edge(e).cost);
            if let Some(e) = cheapest {
                if self.basis.violation(e)? < F::zero() && !self.pivot(e)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Perform one pivot with entering edge `e_in`.
    ///
    /// Returns `false` if the cycle closed by `e_in` has unbounded capacity.
    fn pivot(&mut self, e_in: usize) -> Result<bool, Error> {
        self.iterations += 1;
        let basis = &mut self.basis;

        // flow is pushed from `first` to `second` over `e_in`, then back to `first`
        // through the tree via `join`
        let forward = basis.states[e_in] == EdgeState::Lower;
        let (first, second) = if forward {
            (basis.sources[e_in], basis.targets[e_in])
        } else {
            (basis.targets[e_in], basis.sources[e_in])
        };
        let join = basis.tree.join(first, second);

        // The entering edge can move its whole capacity. On ties the edge met last
        // when walking the cycle from `join` in push direction leaves.
        let mut delta = basis.capacity(e_in);
        let mut leaving = None;

        for u in basis.tree.path(first, join) {
            let e = basis.tree.pred(u);
            let (residual, to_upper) = if basis.tree.is_up(u) {
                (Some(basis.flows[e]), false)
            } else {
                (basis.slack(e), true)
            };
            if shorter(residual, delta) {
                delta = residual;
                leaving = Some(Leaving {
                    node: u,
                    side: Side::First,
                    to_upper,
                });
            }
        }

        for u in basis.tree.path(second, join) {
            let e = basis.tree.pred(u);
            let (residual, to_upper) = if basis.tree.is_up(u) {
                (basis.slack(e), true)
            } else {
                (Some(basis.flows[e]), false)
            };
            if residual.is_some() && !shorter(delta, residual) {
                delta = residual;
                leaving = Some(Leaving {
                    node: u,
                    side: Side::Second,
                    to_upper,
                });
            }
        }

        let Some(delta) = delta else {
            log::debug!("edge {e_in} closes a negative cycle of unbounded capacity");
            return Ok(false);
        };

        if !delta.is_zero() {
            shift(&mut basis.flows[e_in], delta, forward)?;
            for u in basis.tree.path(first, join) {
                let e = basis.tree.pred(u);
                shift(&mut basis.flows[e], delta, !basis.tree.is_up(u))?;
            }
            for u in basis.tree.path(second, join) {
                let e = basis.tree.pred(u);
                shift(&mut basis.flows[e], delta, basis.tree.is_up(u))?;
            }
        }

        let Some(Leaving {
            node: v_out,
            side,
            to_upper,
        }) = leaving
        else {
            // the entering edge itself is the bottleneck, it only switches bounds
            basis.states[e_in] = if forward {
                EdgeState::Upper
            } else {
                EdgeState::Lower
            };
            log::trace!("pivot {}: edge {e_in} switches bound, delta {delta}", self.iterations);
            return Ok(true);
        };

        let e_out = basis.tree.pred(v_out);
        basis.states[e_out] = if to_upper {
            EdgeState::Upper
        } else {
            EdgeState::Lower
        };
        basis.states[e_in] = EdgeState::Tree;

        // the subtree below the leaving edge contains `u_in` and is re-hung at `v_in`
        let (u_in, v_in) = match side {
            Side::First => (first, second),
            Side::Second => (second, first),
        };
        let up_in = basis.sources[e_in] == u_in;
        basis
            .tree
            .exchange(u_in, v_in, v_out, e_in, up_in, &basis.costs)?;

        log::trace!(
            "pivot {}: edge {e_in} enters, edge {e_out} leaves, delta {delta}",
            self.iterations
        );
        Ok(true)
    }
}

/// `a < b` where `None` stands for an unbounded amount.
fn shorter<F: Ord>(a: Option<F>, b: Option<F>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a < b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

fn shift<F>(flow: &mut F, delta: F, increase: bool) -> Result<(), Error>
where
    F: Amount,
{
    let shifted = if increase {
        flow.checked_add(&delta)
    } else {
        flow.checked_sub(&delta)
    };
    *flow = shifted.ok_or(Error::NumericOverflow)?;
    Ok(())
}
