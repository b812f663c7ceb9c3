//! Minimum cost flow by the primal network simplex method.
//!
//! A [`Network`] holds vertex supplies (positive for sources, negative for sinks) and
//! directed edges with a capacity and a per-unit cost. [`NetworkSimplex`] finds a flow
//! that ships every supply to the demands within the capacities at minimum total cost,
//! or reports that the problem is infeasible or unbounded. [`solve`] wraps both behind
//! a flat, array based signature.

#![no_std]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod algo;
pub mod amount;
pub mod error;
pub mod network;
pub mod solution;
pub mod transport;

use alloc::vec::Vec;

use itertools::izip;

pub use crate::algo::mcmf::network_simplex::{NetworkSimplex, Pricing};
pub use crate::algo::mcmf::MinCostFlow;
pub use crate::amount::Amount;
pub use crate::error::Error;
pub use crate::network::{Edge, Network};
pub use crate::solution::{Solution, SolutionState};

/// Solve a min-cost flow problem given as flat arrays.
///
/// Edge `e` goes from `edge_tails[e]` to `edge_heads[e]`, costs `edge_costs[e]` per unit
/// and can carry up to `max_capacity` units. A `max_capacity` of `i64::MAX` makes every
/// edge unbounded. The supplies must sum to zero for the problem to be feasible.
pub fn solve(
    num_vertices: usize,
    num_edges: usize,
    max_capacity: i64,
    vertex_supplies: &[i64],
    edge_tails: &[usize],
    edge_heads: &[usize],
    edge_costs: &[i64],
) -> Result<Solution<i64>, Error> {
    if vertex_supplies.len() != num_vertices
        || edge_tails.len() != num_edges
        || edge_heads.len() != num_edges
        || edge_costs.len() != num_edges
    {
        return Err(Error::LengthMismatch);
    }

    let edges: Vec<_> = izip!(edge_tails, edge_heads)
        .map(|(&tail, &head)| (tail, head))
        .collect();
    let network = Network::new(vertex_supplies.to_vec(), edges, max_capacity, edge_costs)?;

    NetworkSimplex::new().solve(&network)
}
