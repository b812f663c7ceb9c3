pub mod network_simplex;

use core::fmt::Debug;

/// A minimum cost flow algorithm.
pub trait MinCostFlow {
    type Amount;
    type Network;
    type Error: Debug;
    type Solution;

    /// Find a flow satisfying every supply and demand of `network` within the edge
    /// capacities at minimum total cost.
    fn min_cost_flow(&mut self, network: &Self::Network) -> Result<Self::Solution, Self::Error>;
}
