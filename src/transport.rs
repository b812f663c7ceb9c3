//! Transport problems on top of the min-cost flow kernel.
//!
//! A [`Graph`] collects vertices with supplies (positive) or demands (negative supply)
//! and edges with ground costs, all sharing one capacity. [`wasserstein_1d`] builds such
//! a graph for a pair of histograms and returns the earth mover's distance between them.

use alloc::format;
use alloc::vec::Vec;

use serde::Serialize;

use crate::algo::mcmf::network_simplex::NetworkSimplex;
use crate::error::Error;
use crate::network::Network;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Vertex {
    pub index: usize,
    pub coordinates: (usize, usize),
    pub supply: i64,
}

impl Vertex {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            coordinates: (0, 0),
            supply: 0,
        }
    }
}

/// An edge between two vertices of a [`Graph`], given by their indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub left: usize,
    pub right: usize,
    pub cost: usize,
    pub flow: usize,
}

impl Edge {
    /// An edge whose ground cost is the Manhattan distance between the coordinates of
    /// its end points.
    pub fn new(left: &Vertex, right: &Vertex) -> Self {
        let (lx, ly) = left.coordinates;
        let (rx, ry) = right.coordinates;
        Self {
            left: left.index,
            right: right.index,
            cost: lx.abs_diff(rx) + ly.abs_diff(ry),
            flow: 0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub max_capacity: usize,
}

impl Graph {
    pub fn new(num_vertices: usize, max_capacity: usize) -> Result<Self, Error> {
        if max_capacity == 0 {
            return Err(Error::InvalidGraph(format!(
                "need a positive max capacity, got {max_capacity}"
            )));
        }

        Ok(Self {
            vertices: (0..num_vertices).map(Vertex::new).collect(),
            edges: Vec::new(),
            max_capacity,
        })
    }

    pub fn add_edge(&mut self, left: usize, right: usize, cost: usize, flow: usize) -> Result<(), Error> {
        self.check_vertex(left)?;
        self.check_vertex(right)?;

        self.edges.push(Edge {
            left,
            right,
            cost,
            flow,
        });
        Ok(())
    }

    pub fn designate_supply(&mut self, vertex: usize, supply: i64) -> Result<(), Error> {
        self.check_vertex(vertex)?;
        self.vertices[vertex].supply = supply;
        Ok(())
    }

    pub fn designate_demand(&mut self, vertex: usize, demand: i64) -> Result<(), Error> {
        self.check_vertex(vertex)?;
        self.vertices[vertex].supply = demand.checked_neg().ok_or(Error::NumericOverflow)?;
        Ok(())
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), Error> {
        let n = self.vertices.len();
        if vertex < n {
            Ok(())
        } else {
            Err(Error::InvalidGraph(format!(
                "vertex {vertex} is out of range {n}"
            )))
        }
    }

    /// Route all supplies to the demands at minimum total cost.
    ///
    /// The flow of every edge is overwritten with the optimal flow. Returns the total
    /// cost of that flow.
    pub fn mcmf(&mut self) -> Result<usize, Error> {
        let network = self.network()?;
        let solution = NetworkSimplex::new().solve(&network)?;

        for (edge, &flow) in self.edges.iter_mut().zip(solution.flows()) {
            edge.flow = usize::try_from(flow).map_err(|_| {
                Error::InvalidGraph(format!(
                    "negative flow {flow} on edge {} -> {}",
                    edge.left, edge.right
                ))
            })?;
        }

        usize::try_from(solution.total_cost()).map_err(|_| Error::NumericOverflow)
    }

    fn network(&self) -> Result<Network<i64>, Error> {
        let capacity = i64::try_from(self.max_capacity).map_err(|_| Error::NumericOverflow)?;
        let costs = self
            .edges
            .iter()
            .map(|e| i64::try_from(e.cost).map_err(|_| Error::NumericOverflow))
            .collect::<Result<Vec<_>, _>>()?;

        Network::new(
            self.vertices.iter().map(|v| v.supply).collect(),
            self.edges.iter().map(|e| (e.left, e.right)),
            capacity,
            &costs,
        )
    }
}

/// The earth mover's distance between two 1-D histograms.
///
/// Bin `i` of `left` is connected to every bin `j` of `right` at cost `|i - j|`. Both
/// histograms must hold the same total mass, which must fit in an `i32`. Returns the
/// distance together with the solved graph, whose edge flows form the transport plan.
/// Vertices `0..left.len()` are the bins of `left`, the remaining ones those of `right`.
pub fn wasserstein_1d(left: &[u64], right: &[u64]) -> Result<(usize, Graph), Error> {
    let total_supply = left
        .iter()
        .try_fold(0u64, |acc, &x| acc.checked_add(x))
        .ok_or(Error::NumericOverflow)?;
    let total_demand = right
        .iter()
        .try_fold(0u64, |acc, &x| acc.checked_add(x))
        .ok_or(Error::NumericOverflow)?;

    if total_supply > i32::MAX as u64 {
        return Err(Error::InvalidGraph(format!(
            "total supply {total_supply} must fit in i32"
        )));
    }
    if total_supply != total_demand {
        return Err(Error::InvalidGraph(format!(
            "supply {total_supply} and demand {total_demand} differ"
        )));
    }

    // an empty distribution has nothing to move
    let mut graph = Graph::new(left.len() + right.len(), (total_supply as usize).max(1))?;

    // both totals fit in i32, so every bin does too
    for (i, &mass) in left.iter().enumerate() {
        graph.designate_supply(i, mass as i64)?;
    }
    for (j, &mass) in right.iter().enumerate() {
        graph.designate_demand(left.len() + j, mass as i64)?;
    }

    for i in 0..left.len() {
        for j in 0..right.len() {
            graph.add_edge(i, left.len() + j, i.abs_diff(j), 0)?;
        }
    }

    let distance = graph.mcmf()?;
    log::debug!(
        "wasserstein distance {distance} between {} and {} bins",
        left.len(),
        right.len()
    );
    Ok((distance, graph))
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(Graph::new(3, 0), Err(Error::InvalidGraph(_))));
        let g = Graph::new(3, 1).unwrap();
        assert_eq!(g.vertices.len(), 3);
        assert_eq!(g.vertices[2], Vertex::new(2));
    }

    #[test]
    fn add_edge_checks_vertices() {
        let mut g = Graph::new(2, 5).unwrap();
        assert!(g.add_edge(0, 1, 3, 0).is_ok());
        assert!(matches!(g.add_edge(0, 2, 3, 0), Err(Error::InvalidGraph(_))));
        assert!(matches!(g.add_edge(7, 1, 3, 0), Err(Error::InvalidGraph(_))));
        assert_eq!(g.edges.len(), 1);
    }

    #[test]
    fn designations_check_vertices() {
        let mut g = Graph::new(2, 5).unwrap();
        assert!(matches!(g.designate_supply(2, 1), Err(Error::InvalidGraph(_))));
        assert!(matches!(g.designate_demand(5, 1), Err(Error::InvalidGraph(_))));
        assert!(g.vertices.iter().all(|v| v.supply == 0));

        g.designate_supply(0, 4).unwrap();
        g.designate_demand(1, 4).unwrap();
        assert_eq!(g.vertices[0].supply, 4);
        assert_eq!(g.vertices[1].supply, -4);
    }

    #[test]
    fn manhattan_ground_cost() {
        let mut a = Vertex::new(0);
        a.coordinates = (1, 5);
        let mut b = Vertex::new(1);
        b.coordinates = (4, 2);
        let e = Edge::new(&a, &b);
        assert_eq!((e.left, e.right, e.cost, e.flow), (0, 1, 6, 0));
    }

    #[test]
    fn mcmf_writes_flows_back() {
        let mut g = Graph::new(3, 4).unwrap();
        g.designate_supply(0, 3).unwrap();
        g.designate_demand(2, 3).unwrap();
        g.add_edge(0, 1, 1, 0).unwrap();
        g.add_edge(1, 2, 1, 0).unwrap();
        g.add_edge(0, 2, 5, 9).unwrap();

        assert_eq!(g.mcmf(), Ok(6));
        let flows: Vec<_> = g.edges.iter().map(|e| e.flow).collect();
        assert_eq!(flows, vec![3, 3, 0]);
    }

    #[test]
    fn mcmf_reports_infeasible_demand() {
        let mut g = Graph::new(2, 1).unwrap();
        g.designate_supply(0, 2).unwrap();
        g.designate_demand(1, 2).unwrap();
        g.add_edge(0, 1, 1, 0).unwrap();
        assert_eq!(g.mcmf(), Err(Error::Infeasible));
    }

    #[test]
    fn wasserstein_of_shifted_histograms() {
        let (d, g) = wasserstein_1d(&[1, 2, 0], &[0, 1, 2]).unwrap();
        assert_eq!(d, 3);
        let moved: usize = g.edges.iter().map(|e| e.flow).sum();
        assert_eq!(moved, 3);

        let (d, _) = wasserstein_1d(&[4, 0, 0, 0], &[0, 0, 0, 4]).unwrap();
        assert_eq!(d, 12);
    }

    #[test]
    fn wasserstein_of_identical_histograms_is_zero() {
        let (d, g) = wasserstein_1d(&[3, 1, 4], &[3, 1, 4]).unwrap();
        assert_eq!(d, 0);
        assert!(g.edges.iter().all(|e| e.flow == 0 || e.cost == 0));

        assert_eq!(wasserstein_1d(&[], &[]).unwrap().0, 0);
    }

    #[test]
    fn wasserstein_rejects_bad_masses() {
        assert!(matches!(
            wasserstein_1d(&[1, 2], &[1, 1]),
            Err(Error::InvalidGraph(_))
        ));
        assert!(matches!(
            wasserstein_1d(&[u64::from(u32::MAX)], &[u64::from(u32::MAX)]),
            Err(Error::InvalidGraph(_))
        ));
    }
}
