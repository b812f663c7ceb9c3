//! Immutable flow network: vertices with supplies, directed edges with capacity and cost.

use alloc::vec;
use alloc::vec::Vec;

use itertools::izip;
use serde::Serialize;

use crate::amount::Amount;
use crate::error::Error;

/// A directed edge of a [`Network`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Edge<F> {
    pub tail: usize,
    pub head: usize,
    pub capacity: F,
    pub cost: F,
}

/// The graph model of a min-cost flow instance.
///
/// Built once and never mutated afterwards. Multi-edges and self-loops are allowed.
/// Adjacency is stored in compressed form: the edges leaving (entering) vertex `v`
/// are `out_edges[out_start[v]..out_start[v + 1]]` (`in_edges` respectively), in
/// increasing edge index order.
#[derive(Clone, Debug)]
pub struct Network<F> {
    supplies: Vec<F>,
    edges: Vec<Edge<F>>,
    out_start: Vec<usize>,
    out_edges: Vec<usize>,
    in_start: Vec<usize>,
    in_edges: Vec<usize>,
}

impl<F> Network<F>
where
    F: Amount,
{
    /// Create a network where every edge has the same `capacity`.
    pub fn new<E>(supplies: Vec<F>, edges: E, capacity: F, costs: &[F]) -> Result<Self, Error>
    where
        E: IntoIterator<Item = (usize, usize)>,
    {
        let edges: Vec<_> = edges.into_iter().collect();
        if edges.len() != costs.len() {
            return Err(Error::LengthMismatch);
        }
        let capacities = vec![capacity; edges.len()];
        Self::with_capacities(supplies, &edges, &capacities, costs)
    }

    /// Create a network with an individual capacity per edge.
    pub fn with_capacities(
        supplies: Vec<F>,
        edges: &[(usize, usize)],
        capacities: &[F],
        costs: &[F],
    ) -> Result<Self, Error> {
        if edges.len() != capacities.len() || edges.len() != costs.len() {
            return Err(Error::LengthMismatch);
        }

        let n = supplies.len();
        let edges = izip!(edges, capacities, costs)
            .enumerate()
            .map(|(eid, (&(tail, head), &capacity, &cost))| {
                if let Some(&vertex) = [tail, head].iter().find(|&&v| v >= n) {
                    Err(Error::InvalidIndex { edge: eid, vertex })
                } else if capacity < F::zero() {
                    Err(Error::NegativeCapacity { edge: eid })
                } else {
                    Ok(Edge {
                        tail,
                        head,
                        capacity,
                        cost,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (out_start, out_edges) = compress(n, edges.iter().map(|e| e.tail));
        let (in_start, in_edges) = compress(n, edges.iter().map(|e| e.head));

        Ok(Self {
            supplies,
            edges,
            out_start,
            out_edges,
            in_start,
            in_edges,
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.supplies.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn supply(&self, v: usize) -> F {
        self.supplies[v]
    }

    pub fn supplies(&self) -> &[F] {
        &self.supplies
    }

    pub fn edge(&self, e: usize) -> &Edge<F> {
        &self.edges[e]
    }

    pub fn edges(&self) -> &[Edge<F>] {
        &self.edges
    }

    /// Indices of the edges leaving `v`.
    pub fn outgoing(&self, v: usize) -> &[usize] {
        &self.out_edges[self.out_start[v]..self.out_start[v + 1]]
    }

    /// Indices of the edges entering `v`.
    pub fn incoming(&self, v: usize) -> &[usize] {
        &self.in_edges[self.in_start[v]..self.in_start[v + 1]]
    }

    /// Supply plus inflow minus outflow at `v` for the given edge flows.
    ///
    /// Zero at every vertex iff `flows` satisfies flow conservation, i.e. a vertex
    /// sends out exactly its supply more than it receives.
    pub fn excess(&self, v: usize, flows: &[F]) -> Result<F, Error> {
        let inflow = sum_checked(self.incoming(v).iter().map(|&e| flows[e]))?;
        let outflow = sum_checked(self.outgoing(v).iter().map(|&e| flows[e]))?;
        inflow
            .checked_sub(&outflow)
            .and_then(|x| x.checked_add(&self.supplies[v]))
            .ok_or(Error::NumericOverflow)
    }
}

pub(crate) fn sum_checked<F, I>(values: I) -> Result<F, Error>
where
    F: Amount,
    I: IntoIterator<Item = F>,
{
    values.into_iter().try_fold(F::zero(), |acc, x| {
        acc.checked_add(&x).ok_or(Error::NumericOverflow)
    })
}

// counting sort of edge indices by their endpoint
fn compress<I>(n: usize, endpoints: I) -> (Vec<usize>, Vec<usize>)
where
    I: Iterator<Item = usize> + Clone,
{
    let mut start = vec![0; n + 1];
    for v in endpoints.clone() {
        start[v + 1] += 1;
    }
    for v in 0..n {
        start[v + 1] += start[v];
    }

    let mut fill = start.clone();
    let mut list = vec![0; start[n]];
    for (eid, v) in endpoints.enumerate() {
        list[fill[v]] = eid;
        fill[v] += 1;
    }

    (start, list)
}
