use alloc::string::String;

use displaydoc::Display;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Error {
    /// Edge {edge} references vertex {vertex} which is out of range
    InvalidIndex { edge: usize, vertex: usize },
    /// Edge {edge} has a negative capacity
    NegativeCapacity { edge: usize },
    /// Input sequence lengths do not match the vertex or edge count
    LengthMismatch,
    /// No flow satisfies all supplies and demands within the capacities
    Infeasible,
    /// A negative cost cycle with unbounded capacity exists
    Unbounded,
    /// Intermediate value does not fit in the chosen integer width
    NumericOverflow,
    /// Invalid transport graph: {0}
    InvalidGraph(String),
}
