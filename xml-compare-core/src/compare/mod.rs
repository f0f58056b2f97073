//! Pairing of two documents into a comparison graph.

mod aligner;
mod comparator;
mod differences;
mod graph;
mod state;

pub use aligner::{classify, compare};
pub use comparator::Comparator;
pub use differences::DifferenceIndex;
pub use graph::{
    ComparisonGraph, ComparisonId, ComparisonNode, NodeKey, PreOrder, Side, SideWrapper, Summary,
    WrapperId,
};
pub use state::{Direction, MovedState, NodeStatus};
