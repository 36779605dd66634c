/*! Compile-time analyses over pattern graphs.

The graph front end decomposes a parsed pattern set into regions and hands
them to the analyses in this module. [`pure_repeat`] summarizes a region
that is a single class repeated `{m,n}` times, so automaton construction can
pick a compact repeat representation (counter, ring, bitmap) instead of
unrolling the graph. The [`trigger`] utilities reduce externally computed
reachability depths over the trigger graph and provide the deterministic
vertex ordering that keeps compiled output reproducible across runs.
*/

use thiserror::Error;

pub mod graph;
pub mod repeat;
pub mod trigger;

pub use graph::ClassId;
pub use graph::PatternGraph;
pub use graph::VertexId;
pub use repeat::pure_repeat;
pub use repeat::PureRepeat;
pub use trigger::depths_from;
pub use trigger::min_depth_ignoring_trivial;
pub use trigger::sorted_by_index;
pub use trigger::TriggerGraph;
pub use trigger::TriggerVertex;
pub use trigger::VertexIndexOrder;
pub use trigger::NO_DEPTH_BOUND;

/// Errors raised while building analysis graphs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The graph outgrew the vertex or class identifier space.
    #[error("pattern graph too large")]
    TooLarge,
}
