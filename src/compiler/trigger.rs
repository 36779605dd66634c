/*! Trigger graph utilities.

The trigger graph gates the runtime: each vertex is a literal-anchored
trigger, and an edge means the target may fire after the source. A
vertex's depth is the minimum guaranteed number of trigger hops from the
anchor root before it can fire; the scheduler uses the minimum depth over a
vertex set as a lower bound on how soon any of them needs attention.

Vertices carry a stable insertion index so that vertex sets can be iterated
in an order that is reproducible across runs; compiled output must not
depend on allocation order.
*/

use std::cmp::Ordering;
use std::collections::VecDeque;

use bitvec::vec::BitVec;
use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::Error;
use crate::bound::Bound;

/// Returned by [`min_depth_ignoring_trivial`] when no vertex in the set
/// contributes a useful bound: the largest representable finite depth, a
/// deliberately conservative "schedule it whenever" answer.
pub const NO_DEPTH_BOUND: Bound = Bound::Finite(Bound::CEILING);

/// Handle to a vertex in a [`TriggerGraph`].
///
/// Handles carry no order of their own; use [`VertexIndexOrder`] or
/// [`sorted_by_index`] wherever iteration order reaches compiled output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TriggerVertex(u32);

impl TriggerVertex {
    #[inline]
    fn slot(self) -> usize {
        self.0 as usize
    }
}

/// A literal-anchored trigger graph.
#[derive(Default)]
pub struct TriggerGraph {
    /// Stable insertion index of each vertex. Indices are unique; the
    /// ordering invariant check in [`VertexIndexOrder`] depends on it.
    index: Vec<u32>,
    succ: Vec<SmallVec<[TriggerVertex; 2]>>,
}

impl TriggerGraph {
    /// Creates an empty trigger graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex, assigning it the next insertion index.
    pub fn add_vertex(&mut self) -> Result<TriggerVertex, Error> {
        let v = self
            .index
            .len()
            .try_into()
            .map(TriggerVertex)
            .map_err(|_| Error::TooLarge)?;
        self.index.push(v.0);
        self.succ.push(SmallVec::new());
        Ok(v)
    }

    /// Adds the edge `from` → `to`. Duplicate edges are ignored.
    pub fn add_edge(&mut self, from: TriggerVertex, to: TriggerVertex) {
        if self.succ[from.slot()].contains(&to) {
            return;
        }
        self.succ[from.slot()].push(to);
    }

    /// Vertices that may fire after `v`.
    #[inline]
    pub fn successors(&self, v: TriggerVertex) -> &[TriggerVertex] {
        &self.succ[v.slot()]
    }

    /// Stable insertion index of `v`.
    #[inline]
    pub fn index_of(&self, v: TriggerVertex) -> u32 {
        self.index[v.slot()]
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.index.len()
    }

    /// All vertices, in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = TriggerVertex> + '_ {
        (0..self.index.len()).map(|i| TriggerVertex(i as u32))
    }

    #[cfg(test)]
    fn set_index(&mut self, v: TriggerVertex, index: u32) {
        self.index[v.slot()] = index;
    }
}

/// Computes every vertex's depth: the minimum number of edges on any path
/// from `root`, accumulated with saturating [`Bound`] addition. The root
/// itself has depth 0. Vertices the walk never reaches are reported as
/// [`Bound::Unreachable`].
pub fn depths_from(
    g: &TriggerGraph,
    root: TriggerVertex,
) -> FxHashMap<TriggerVertex, Bound> {
    let mut depths: FxHashMap<TriggerVertex, Bound> =
        g.vertices().map(|v| (v, Bound::Unreachable)).collect();

    let mut seen: BitVec = BitVec::repeat(false, g.num_vertices());
    let mut queue = VecDeque::new();

    seen.set(root.slot(), true);
    depths.insert(root, Bound::ZERO);
    queue.push_back(root);

    while let Some(v) = queue.pop_front() {
        let next = depths[&v] + Bound::Finite(1);
        for &w in g.successors(v) {
            if !seen[w.slot()] {
                seen.set(w.slot(), true);
                depths.insert(w, next);
                queue.push_back(w);
            }
        }
    }

    debug!(
        "trigger depths: {} vertices, {} reachable",
        g.num_vertices(),
        seen.count_ones()
    );

    depths
}

/// Minimum depth over `verts`, ignoring vertices that carry no useful
/// lower bound: depth-1 vertices (directly anchored, zero delay),
/// unreachable vertices, and infinite depths. Returns [`NO_DEPTH_BOUND`]
/// when nothing qualifies.
pub fn min_depth_ignoring_trivial(
    depths: &FxHashMap<TriggerVertex, Bound>,
    verts: impl IntoIterator<Item = TriggerVertex>,
) -> Bound {
    let mut min = NO_DEPTH_BOUND;
    for v in verts {
        let depth =
            depths.get(&v).copied().unwrap_or(Bound::Unreachable);
        match depth {
            Bound::Finite(d) if d > 1 => {
                min = min.min(Bound::finite(d));
            }
            _ => {}
        }
    }
    min
}

/// Orders trigger vertices by their stable insertion index.
pub struct VertexIndexOrder<'g> {
    g: &'g TriggerGraph,
}

impl<'g> VertexIndexOrder<'g> {
    /// Creates a comparator over the vertices of `g`.
    pub fn new(g: &'g TriggerGraph) -> Self {
        Self { g }
    }

    /// Compares two vertices by index.
    ///
    /// # Panics
    ///
    /// When two distinct vertices carry the same index. Indices are
    /// assigned uniquely at insertion, so a duplicate means the upstream
    /// index assignment is corrupted and compilation must not proceed.
    pub fn cmp(&self, a: TriggerVertex, b: TriggerVertex) -> Ordering {
        let ord = self.g.index_of(a).cmp(&self.g.index_of(b));
        if ord == Ordering::Equal {
            assert!(
                a == b,
                "duplicate trigger vertex index {}",
                self.g.index_of(a)
            );
        }
        ord
    }
}

/// Sorts `verts` into the stable compilation order.
pub fn sorted_by_index(
    g: &TriggerGraph,
    verts: impl IntoIterator<Item = TriggerVertex>,
) -> Vec<TriggerVertex> {
    let order = VertexIndexOrder::new(g);
    verts.into_iter().sorted_by(|a, b| order.cmp(*a, *b)).collect()
}
