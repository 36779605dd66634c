/*! Bounded-repeat extraction.

Decides whether a region is equivalent to a single byte class repeated
between `min` and `max` times. A region qualifies when every interior
vertex accepts the same class and the lengths of the entry-to-exit paths
form one contiguous integer range; `max` is unbounded when the only way to
extend a match past `min` is a self-loop.

Most regions do not qualify. That is a normal negative outcome: the caller
falls back to general automaton construction. Only a qualifying region is
worth a dedicated repeat representation.
*/

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::bound::{Bound, BoundRange};
use crate::compiler::graph::{ClassId, PatternGraph, VertexId};

/// Describes a region equivalent to one byte class repeated between
/// `bounds.min` and `bounds.max` times.
///
/// Produced once per qualifying region at compile time and baked into the
/// generated automaton, where the spread `max - min` and the finiteness of
/// `max` select the repeat-state encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PureRepeat {
    /// The repeated byte class.
    pub class: ClassId,
    /// How often the class repeats.
    pub bounds: BoundRange,
}

/// A set of path lengths, kept as sorted, disjoint, non-adjoining ranges.
///
/// Regions that qualify as pure repeats collapse to a single range almost
/// immediately, so two inline slots cover the common case.
#[derive(Clone, Default)]
struct LengthSet(SmallVec<[BoundRange; 2]>);

impl LengthSet {
    fn insert(&mut self, range: BoundRange) {
        let mut merged = range;
        let mut rest: SmallVec<[BoundRange; 2]> = SmallVec::new();
        for &r in self.0.iter() {
            match r.merge(merged) {
                Some(m) => merged = m,
                None => rest.push(r),
            }
        }
        let pos = rest
            .iter()
            .position(|r| merged.min < r.min)
            .unwrap_or(rest.len());
        rest.insert(pos, merged);
        self.0 = rest;
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn min(&self) -> Option<Bound> {
        self.0.first().map(|r| r.min)
    }

    /// The single contiguous range, if the set is one.
    fn single(&self) -> Option<BoundRange> {
        match self.0.as_slice() {
            &[r] => Some(r),
            _ => None,
        }
    }

    fn ranges(&self) -> impl Iterator<Item = BoundRange> + '_ {
        self.0.iter().copied()
    }
}

/// Classifies a region as a pure bounded repeat.
///
/// Returns `None` when the region is not one: mixed classes, path lengths
/// with holes, or cycles other than self-loops all disqualify it. Regions
/// matching the empty string report `min` zero; a trailing self-loop
/// reports `max` infinite.
pub fn pure_repeat(g: &PatternGraph) -> Option<PureRepeat> {
    // Every interior vertex must accept the same class. A region with no
    // interior vertices has no class to repeat.
    let class = g
        .interior()
        .map(|v| g.class_of(v).expect("interior vertex without a class"))
        .all_equal_value()
        .ok()?;

    // Self-loops aside, path lengths are only enumerable over a DAG.
    let order = topo_order(g)?;

    let one = BoundRange::exact(1);
    let mut lengths: Vec<LengthSet> = vec![LengthSet::default(); g.num_vertices()];
    lengths[PatternGraph::ENTRY.index()].insert(BoundRange::exact(0));

    for v in order {
        if lengths[v.index()].is_empty() {
            // Not reachable from the entry.
            continue;
        }
        if !g.is_special(v) && g.has_edge(v, v) {
            // Looping on `v` extends any arrival length one byte at a time.
            let min = lengths[v.index()].min().unwrap();
            let mut unbounded = LengthSet::default();
            unbounded.insert(BoundRange::new(min, Bound::Infinite));
            lengths[v.index()] = unbounded;
        }
        let at_v = lengths[v.index()].clone();
        for &w in g.successors(v) {
            if w == v || w == PatternGraph::EXIT {
                continue;
            }
            for r in at_v.ranges() {
                lengths[w.index()].insert(r + one);
            }
        }
    }

    // Accepted lengths: everything that can step into the exit, plus the
    // empty match when the entry connects to the exit directly.
    let mut accepted = LengthSet::default();
    for &p in g.predecessors(PatternGraph::EXIT) {
        if p == PatternGraph::ENTRY {
            accepted.insert(BoundRange::exact(0));
            continue;
        }
        for r in lengths[p.index()].ranges() {
            accepted.insert(r);
        }
    }

    let bounds = accepted.single()?;
    debug!("pure repeat found: bounds={}", bounds);
    Some(PureRepeat { class, bounds })
}

/// Kahn's algorithm over the graph with self-loops ignored. `None` when a
/// non-trivial cycle remains.
fn topo_order(g: &PatternGraph) -> Option<Vec<VertexId>> {
    let n = g.num_vertices();
    let mut indegree = vec![0u32; n];
    for v in g.vertices() {
        for &w in g.successors(v) {
            if w != v {
                indegree[w.index()] += 1;
            }
        }
    }

    let mut order: Vec<VertexId> =
        g.vertices().filter(|v| indegree[v.index()] == 0).collect();
    let mut head = 0;
    while head < order.len() {
        let v = order[head];
        head += 1;
        for &w in g.successors(v) {
            if w == v {
                continue;
            }
            indegree[w.index()] -= 1;
            if indegree[w.index()] == 0 {
                order.push(w);
            }
        }
    }

    if order.len() == n {
        Some(order)
    } else {
        None
    }
}
