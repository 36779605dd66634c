/*! Arena-based region graphs.

A [`PatternGraph`] is the unit the graph front end hands to the analyses: a
single connected matching region with one entry and one exit. Interior
vertices each consume one byte of an interned class; the entry and exit
specials consume nothing. Vertices are records in an arena, identified by
small stable integers, so vertex identity carries a canonical order for
free.
*/

use regex_syntax::hir::ClassBytes;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::Error;

/// Identifies a vertex in a [`PatternGraph`].
///
/// Identifiers are assigned in insertion order and totally order the vertex
/// set independently of address identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(u32);

impl VertexId {
    /// Position of the vertex in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies an interned byte class in a [`PatternGraph`].
///
/// Classes that compare equal share an identifier, so "all vertices accept
/// the same class" is an identifier comparison.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct ClassId(u32);

/// A single-entry, single-exit matching region.
pub struct PatternGraph {
    /// Interned byte classes, indexed by [`ClassId`].
    classes: Vec<ClassBytes>,
    /// Class accepted by each vertex; `None` for the entry/exit specials.
    verts: Vec<Option<ClassId>>,
    succ: Vec<SmallVec<[VertexId; 2]>>,
    pred: Vec<SmallVec<[VertexId; 2]>>,
}

impl PatternGraph {
    /// The entry special. Paths into the region start here.
    pub const ENTRY: VertexId = VertexId(0);

    /// The exit special. Paths out of the region end here.
    pub const EXIT: VertexId = VertexId(1);

    /// Creates a region containing only the entry and exit specials.
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            verts: vec![None, None],
            succ: vec![SmallVec::new(), SmallVec::new()],
            pred: vec![SmallVec::new(), SmallVec::new()],
        }
    }

    /// Interns `class`, returning the identifier shared by all equal
    /// classes in this graph.
    pub fn intern_class(&mut self, class: ClassBytes) -> Result<ClassId, Error> {
        // Regions carry a handful of distinct classes at most; a linear
        // scan beats hashing the ranges.
        if let Some(pos) = self.classes.iter().position(|c| *c == class) {
            return Ok(ClassId(pos as u32));
        }
        let id = self
            .classes
            .len()
            .try_into()
            .map(ClassId)
            .map_err(|_| Error::TooLarge)?;
        self.classes.push(class);
        Ok(id)
    }

    /// Adds an interior vertex accepting one byte of `class`.
    pub fn add_vertex(&mut self, class: ClassId) -> Result<VertexId, Error> {
        let id = self
            .verts
            .len()
            .try_into()
            .map(VertexId)
            .map_err(|_| Error::TooLarge)?;
        self.verts.push(Some(class));
        self.succ.push(SmallVec::new());
        self.pred.push(SmallVec::new());
        Ok(id)
    }

    /// Adds the edge `from` → `to`. Duplicate edges are ignored.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) {
        if self.succ[from.index()].contains(&to) {
            return;
        }
        self.succ[from.index()].push(to);
        self.pred[to.index()].push(from);
    }

    /// True if the edge `from` → `to` exists.
    #[inline]
    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.succ[from.index()].contains(&to)
    }

    /// True for the entry and exit specials.
    #[inline]
    pub fn is_special(&self, v: VertexId) -> bool {
        v.0 < 2
    }

    /// Class accepted by `v`, or `None` for the specials.
    #[inline]
    pub fn class_of(&self, v: VertexId) -> Option<ClassId> {
        self.verts[v.index()]
    }

    /// The byte class behind an identifier.
    #[inline]
    pub fn class(&self, id: ClassId) -> &ClassBytes {
        &self.classes[id.0 as usize]
    }

    /// Number of vertices, specials included.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.verts.len()
    }

    /// All vertices, in identifier order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.verts.len()).map(|i| VertexId(i as u32))
    }

    /// The interior vertices, in identifier order.
    pub fn interior(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices().filter(|v| !self.is_special(*v))
    }

    /// Successors of `v`, in edge insertion order.
    #[inline]
    pub fn successors(&self, v: VertexId) -> &[VertexId] {
        &self.succ[v.index()]
    }

    /// Predecessors of `v`, in edge insertion order.
    #[inline]
    pub fn predecessors(&self, v: VertexId) -> &[VertexId] {
        &self.pred[v.index()]
    }
}

impl Default for PatternGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use regex_syntax::hir::{ClassBytes, ClassBytesRange};

    use super::PatternGraph;

    fn byte_class(lo: u8, hi: u8) -> ClassBytes {
        ClassBytes::new([ClassBytesRange::new(lo, hi)])
    }

    #[test]
    fn class_interning() {
        let mut g = PatternGraph::new();

        let a = g.intern_class(byte_class(b'a', b'a')).unwrap();
        let any = g.intern_class(byte_class(0x00, 0xff)).unwrap();
        let a_again = g.intern_class(byte_class(b'a', b'a')).unwrap();

        assert_eq!(a, a_again);
        assert_ne!(a, any);
        assert_eq!(&byte_class(0x00, 0xff), g.class(any));
    }

    #[test]
    fn edges_are_idempotent() {
        let mut g = PatternGraph::new();
        let class = g.intern_class(byte_class(0x00, 0xff)).unwrap();
        let v = g.add_vertex(class).unwrap();

        g.add_edge(PatternGraph::ENTRY, v);
        g.add_edge(PatternGraph::ENTRY, v);
        g.add_edge(v, PatternGraph::EXIT);

        assert_eq!(&[v], g.successors(PatternGraph::ENTRY));
        assert_eq!(&[PatternGraph::ENTRY], g.predecessors(v));
        assert!(g.has_edge(v, PatternGraph::EXIT));
        assert!(!g.has_edge(PatternGraph::EXIT, v));
    }

    #[test]
    fn interior_skips_specials() {
        let mut g = PatternGraph::new();
        let class = g.intern_class(byte_class(0x00, 0xff)).unwrap();
        let v1 = g.add_vertex(class).unwrap();
        let v2 = g.add_vertex(class).unwrap();

        assert_eq!(vec![v1, v2], g.interior().collect::<Vec<_>>());
        assert_eq!(4, g.num_vertices());
        assert_eq!(None, g.class_of(PatternGraph::ENTRY));
        assert_eq!(Some(class), g.class_of(v1));
    }
}
