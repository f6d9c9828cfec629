use std::cmp::Ordering;

use tread_core::Coord;

// ---------------------------------------------------------------------------
// Internal node for A* priority-queue searches
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: f64,
    pub(crate) f: f64,
    /// Flattened index of the predecessor, `usize::MAX` for none.
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0.0,
            f: 0.0,
            parent: usize::MAX,
            generation: 0,
            closed: false,
        }
    }
}

/// Reference into the node array, ordered for use in a `BinaryHeap`.
///
/// Lowest `f` pops first; equal `f` pops the smaller coordinate (row, then
/// column) first, so searches are deterministic.
#[derive(Clone, Copy)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f64,
    pub(crate) coord: Coord,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

// ---------------------------------------------------------------------------
// SearchSpace
// ---------------------------------------------------------------------------

/// Reusable A* workspace for a `rows x cols` grid.
///
/// Owns the node array (g/f scores, predecessor links, closed flags) indexed
/// by flattened row-major coordinate, plus the neighbor scratch buffer, so
/// repeated queries on the same extent incur no allocations after the first.
pub struct SearchSpace {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) nodes: Vec<Node>,
    pub(crate) generation: u32,
    pub(crate) nbuf: Vec<Coord>,
}

impl SearchSpace {
    /// Create a workspace for a `rows x cols` grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            nodes: vec![Node::default(); rows * cols],
            generation: 0,
            nbuf: Vec::with_capacity(4),
        }
    }

    /// Change the extent, reallocating only when the node array is too small.
    pub fn set_shape(&mut self, rows: usize, cols: usize) {
        let new_len = rows * cols;
        self.rows = rows;
        self.cols = cols;

        if new_len <= self.nodes.len() {
            // Flattened indices now mean different cells; stale entries are
            // invalidated by the generation bump of the next search.
            self.generation = self.generation.wrapping_add(1);
            return;
        }

        self.nodes.clear();
        self.nodes.resize(new_len, Node::default());
        self.generation = 0;
    }

    /// `(rows, cols)` of the current extent.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Start a new search generation, lazily invalidating every node.
    pub(crate) fn next_generation(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: nodes from 2^32 searches ago would look current.
            for n in self.nodes.iter_mut() {
                n.generation = 0;
            }
            self.generation = 1;
        }
        self.generation
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Coord` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, c: Coord) -> Option<usize> {
        if c.row < 0 || c.col < 0 || c.row as usize >= self.rows || c.col as usize >= self.cols {
            return None;
        }
        c.to_index(self.cols)
    }

    /// Convert a flat index back to a `Coord`.
    #[inline]
    pub(crate) fn coord(&self, idx: usize) -> Coord {
        Coord::from_index(idx, self.cols)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SearchSpace {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.rows, self.cols).serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SearchSpace {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (rows, cols) = <(usize, usize)>::deserialize(deserializer)?;
        Ok(SearchSpace::new(rows, cols))
    }
}
