use super::level::Level;
use crate::core::translation::TableRef;
use itertools::Itertools;

/// An ordered selection of entities at a single level.
///
/// Indices are zero-based, need not be sorted and may repeat. A group optionally carries
/// the handle of the topology it was drawn from, which connectivity reads pass on to the
/// groups they produce.
#[derive(Debug, Clone)]
pub struct Group {
    level: Level,
    indices: Vec<usize>,
    table: Option<TableRef>,
}

impl Group {
    pub fn new(level: Level, indices: Vec<usize>) -> Self {
        Self {
            level,
            indices,
            table: None,
        }
    }

    pub fn atoms(indices: Vec<usize>) -> Self {
        Self::new(Level::Atom, indices)
    }

    pub fn residues(indices: Vec<usize>) -> Self {
        Self::new(Level::Residue, indices)
    }

    pub fn segments(indices: Vec<usize>) -> Self {
        Self::new(Level::Segment, indices)
    }

    /// Binds the group to the topology it belongs to.
    pub fn with_table(mut self, table: TableRef) -> Self {
        self.table = Some(table);
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn table(&self) -> Option<&TableRef> {
        self.table.as_ref()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A set of connectivity tuples (bonds, angles, ...) produced by a connectivity read.
#[derive(Debug, Clone)]
pub struct TopologyGroup {
    tuples: Vec<Vec<usize>>,      // Canonically oriented, sorted, distinct
    kind: &'static str,           // Singular kind label, e.g. "bond"
    table: Option<TableRef>,      // Topology the tuples index into
}

impl TopologyGroup {
    pub fn new(tuples: Vec<Vec<usize>>, kind: &'static str, table: Option<TableRef>) -> Self {
        Self {
            tuples,
            kind,
            table,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn tuples(&self) -> &[Vec<usize>] {
        &self.tuples
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.tuples.iter().map(Vec::as_slice)
    }

    pub fn table(&self) -> Option<&TableRef> {
        self.table.as_ref()
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Distinct atoms taking part in at least one tuple, in ascending order.
    pub fn atom_indices(&self) -> Vec<usize> {
        self.tuples.iter().flatten().copied().sorted().dedup().collect()
    }

    pub fn into_tuples(self) -> Vec<Vec<usize>> {
        self.tuples
    }
}

impl PartialEq for TopologyGroup {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.tuples == other.tuples
    }
}
