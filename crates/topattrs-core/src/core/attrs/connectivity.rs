use super::error::AttrError;
use super::{AttrName, TopologyAttr};
use crate::core::models::group::{Group, TopologyGroup};
use crate::core::models::level::Level;
use crate::core::translation::{TableRef, check_indices};
use itertools::Itertools;
use std::cell::OnceCell;
use std::collections::HashMap;
use tracing::trace;

/// Map from an atom index to every canonical tuple it takes part in.
pub type AdjacencyMap = HashMap<usize, Vec<Vec<usize>>>;

/// Bonds, angles, dihedrals or impropers, stored as chains of atom indices.
///
/// Queries go through an adjacency map that is built on first use and cached. Every
/// method that changes the stored tuples drops the cached map.
///
/// Constructors store tuples as given; they are checked when the attribute is added to a
/// topology. Mutators check tuples before storing them.
#[derive(Debug, Clone)]
pub struct Connectivity {
    name: AttrName,
    values: Vec<Vec<usize>>,
    table: Option<TableRef>,
    adjacency: OnceCell<AdjacencyMap>,
}

pub type Bonds = Connectivity;
pub type Angles = Connectivity;
pub type Dihedrals = Connectivity;
pub type Impropers = Connectivity;

/// Orientation under which a tuple is registered in the adjacency map.
///
/// Tuples whose first index is below their last are reversed, so `(0, 1)` and `(1, 0)`
/// share the key `(1, 0)`.
pub fn canonical(tuple: &[usize]) -> Vec<usize> {
    match (tuple.first(), tuple.last()) {
        (Some(first), Some(last)) if first < last => tuple.iter().rev().copied().collect(),
        _ => tuple.to_vec(),
    }
}

impl Connectivity {
    // One atom usually has several bonds, so the singular stays plural.
    pub fn new(attrname: &'static str, values: Vec<Vec<usize>>) -> Self {
        Self {
            name: AttrName::new(attrname, attrname),
            values,
            table: None,
            adjacency: OnceCell::new(),
        }
    }

    pub fn bonds(values: Vec<Vec<usize>>) -> Self {
        Self::new("bonds", values)
    }

    pub fn angles(values: Vec<Vec<usize>>) -> Self {
        Self::new("angles", values)
    }

    pub fn dihedrals(values: Vec<Vec<usize>>) -> Self {
        Self::new("dihedrals", values)
    }

    pub fn impropers(values: Vec<Vec<usize>>) -> Self {
        Self::new("impropers", values)
    }

    /// Label of a single tuple, e.g. `"bond"` for `bonds`.
    pub fn kind(&self) -> &'static str {
        let singular = self.name.singular;
        singular.strip_suffix('s').unwrap_or(singular)
    }

    /// Stored tuples, in insertion order and original orientation.
    pub fn values(&self) -> &[Vec<usize>] {
        &self.values
    }

    pub fn n_tuples(&self) -> usize {
        self.values.len()
    }

    /// Appends one tuple.
    ///
    /// # Errors
    ///
    /// Fails with [`AttrError::InvalidTuple`] for a tuple of fewer than two atoms, or with an
    /// index error if the attribute is attached and the tuple names an atom outside the
    /// topology. Nothing is stored on error.
    pub fn add(&mut self, tuple: Vec<usize>) -> Result<(), AttrError> {
        self.extend([tuple])
    }

    /// Appends several tuples; either all are stored or, on error, none.
    pub fn extend(
        &mut self,
        tuples: impl IntoIterator<Item = Vec<usize>>,
    ) -> Result<(), AttrError> {
        let tuples: Vec<_> = tuples.into_iter().collect();
        check_tuples(self.name.attrname, &tuples, self.values.len(), self.n_atoms())?;
        self.values.extend(tuples);
        self.clear_cache();
        Ok(())
    }

    /// Replaces every stored tuple; the old tuples are kept on error.
    pub fn set_values(&mut self, values: Vec<Vec<usize>>) -> Result<(), AttrError> {
        check_tuples(self.name.attrname, &values, 0, self.n_atoms())?;
        self.values = values;
        self.clear_cache();
        Ok(())
    }

    /// Checks every stored tuple against a topology of `n_atoms` atoms.
    pub fn validate(&self, n_atoms: usize) -> Result<(), AttrError> {
        check_tuples(self.name.attrname, &self.values, 0, Some(n_atoms))
    }

    /// Drops the cached adjacency map; the next query rebuilds it.
    pub fn clear_cache(&mut self) {
        if self.adjacency.take().is_some() {
            trace!(attr = self.name.attrname, "Invalidated adjacency map.");
        }
    }

    fn n_atoms(&self) -> Option<usize> {
        self.table.as_ref().map(|table| table.borrow().n_atoms())
    }

    pub fn adjacency(&self) -> &AdjacencyMap {
        self.adjacency.get_or_init(|| self.build_adjacency())
    }

    fn build_adjacency(&self) -> AdjacencyMap {
        let mut map = AdjacencyMap::new();
        for tuple in &self.values {
            let tuple = canonical(tuple);
            for &atom in &tuple {
                map.entry(atom).or_default().push(tuple.clone());
            }
        }
        trace!(
            attr = self.name.attrname,
            tuples = self.values.len(),
            atoms = map.len(),
            "Built adjacency map."
        );
        map
    }
}

// `first` is the position the first tuple takes in the stored list.
fn check_tuples(
    attr: &'static str,
    tuples: &[Vec<usize>],
    first: usize,
    n_atoms: Option<usize>,
) -> Result<(), AttrError> {
    for (offset, tuple) in tuples.iter().enumerate() {
        if tuple.len() < 2 {
            return Err(AttrError::InvalidTuple {
                attr,
                index: first + offset,
                len: tuple.len(),
            });
        }
        if let Some(n_atoms) = n_atoms {
            check_indices(Level::Atom, tuple, n_atoms)?;
        }
    }
    Ok(())
}

impl TopologyAttr for Connectivity {
    type Value = Vec<usize>;
    type Output = TopologyGroup;

    fn name(&self) -> AttrName {
        self.name
    }

    fn native_level(&self) -> Level {
        Level::Atom
    }

    /// Number of distinct atoms taking part in at least one tuple.
    fn len(&self) -> usize {
        self.adjacency().len()
    }

    fn attach(&mut self, table: TableRef) {
        self.table = Some(table);
    }

    /// Every distinct tuple touching an atom of `ag`, in ascending order.
    fn read_atoms(&self, ag: &Group) -> Result<TopologyGroup, AttrError> {
        let adjacency = self.adjacency();
        let tuples = ag
            .indices()
            .iter()
            .filter_map(|atom| adjacency.get(atom))
            .flatten()
            .cloned()
            .sorted()
            .dedup()
            .collect();
        let table = ag.table().or(self.table.as_ref()).cloned();
        Ok(TopologyGroup::new(tuples, self.kind(), table))
    }
}
