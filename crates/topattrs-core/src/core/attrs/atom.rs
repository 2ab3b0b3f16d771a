use super::aggregate::{Aggregation, Flatten, Summed};
use super::error::AttrError;
use super::{AttrName, Storage, TopologyAttr};
use crate::core::models::group::Group;
use crate::core::models::level::Level;
use crate::core::translation::TableRef;
use std::marker::PhantomData;

/// An attribute holding one value per atom.
///
/// Reads through residues or segments are resolved by the aggregation policy `P`:
/// [`Flatten`] returns the value of every member atom, [`Summed`] one total per entity.
/// Values can only be assigned per atom.
#[derive(Debug, Clone)]
pub struct AtomAttr<V, P = Flatten> {
    storage: Storage<V>,
    _policy: PhantomData<P>,
}

pub type Atomids = AtomAttr<i64>;
pub type Atomnames = AtomAttr<String>;
pub type Atomtypes = AtomAttr<String>;
pub type Masses = AtomAttr<f64, Summed>;
pub type Charges = AtomAttr<f64, Summed>;

impl<V: Clone, P> AtomAttr<V, P> {
    pub fn new(name: AttrName, values: Vec<V>) -> Self {
        Self {
            storage: Storage::new(name, Level::Atom, values),
            _policy: PhantomData,
        }
    }

    pub fn values(&self) -> &[V] {
        &self.storage.values
    }
}

impl AtomAttr<i64> {
    pub fn ids(values: Vec<i64>) -> Self {
        Self::new(AttrName::new("ids", "id"), values)
    }
}

impl AtomAttr<String> {
    pub fn names(values: Vec<String>) -> Self {
        Self::new(AttrName::new("names", "name"), values)
    }

    pub fn types(values: Vec<String>) -> Self {
        Self::new(AttrName::new("types", "type"), values)
    }
}

impl AtomAttr<f64, Summed> {
    pub fn masses(values: Vec<f64>) -> Self {
        Self::new(AttrName::new("masses", "mass"), values)
    }

    pub fn charges(values: Vec<f64>) -> Self {
        Self::new(AttrName::new("charges", "charge"), values)
    }
}

impl<V: Clone, P: Aggregation<V>> TopologyAttr for AtomAttr<V, P> {
    type Value = V;
    type Output = Vec<V>;

    fn name(&self) -> AttrName {
        self.storage.name
    }

    fn native_level(&self) -> Level {
        Level::Atom
    }

    fn len(&self) -> usize {
        self.storage.values.len()
    }

    fn attach(&mut self, table: TableRef) {
        self.storage.table = Some(table);
    }

    fn read_atoms(&self, ag: &Group) -> Result<Vec<V>, AttrError> {
        self.storage.take(ag.indices())
    }

    fn write_atoms(&mut self, ag: &Group, values: &[V]) -> Result<(), AttrError> {
        self.storage.put(ag.indices(), values)
    }

    fn read_residues(&self, rg: &Group) -> Result<Vec<V>, AttrError> {
        let rows = self.storage.table()?.residues_to_atoms_grouped(rg.indices())?;
        P::aggregate(&self.storage.values, rows)
    }

    fn read_segments(&self, sg: &Group) -> Result<Vec<V>, AttrError> {
        let rows = self.storage.table()?.segments_to_atoms_grouped(sg.indices())?;
        P::aggregate(&self.storage.values, rows)
    }
}
