use super::error::AttrError;
use super::{AttrName, Storage, TopologyAttr, broadcast};
use crate::core::models::group::Group;
use crate::core::models::level::Level;
use crate::core::translation::TableRef;
use tracing::debug;

/// An attribute holding one value per residue.
///
/// Atoms see the value of their owning residue; segments see the values of all their
/// member residues, without aggregation.
#[derive(Debug, Clone)]
pub struct ResidueAttr<V> {
    storage: Storage<V>,
}

pub type Resnames = ResidueAttr<String>;

impl<V: Clone> ResidueAttr<V> {
    pub fn new(name: AttrName, values: Vec<V>) -> Self {
        Self {
            storage: Storage::new(name, Level::Residue, values),
        }
    }

    pub fn values(&self) -> &[V] {
        &self.storage.values
    }
}

impl ResidueAttr<String> {
    pub fn resnames(values: Vec<String>) -> Self {
        Self::new(AttrName::new("resnames", "resname"), values)
    }
}

impl<V: Clone> TopologyAttr for ResidueAttr<V> {
    type Value = V;
    type Output = Vec<V>;

    fn name(&self) -> AttrName {
        self.storage.name
    }

    fn native_level(&self) -> Level {
        Level::Residue
    }

    fn len(&self) -> usize {
        self.storage.values.len()
    }

    fn attach(&mut self, table: TableRef) {
        self.storage.table = Some(table);
    }

    fn read_atoms(&self, ag: &Group) -> Result<Vec<V>, AttrError> {
        let rix = self.storage.table()?.atoms_to_residues(ag.indices())?;
        self.storage.take(&rix)
    }

    fn read_residues(&self, rg: &Group) -> Result<Vec<V>, AttrError> {
        self.storage.take(rg.indices())
    }

    fn write_residues(&mut self, rg: &Group, values: &[V]) -> Result<(), AttrError> {
        self.storage.put(rg.indices(), values)
    }

    fn read_segments(&self, sg: &Group) -> Result<Vec<V>, AttrError> {
        let rix = self.storage.table()?.segments_to_residues(sg.indices())?;
        self.storage.take(&rix)
    }
}

/// Residue numbers.
///
/// Behaves like any residue attribute, except that assigning resids to atoms moves those
/// atoms into the residues carrying the requested numbers. Atoms never own a resid.
#[derive(Debug, Clone)]
pub struct Resids {
    inner: ResidueAttr<i64>,
}

impl Resids {
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            inner: ResidueAttr::new(AttrName::new("resids", "resid"), values),
        }
    }

    pub fn values(&self) -> &[i64] {
        self.inner.values()
    }

    /// Index of the first residue numbered `resid`.
    ///
    /// Duplicate resids (e.g. in different segments) resolve to the lowest index.
    pub fn find_residue(&self, resid: i64) -> Option<usize> {
        self.values().iter().position(|&value| value == resid)
    }
}

impl TopologyAttr for Resids {
    type Value = i64;
    type Output = Vec<i64>;

    fn name(&self) -> AttrName {
        self.inner.name()
    }

    fn native_level(&self) -> Level {
        Level::Residue
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn attach(&mut self, table: TableRef) {
        self.inner.attach(table);
    }

    fn read_atoms(&self, ag: &Group) -> Result<Vec<i64>, AttrError> {
        self.inner.read_atoms(ag)
    }

    /// Moves every atom of `ag` into the residue carrying the matching resid.
    ///
    /// Fails with [`AttrError::NoData`] if a requested resid has no residue; residues are
    /// never created, and no atom is moved.
    fn write_atoms(&mut self, ag: &Group, resids: &[i64]) -> Result<(), AttrError> {
        let attr = self.attrname();
        let resids = broadcast(attr, resids, ag.len())?;
        let rix = resids
            .iter()
            .map(|&resid| {
                self.find_residue(resid).ok_or_else(|| AttrError::NoData {
                    attr,
                    level: Level::Atom,
                    reason: format!(
                        "cannot assign atom to residue {resid}, which doesn't already exist"
                    ),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = self
            .inner
            .storage
            .table
            .as_ref()
            .ok_or(AttrError::Detached { attr })?;
        table.borrow_mut().move_atoms(ag.indices(), &rix)?;

        debug!(atoms = ag.len(), "Moved atoms by resid assignment.");
        Ok(())
    }

    fn read_residues(&self, rg: &Group) -> Result<Vec<i64>, AttrError> {
        self.inner.read_residues(rg)
    }

    fn write_residues(&mut self, rg: &Group, values: &[i64]) -> Result<(), AttrError> {
        self.inner.write_residues(rg, values)
    }

    fn read_segments(&self, sg: &Group) -> Result<Vec<i64>, AttrError> {
        self.inner.read_segments(sg)
    }
}
