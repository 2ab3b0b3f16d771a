use super::group::Group;
use crate::core::attrs::any::{AnyAttr, AttrData};
use crate::core::attrs::error::AttrError;
use crate::core::translation::TableRef;
use phf::{Map, phf_map};
use std::collections::HashMap;
use tracing::debug;

static SINGULAR_NAMES: Map<&'static str, &'static str> = phf_map! {
    "id" => "ids",
    "name" => "names",
    "type" => "types",
    "mass" => "masses",
    "charge" => "charges",
    "resid" => "resids",
    "resname" => "resnames",
    "segid" => "segids",
};

/// Resolves a singular attribute name to its attrname; other names pass through.
pub fn canonical_attrname(name: &str) -> &str {
    SINGULAR_NAMES.get(name.trim()).copied().unwrap_or(name.trim())
}

/// The owner of a set of attributes and of the structure they are indexed by.
///
/// Attributes are registered by attrname and are bound to the topology's translation
/// table when added. Reads and writes by name go through [`AttrData`], so callers do not
/// need to know the concrete type of an attribute.
#[derive(Debug)]
pub struct Topology {
    table: TableRef,
    attrs: HashMap<&'static str, AnyAttr>,
}

impl Topology {
    pub fn new(table: TableRef) -> Self {
        Self {
            table,
            attrs: HashMap::new(),
        }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn n_atoms(&self) -> usize {
        self.table.borrow().n_atoms()
    }

    pub fn n_residues(&self) -> usize {
        self.table.borrow().n_residues()
    }

    pub fn n_segments(&self) -> usize {
        self.table.borrow().n_segments()
    }

    /// Registers an attribute, replacing any attribute with the same attrname.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::LengthMismatch`] if a per-entity attribute does not hold exactly
    /// one value per entity of its native level. Connectivity attributes fail with
    /// [`AttrError::InvalidTuple`] for tuples of fewer than two atoms, or with an index error
    /// for atoms outside the topology.
    pub fn add_attr(&mut self, attr: impl Into<AnyAttr>) -> Result<(), AttrError> {
        let mut attr = attr.into();
        match &attr {
            AnyAttr::Connectivity(connectivity) => connectivity.validate(self.n_atoms())?,
            _ => {
                let expected = self.table.borrow().count(attr.native_level());
                if attr.len() != expected {
                    return Err(AttrError::LengthMismatch {
                        attr: attr.attrname(),
                        expected,
                        found: attr.len(),
                    });
                }
            }
        }

        attr.attach(self.table.clone());
        debug!(
            attr = attr.attrname(),
            level = %attr.native_level(),
            "Registered topology attribute."
        );
        if self.attrs.insert(attr.attrname(), attr).is_some() {
            debug!("Replaced a previously registered attribute.");
        }
        Ok(())
    }

    pub fn attr(&self, name: &str) -> Option<&AnyAttr> {
        self.attrs.get(canonical_attrname(name))
    }

    pub fn attr_mut(&mut self, name: &str) -> Option<&mut AnyAttr> {
        self.attrs.get_mut(canonical_attrname(name))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Attrnames of all registered attributes, sorted.
    pub fn attrnames(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.attrs.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn read(&self, name: &str, group: &Group) -> Result<AttrData, AttrError> {
        self.attr(name)
            .ok_or_else(|| AttrError::UnknownAttribute(name.to_string()))?
            .read(group)
    }

    pub fn write(&mut self, name: &str, group: &Group, data: AttrData) -> Result<(), AttrError> {
        self.attr_mut(name)
            .ok_or_else(|| AttrError::UnknownAttribute(name.to_string()))?
            .write(group, data)
    }

    pub fn atoms(&self, indices: Vec<usize>) -> Group {
        Group::atoms(indices).with_table(self.table.clone())
    }

    pub fn residues(&self, indices: Vec<usize>) -> Group {
        Group::residues(indices).with_table(self.table.clone())
    }

    pub fn segments(&self, indices: Vec<usize>) -> Group {
        Group::segments(indices).with_table(self.table.clone())
    }

    pub fn all_atoms(&self) -> Group {
        self.atoms((0..self.n_atoms()).collect())
    }

    pub fn all_residues(&self) -> Group {
        self.residues((0..self.n_residues()).collect())
    }

    pub fn all_segments(&self) -> Group {
        self.segments((0..self.n_segments()).collect())
    }
}
