//! # Attributes Module
//!
//! Per-entity data of a topology, readable and writable through any hierarchy level.
//!
//! ## Overview
//!
//! Every attribute is indexed by one native [`Level`]. The [`TopologyAttr`] contract routes
//! a read or write on a [`Group`] to the handler for the group's level. A handler either
//! indexes the attribute's own values directly, translates the group's indices to the native
//! level through the owning topology's translation table, or aggregates member values.
//!
//! Levels an attribute has no handler for fail with typed errors: reads with
//! [`AttrError::NoData`], writes with [`AttrError::NotSupported`].
//!
//! ## Key Components
//!
//! - [`atom`] - Atom-native attributes (`ids`, `names`, `types`, `masses`, `charges`)
//! - [`residue`] - Residue-native attributes (`resnames`, and `resids` with atom moves)
//! - [`segment`] - Segment-native attributes (`segids`)
//! - [`connectivity`] - Bonds, angles, dihedrals and impropers with a cached adjacency map
//! - [`aggregate`] - How atom attributes are seen from coarser levels (flatten or sum)
//! - [`any`] - Type-erased attribute and value containers used by the topology registry

pub mod aggregate;
pub mod any;
pub mod atom;
pub mod connectivity;
pub mod error;
pub mod residue;
pub mod segment;

use crate::core::models::group::Group;
use crate::core::models::level::Level;
use crate::core::translation::{TableRef, TranslationTable, check_indices};
use error::AttrError;
use std::borrow::Cow;
use std::cell::Ref;

/// The plural and singular names an attribute is known by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrName {
    pub attrname: &'static str,
    pub singular: &'static str,
}

impl AttrName {
    pub const fn new(attrname: &'static str, singular: &'static str) -> Self {
        Self { attrname, singular }
    }
}

/// Level-dispatched access to a topology attribute.
///
/// Implementors override the handlers for the levels they support. The defaults fail:
/// reads with [`AttrError::NoData`], writes with [`AttrError::NotSupported`].
pub trait TopologyAttr {
    /// Element type accepted by writes.
    type Value;
    /// Result type of reads.
    type Output;

    fn name(&self) -> AttrName;

    fn native_level(&self) -> Level;

    /// Number of entities at the native level.
    fn len(&self) -> usize;

    /// Binds the attribute to the structure of its owning topology.
    fn attach(&mut self, table: TableRef);

    fn attrname(&self) -> &'static str {
        self.name().attrname
    }

    fn singular(&self) -> &'static str {
        self.name().singular
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self, group: &Group) -> Result<Self::Output, AttrError> {
        match group.level() {
            Level::Atom => self.read_atoms(group),
            Level::Residue => self.read_residues(group),
            Level::Segment => self.read_segments(group),
        }
    }

    fn write(&mut self, group: &Group, values: &[Self::Value]) -> Result<(), AttrError> {
        match group.level() {
            Level::Atom => self.write_atoms(group, values),
            Level::Residue => self.write_residues(group, values),
            Level::Segment => self.write_segments(group, values),
        }
    }

    fn read_atoms(&self, _ag: &Group) -> Result<Self::Output, AttrError> {
        Err(AttrError::no_data(self.attrname(), Level::Atom))
    }

    fn read_residues(&self, _rg: &Group) -> Result<Self::Output, AttrError> {
        Err(AttrError::no_data(self.attrname(), Level::Residue))
    }

    fn read_segments(&self, _sg: &Group) -> Result<Self::Output, AttrError> {
        Err(AttrError::no_data(self.attrname(), Level::Segment))
    }

    fn write_atoms(&mut self, _ag: &Group, _values: &[Self::Value]) -> Result<(), AttrError> {
        Err(AttrError::NotSupported {
            attr: self.attrname(),
            level: Level::Atom,
        })
    }

    fn write_residues(&mut self, _rg: &Group, _values: &[Self::Value]) -> Result<(), AttrError> {
        Err(AttrError::NotSupported {
            attr: self.attrname(),
            level: Level::Residue,
        })
    }

    fn write_segments(&mut self, _sg: &Group, _values: &[Self::Value]) -> Result<(), AttrError> {
        Err(AttrError::NotSupported {
            attr: self.attrname(),
            level: Level::Segment,
        })
    }
}

/// Values of a scalar attribute together with its name and topology binding.
#[derive(Debug, Clone)]
pub(crate) struct Storage<V> {
    pub(crate) name: AttrName,
    pub(crate) level: Level,
    pub(crate) values: Vec<V>,
    pub(crate) table: Option<TableRef>,
}

impl<V: Clone> Storage<V> {
    pub(crate) fn new(name: AttrName, level: Level, values: Vec<V>) -> Self {
        Self {
            name,
            level,
            values,
            table: None,
        }
    }

    pub(crate) fn table(&self) -> Result<Ref<'_, dyn TranslationTable>, AttrError> {
        self.table
            .as_ref()
            .map(|table| table.borrow())
            .ok_or(AttrError::Detached {
                attr: self.name.attrname,
            })
    }

    /// Values at the given native-level indices.
    pub(crate) fn take(&self, indices: &[usize]) -> Result<Vec<V>, AttrError> {
        check_indices(self.level, indices, self.values.len())?;
        Ok(indices.iter().map(|&i| self.values[i].clone()).collect())
    }

    /// Assigns values at the given native-level indices; nothing is written on error.
    pub(crate) fn put(&mut self, indices: &[usize], values: &[V]) -> Result<(), AttrError> {
        let values = broadcast(self.name.attrname, values, indices.len())?;
        check_indices(self.level, indices, self.values.len())?;
        for (&i, value) in indices.iter().zip(values.iter()) {
            self.values[i] = value.clone();
        }
        Ok(())
    }
}

/// Expands `values` to exactly `n` items.
///
/// Accepts one value per target, or a single value that is repeated for every target.
pub(crate) fn broadcast<'a, V: Clone>(
    attr: &'static str,
    values: &'a [V],
    n: usize,
) -> Result<Cow<'a, [V]>, AttrError> {
    match values {
        _ if values.len() == n => Ok(Cow::Borrowed(values)),
        [single] => Ok(Cow::Owned(vec![single.clone(); n])),
        _ => Err(AttrError::LengthMismatch {
            attr,
            expected: n,
            found: values.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::translation::TableError;

    struct Opaque;

    impl TopologyAttr for Opaque {
        type Value = i64;
        type Output = Vec<i64>;

        fn name(&self) -> AttrName {
            AttrName::new("opaques", "opaque")
        }

        fn native_level(&self) -> Level {
            Level::Atom
        }

        fn len(&self) -> usize {
            0
        }

        fn attach(&mut self, _table: TableRef) {}
    }

    mod dispatch_defaults {
        use super::*;

        #[test]
        fn reads_fail_with_no_data_at_every_level() {
            for level in Level::ALL {
                let result = Opaque.read(&Group::new(level, vec![0]));
                assert!(matches!(
                    result,
                    Err(AttrError::NoData { attr: "opaques", level: l, .. }) if l == level
                ));
            }
        }

        #[test]
        fn writes_fail_with_not_supported_at_every_level() {
            for level in Level::ALL {
                let result = Opaque.write(&Group::new(level, vec![0]), &[1]);
                assert_eq!(
                    result,
                    Err(AttrError::NotSupported {
                        attr: "opaques",
                        level,
                    })
                );
            }
        }

        #[test]
        fn name_accessors_forward_to_attr_name() {
            assert_eq!(Opaque.attrname(), "opaques");
            assert_eq!(Opaque.singular(), "opaque");
            assert!(Opaque.is_empty());
        }
    }

    mod storage {
        use super::*;

        fn create_storage() -> Storage<i64> {
            Storage::new(AttrName::new("ids", "id"), Level::Atom, vec![10, 20, 30])
        }

        #[test]
        fn take_indexes_in_group_order_with_repeats() {
            assert_eq!(create_storage().take(&[2, 0, 2]).unwrap(), vec![30, 10, 30]);
        }

        #[test]
        fn take_out_of_range_reports_native_level() {
            assert_eq!(
                create_storage().take(&[3]).unwrap_err(),
                AttrError::Table(TableError::IndexOutOfRange {
                    level: Level::Atom,
                    index: 3,
                    len: 3,
                })
            );
        }

        #[test]
        fn put_assigns_per_index_values() {
            let mut storage = create_storage();
            storage.put(&[2, 0], &[7, 8]).unwrap();
            assert_eq!(storage.values, vec![8, 20, 7]);
        }

        #[test]
        fn put_broadcasts_a_single_value() {
            let mut storage = create_storage();
            storage.put(&[0, 1], &[5]).unwrap();
            assert_eq!(storage.values, vec![5, 5, 30]);
        }

        #[test]
        fn put_leaves_values_untouched_on_out_of_range_index() {
            let mut storage = create_storage();
            assert!(storage.put(&[0, 5], &[1, 2]).is_err());
            assert_eq!(storage.values, vec![10, 20, 30]);
        }

        #[test]
        fn detached_storage_has_no_table() {
            assert_eq!(
                create_storage().table().err(),
                Some(AttrError::Detached { attr: "ids" })
            );
        }
    }

    #[test]
    fn broadcast_rejects_other_lengths() {
        assert_eq!(
            broadcast("ids", &[1, 2], 3).unwrap_err(),
            AttrError::LengthMismatch {
                attr: "ids",
                expected: 3,
                found: 2,
            }
        );
        assert_eq!(broadcast("ids", &[4], 2).unwrap().as_ref(), &[4, 4]);
        assert_eq!(broadcast("ids", &[1, 2], 2).unwrap().as_ref(), &[1, 2]);
    }
}
