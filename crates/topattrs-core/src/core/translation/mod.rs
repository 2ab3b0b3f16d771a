//! # Translation Module
//!
//! Index-set conversion between the levels of the structural hierarchy.
//!
//! ## Overview
//!
//! Attributes never store the atom/residue/segment membership themselves. Whenever an
//! attribute is addressed through a level other than its native one, it asks the owning
//! topology's [`TranslationTable`] to convert the group's indices:
//!
//! - **Fine to coarse** (`atoms_to_residues`, `atoms_to_segments`, `residues_to_segments`) -
//!   one parent index per input index, order and length preserved.
//! - **Coarse to fine, flat** (`residues_to_atoms`, `segments_to_atoms`, `segments_to_residues`) -
//!   the concatenated member indices of every input entity.
//! - **Coarse to fine, grouped** (`residues_to_atoms_grouped`, `segments_to_atoms_grouped`) -
//!   one row of member atoms per input entity, used for aggregation.
//!
//! The table is also the only place where structure changes: [`TranslationTable::move_atoms`]
//! reassigns atoms to other residues.
//!
//! ## Key Components
//!
//! - [`TranslationTable`] - The conversion contract consumed by the attribute layer
//! - [`TableRef`] - Shared handle through which attributes and groups reach the table
//! - [`index_table`] - `IndexTable`, an in-memory implementation backed by parent arrays

pub mod index_table;

use crate::core::models::level::Level;
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;
use thiserror::Error;

/// Shared, single-threaded handle to the structure of the owning topology.
pub type TableRef = Rc<RefCell<dyn TranslationTable>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("{level} index {index} is out of range ({len} {level}s in topology)")]
    IndexOutOfRange {
        level: Level,
        index: usize,
        len: usize,
    },

    #[error("Expected {expected} values, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("{level} {index} is assigned to parent {parent}, but only {count} parents exist")]
    InvalidParent {
        level: Level,
        index: usize,
        parent: usize,
        count: usize,
    },

    #[error("{count} segments requested, but only {n_residues} residues exist to fill them")]
    TooManySegments { count: usize, n_residues: usize },
}

/// Bulk index conversion between hierarchy levels.
///
/// Implementations must reject any index at or beyond the entity count of its level
/// with [`TableError::IndexOutOfRange`].
pub trait TranslationTable: Debug {
    fn n_atoms(&self) -> usize;
    fn n_residues(&self) -> usize;
    fn n_segments(&self) -> usize;

    /// Residue index of every given atom.
    fn atoms_to_residues(&self, aix: &[usize]) -> Result<Vec<usize>, TableError>;

    /// Segment index of every given atom.
    fn atoms_to_segments(&self, aix: &[usize]) -> Result<Vec<usize>, TableError>;

    /// Segment index of every given residue.
    fn residues_to_segments(&self, rix: &[usize]) -> Result<Vec<usize>, TableError>;

    /// Member atoms of the given residues, concatenated.
    fn residues_to_atoms(&self, rix: &[usize]) -> Result<Vec<usize>, TableError>;

    /// Member atoms of the given residues, one row per residue.
    fn residues_to_atoms_grouped(&self, rix: &[usize]) -> Result<Vec<Vec<usize>>, TableError>;

    /// Member residues of the given segments, concatenated.
    fn segments_to_residues(&self, six: &[usize]) -> Result<Vec<usize>, TableError>;

    /// Member atoms of the given segments, concatenated.
    fn segments_to_atoms(&self, six: &[usize]) -> Result<Vec<usize>, TableError>;

    /// Member atoms of the given segments, one row per segment.
    fn segments_to_atoms_grouped(&self, six: &[usize]) -> Result<Vec<Vec<usize>>, TableError>;

    /// Moves each atom `aix[i]` into residue `rix[i]`.
    ///
    /// Either every atom is moved or, on error, none is.
    fn move_atoms(&mut self, aix: &[usize], rix: &[usize]) -> Result<(), TableError>;

    /// Number of entities at the given level.
    fn count(&self, level: Level) -> usize {
        match level {
            Level::Atom => self.n_atoms(),
            Level::Residue => self.n_residues(),
            Level::Segment => self.n_segments(),
        }
    }
}

/// Fails on the first index that does not address one of `len` entities.
pub(crate) fn check_indices(level: Level, indices: &[usize], len: usize) -> Result<(), TableError> {
    match indices.iter().find(|&&index| index >= len) {
        Some(&index) => Err(TableError::IndexOutOfRange { level, index, len }),
        None => Ok(()),
    }
}
