use super::error::AttrError;
use crate::core::models::level::Level;
use crate::core::translation::check_indices;
use std::iter::Sum;

/// How an atom-native attribute is seen through a coarser level.
pub trait Aggregation<V> {
    /// Values of `atom_values` for residues or segments, given as one row of member atoms
    /// per entity in group order.
    fn aggregate(atom_values: &[V], rows: Vec<Vec<usize>>) -> Result<Vec<V>, AttrError>;
}

/// One value per member atom, concatenated in group order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flatten;

/// One value per residue or segment: the sum over its member atoms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summed;

impl<V: Clone> Aggregation<V> for Flatten {
    fn aggregate(atom_values: &[V], rows: Vec<Vec<usize>>) -> Result<Vec<V>, AttrError> {
        let aix: Vec<usize> = rows.into_iter().flatten().collect();
        check_indices(Level::Atom, &aix, atom_values.len())?;
        Ok(aix.into_iter().map(|a| atom_values[a].clone()).collect())
    }
}

impl<V: Copy + Sum<V>> Aggregation<V> for Summed {
    fn aggregate(atom_values: &[V], rows: Vec<Vec<usize>>) -> Result<Vec<V>, AttrError> {
        rows.into_iter()
            .map(|row| -> Result<V, AttrError> {
                check_indices(Level::Atom, &row, atom_values.len())?;
                Ok(row.into_iter().map(|a| atom_values[a]).sum())
            })
            .collect()
    }
}
