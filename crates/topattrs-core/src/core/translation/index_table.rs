use super::{TableError, TableRef, TranslationTable, check_indices};
use crate::core::models::level::Level;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// In-memory translation table backed by parent arrays.
///
/// Membership is stored in both directions: every atom knows its residue and every residue
/// its segment, while each residue and segment keeps a sorted list of its children so that
/// coarse-to-fine conversions never scan the whole topology.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexTable {
    atom_residue: Vec<usize>,            // Parent residue of each atom
    residue_segment: Vec<usize>,         // Parent segment of each residue
    residue_atoms: Vec<Vec<usize>>,      // Sorted member atoms of each residue
    segment_residues: Vec<Vec<usize>>,   // Sorted member residues of each segment
}

impl IndexTable {
    /// Creates a table from the atom-to-residue and residue-to-segment assignments.
    ///
    /// The residue count is `residue_segment.len()`; the segment count is one past the
    /// highest segment index referenced. Residues without atoms are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidParent`] if an atom names a residue that does not exist,
    /// and [`TableError::TooManySegments`] if the segment indices imply more segments than
    /// there are residues.
    pub fn new(atom_residue: Vec<usize>, residue_segment: Vec<usize>) -> Result<Self, TableError> {
        let n_segments = residue_segment
            .iter()
            .max()
            .map_or(0, |&max| max.saturating_add(1));
        Self::with_segment_count(atom_residue, residue_segment, n_segments)
    }

    /// Creates a table with an explicit segment count, so trailing segments may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::TooManySegments`] if `n_segments` exceeds the residue count, and
    /// [`TableError::InvalidParent`] if an atom or residue names a parent that does not exist.
    pub fn with_segment_count(
        atom_residue: Vec<usize>,
        residue_segment: Vec<usize>,
        n_segments: usize,
    ) -> Result<Self, TableError> {
        let n_residues = residue_segment.len();
        if n_segments > n_residues {
            return Err(TableError::TooManySegments {
                count: n_segments,
                n_residues,
            });
        }
        check_parents(Level::Atom, &atom_residue, n_residues)?;
        check_parents(Level::Residue, &residue_segment, n_segments)?;

        let mut residue_atoms = vec![Vec::new(); n_residues];
        for (atom, &residue) in atom_residue.iter().enumerate() {
            residue_atoms[residue].push(atom);
        }

        let mut segment_residues = vec![Vec::new(); n_segments];
        for (residue, &segment) in residue_segment.iter().enumerate() {
            segment_residues[segment].push(residue);
        }

        debug!(
            n_atoms = atom_residue.len(),
            n_residues, n_segments, "Built index table."
        );

        Ok(Self {
            atom_residue,
            residue_segment,
            residue_atoms,
            segment_residues,
        })
    }

    /// Wraps the table into the shared handle attributes and groups hold on to.
    pub fn into_ref(self) -> TableRef {
        Rc::new(RefCell::new(self))
    }

    pub fn atom_residues(&self) -> &[usize] {
        &self.atom_residue
    }

    pub fn residue_segments(&self) -> &[usize] {
        &self.residue_segment
    }

    fn segment_atoms(&self, segment: usize) -> impl Iterator<Item = usize> + '_ {
        self.segment_residues[segment]
            .iter()
            .flat_map(|&residue| self.residue_atoms[residue].iter().copied())
    }
}

fn check_parents(level: Level, parents: &[usize], count: usize) -> Result<(), TableError> {
    match parents.iter().enumerate().find(|&(_, &parent)| parent >= count) {
        Some((index, &parent)) => Err(TableError::InvalidParent {
            level,
            index,
            parent,
            count,
        }),
        None => Ok(()),
    }
}

impl TranslationTable for IndexTable {
    fn n_atoms(&self) -> usize {
        self.atom_residue.len()
    }

    fn n_residues(&self) -> usize {
        self.residue_segment.len()
    }

    fn n_segments(&self) -> usize {
        self.segment_residues.len()
    }

    fn atoms_to_residues(&self, aix: &[usize]) -> Result<Vec<usize>, TableError> {
        check_indices(Level::Atom, aix, self.n_atoms())?;
        Ok(aix.iter().map(|&a| self.atom_residue[a]).collect())
    }

    fn atoms_to_segments(&self, aix: &[usize]) -> Result<Vec<usize>, TableError> {
        check_indices(Level::Atom, aix, self.n_atoms())?;
        Ok(aix
            .iter()
            .map(|&a| self.residue_segment[self.atom_residue[a]])
            .collect())
    }

    fn residues_to_segments(&self, rix: &[usize]) -> Result<Vec<usize>, TableError> {
        check_indices(Level::Residue, rix, self.n_residues())?;
        Ok(rix.iter().map(|&r| self.residue_segment[r]).collect())
    }

    fn residues_to_atoms(&self, rix: &[usize]) -> Result<Vec<usize>, TableError> {
        check_indices(Level::Residue, rix, self.n_residues())?;
        Ok(rix
            .iter()
            .flat_map(|&r| self.residue_atoms[r].iter().copied())
            .collect())
    }

    fn residues_to_atoms_grouped(&self, rix: &[usize]) -> Result<Vec<Vec<usize>>, TableError> {
        check_indices(Level::Residue, rix, self.n_residues())?;
        Ok(rix.iter().map(|&r| self.residue_atoms[r].clone()).collect())
    }

    fn segments_to_residues(&self, six: &[usize]) -> Result<Vec<usize>, TableError> {
        check_indices(Level::Segment, six, self.n_segments())?;
        Ok(six
            .iter()
            .flat_map(|&s| self.segment_residues[s].iter().copied())
            .collect())
    }

    fn segments_to_atoms(&self, six: &[usize]) -> Result<Vec<usize>, TableError> {
        check_indices(Level::Segment, six, self.n_segments())?;
        Ok(six.iter().flat_map(|&s| self.segment_atoms(s)).collect())
    }

    fn segments_to_atoms_grouped(&self, six: &[usize]) -> Result<Vec<Vec<usize>>, TableError> {
        check_indices(Level::Segment, six, self.n_segments())?;
        Ok(six.iter().map(|&s| self.segment_atoms(s).collect()).collect())
    }

    fn move_atoms(&mut self, aix: &[usize], rix: &[usize]) -> Result<(), TableError> {
        if aix.len() != rix.len() {
            return Err(TableError::LengthMismatch {
                expected: aix.len(),
                found: rix.len(),
            });
        }
        check_indices(Level::Atom, aix, self.n_atoms())?;
        check_indices(Level::Residue, rix, self.n_residues())?;

        // Validation is complete; nothing below can fail.
        for (&atom, &target) in aix.iter().zip(rix) {
            let source = self.atom_residue[atom];
            if source == target {
                continue;
            }
            let members = &mut self.residue_atoms[source];
            if let Ok(pos) = members.binary_search(&atom) {
                members.remove(pos);
            }
            let members = &mut self.residue_atoms[target];
            if let Err(pos) = members.binary_search(&atom) {
                members.insert(pos, atom);
            }
            self.atom_residue[atom] = target;
        }

        debug!(moved = aix.len(), "Reassigned atoms to residues.");
        Ok(())
    }
}
