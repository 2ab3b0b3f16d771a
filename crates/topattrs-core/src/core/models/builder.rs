use super::topology::Topology;
use crate::core::attrs::atom::{Atomids, Atomnames, Atomtypes, Charges, Masses};
use crate::core::attrs::connectivity::Connectivity;
use crate::core::attrs::error::AttrError;
use crate::core::attrs::residue::{Resids, Resnames};
use crate::core::attrs::segment::Segids;
use crate::core::translation::index_table::IndexTable;
use crate::core::translation::TableError;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Attr(#[from] AttrError),
}

/// Plain description of a topology: its structure plus any number of attributes.
///
/// Every field is optional so that partial descriptions can be merged into a
/// [`TopologyBuilder`]; [`TopologyBuilder::build`] enforces the required ones. Without
/// `n_segments`, the segment count is one past the highest index in `residue_segments`.
///
/// ```toml
/// atom_residues = [0, 0, 0, 1]
/// residue_segments = [0, 0]
/// names = ["OW", "HW1", "HW2", "NA"]
/// masses = [16.0, 1.0, 1.0, 23.0]
/// resids = [1, 2]
/// bonds = [[0, 1], [0, 2]]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopologyData {
    pub atom_residues: Option<Vec<usize>>,
    pub residue_segments: Option<Vec<usize>>,
    pub n_segments: Option<usize>,
    pub ids: Option<Vec<i64>>,
    pub names: Option<Vec<String>>,
    pub types: Option<Vec<String>>,
    pub masses: Option<Vec<f64>>,
    pub charges: Option<Vec<f64>>,
    pub resids: Option<Vec<i64>>,
    pub resnames: Option<Vec<String>>,
    pub segids: Option<Vec<String>>,
    pub bonds: Option<Vec<Vec<usize>>>,
    pub angles: Option<Vec<Vec<usize>>>,
    pub dihedrals: Option<Vec<Vec<usize>>>,
    pub impropers: Option<Vec<Vec<usize>>>,
}

impl TopologyData {
    pub fn from_toml_str(content: &str) -> Result<Self, BuildError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let content = std::fs::read_to_string(path).map_err(|e| BuildError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| BuildError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }
}

#[derive(Debug, Default)]
pub struct TopologyBuilder {
    data: TopologyData,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: TopologyData) -> Self {
        Self { data }
    }

    pub fn atom_residues(mut self, atom_residues: Vec<usize>) -> Self {
        self.data.atom_residues = Some(atom_residues);
        self
    }
    pub fn residue_segments(mut self, residue_segments: Vec<usize>) -> Self {
        self.data.residue_segments = Some(residue_segments);
        self
    }
    pub fn n_segments(mut self, n_segments: usize) -> Self {
        self.data.n_segments = Some(n_segments);
        self
    }
    pub fn ids(mut self, ids: Vec<i64>) -> Self {
        self.data.ids = Some(ids);
        self
    }
    pub fn names(mut self, names: Vec<String>) -> Self {
        self.data.names = Some(names);
        self
    }
    pub fn types(mut self, types: Vec<String>) -> Self {
        self.data.types = Some(types);
        self
    }
    pub fn masses(mut self, masses: Vec<f64>) -> Self {
        self.data.masses = Some(masses);
        self
    }
    pub fn charges(mut self, charges: Vec<f64>) -> Self {
        self.data.charges = Some(charges);
        self
    }
    pub fn resids(mut self, resids: Vec<i64>) -> Self {
        self.data.resids = Some(resids);
        self
    }
    pub fn resnames(mut self, resnames: Vec<String>) -> Self {
        self.data.resnames = Some(resnames);
        self
    }
    pub fn segids(mut self, segids: Vec<String>) -> Self {
        self.data.segids = Some(segids);
        self
    }
    pub fn bonds(mut self, bonds: Vec<Vec<usize>>) -> Self {
        self.data.bonds = Some(bonds);
        self
    }
    pub fn angles(mut self, angles: Vec<Vec<usize>>) -> Self {
        self.data.angles = Some(angles);
        self
    }
    pub fn dihedrals(mut self, dihedrals: Vec<Vec<usize>>) -> Self {
        self.data.dihedrals = Some(dihedrals);
        self
    }
    pub fn impropers(mut self, impropers: Vec<Vec<usize>>) -> Self {
        self.data.impropers = Some(impropers);
        self
    }

    /// Builds the translation table and registers every supplied attribute.
    ///
    /// # Errors
    ///
    /// Fails if the structure is missing or inconsistent, if an attribute does not hold
    /// one value per entity, or if a connectivity tuple is too short or names an atom
    /// outside the topology.
    #[instrument(skip_all, name = "topology_build")]
    pub fn build(self) -> Result<Topology, BuildError> {
        let data = self.data;
        let atom_residues = data
            .atom_residues
            .ok_or(BuildError::MissingParameter("atom_residues"))?;
        let residue_segments = data
            .residue_segments
            .ok_or(BuildError::MissingParameter("residue_segments"))?;

        let table = match data.n_segments {
            Some(n_segments) => {
                IndexTable::with_segment_count(atom_residues, residue_segments, n_segments)?
            }
            None => IndexTable::new(atom_residues, residue_segments)?,
        };
        let mut topology = Topology::new(table.into_ref());

        if let Some(ids) = data.ids {
            topology.add_attr(Atomids::ids(ids))?;
        }
        if let Some(names) = data.names {
            topology.add_attr(Atomnames::names(names))?;
        }
        if let Some(types) = data.types {
            topology.add_attr(Atomtypes::types(types))?;
        }
        if let Some(masses) = data.masses {
            topology.add_attr(Masses::masses(masses))?;
        }
        if let Some(charges) = data.charges {
            topology.add_attr(Charges::charges(charges))?;
        }
        if let Some(resids) = data.resids {
            topology.add_attr(Resids::new(resids))?;
        }
        if let Some(resnames) = data.resnames {
            topology.add_attr(Resnames::resnames(resnames))?;
        }
        if let Some(segids) = data.segids {
            topology.add_attr(Segids::segids(segids))?;
        }

        let connectivity = [
            ("bonds", data.bonds),
            ("angles", data.angles),
            ("dihedrals", data.dihedrals),
            ("impropers", data.impropers),
        ];
        for (attr, tuples) in connectivity {
            if let Some(tuples) = tuples {
                topology.add_attr(Connectivity::new(attr, tuples))?;
            }
        }

        debug!(
            atoms = topology.n_atoms(),
            residues = topology.n_residues(),
            segments = topology.n_segments(),
            attrs = ?topology.attrnames(),
            "Built topology."
        );
        Ok(topology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attrs::any::AttrData;
    use crate::core::models::level::Level;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const WATER_AND_ION: &str = r#"
atom_residues = [0, 0, 0, 1]
residue_segments = [0, 0]
names = ["OW", "HW1", "HW2", "NA"]
masses = [16.0, 1.0, 1.0, 23.0]
resids = [1, 2]
resnames = ["SOL", "NA"]
segids = ["SYSTEM"]
bonds = [[0, 1], [0, 2]]
angles = [[1, 0, 2]]
"#;

    fn write_temp_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    mod builder {
        use super::*;

        #[test]
        fn build_registers_supplied_attributes() {
            let topology = TopologyBuilder::new()
                .atom_residues(vec![0, 0, 1])
                .residue_segments(vec![0, 0])
                .charges(vec![-1.0, 0.5, 0.5])
                .resids(vec![7, 8])
                .bonds(vec![vec![0, 1]])
                .build()
                .unwrap();

            assert_eq!(topology.attrnames(), vec!["bonds", "charges", "resids"]);
            assert_eq!(
                topology.read("charge", &topology.all_residues()).unwrap(),
                AttrData::Float(vec![-0.5, 0.5])
            );
        }

        #[test]
        fn structure_alone_builds_an_empty_topology() {
            let topology = TopologyBuilder::new()
                .atom_residues(vec![0])
                .residue_segments(vec![0])
                .build()
                .unwrap();
            assert_eq!(topology.n_atoms(), 1);
            assert!(topology.attrnames().is_empty());
        }

        #[test]
        fn build_fails_without_atom_residues() {
            let result = TopologyBuilder::new().residue_segments(vec![0]).build();
            assert!(matches!(
                result,
                Err(BuildError::MissingParameter("atom_residues"))
            ));
        }

        #[test]
        fn build_fails_without_residue_segments() {
            let result = TopologyBuilder::new().atom_residues(vec![0]).build();
            assert!(matches!(
                result,
                Err(BuildError::MissingParameter("residue_segments"))
            ));
        }

        #[test]
        fn build_fails_on_dangling_parent() {
            let result = TopologyBuilder::new()
                .atom_residues(vec![0, 3])
                .residue_segments(vec![0])
                .build();
            assert!(matches!(
                result,
                Err(BuildError::Table(TableError::InvalidParent { .. }))
            ));
        }

        #[test]
        fn build_fails_on_segment_index_beyond_residue_count() {
            let result = TopologyBuilder::new()
                .atom_residues(vec![0])
                .residue_segments(vec![usize::MAX])
                .build();
            assert!(matches!(
                result,
                Err(BuildError::Table(TableError::TooManySegments { n_residues: 1, .. }))
            ));
        }

        #[test]
        fn explicit_segment_count_keeps_trailing_empty_segment() {
            let topology = TopologyBuilder::new()
                .atom_residues(vec![0, 1])
                .residue_segments(vec![0, 0])
                .n_segments(2)
                .segids(vec!["PROT".to_string(), "EMPTY".to_string()])
                .build()
                .unwrap();
            assert_eq!(topology.n_segments(), 2);
            assert_eq!(
                topology.read("segids", &topology.all_atoms()).unwrap(),
                AttrData::Text(vec!["PROT".to_string(), "PROT".to_string()])
            );
        }

        #[test]
        fn build_fails_on_wrong_attribute_length() {
            let result = TopologyBuilder::new()
                .atom_residues(vec![0, 0])
                .residue_segments(vec![0])
                .masses(vec![1.0])
                .build();
            assert!(matches!(
                result,
                Err(BuildError::Attr(AttrError::LengthMismatch {
                    attr: "masses",
                    expected: 2,
                    found: 1,
                }))
            ));
        }

        #[test]
        fn build_fails_on_short_tuple() {
            let result = TopologyBuilder::new()
                .atom_residues(vec![0, 0])
                .residue_segments(vec![0])
                .angles(vec![vec![0, 1, 0], vec![1]])
                .build();
            assert!(matches!(
                result,
                Err(BuildError::Attr(AttrError::InvalidTuple {
                    attr: "angles",
                    index: 1,
                    len: 1,
                }))
            ));
        }

        #[test]
        fn build_fails_on_tuple_outside_topology() {
            let result = TopologyBuilder::new()
                .atom_residues(vec![0, 0])
                .residue_segments(vec![0])
                .bonds(vec![vec![0, 5]])
                .build();
            assert!(matches!(
                result,
                Err(BuildError::Attr(AttrError::Table(
                    TableError::IndexOutOfRange {
                        level: Level::Atom,
                        index: 5,
                        len: 2,
                    }
                )))
            ));
        }
    }

    mod toml_data {
        use super::*;

        #[test]
        fn from_toml_str_parses_every_present_field() {
            let data = TopologyData::from_toml_str(WATER_AND_ION).unwrap();
            assert_eq!(data.atom_residues, Some(vec![0, 0, 0, 1]));
            assert_eq!(data.resids, Some(vec![1, 2]));
            assert_eq!(data.angles, Some(vec![vec![1, 0, 2]]));
            assert_eq!(data.types, None);
        }

        #[test]
        fn huge_segment_index_in_toml_is_an_error() {
            let data = TopologyData::from_toml_str(
                "atom_residues = [0]\nresidue_segments = [9223372036854775807]",
            )
            .unwrap();
            assert!(matches!(
                TopologyBuilder::from_data(data).build(),
                Err(BuildError::Table(TableError::TooManySegments { .. }))
            ));
        }

        #[test]
        fn from_toml_str_rejects_unknown_fields() {
            let result = TopologyData::from_toml_str("radii = [1.0]");
            assert!(matches!(result, Err(BuildError::Parse(_))));
        }

        #[test]
        fn loaded_data_builds_a_working_topology() {
            let file = write_temp_toml(WATER_AND_ION);
            let data = TopologyData::load(file.path()).unwrap();
            let topology = TopologyBuilder::from_data(data).build().unwrap();

            assert_eq!(
                topology.read("masses", &topology.all_residues()).unwrap(),
                AttrData::Float(vec![18.0, 23.0])
            );
            assert_eq!(
                topology.read("segid", &topology.atoms(vec![3])).unwrap(),
                AttrData::Text(vec!["SYSTEM".to_string()])
            );
            assert_eq!(topology.attr("angles").unwrap().len(), 3);
        }

        #[test]
        fn load_reports_missing_file_with_path() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("missing.toml");
            match TopologyData::load(&path) {
                Err(BuildError::Io { path: reported, .. }) => {
                    assert!(reported.ends_with("missing.toml"))
                }
                other => panic!("expected an I/O error, got {other:?}"),
            }
        }

        #[test]
        fn load_reports_malformed_toml_with_path() {
            let file = write_temp_toml("atom_residues = [0, ");
            assert!(matches!(
                TopologyData::load(file.path()),
                Err(BuildError::Toml { .. })
            ));
        }
    }
}
