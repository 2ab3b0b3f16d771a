use super::aggregate::Summed;
use super::atom::AtomAttr;
use super::connectivity::Connectivity;
use super::error::AttrError;
use super::residue::{ResidueAttr, Resids};
use super::segment::SegmentAttr;
use super::{AttrName, TopologyAttr};
use crate::core::models::group::{Group, TopologyGroup};
use crate::core::models::level::Level;
use crate::core::translation::TableRef;

/// Values read from, or written to, an attribute whose concrete type is not known statically.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrData {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
    Connectivity(TopologyGroup),
}

impl AttrData {
    pub fn kind(&self) -> &'static str {
        match self {
            AttrData::Int(_) => i64::KIND,
            AttrData::Float(_) => f64::KIND,
            AttrData::Text(_) => String::KIND,
            AttrData::Connectivity(_) => <Vec<usize>>::KIND,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AttrData::Int(values) => values.len(),
            AttrData::Float(values) => values.len(),
            AttrData::Text(values) => values.len(),
            AttrData::Connectivity(group) => group.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<i64>> for AttrData {
    fn from(values: Vec<i64>) -> Self {
        AttrData::Int(values)
    }
}

impl From<Vec<f64>> for AttrData {
    fn from(values: Vec<f64>) -> Self {
        AttrData::Float(values)
    }
}

impl From<Vec<String>> for AttrData {
    fn from(values: Vec<String>) -> Self {
        AttrData::Text(values)
    }
}

impl From<TopologyGroup> for AttrData {
    fn from(group: TopologyGroup) -> Self {
        AttrData::Connectivity(group)
    }
}

/// Element types that can be recovered from [`AttrData`].
pub trait DataKind: Sized {
    const KIND: &'static str;

    /// Extracts the values, handing `data` back if it holds another kind.
    fn from_data(data: AttrData) -> Result<Vec<Self>, AttrData>;
}

impl DataKind for i64 {
    const KIND: &'static str = "integer";

    fn from_data(data: AttrData) -> Result<Vec<Self>, AttrData> {
        match data {
            AttrData::Int(values) => Ok(values),
            other => Err(other),
        }
    }
}

impl DataKind for f64 {
    const KIND: &'static str = "float";

    fn from_data(data: AttrData) -> Result<Vec<Self>, AttrData> {
        match data {
            AttrData::Float(values) => Ok(values),
            other => Err(other),
        }
    }
}

impl DataKind for String {
    const KIND: &'static str = "text";

    fn from_data(data: AttrData) -> Result<Vec<Self>, AttrData> {
        match data {
            AttrData::Text(values) => Ok(values),
            other => Err(other),
        }
    }
}

impl DataKind for Vec<usize> {
    const KIND: &'static str = "connectivity";

    fn from_data(data: AttrData) -> Result<Vec<Self>, AttrData> {
        match data {
            AttrData::Connectivity(group) => Ok(group.into_tuples()),
            other => Err(other),
        }
    }
}

/// Any attribute a topology can hold.
#[derive(Debug, Clone)]
pub enum AnyAttr {
    AtomInt(AtomAttr<i64>),
    AtomText(AtomAttr<String>),
    AtomSummed(AtomAttr<f64, Summed>),
    Resids(Resids),
    ResidueText(ResidueAttr<String>),
    SegmentText(SegmentAttr<String>),
    Connectivity(Connectivity),
}

macro_rules! dispatch {
    ($attr:expr, $inner:ident => $body:expr) => {
        match $attr {
            AnyAttr::AtomInt($inner) => $body,
            AnyAttr::AtomText($inner) => $body,
            AnyAttr::AtomSummed($inner) => $body,
            AnyAttr::Resids($inner) => $body,
            AnyAttr::ResidueText($inner) => $body,
            AnyAttr::SegmentText($inner) => $body,
            AnyAttr::Connectivity($inner) => $body,
        }
    };
}

fn read_erased<A>(attr: &A, group: &Group) -> Result<AttrData, AttrError>
where
    A: TopologyAttr,
    A::Output: Into<AttrData>,
{
    attr.read(group).map(Into::into)
}

fn write_erased<A>(attr: &mut A, group: &Group, data: AttrData) -> Result<(), AttrError>
where
    A: TopologyAttr,
    A::Value: DataKind,
{
    let values = <A::Value as DataKind>::from_data(data).map_err(|found| AttrError::ValueKind {
        attr: attr.attrname(),
        expected: <A::Value as DataKind>::KIND,
        found: found.kind(),
    })?;
    attr.write(group, &values)
}

impl AnyAttr {
    pub fn name(&self) -> AttrName {
        dispatch!(self, attr => attr.name())
    }

    pub fn attrname(&self) -> &'static str {
        self.name().attrname
    }

    pub fn native_level(&self) -> Level {
        dispatch!(self, attr => attr.native_level())
    }

    pub fn len(&self) -> usize {
        dispatch!(self, attr => attr.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn attach(&mut self, table: TableRef) {
        dispatch!(self, attr => attr.attach(table))
    }

    pub fn read(&self, group: &Group) -> Result<AttrData, AttrError> {
        dispatch!(self, attr => read_erased(attr, group))
    }

    pub fn write(&mut self, group: &Group, data: AttrData) -> Result<(), AttrError> {
        dispatch!(self, attr => write_erased(attr, group, data))
    }
}

impl From<AtomAttr<i64>> for AnyAttr {
    fn from(attr: AtomAttr<i64>) -> Self {
        AnyAttr::AtomInt(attr)
    }
}

impl From<AtomAttr<String>> for AnyAttr {
    fn from(attr: AtomAttr<String>) -> Self {
        AnyAttr::AtomText(attr)
    }
}

impl From<AtomAttr<f64, Summed>> for AnyAttr {
    fn from(attr: AtomAttr<f64, Summed>) -> Self {
        AnyAttr::AtomSummed(attr)
    }
}

impl From<Resids> for AnyAttr {
    fn from(attr: Resids) -> Self {
        AnyAttr::Resids(attr)
    }
}

impl From<ResidueAttr<String>> for AnyAttr {
    fn from(attr: ResidueAttr<String>) -> Self {
        AnyAttr::ResidueText(attr)
    }
}

impl From<SegmentAttr<String>> for AnyAttr {
    fn from(attr: SegmentAttr<String>) -> Self {
        AnyAttr::SegmentText(attr)
    }
}

impl From<Connectivity> for AnyAttr {
    fn from(attr: Connectivity) -> Self {
        AnyAttr::Connectivity(attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attrs::atom::{Atomnames, Masses};
    use crate::core::attrs::segment::Segids;
    use crate::core::translation::index_table::IndexTable;

    fn attached(attr: impl Into<AnyAttr>) -> AnyAttr {
        let mut attr: AnyAttr = attr.into();
        attr.attach(IndexTable::new(vec![0, 0, 1], vec![0, 0]).unwrap().into_ref());
        attr
    }

    #[test]
    fn read_wraps_values_in_matching_variant() {
        let masses = attached(Masses::masses(vec![1.0, 2.0, 4.0]));
        assert_eq!(
            masses.read(&Group::residues(vec![0, 1])).unwrap(),
            AttrData::Float(vec![3.0, 4.0])
        );

        let bonds = attached(Connectivity::bonds(vec![vec![0, 1]]));
        let data = bonds.read(&Group::atoms(vec![0])).unwrap();
        assert_eq!(data.kind(), "connectivity");
        assert_eq!(data.len(), 1);
        assert!(!data.is_empty());
        assert!(AttrData::Int(Vec::new()).is_empty());
    }

    #[test]
    fn write_accepts_matching_kind() {
        let mut names = attached(Atomnames::names(vec![String::new(); 3]));
        let ag = Group::atoms(vec![2]);
        names
            .write(&ag, AttrData::Text(vec!["CL".to_string()]))
            .unwrap();
        assert_eq!(names.read(&ag).unwrap(), AttrData::Text(vec!["CL".to_string()]));
    }

    #[test]
    fn write_rejects_mismatched_kind() {
        let mut resids = attached(Resids::new(vec![1, 2]));
        let result = resids.write(&Group::residues(vec![0]), AttrData::Float(vec![1.5]));
        assert_eq!(
            result.unwrap_err(),
            AttrError::ValueKind {
                attr: "resids",
                expected: "integer",
                found: "float",
            }
        );
    }

    #[test]
    fn metadata_forwards_to_the_wrapped_attribute() {
        let segids = attached(Segids::segids(vec!["A".to_string()]));
        assert_eq!(segids.attrname(), "segids");
        assert_eq!(segids.native_level(), Level::Segment);
        assert_eq!(segids.len(), 1);
        assert!(attached(Connectivity::angles(vec![])).is_empty());
    }
}
