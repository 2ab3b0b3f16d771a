use super::error::AttrError;
use super::{AttrName, Storage, TopologyAttr};
use crate::core::models::group::Group;
use crate::core::models::level::Level;
use crate::core::translation::TableRef;

/// An attribute holding one value per segment; atoms and residues see their segment's value.
#[derive(Debug, Clone)]
pub struct SegmentAttr<V> {
    storage: Storage<V>,
}

pub type Segids = SegmentAttr<String>;

impl<V: Clone> SegmentAttr<V> {
    pub fn new(name: AttrName, values: Vec<V>) -> Self {
        Self {
            storage: Storage::new(name, Level::Segment, values),
        }
    }

    pub fn values(&self) -> &[V] {
        &self.storage.values
    }
}

impl SegmentAttr<String> {
    pub fn segids(values: Vec<String>) -> Self {
        Self::new(AttrName::new("segids", "segid"), values)
    }
}

impl<V: Clone> TopologyAttr for SegmentAttr<V> {
    type Value = V;
    type Output = Vec<V>;

    fn name(&self) -> AttrName {
        self.storage.name
    }

    fn native_level(&self) -> Level {
        Level::Segment
    }

    fn len(&self) -> usize {
        self.storage.values.len()
    }

    fn attach(&mut self, table: TableRef) {
        self.storage.table = Some(table);
    }

    fn read_atoms(&self, ag: &Group) -> Result<Vec<V>, AttrError> {
        let six = self.storage.table()?.atoms_to_segments(ag.indices())?;
        self.storage.take(&six)
    }

    fn read_residues(&self, rg: &Group) -> Result<Vec<V>, AttrError> {
        let six = self.storage.table()?.residues_to_segments(rg.indices())?;
        self.storage.take(&six)
    }

    fn read_segments(&self, sg: &Group) -> Result<Vec<V>, AttrError> {
        self.storage.take(sg.indices())
    }

    fn write_segments(&mut self, sg: &Group, values: &[V]) -> Result<(), AttrError> {
        self.storage.put(sg.indices(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::translation::index_table::IndexTable;

    fn segids() -> Segids {
        let table = IndexTable::new(vec![0, 0, 1, 2], vec![0, 0, 1])
            .unwrap()
            .into_ref();
        let mut segids = Segids::segids(vec!["PROA".to_string(), "SOLV".to_string()]);
        segids.attach(table);
        segids
    }

    #[test]
    fn atoms_and_residues_see_their_segment() {
        let segids = segids();
        assert_eq!(
            segids.read(&Group::atoms(vec![3, 0, 2])).unwrap(),
            vec!["SOLV", "PROA", "PROA"]
        );
        assert_eq!(
            segids.read(&Group::residues(vec![2, 1, 0])).unwrap(),
            vec!["SOLV", "PROA", "PROA"]
        );
    }

    #[test]
    fn write_then_read_round_trips_at_segment_level() {
        let mut segids = segids();
        let sg = Group::segments(vec![1]);
        segids.write(&sg, &["WAT".to_string()]).unwrap();
        assert_eq!(segids.read(&sg).unwrap(), vec!["WAT"]);
        assert_eq!(segids.values(), &["PROA", "WAT"]);
    }

    #[test]
    fn finer_level_writes_are_not_supported() {
        let mut segids = segids();
        let value = ["X".to_string()];
        for group in [Group::atoms(vec![0]), Group::residues(vec![0])] {
            assert_eq!(
                segids.write(&group, &value).unwrap_err(),
                AttrError::NotSupported {
                    attr: "segids",
                    level: group.level(),
                }
            );
        }
    }

    #[test]
    fn detached_segids_still_read_by_segment() {
        let segids = Segids::segids(vec!["A".to_string()]);
        assert_eq!(segids.read(&Group::segments(vec![0])).unwrap(), vec!["A"]);
        assert_eq!(
            segids.read(&Group::atoms(vec![0])).unwrap_err(),
            AttrError::Detached { attr: "segids" }
        );
    }
}
