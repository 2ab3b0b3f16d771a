//! # topattrs
//!
//! Multi-level topology attributes for molecular structures.
//!
//! A topology groups atoms into residues and residues into segments. Attributes attach
//! data to one of those levels (atom names, residue numbers, segment identifiers,
//! bonds) and can be read from any other level: coarse entities see the values of their
//! members, fine entities see the value of their parent.
//!
//! ## Layout
//!
//! - **[`translation`](crate::core::translation)**: The structure. Maps indices between atoms, residues and
//!   segments, and moves atoms between residues.
//! - **[`attrs`](crate::core::attrs)**: The data. One attribute family per native level, plus
//!   connectivity (bonds, angles, dihedrals, impropers) with a cached adjacency map.
//! - **[`models`](crate::core::models)**: The containers. Levels, index groups, the [`Topology`] registry
//!   and its builder, which can also be fed from a TOML description.
//!
//! ```
//! use topattrs::{AttrData, TopologyBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let topology = TopologyBuilder::new()
//!     .atom_residues(vec![0, 0, 0, 1])
//!     .residue_segments(vec![0, 0])
//!     .masses(vec![16.0, 1.0, 1.0, 23.0])
//!     .build()?;
//!
//! let masses = topology.read("mass", &topology.all_residues())?;
//! assert_eq!(masses, AttrData::Float(vec![18.0, 23.0]));
//! # Ok(())
//! # }
//! ```
//!
//! [`Topology`]: crate::core::models::topology::Topology

pub mod core;

pub use crate::core::attrs::any::{AnyAttr, AttrData};
pub use crate::core::attrs::error::AttrError;
pub use crate::core::attrs::TopologyAttr;
pub use crate::core::models::builder::{BuildError, TopologyBuilder, TopologyData};
pub use crate::core::models::group::{Group, TopologyGroup};
pub use crate::core::models::level::Level;
pub use crate::core::models::topology::Topology;
pub use crate::core::translation::{TableError, TableRef, TranslationTable};
