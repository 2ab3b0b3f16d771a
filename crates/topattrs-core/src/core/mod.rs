//! # Core Module
//!
//! The building blocks of a multi-level topology.
//!
//! - **Structure** ([`translation`]) - Index translation between atoms, residues and segments
//! - **Data** ([`attrs`]) - Attributes native to each level and their cross-level views
//! - **Containers** ([`models`]) - Levels, groups, the topology registry and its builder

pub mod attrs;
pub mod models;
pub mod translation;
