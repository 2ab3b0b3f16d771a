//! # Core Models Module
//!
//! Data structures that tie attributes and structure together.
//!
//! ## Key Components
//!
//! - [`level`] - The three granularities of a topology
//! - [`group`] - Index groups at one level, and groups of connectivity tuples
//! - [`topology`] - The registry owning a translation table and its attributes
//! - [`builder`] - Step-by-step and TOML-driven topology construction

pub mod builder;
pub mod group;
pub mod level;
pub mod topology;
