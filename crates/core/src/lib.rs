//! Deterministic dungeon layout generation and grid routing.
//!
//! [`layout`] turns a seed into a tile grid of platforms joined by corridors;
//! [`path`] builds a walkability lattice over any such grid (or any other
//! oracle) and answers movement queries against it.

pub mod layout;
pub mod path;
pub mod types;

pub use layout::{GeneratorConfig, LayoutGenerator, LayoutPlan};
pub use path::{GridConfig, PathFinder, PathGrid, PathPlan, PathRequestDispatcher, SearchSettings};
pub use types::*;
