//! Grid routing domain: the walkability lattice, the search over it, plan
//! post-processing and the per-tick request dispatcher.

pub mod astar;
pub mod dispatch;
pub mod grid;
pub mod heap;
pub mod smooth;

pub use astar::{PathFinder, SearchSettings};
pub use dispatch::{DrainReport, PathOutcome, PathRequestDispatcher};
pub use grid::{GridConfig, PathGrid};
pub use smooth::{PathPlan, TurnLine};
