//! Procedural dungeon layout domain split into coherent submodules.

pub mod corridor;
pub mod generator;
pub mod plan;
pub mod platform;
pub mod spanning;

pub use corridor::{Corridor, Heading};
pub use generator::{GeneratorConfig, LayoutGenerator};
pub use plan::{LayoutPlan, Sentinels};
pub use platform::Platform;

/// Generates a layout from a seed with the given configuration.
pub fn generate(seed: u64, config: GeneratorConfig) -> LayoutPlan {
    LayoutGenerator::new(config).generate(seed)
}
