//! Seeded layout generation: rejection-sampled platform placement, spanning
//! tree wiring, corridor carving, and plan assembly.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use super::corridor;
use super::plan::{LayoutPlan, Sentinels};
use super::platform::Platform;
use super::spanning::minimum_spanning_edges;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub width: i32,
    pub height: i32,
    pub platform_min_width: i32,
    pub platform_max_width: i32,
    pub platform_min_height: i32,
    pub platform_max_height: i32,
    /// Placement attempts. Rejected samples are dropped, not retried, so an
    /// unlucky seed yields fewer platforms than attempts.
    pub cycles: u32,
    /// Margin applied to both rectangles in the overlap test.
    pub padding: i32,
    /// Postcondition threshold checked by the caller via
    /// [`LayoutPlan::is_underfilled`]; generation itself never retries.
    pub min_platforms: usize,
    pub sentinels: Sentinels,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 40,
            platform_min_width: 4,
            platform_max_width: 10,
            platform_min_height: 4,
            platform_max_height: 8,
            cycles: 120,
            padding: 2,
            min_platforms: 6,
            sentinels: Sentinels::default(),
        }
    }
}

pub struct LayoutGenerator {
    config: GeneratorConfig,
}

impl LayoutGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Deterministic for a given seed and config: all randomness flows from
    /// one ChaCha8 stream, never from system entropy.
    pub fn generate(&self, seed: u64) -> LayoutPlan {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut platforms = self.sample_platforms(&mut rng);
        let centers: Vec<_> = platforms.iter().map(Platform::center).collect();
        let edges = minimum_spanning_edges(&centers);

        let mut corridors = Vec::with_capacity(edges.len());
        for (a, b) in edges {
            let (from, to) = (&platforms[a], &platforms[b]);
            corridors.push(corridor::carve(from, to, &mut rng));
            platforms[a].connections += 1;
            platforms[b].connections += 1;
        }

        LayoutPlan::new(
            platforms,
            corridors,
            self.config.width,
            self.config.height,
            self.config.sentinels,
        )
    }

    fn sample_platforms(&self, rng: &mut ChaCha8Rng) -> Vec<Platform> {
        let config = &self.config;
        let mut platforms: Vec<Platform> = Vec::new();
        for _ in 0..config.cycles {
            let width = random_in_range(rng, config.platform_min_width, config.platform_max_width);
            let height =
                random_in_range(rng, config.platform_min_height, config.platform_max_height);
            if width + 2 >= config.width || height + 2 >= config.height {
                continue;
            }
            let x = random_in_range(rng, 1, config.width - width - 1);
            let y = random_in_range(rng, 1, config.height - height - 1);

            let candidate = Platform::new(platforms.len(), x, y, width, height);
            if platforms.iter().any(|existing| existing.intersects(&candidate, config.padding)) {
                continue;
            }
            platforms.push(candidate);
        }
        platforms
    }
}

fn random_in_range(rng: &mut ChaCha8Rng, min_value: i32, max_value: i32) -> i32 {
    debug_assert!(min_value <= max_value);
    let span = (max_value - min_value + 1) as u64;
    min_value + (rng.next_u64() % span) as i32
}
