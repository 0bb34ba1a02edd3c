use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::layout::{self, GeneratorConfig};
use dungeon_core::path::{GridConfig, PathGrid, PathRequestDispatcher, SearchSettings};
use glam::Vec2;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

const CELL_SIZE: f32 = 1.0;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First layout seed to exercise
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// Number of consecutive seeds to run
    #[arg(short = 'n', long, default_value_t = 200)]
    count: u64,
    /// Routing requests issued per accepted layout
    #[arg(short, long, default_value_t = 16)]
    requests: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    println!("Soaking {} seeds starting at {}...", args.count, args.seed);

    let config = GeneratorConfig::default();
    let mut underfilled = 0_u64;
    let mut routed = 0_u64;

    for seed in args.seed..args.seed + args.count {
        let plan = layout::generate(seed, config.clone());

        for (index, a) in plan.platforms.iter().enumerate() {
            for b in &plan.platforms[index + 1..] {
                if a.intersects(b, 0) {
                    bail!("Seed {seed}: platforms {} and {} overlap", a.id, b.id);
                }
            }
        }

        if plan.is_underfilled(config.min_platforms) || plan.nodes().len() < 2 {
            underfilled += 1;
            continue;
        }

        let grid_config = GridConfig {
            origin: Vec2::ZERO,
            size: plan.world_size(CELL_SIZE),
            cell_radius: CELL_SIZE / 2.0,
            safety_margin: false,
        };
        let mut grid = PathGrid::build(&grid_config, plan.walkability_oracle(CELL_SIZE));
        let mut dispatcher = PathRequestDispatcher::new(&grid, SearchSettings::default());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let fired = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));
        for _ in 0..args.requests {
            // Distinct platforms, so the two endpoints can never share a
            // cell (a same-cell request legitimately has no plan).
            let (from, to) = random_platform_pair(&plan, &mut rng);
            let fired = Arc::clone(&fired);
            let failures = Arc::clone(&failures);
            dispatcher.request(from, to, move |outcome| {
                fired.fetch_add(1, Ordering::SeqCst);
                if !outcome.success() {
                    failures.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        // One search per drain plus one trailing drain to flush callbacks.
        for _ in 0..args.requests + 1 {
            dispatcher.drain(&mut grid);
        }

        let fired = fired.load(Ordering::SeqCst) as u32;
        if fired != args.requests {
            bail!("Seed {seed}: {fired} of {} callbacks fired", args.requests);
        }
        let failure_count = failures.load(Ordering::SeqCst) as u64;
        if failure_count > 0 {
            // Platform interiors are connected by construction; any failure
            // here is a carving or lattice bug worth stopping on.
            bail!("Seed {seed}: {failure_count} routing requests failed");
        }
        routed += args.requests as u64;
    }

    println!("Done: {} seeds, {} underfilled, {} routes", args.count, underfilled, routed);
    Ok(())
}

fn random_platform_pair(plan: &dungeon_core::LayoutPlan, rng: &mut ChaCha8Rng) -> (Vec2, Vec2) {
    let count = plan.platforms.len();
    let first = rng.next_u64() as usize % count;
    let second = (first + 1 + rng.next_u64() as usize % (count - 1)) % count;
    let from = plan.platforms[first].random_point_inside(rng);
    let to = plan.platforms[second].random_point_inside(rng);
    (plan.cell_to_world(from, CELL_SIZE), plan.cell_to_world(to, CELL_SIZE))
}
