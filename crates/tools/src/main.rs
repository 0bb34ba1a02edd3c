use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dungeon_core::layout::{self, GeneratorConfig};
use dungeon_core::path::{GridConfig, PathFinder, PathGrid};
use glam::Vec2;

const CELL_SIZE: f32 = 1.0;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a layout and print its tile grid
    Generate {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 64)]
        width: i32,
        #[arg(long, default_value_t = 40)]
        height: i32,
        /// Emit the full plan as JSON instead of the ASCII grid
        #[arg(long)]
        json: bool,
    },
    /// Generate a layout and overlay the route between its first two nodes
    Route {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 64)]
        width: i32,
        #[arg(long, default_value_t = 40)]
        height: i32,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Generate { seed, width, height, json } => {
            let plan = generate_checked(seed, width, height)?;
            if json {
                let encoded =
                    serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
                println!("{encoded}");
            } else {
                for row in &plan.rows {
                    println!("{row}");
                }
                println!();
                println!(
                    "seed {seed}: {} platforms, {} corridors, fingerprint {:016x}",
                    plan.platforms.len(),
                    plan.corridors.len(),
                    plan.fingerprint()
                );
            }
        }
        Command::Route { seed, width, height } => {
            let plan = generate_checked(seed, width, height)?;
            let nodes = plan.nodes();
            if nodes.len() < 2 {
                bail!("Seed {seed} produced {} node platforms; routing needs two", nodes.len());
            }
            let start = plan.cell_to_world(nodes[0].center(), CELL_SIZE);
            let end = plan.cell_to_world(nodes[1].center(), CELL_SIZE);

            let grid_config = GridConfig {
                origin: Vec2::ZERO,
                size: plan.world_size(CELL_SIZE),
                cell_radius: CELL_SIZE / 2.0,
                safety_margin: false,
            };
            let mut grid = PathGrid::build(&grid_config, plan.walkability_oracle(CELL_SIZE));
            let mut finder = PathFinder::new(&grid);
            let Some(chain) = finder.find_cell_path(&mut grid, start, end) else {
                bail!("Seed {seed}: no route between node {} and node {}", nodes[0].id, nodes[1].id);
            };

            let mut rows: Vec<Vec<char>> =
                plan.rows.iter().map(|row| row.chars().collect()).collect();
            for &id in &chain {
                let cell = grid.cell(id);
                rows[cell.y as usize][cell.x as usize] = plan.sentinels.path;
            }
            for row in rows {
                println!("{}", row.into_iter().collect::<String>());
            }
            println!();
            println!("seed {seed}: route covers {} cells", chain.len());
        }
    }

    Ok(())
}

fn generate_checked(seed: u64, width: i32, height: i32) -> Result<dungeon_core::LayoutPlan> {
    let config = GeneratorConfig { width, height, ..GeneratorConfig::default() };
    let plan = layout::generate(seed, config.clone());
    if plan.is_underfilled(config.min_platforms) {
        bail!(
            "Seed {seed} placed {} platforms, fewer than the {} required; try another seed",
            plan.platforms.len(),
            config.min_platforms
        );
    }
    Ok(plan)
}
