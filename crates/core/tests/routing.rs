//! End-to-end: generate a layout, lift it into a walkability lattice, and
//! route between its node platforms through the dispatcher.

use std::sync::Arc;
use std::sync::Mutex;

use glam::Vec2;
use dungeon_core::layout::{self, GeneratorConfig};
use dungeon_core::path::{GridConfig, PathGrid, PathOutcome, PathRequestDispatcher, SearchSettings};

const CELL_SIZE: f32 = 1.0;

fn routed_seed() -> (dungeon_core::LayoutPlan, u64) {
    // First seed whose layout filled out and grew at least two nodes. The
    // scan is deterministic, so every test sees the same geometry.
    let config = GeneratorConfig::default();
    for seed in 0..32 {
        let plan = layout::generate(seed, config.clone());
        if !plan.is_underfilled(config.min_platforms) && plan.nodes().len() >= 2 {
            return (plan, seed);
        }
    }
    panic!("no seed in 0..32 produced a filled layout");
}

fn grid_for(plan: &dungeon_core::LayoutPlan) -> PathGrid {
    let config = GridConfig {
        origin: Vec2::ZERO,
        size: plan.world_size(CELL_SIZE),
        cell_radius: CELL_SIZE / 2.0,
        // Corridors are one tile wide; eroding the border would seal them.
        safety_margin: false,
    };
    PathGrid::build(&config, plan.walkability_oracle(CELL_SIZE))
}

#[test]
fn generated_layouts_route_between_their_node_platforms() {
    let (plan, seed) = routed_seed();
    let mut grid = grid_for(&plan);

    let nodes = plan.nodes();
    assert!(nodes.len() >= 2, "seed {seed} produced fewer than two nodes");
    let start = plan.cell_to_world(nodes[0].center(), CELL_SIZE);
    let end = plan.cell_to_world(nodes[1].center(), CELL_SIZE);

    let mut dispatcher = PathRequestDispatcher::new(&grid, SearchSettings::default());
    let delivered = Arc::new(Mutex::new(None));
    let observer = Arc::clone(&delivered);
    dispatcher.request(start, end, move |outcome| {
        *observer.lock().expect("outcome lock poisoned") = Some(outcome);
    });

    dispatcher.drain(&mut grid);
    dispatcher.drain(&mut grid);

    let outcome = delivered
        .lock()
        .expect("outcome lock poisoned")
        .take()
        .expect("callback fired by the second drain");
    let plan_out = match outcome {
        PathOutcome::Found(plan_out) => plan_out,
        PathOutcome::Failed => panic!("node platforms are connected by construction"),
    };

    // Every surviving waypoint is a walkable tile center, and the route
    // actually ends at the target.
    let oracle = plan.walkability_oracle(CELL_SIZE);
    for waypoint in &plan_out.waypoints {
        assert!(oracle(*waypoint), "waypoint {waypoint} landed on an unwalkable tile");
    }
    let last = plan_out.waypoints[plan_out.finish_line_index];
    assert!(last.distance(end) < CELL_SIZE, "route stops {last} away from {end}");
    assert_eq!(plan_out.finish_line_index, plan_out.waypoints.len() - 1);
    assert!(plan_out.slowdown_index <= plan_out.finish_line_index);
}

#[test]
fn every_platform_pair_is_mutually_reachable() {
    let (plan, seed) = routed_seed();
    let mut grid = grid_for(&plan);
    let mut finder = dungeon_core::PathFinder::new(&grid);

    let anchor = plan.cell_to_world(plan.platforms[0].center(), CELL_SIZE);
    for platform in &plan.platforms[1..] {
        let target = plan.cell_to_world(platform.center(), CELL_SIZE);
        assert!(
            finder.find_cell_path(&mut grid, anchor, target).is_some(),
            "seed {seed}: platform {} unreachable from platform 0",
            platform.id
        );
    }
}

#[test]
fn occupied_tiles_reroute_but_never_strand_a_request() {
    let (plan, _) = routed_seed();
    let mut grid = grid_for(&plan);
    let mut finder = dungeon_core::PathFinder::new(&grid);

    let nodes = plan.nodes();
    let start = plan.cell_to_world(nodes[0].center(), CELL_SIZE);
    let end = plan.cell_to_world(nodes[1].center(), CELL_SIZE);
    let baseline =
        finder.find_cell_path(&mut grid, start, end).expect("node platforms are connected");

    // Park a unit on a mid-route cell. The route may change shape but must
    // still exist: occupancy is a penalty, not a wall.
    let mid = grid.cell(baseline[baseline.len() / 2]).world_point;
    grid.update_blocked(mid, mid);
    let rerouted =
        finder.find_cell_path(&mut grid, start, end).expect("occupancy never severs the route");
    assert_eq!(rerouted.first(), baseline.first());
    assert_eq!(rerouted.last(), baseline.last());
}
