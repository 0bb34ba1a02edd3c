//! The search itself. This module exists so the dispatcher and the lattice
//! never need to know about heap mechanics; it owns a reusable open set and
//! nothing else.

use glam::Vec2;

use super::grid::{Cell, PathGrid};
use super::heap::OpenHeap;
use super::smooth::{self, PathPlan};
use crate::types::CellIndex;

/// Integer octile step costs: 10 per axis-aligned move, 14 per diagonal
/// (sqrt(2) * 10, truncated). The heuristic uses the same pair, so it never
/// overestimates and f-cost ties stay meaningful.
pub const LINEAR_COST: u32 = 10;
pub const DIAGONAL_COST: u32 = 14;

#[derive(Clone, Copy, Debug)]
pub struct SearchSettings {
    /// Waypoint simplification tolerance, in world units.
    pub simplify_tolerance: f32,
    /// How far before a corner its turn boundary sits.
    pub turn_distance: f32,
    /// Route length from the end over which movement should decelerate.
    pub stopping_distance: f32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { simplify_tolerance: 0.35, turn_distance: 1.0, stopping_distance: 3.0 }
    }
}

pub struct PathFinder {
    open: OpenHeap,
}

impl PathFinder {
    /// Sizes the open set for `grid`; a search can never enqueue more cells
    /// than the lattice holds.
    pub fn new(grid: &PathGrid) -> Self {
        Self { open: OpenHeap::with_capacity(grid.cell_count()) }
    }

    /// Runs A* between the cells nearest to `start` and `end` and returns the
    /// raw cell chain, start cell included. `None` when no walkable chain
    /// connects the two.
    pub fn find_cell_path(
        &mut self,
        grid: &mut PathGrid,
        start: Vec2,
        end: Vec2,
    ) -> Option<Vec<CellIndex>> {
        let start_id = grid.nearest_cell(start);
        let target_id = grid.nearest_cell(end);
        if !grid.cell(start_id).walkable || !grid.cell(target_id).walkable {
            return None;
        }

        let stamp = grid.begin_search();
        self.open.clear();

        let start_h = octile_between(grid.cell(start_id), grid.cell(target_id));
        {
            let cell = grid.cell_mut(start_id);
            cell.g_cost = 0;
            cell.h_cost = start_h;
            cell.parent = None;
            cell.stamp = stamp;
            cell.closed = false;
        }
        self.open.push(grid, start_id);

        while let Some(current) = self.open.pop(grid) {
            grid.cell_mut(current).closed = true;
            if current == target_id {
                return Some(retrace(grid, start_id, target_id));
            }

            for neighbour in grid.neighbours(current) {
                let step = {
                    let n = grid.cell(neighbour);
                    if !n.walkable || (n.stamp == stamp && n.closed) {
                        continue;
                    }
                    octile_between(grid.cell(current), n) + grid.movement_penalty(neighbour)
                };
                let tentative = grid.cell(current).g_cost + step;

                let (fresh, improved) = {
                    let n = grid.cell(neighbour);
                    let fresh = n.stamp != stamp;
                    (fresh, fresh || tentative < n.g_cost)
                };
                if !improved {
                    continue;
                }

                let h = octile_between(grid.cell(neighbour), grid.cell(target_id));
                let resurface = !fresh && self.open.contains(grid, neighbour);
                {
                    let n = grid.cell_mut(neighbour);
                    n.g_cost = tentative;
                    n.h_cost = h;
                    n.parent = Some(current);
                    n.stamp = stamp;
                    n.closed = false;
                }
                if resurface {
                    self.open.update(grid, neighbour);
                } else {
                    self.open.push(grid, neighbour);
                }
            }
        }
        None
    }

    /// Full pipeline: A*, waypoint simplification, turn boundaries. The plan
    /// excludes the start position; its first waypoint is the first place the
    /// unit actually needs to reach.
    pub fn find_path(
        &mut self,
        grid: &mut PathGrid,
        start: Vec2,
        end: Vec2,
        settings: &SearchSettings,
    ) -> Option<PathPlan> {
        let cells = self.find_cell_path(grid, start, end)?;
        let points: Vec<Vec2> = cells.iter().map(|&id| grid.cell(id).world_point).collect();
        let simplified = smooth::simplify(&points, settings.simplify_tolerance);
        // The leading point is the start cell's center; the unit is already there.
        let waypoints: Vec<Vec2> = simplified.into_iter().skip(1).collect();
        if waypoints.is_empty() {
            return None;
        }
        Some(PathPlan::assemble(start, waypoints, settings.turn_distance, settings.stopping_distance))
    }
}

fn octile_between(a: &Cell, b: &Cell) -> u32 {
    let dx = (a.x - b.x).unsigned_abs();
    let dy = (a.y - b.y).unsigned_abs();
    let (long, short) = if dx >= dy { (dx, dy) } else { (dy, dx) };
    DIAGONAL_COST * short + LINEAR_COST * (long - short)
}

fn retrace(grid: &PathGrid, start_id: CellIndex, target_id: CellIndex) -> Vec<CellIndex> {
    let mut chain = vec![target_id];
    let mut current = target_id;
    while current != start_id {
        current = grid.cell(current).parent.expect("every retraced cell links back to the start");
        chain.push(current);
    }
    chain.reverse();
    chain
}
