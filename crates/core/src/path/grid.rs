//! Walkability lattice the searches run over.
//! Built once per layout from an injected oracle, then mutated in place
//! (blocked flags) for the rest of the session; never resized.

use glam::Vec2;

use super::heap::HeapOrder;
use crate::types::CellIndex;

/// Traversal surcharge for a cell currently occupied by a unit. A penalty
/// rather than a wall: the search prefers free cells but may still route
/// through occupied ones when nothing else connects.
pub const BLOCKED_PENALTY: u32 = 50;

#[derive(Clone, Debug)]
pub struct GridConfig {
    /// World-space corner the lattice grows from.
    pub origin: Vec2,
    pub size: Vec2,
    /// Half a cell edge; per-axis cell counts are `round(size / (2 * radius))`.
    pub cell_radius: f32,
    /// Erode the walkable region by one cell along its borders. Useful when
    /// the oracle is a coarse physics probe and units have girth; switch it
    /// off for tile-exact layouts whose corridors are a single cell wide.
    pub safety_margin: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { origin: Vec2::ZERO, size: Vec2::new(10.0, 10.0), cell_radius: 0.5, safety_margin: true }
    }
}

#[derive(Clone, Debug)]
pub struct Cell {
    pub walkable: bool,
    /// Set by the safety-margin pass: walkable per the oracle but adjacent to
    /// the unwalkable region, so treated as unwalkable.
    pub out_of_bounds: bool,
    pub blocked: bool,
    pub world_point: Vec2,
    pub x: i32,
    pub y: i32,
    pub(super) g_cost: u32,
    pub(super) h_cost: u32,
    pub(super) parent: Option<CellIndex>,
    pub(super) heap_slot: usize,
    /// Search generation that last wrote the cost fields. Costs, parent and
    /// closed state from older generations are never read.
    pub(super) stamp: u64,
    pub(super) closed: bool,
}

impl Cell {
    pub fn f_cost(&self) -> u32 {
        self.g_cost + self.h_cost
    }
}

pub struct PathGrid {
    cells: Vec<Cell>,
    cells_x: i32,
    cells_y: i32,
    origin: Vec2,
    size: Vec2,
    search_stamp: u64,
}

impl PathGrid {
    /// Builds the lattice by probing the oracle at every cell center, then
    /// optionally eroding the walkable border by one cell.
    pub fn build(config: &GridConfig, oracle: impl Fn(Vec2) -> bool) -> Self {
        let cell_diameter = config.cell_radius * 2.0;
        let cells_x = (config.size.x / cell_diameter).round().max(1.0) as i32;
        let cells_y = (config.size.y / cell_diameter).round().max(1.0) as i32;

        let mut cells = Vec::with_capacity((cells_x * cells_y) as usize);
        for y in 0..cells_y {
            for x in 0..cells_x {
                let world_point = config.origin
                    + Vec2::new((x as f32 + 0.5) * cell_diameter, (y as f32 + 0.5) * cell_diameter);
                cells.push(Cell {
                    walkable: oracle(world_point),
                    out_of_bounds: false,
                    blocked: false,
                    world_point,
                    x,
                    y,
                    g_cost: 0,
                    h_cost: 0,
                    parent: None,
                    heap_slot: usize::MAX,
                    stamp: 0,
                    closed: false,
                });
            }
        }

        let mut grid = Self {
            cells,
            cells_x,
            cells_y,
            origin: config.origin,
            size: config.size,
            search_stamp: 0,
        };
        if config.safety_margin {
            grid.apply_safety_margin();
        }
        grid
    }

    /// Flags every walkable cell with an unwalkable 8-neighbour, then flips
    /// it. Two passes so the erosion reads pre-pass walkability.
    fn apply_safety_margin(&mut self) {
        let mut eroded = Vec::new();
        for id in 0..self.cells.len() as CellIndex {
            if !self.cells[id as usize].walkable {
                continue;
            }
            let touches_edge =
                self.neighbours(id).into_iter().any(|n| !self.cells[n as usize].walkable);
            if touches_edge {
                eroded.push(id);
            }
        }
        for id in eroded {
            let cell = &mut self.cells[id as usize];
            cell.out_of_bounds = true;
            cell.walkable = false;
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells_x(&self) -> i32 {
        self.cells_x
    }

    pub fn cells_y(&self) -> i32 {
        self.cells_y
    }

    pub fn cell(&self, id: CellIndex) -> &Cell {
        &self.cells[id as usize]
    }

    pub(super) fn cell_mut(&mut self, id: CellIndex) -> &mut Cell {
        &mut self.cells[id as usize]
    }

    pub fn index_of(&self, x: i32, y: i32) -> CellIndex {
        debug_assert!(x >= 0 && x < self.cells_x && y >= 0 && y < self.cells_y);
        (y * self.cells_x + x) as CellIndex
    }

    /// Maps a world position to the nearest cell by clamped interpolation
    /// over the grid extents. O(1); positions outside the configured bounds
    /// clamp silently, by design, to absorb small floating drift at edges.
    pub fn nearest_cell(&self, world: Vec2) -> CellIndex {
        let percent_x = ((world.x - self.origin.x) / self.size.x).clamp(0.0, 1.0);
        let percent_y = ((world.y - self.origin.y) / self.size.y).clamp(0.0, 1.0);
        let x = ((self.cells_x - 1) as f32 * percent_x).round() as i32;
        let y = ((self.cells_y - 1) as f32 * percent_y).round() as i32;
        self.index_of(x, y)
    }

    /// Moves a unit's occupancy marker: block the cell under `current`,
    /// unblock the one under `previous` when they differ.
    pub fn update_blocked(&mut self, previous: Vec2, current: Vec2) {
        let previous_id = self.nearest_cell(previous);
        let current_id = self.nearest_cell(current);
        self.cells[current_id as usize].blocked = true;
        if previous_id != current_id {
            self.cells[previous_id as usize].blocked = false;
        }
    }

    pub fn movement_penalty(&self, id: CellIndex) -> u32 {
        if self.cells[id as usize].blocked { BLOCKED_PENALTY } else { 0 }
    }

    /// Up to eight adjacent in-lattice cells.
    pub fn neighbours(&self, id: CellIndex) -> Vec<CellIndex> {
        let cell = &self.cells[id as usize];
        let mut neighbours = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let x = cell.x + dx;
                let y = cell.y + dy;
                if x < 0 || y < 0 || x >= self.cells_x || y >= self.cells_y {
                    continue;
                }
                neighbours.push(self.index_of(x, y));
            }
        }
        neighbours
    }

    /// Starts a new search generation; cost fields stamped with older
    /// generations become unreadable instead of silently stale.
    pub(super) fn begin_search(&mut self) -> u64 {
        self.search_stamp += 1;
        self.search_stamp
    }
}

/// Open-set order: lowest `f_cost` first, `h_cost` breaking ties.
impl HeapOrder for PathGrid {
    fn precedes(&self, a: CellIndex, b: CellIndex) -> bool {
        let a = &self.cells[a as usize];
        let b = &self.cells[b as usize];
        (a.f_cost(), a.h_cost) < (b.f_cost(), b.h_cost)
    }

    fn heap_slot(&self, id: CellIndex) -> usize {
        self.cells[id as usize].heap_slot
    }

    fn set_heap_slot(&mut self, id: CellIndex, slot: usize) {
        self.cells[id as usize].heap_slot = slot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_config(width: f32, height: f32) -> GridConfig {
        GridConfig {
            origin: Vec2::ZERO,
            size: Vec2::new(width, height),
            cell_radius: 0.5,
            safety_margin: false,
        }
    }

    #[test]
    fn cell_counts_round_to_nearest_per_axis() {
        let grid = PathGrid::build(&open_config(10.0, 7.4), |_| true);
        assert_eq!(grid.cells_x(), 10);
        assert_eq!(grid.cells_y(), 7);
        assert_eq!(grid.cell_count(), 70);
    }

    #[test]
    fn nearest_cell_recovers_cell_centers_and_clamps_outside_points() {
        let grid = PathGrid::build(&open_config(10.0, 10.0), |_| true);
        for id in [0, 37, 99] {
            let center = grid.cell(id).world_point;
            assert_eq!(grid.nearest_cell(center), id);
        }
        assert_eq!(grid.nearest_cell(Vec2::new(-50.0, -50.0)), grid.index_of(0, 0));
        assert_eq!(grid.nearest_cell(Vec2::new(999.0, 999.0)), grid.index_of(9, 9));
    }

    #[test]
    fn safety_margin_erodes_cells_bordering_the_unwalkable_region() {
        // Left half walkable, right half not.
        let config = GridConfig { safety_margin: true, ..open_config(10.0, 10.0) };
        let grid = PathGrid::build(&config, |point| point.x < 5.0);
        let boundary = grid.cell(grid.index_of(4, 5));
        assert!(boundary.out_of_bounds && !boundary.walkable);
        let interior = grid.cell(grid.index_of(3, 5));
        assert!(interior.walkable && !interior.out_of_bounds);
    }

    #[test]
    fn blocked_flag_moves_with_the_unit() {
        let mut grid = PathGrid::build(&open_config(10.0, 10.0), |_| true);
        let from = Vec2::new(2.5, 2.5);
        let to = Vec2::new(3.5, 2.5);
        grid.update_blocked(from, from);
        assert!(grid.cell(grid.nearest_cell(from)).blocked);

        grid.update_blocked(from, to);
        assert!(!grid.cell(grid.nearest_cell(from)).blocked);
        assert!(grid.cell(grid.nearest_cell(to)).blocked);
        assert_eq!(grid.movement_penalty(grid.nearest_cell(to)), BLOCKED_PENALTY);
    }

    #[test]
    fn corner_cells_have_three_neighbours() {
        let grid = PathGrid::build(&open_config(10.0, 10.0), |_| true);
        assert_eq!(grid.neighbours(grid.index_of(0, 0)).len(), 3);
        assert_eq!(grid.neighbours(grid.index_of(9, 9)).len(), 3);
        assert_eq!(grid.neighbours(grid.index_of(5, 0)).len(), 5);
        assert_eq!(grid.neighbours(grid.index_of(5, 5)).len(), 8);
    }
}
