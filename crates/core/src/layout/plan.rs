//! Serialized layout: the sentinel-character tile grid plus the platform and
//! corridor lists it was derived from. Rebuilt, never mutated, on
//! regeneration.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use super::corridor::Corridor;
use super::platform::Platform;
use crate::types::GridPos;

/// The four tile characters a serialized layout is written with. Every tile
/// of the grid is exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentinels {
    pub empty: char,
    pub platform: char,
    pub node: char,
    pub path: char,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self { empty: '-', platform: 'P', node: 'N', path: '*' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub platforms: Vec<Platform>,
    pub corridors: Vec<Corridor>,
    pub width: i32,
    pub height: i32,
    pub sentinels: Sentinels,
    /// Row-major tile grid; `rows.len() == height`, each row `width` chars.
    pub rows: Vec<String>,
}

impl LayoutPlan {
    pub fn new(
        platforms: Vec<Platform>,
        corridors: Vec<Corridor>,
        width: i32,
        height: i32,
        sentinels: Sentinels,
    ) -> Self {
        let mut grid = vec![vec![sentinels.empty; width as usize]; height as usize];

        for platform in &platforms {
            let tile = if platform.is_node() { sentinels.node } else { sentinels.platform };
            for y in platform.top()..=platform.bottom() {
                for x in platform.left()..=platform.right() {
                    grid[y as usize][x as usize] = tile;
                }
            }
        }

        // Corridors are drawn after platforms but only into still-empty
        // cells: their geometry runs through the gaps the placement step
        // reserved, and a segment grazing a third platform must not erase it.
        for corridor in &corridors {
            for cell in corridor.cells() {
                if cell.x < 0 || cell.y < 0 || cell.x >= width || cell.y >= height {
                    continue;
                }
                let tile = &mut grid[cell.y as usize][cell.x as usize];
                if *tile == sentinels.empty {
                    *tile = sentinels.path;
                }
            }
        }

        let rows = grid.into_iter().map(String::from_iter).collect();
        Self { platforms, corridors, width, height, sentinels, rows }
    }

    /// The degree-1 platforms functioning as dungeon entrance and exit.
    pub fn nodes(&self) -> Vec<&Platform> {
        self.platforms.iter().filter(|platform| platform.is_node()).collect()
    }

    /// Caller-checked generation postcondition; the core never retries seeds.
    pub fn is_underfilled(&self, min_platforms: usize) -> bool {
        self.platforms.len() < min_platforms
    }

    /// Tile at `pos`; out-of-bounds reads as empty.
    pub fn tile_at(&self, pos: GridPos) -> char {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return self.sentinels.empty;
        }
        self.rows[pos.y as usize]
            .chars()
            .nth(pos.x as usize)
            .unwrap_or(self.sentinels.empty)
    }

    /// Grid-to-pixel conversion: the world-space center of a tile.
    pub fn cell_to_world(&self, pos: GridPos, cell_size: f32) -> Vec2 {
        Vec2::new((pos.x as f32 + 0.5) * cell_size, (pos.y as f32 + 0.5) * cell_size)
    }

    pub fn world_size(&self, cell_size: f32) -> Vec2 {
        Vec2::new(self.width as f32 * cell_size, self.height as f32 * cell_size)
    }

    /// Walkability probe for [`crate::path::PathGrid::build`]: a world point
    /// is traversable when the tile under it is not empty.
    pub fn walkability_oracle(&self, cell_size: f32) -> impl Fn(Vec2) -> bool + '_ {
        move |point: Vec2| {
            let pos = GridPos::new(
                (point.x / cell_size).floor() as i32,
                (point.y / cell_size).floor() as i32,
            );
            self.tile_at(pos) != self.sentinels.empty
        }
    }

    /// Stable byte serialization for fingerprinting. Update the encoding only
    /// together with the fingerprint tests.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for row in &self.rows {
            bytes.extend(row.as_bytes());
        }
        bytes.extend((self.platforms.len() as u32).to_le_bytes());
        for platform in &self.platforms {
            bytes.extend(platform.x.to_le_bytes());
            bytes.extend(platform.y.to_le_bytes());
            bytes.extend(platform.width.to_le_bytes());
            bytes.extend(platform.height.to_le_bytes());
            bytes.extend(platform.connections.to_le_bytes());
        }
        bytes.extend((self.corridors.len() as u32).to_le_bytes());
        for corridor in &self.corridors {
            for cell in corridor.cells() {
                bytes.extend(cell.x.to_le_bytes());
                bytes.extend(cell.y.to_le_bytes());
            }
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
