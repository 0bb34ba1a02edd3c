//! Rectangular platform entity placed by the generator.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;
use serde::{Deserialize, Serialize};

use crate::types::GridPos;

/// A rectangular room in the generated layout. Geometry is immutable after
/// creation; only `connections` changes, incremented once per spanning-tree
/// edge touching the platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: usize,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub connections: u32,
}

impl Platform {
    pub fn new(id: usize, x: i32, y: i32, width: i32, height: i32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self { id, x, y, width, height, connections: 0 }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn center(&self) -> GridPos {
        GridPos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// AABB overlap test with a `padding` margin applied to both rectangles.
    /// Touching expanded edges counts as an intersection.
    pub fn intersects(&self, other: &Self, padding: i32) -> bool {
        self.left() - padding <= other.right() + padding
            && self.right() + padding >= other.left() - padding
            && self.top() - padding <= other.bottom() + padding
            && self.bottom() + padding >= other.top() - padding
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= self.left() && pos.x <= self.right() && pos.y >= self.top() && pos.y <= self.bottom()
    }

    /// A platform touched by exactly one corridor is a dungeon entrance or
    /// exit.
    pub fn is_node(&self) -> bool {
        self.connections == 1
    }

    /// Uniformly random cell inside the rectangle. Used by consumers placing
    /// content (spawn points, exits) on a platform.
    pub fn random_point_inside(&self, rng: &mut ChaCha8Rng) -> GridPos {
        let dx = (rng.next_u64() % self.width as u64) as i32;
        let dy = (rng.next_u64() % self.height as u64) as i32;
        GridPos::new(self.x + dx, self.y + dy)
    }
}
