use serde::{Deserialize, Serialize};

/// Integer tile coordinate in layout space. `y` grows downward, matching the
/// row-major grid the layout serializer emits.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Squared Euclidean distance, computed in i64 so it stays exact for any
    /// sane map size.
    pub fn squared_distance(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Index of a cell inside a `PathGrid` arena. Cells reference each other
/// (neighbours, parents) by index, never by owning pointer.
pub type CellIndex = u32;
