//! Corridor model and carving heuristics for spanning-tree edges.
//! A corridor is a 1-cell-wide connector, straight or single-bend; routing is
//! heuristic, not shortest-path.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;
use serde::{Deserialize, Serialize};

use super::platform::Platform;
use crate::types::GridPos;

/// Axis-snapped relative direction from one platform toward another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

/// Snaps the delta between the two platforms' top-left corners to the
/// dominant axis. Under the y-downward convention and the center-sorted edge
/// order produced upstream, `Down` is rarely exercised; it is still handled
/// uniformly rather than special-cased.
pub fn classify_heading(from: &Platform, to: &Platform) -> Heading {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() >= dy.abs() {
        if dx >= 0 { Heading::Right } else { Heading::Left }
    } else if dy < 0 {
        Heading::Up
    } else {
        Heading::Down
    }
}

/// One carved connector between two platforms.
///
/// `Straight` walks `length` cells from `origin` along `direction`. `Bent`
/// walks `start_length` cells from `origin` along `start_direction` (the last
/// of those cells is the branch point), then `branch_length` further cells
/// along the perpendicular `branch_direction`. Both segment vectors are
/// axis-aligned unit steps. Zero lengths are legal and draw nothing;
/// adjacent platforms still count as connected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corridor {
    Straight {
        origin: GridPos,
        direction: GridPos,
        length: i32,
    },
    Bent {
        origin: GridPos,
        start_direction: GridPos,
        start_length: i32,
        branch_direction: GridPos,
        branch_length: i32,
    },
}

impl Corridor {
    /// The bend point of a bent corridor; straight corridors have none.
    pub fn branch(&self) -> Option<GridPos> {
        match *self {
            Corridor::Straight { .. } => None,
            Corridor::Bent { origin, start_direction, start_length, .. } => Some(GridPos::new(
                origin.x + start_direction.x * (start_length - 1).max(0),
                origin.y + start_direction.y * (start_length - 1).max(0),
            )),
        }
    }

    /// Every cell the corridor occupies, in walk order.
    pub fn cells(&self) -> Vec<GridPos> {
        match *self {
            Corridor::Straight { origin, direction, length } => (0..length)
                .map(|step| {
                    GridPos::new(origin.x + direction.x * step, origin.y + direction.y * step)
                })
                .collect(),
            Corridor::Bent {
                origin,
                start_direction,
                start_length,
                branch_direction,
                branch_length,
            } => {
                let mut cells: Vec<GridPos> = (0..start_length)
                    .map(|step| {
                        GridPos::new(
                            origin.x + start_direction.x * step,
                            origin.y + start_direction.y * step,
                        )
                    })
                    .collect();
                let branch = self.branch().unwrap_or(origin);
                cells.extend((1..=branch_length).map(|step| {
                    GridPos::new(
                        branch.x + branch_direction.x * step,
                        branch.y + branch_direction.y * step,
                    )
                }));
                cells
            }
        }
    }
}

/// Projected overlap of the two platforms on the axis perpendicular to the
/// heading; `Some` means a straight corridor fits.
pub fn perpendicular_overlap(from: &Platform, to: &Platform, heading: Heading) -> Option<(i32, i32)> {
    let (low, high) = match heading {
        Heading::Left | Heading::Right => {
            (from.top().max(to.top()), from.bottom().min(to.bottom()))
        }
        Heading::Up | Heading::Down => (from.left().max(to.left()), from.right().min(to.right())),
    };
    (low <= high).then_some((low, high))
}

/// Carves a corridor for one spanning-tree edge: a straight segment at a
/// uniformly random offset inside the perpendicular overlap when one exists,
/// otherwise an L-shaped bend leaving the source edge on its center row or
/// column and reaching the target edge on the target's center column or row.
pub fn carve(from: &Platform, to: &Platform, rng: &mut ChaCha8Rng) -> Corridor {
    let heading = classify_heading(from, to);
    match perpendicular_overlap(from, to, heading) {
        Some((low, high)) => {
            let offset = low + (rng.next_u64() % (high - low + 1) as u64) as i32;
            carve_straight(from, to, heading, offset)
        }
        None => carve_bent(from, to, heading),
    }
}

fn carve_straight(from: &Platform, to: &Platform, heading: Heading, offset: i32) -> Corridor {
    match heading {
        Heading::Right => Corridor::Straight {
            origin: GridPos::new(from.right() + 1, offset),
            direction: GridPos::new(1, 0),
            length: (to.left() - from.right() - 1).max(0),
        },
        Heading::Left => Corridor::Straight {
            origin: GridPos::new(from.left() - 1, offset),
            direction: GridPos::new(-1, 0),
            length: (from.left() - to.right() - 1).max(0),
        },
        Heading::Up => Corridor::Straight {
            origin: GridPos::new(offset, from.top() - 1),
            direction: GridPos::new(0, -1),
            length: (from.top() - to.bottom() - 1).max(0),
        },
        Heading::Down => Corridor::Straight {
            origin: GridPos::new(offset, from.bottom() + 1),
            direction: GridPos::new(0, 1),
            length: (to.top() - from.bottom() - 1).max(0),
        },
    }
}

fn carve_bent(from: &Platform, to: &Platform, heading: Heading) -> Corridor {
    let from_center = from.center();
    let to_center = to.center();
    // A bend on a given axis needs the target's center column (or row) to
    // clear the source's facing edge; a wide or tall source can swallow it,
    // which would plant the branch outside the target's span and leave the
    // corridor dangling. In that case route over the other axis: its spans
    // are disjoint whenever this function is reached, so the construction
    // there is always sound.
    let heading = match heading {
        Heading::Right if to_center.x <= from.right() => vertical_toward(from, to),
        Heading::Left if to_center.x >= from.left() => vertical_toward(from, to),
        Heading::Down if to_center.y <= from.bottom() => horizontal_toward(from, to),
        Heading::Up if to_center.y >= from.top() => horizontal_toward(from, to),
        other => other,
    };
    match heading {
        Heading::Right | Heading::Left => {
            // A zero sign (centers level in y, possible after a reroute)
            // degenerates the branch to length zero, with the bend already
            // inside the target's row span.
            let vertical_sign = (to_center.y - from_center.y).signum();
            let branch_length = if vertical_sign > 0 {
                to.top() - from_center.y - 1
            } else {
                from_center.y - to.bottom() - 1
            };
            let (origin_x, start_direction, start_length) = if heading == Heading::Right {
                (from.right() + 1, GridPos::new(1, 0), to_center.x - from.right())
            } else {
                (from.left() - 1, GridPos::new(-1, 0), from.left() - to_center.x)
            };
            Corridor::Bent {
                origin: GridPos::new(origin_x, from_center.y),
                start_direction,
                start_length: start_length.max(1),
                branch_direction: GridPos::new(0, vertical_sign),
                branch_length: branch_length.max(0),
            }
        }
        Heading::Up | Heading::Down => {
            let horizontal_sign = (to_center.x - from_center.x).signum();
            let branch_length = if horizontal_sign > 0 {
                to.left() - from_center.x - 1
            } else {
                from_center.x - to.right() - 1
            };
            let (origin_y, start_direction, start_length) = if heading == Heading::Up {
                (from.top() - 1, GridPos::new(0, -1), from.top() - to_center.y)
            } else {
                (from.bottom() + 1, GridPos::new(0, 1), to_center.y - from.bottom())
            };
            Corridor::Bent {
                origin: GridPos::new(from_center.x, origin_y),
                start_direction,
                start_length: start_length.max(1),
                branch_direction: GridPos::new(horizontal_sign, 0),
                branch_length: branch_length.max(0),
            }
        }
    }
}

/// The vertical spans are disjoint here, so the relation is strict.
fn vertical_toward(from: &Platform, to: &Platform) -> Heading {
    if to.top() > from.bottom() { Heading::Down } else { Heading::Up }
}

fn horizontal_toward(from: &Platform, to: &Platform) -> Heading {
    if to.left() > from.right() { Heading::Right } else { Heading::Left }
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn heading_snaps_to_the_dominant_axis() {
        let anchor = Platform::new(0, 10, 10, 4, 4);
        assert_eq!(classify_heading(&anchor, &Platform::new(1, 20, 12, 4, 4)), Heading::Right);
        assert_eq!(classify_heading(&anchor, &Platform::new(1, 2, 12, 4, 4)), Heading::Left);
        assert_eq!(classify_heading(&anchor, &Platform::new(1, 12, 1, 4, 4)), Heading::Up);
        assert_eq!(classify_heading(&anchor, &Platform::new(1, 12, 22, 4, 4)), Heading::Down);
    }

    #[test]
    fn overlapping_spans_carve_a_straight_corridor_inside_the_overlap() {
        let from = Platform::new(0, 0, 4, 4, 6);
        let to = Platform::new(1, 12, 6, 4, 6);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            match carve(&from, &to, &mut rng) {
                Corridor::Straight { origin, direction, length } => {
                    assert_eq!(direction, GridPos::new(1, 0));
                    assert_eq!(origin.x, from.right() + 1);
                    assert_eq!(length, to.left() - from.right() - 1);
                    assert!((6..=9).contains(&origin.y), "offset outside overlap: {origin:?}");
                }
                other => panic!("expected straight corridor, got {other:?}"),
            }
        }
    }

    #[test]
    fn disjoint_spans_carve_a_bent_corridor_meeting_both_edges() {
        let from = Platform::new(0, 0, 0, 4, 4);
        let to = Platform::new(1, 14, 12, 4, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let corridor = carve(&from, &to, &mut rng);
        let Corridor::Bent { origin, start_direction, branch_direction, .. } = corridor.clone()
        else {
            panic!("expected bent corridor, got {corridor:?}");
        };
        assert_eq!(origin, GridPos::new(from.right() + 1, from.center().y));
        assert_eq!(start_direction, GridPos::new(1, 0));
        assert_eq!(branch_direction, GridPos::new(0, 1));
        let branch = corridor.branch().expect("bent corridor has a branch point");
        assert_eq!(branch, GridPos::new(to.center().x, from.center().y));

        let cells = corridor.cells();
        assert_eq!(cells.first(), Some(&origin));
        assert_eq!(cells.last(), Some(&GridPos::new(to.center().x, to.top() - 1)));
        // Both segments are axis-aligned and meet at the branch.
        assert!(cells.iter().all(|cell| cell.y == origin.y || cell.x == branch.x));
    }

    /// Inside the rectangle or 8-adjacent to it.
    fn touches(platform: &Platform, cell: GridPos) -> bool {
        cell.x >= platform.left() - 1
            && cell.x <= platform.right() + 1
            && cell.y >= platform.top() - 1
            && cell.y <= platform.bottom() + 1
    }

    fn assert_connects(corridor: &Corridor, from: &Platform, to: &Platform) {
        let cells = corridor.cells();
        assert!(!cells.is_empty(), "corridor between {from:?} and {to:?} has no cells");
        assert!(touches(from, cells[0]), "corridor starts at {:?}, away from {from:?}", cells[0]);
        assert!(
            cells.iter().any(|&cell| touches(to, cell)),
            "corridor {cells:?} never reaches {to:?}"
        );
        for pair in cells.windows(2) {
            assert!(
                (pair[0].x - pair[1].x).abs() + (pair[0].y - pair[1].y).abs() == 1,
                "corridor cells {pair:?} are not contiguous"
            );
        }
    }

    #[test]
    fn wide_source_swallowing_the_target_center_column_reroutes_vertically() {
        // Heading snaps to Right, but the target's center column sits behind
        // the wide source's right edge; a horizontal bend would branch in a
        // column the target never occupies.
        let from = Platform::new(0, 0, 0, 10, 4);
        let to = Platform::new(1, 5, 5, 4, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let corridor = carve(&from, &to, &mut rng);
        assert_connects(&corridor, &from, &to);
        let Corridor::Bent { start_direction, .. } = &corridor else {
            panic!("expected bent corridor, got {corridor:?}");
        };
        assert_eq!(*start_direction, GridPos::new(0, 1), "bend should leave the bottom edge");
    }

    #[test]
    fn tall_source_swallowing_the_target_center_row_reroutes_horizontally() {
        let from = Platform::new(0, 0, 0, 4, 10);
        let to = Platform::new(1, 5, 6, 2, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let corridor = carve(&from, &to, &mut rng);
        assert_connects(&corridor, &from, &to);
        let Corridor::Bent { start_direction, .. } = &corridor else {
            panic!("expected bent corridor, got {corridor:?}");
        };
        assert_eq!(*start_direction, GridPos::new(1, 0), "bend should leave the right edge");
    }

    #[test]
    fn zero_length_corridors_occupy_no_cells() {
        let corridor = Corridor::Straight {
            origin: GridPos::new(5, 5),
            direction: GridPos::new(1, 0),
            length: 0,
        };
        assert!(corridor.cells().is_empty());
    }
}
