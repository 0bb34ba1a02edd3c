//! Post-processing of raw cell paths: waypoint simplification and the
//! turn-boundary lines movement code steers against.

use glam::Vec2;

/// Stand-in slope for vertical lines; large enough that the side predicate
/// behaves like a true vertical within grid-sized coordinates.
const VERTICAL_GRADIENT: f32 = 100_000.0;

/// Reduces a polyline to the points that matter within `tolerance`:
/// classic Douglas-Peucker, endpoints always kept. Running it twice with
/// the same tolerance returns the same points.
pub fn simplify(points: &[Vec2], tolerance: f32) -> Vec<Vec2> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    split_farthest(points, 0, points.len() - 1, tolerance, &mut keep);
    points
        .iter()
        .zip(&keep)
        .filter_map(|(&point, &kept)| kept.then_some(point))
        .collect()
}

fn split_farthest(points: &[Vec2], first: usize, last: usize, tolerance: f32, keep: &mut [bool]) {
    let mut farthest = first;
    let mut farthest_distance = 0.0;
    for index in first + 1..last {
        let distance = perpendicular_distance(points[index], points[first], points[last]);
        if distance > farthest_distance {
            farthest_distance = distance;
            farthest = index;
        }
    }
    if farthest_distance > tolerance {
        keep[farthest] = true;
        split_farthest(points, first, farthest, tolerance, keep);
        split_farthest(points, farthest, last, tolerance, keep);
    }
}

fn perpendicular_distance(point: Vec2, segment_start: Vec2, segment_end: Vec2) -> f32 {
    let segment = segment_end - segment_start;
    if segment == Vec2::ZERO {
        return point.distance(segment_start);
    }
    (segment.perp_dot(point - segment_start)).abs() / segment.length()
}

/// An infinite line perpendicular to the travel direction at a waypoint.
/// A unit has passed the waypoint once it sits on the far side of the line,
/// regardless of how wide its actual trajectory swung.
#[derive(Clone, Copy, Debug)]
pub struct TurnLine {
    gradient: f32,
    y_intercept: f32,
    point_on_line: Vec2,
    point_on_line_2: Vec2,
    approach_side: bool,
}

impl TurnLine {
    /// Line through `point_on_line`, perpendicular to the segment from
    /// `point_perpendicular` to it.
    pub fn new(point_on_line: Vec2, point_perpendicular: Vec2) -> Self {
        let dx = point_on_line.x - point_perpendicular.x;
        let dy = point_on_line.y - point_perpendicular.y;
        let gradient_perpendicular = if dx == 0.0 { VERTICAL_GRADIENT } else { dy / dx };
        let gradient =
            if gradient_perpendicular == 0.0 { VERTICAL_GRADIENT } else { -1.0 / gradient_perpendicular };
        let y_intercept = point_on_line.y - gradient * point_on_line.x;
        let point_on_line_2 = point_on_line + Vec2::new(1.0, gradient);
        let mut line =
            Self { gradient, y_intercept, point_on_line, point_on_line_2, approach_side: false };
        line.approach_side = line.side(point_perpendicular);
        line
    }

    fn side(&self, point: Vec2) -> bool {
        (point.x - self.point_on_line.x) * (self.point_on_line_2.y - self.point_on_line.y)
            > (point.y - self.point_on_line.y) * (self.point_on_line_2.x - self.point_on_line.x)
    }

    /// Whether `point` lies on the opposite side from the approach.
    pub fn has_crossed(&self, point: Vec2) -> bool {
        self.side(point) != self.approach_side
    }

    pub fn distance_from(&self, point: Vec2) -> f32 {
        (self.gradient * point.x - point.y + self.y_intercept).abs()
            / (self.gradient * self.gradient + 1.0).sqrt()
    }
}

/// A finished route: simplified waypoints (start position excluded) plus the
/// crossing line for each, and the indices movement code keys off.
#[derive(Clone, Debug)]
pub struct PathPlan {
    pub waypoints: Vec<Vec2>,
    pub turn_boundaries: Vec<TurnLine>,
    /// Index of the boundary through the final waypoint itself.
    pub finish_line_index: usize,
    /// First waypoint index within stopping distance of the end, walking the
    /// route backwards; 0 when the whole route fits inside it.
    pub slowdown_index: usize,
}

impl PathPlan {
    /// `turn_distance` pulls each boundary back along the incoming segment so
    /// units start turning before the corner; the final boundary sits on the
    /// waypoint itself.
    pub fn assemble(
        start: Vec2,
        waypoints: Vec<Vec2>,
        turn_distance: f32,
        stopping_distance: f32,
    ) -> Self {
        let finish_line_index = waypoints.len().saturating_sub(1);
        let mut turn_boundaries = Vec::with_capacity(waypoints.len());
        let mut previous = start;
        for (index, &waypoint) in waypoints.iter().enumerate() {
            let direction = (waypoint - previous).normalize_or_zero();
            let boundary_point = if index == finish_line_index {
                waypoint
            } else {
                waypoint - direction * turn_distance
            };
            turn_boundaries
                .push(TurnLine::new(boundary_point, previous - direction * turn_distance));
            previous = boundary_point;
        }

        let mut slowdown_index = 0;
        let mut walked = 0.0;
        for index in (1..waypoints.len()).rev() {
            walked += waypoints[index].distance(waypoints[index - 1]);
            if walked > stopping_distance {
                slowdown_index = index;
                break;
            }
        }

        Self { waypoints, turn_boundaries, finish_line_index, slowdown_index }
    }
}
