use tracing::debug;

use super::collision::CollisionIndex;
use super::coords::{ContentSize, CoordinateMapper, TileCoord, Vec2};
use super::flags::Direction;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStep {
    pub tile: TileCoord,
    pub pixel: Vec2,
}

/// Result of a greedy plan. `steps` exclude the start tile; a plan that stalls
/// before the goal is still returned, with `reached_goal == false`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPath {
    pub start: TileCoord,
    pub goal: TileCoord,
    pub steps: Vec<PathStep>,
    pub reached_goal: bool,
}

impl PlannedPath {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Tile the walker ends on.
    pub fn end_tile(&self) -> TileCoord {
        self.steps.last().map_or(self.start, |step| step.tile)
    }
}

pub struct PathPlanner<'a> {
    index: &'a CollisionIndex,
    mapper: CoordinateMapper,
    max_steps: usize,
}

impl<'a> PathPlanner<'a> {
    pub fn new(index: &'a CollisionIndex, mapper: CoordinateMapper, max_steps: usize) -> Self {
        Self {
            index,
            mapper,
            max_steps,
        }
    }

    pub fn index(&self) -> &CollisionIndex {
        self.index
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn calculate_path(&self, from: Vec2, to: Vec2, content: ContentSize) -> PlannedPath {
        let start = self.mapper.pixel_to_tile(from, content);
        let goal = self.mapper.pixel_to_tile(to, content);
        self.plan_tiles(start, goal, content)
    }

    pub fn plan_tiles(&self, start: TileCoord, goal: TileCoord, content: ContentSize) -> PlannedPath {
        if start == goal {
            return PlannedPath {
                start,
                goal,
                steps: Vec::new(),
                reached_goal: true,
            };
        }

        if !self.index.is_ready() {
            return PlannedPath {
                start,
                goal,
                steps: vec![self.step(goal, content)],
                reached_goal: true,
            };
        }

        let mut steps = Vec::new();
        let mut current = start;
        while current != goal && steps.len() < self.max_steps {
            let Some(next) = self.next_greedy_tile(current, goal) else {
                break;
            };
            steps.push(self.step(next, content));
            current = next;
        }

        let reached_goal = current == goal;
        debug!(
            map_id = self.index.map_id(),
            start_x = start.x,
            start_y = start.y,
            goal_x = goal.x,
            goal_y = goal.y,
            steps = steps.len(),
            partial = !reached_goal,
            "path_planned"
        );
        PlannedPath {
            start,
            goal,
            steps,
            reached_goal,
        }
    }

    /// `tile` itself when passable, otherwise the in-bounds passable tile
    /// with the smallest squared distance to it, ties broken by lowest row
    /// then lowest column. `max_radius` caps the Chebyshev distance searched.
    pub fn nearest_passable(&self, tile: TileCoord, max_radius: Option<u32>) -> Option<TileCoord> {
        if self.index.is_passable(tile) {
            return Some(tile);
        }
        let (width, height) = self.index.dimensions()?;
        if width == 0 || height == 0 {
            return None;
        }
        let (width, height) = (i64::from(width), i64::from(height));
        let (cx, cy) = (i64::from(tile.x), i64::from(tile.y));

        // Rings closer than this lie entirely off the map.
        let outside = [-cx, cx - (width - 1), -cy, cy - (height - 1)]
            .into_iter()
            .fold(0, i64::max);
        let mut limit = outside + width.max(height);
        if let Some(max_radius) = max_radius {
            limit = limit.min(i64::from(max_radius));
        }

        let mut best: Option<(i64, i32, i32)> = None;
        let mut radius = outside.max(1);
        while radius <= limit {
            // Every tile on this ring is at least `radius` away on one axis.
            if best.is_some_and(|(distance, _, _)| radius.saturating_mul(radius) > distance) {
                break;
            }
            for candidate in ring_on_grid(cx, cy, radius, width, height) {
                if !self.index.is_passable(candidate) {
                    continue;
                }
                let dx = i64::from(candidate.x) - cx;
                let dy = i64::from(candidate.y) - cy;
                let key = (
                    dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy)),
                    candidate.y,
                    candidate.x,
                );
                if best.map_or(true, |current| key < current) {
                    best = Some(key);
                }
            }
            radius += 1;
        }
        best.map(|(_, y, x)| TileCoord::new(x, y))
    }

    fn next_greedy_tile(&self, current: TileCoord, goal: TileCoord) -> Option<TileCoord> {
        candidate_directions(current, goal)
            .into_iter()
            .flatten()
            .find_map(|direction| {
                let (dx, dy) = direction.delta();
                let next = current.offset(dx, dy);
                let accepted = self.index.is_passable(next)
                    && !self.index.is_direction_blocked(current, direction);
                accepted.then_some(next)
            })
    }

    fn step(&self, tile: TileCoord, content: ContentSize) -> PathStep {
        PathStep {
            tile,
            pixel: self.mapper.tile_to_pixel(tile, content),
        }
    }
}

/// Moves that shrink the remaining delta, larger axis first; horizontal first
/// when both axes are equal.
fn candidate_directions(current: TileCoord, goal: TileCoord) -> [Option<Direction>; 2] {
    let dx = goal.x.saturating_sub(current.x);
    let dy = goal.y.saturating_sub(current.y);
    let horizontal = Direction::from_delta(dx.signum(), 0);
    let vertical = Direction::from_delta(0, dy.signum());
    if dx.unsigned_abs() >= dy.unsigned_abs() {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    }
}

/// Tiles of the square ring at Chebyshev distance `radius` from `(cx, cy)`
/// that fall inside a `width` x `height` grid.
fn ring_on_grid(
    cx: i64,
    cy: i64,
    radius: i64,
    width: i64,
    height: i64,
) -> impl Iterator<Item = TileCoord> {
    let rows = (cy - radius).max(0)..=(cy + radius).min(height - 1);
    rows.flat_map(move |y| {
        let edge_row = (y - cy).abs() == radius;
        // Inner rows only touch the ring at its left and right columns.
        let (columns, stride) = if edge_row {
            ((cx - radius).max(0)..=(cx + radius).min(width - 1), 1)
        } else {
            ((cx - radius)..=(cx + radius), 2 * radius)
        };
        columns
            .step_by(stride as usize)
            .filter(move |x| (0..width).contains(x))
            .map(move |x| TileCoord::new(x as i32, y as i32))
    })
}
