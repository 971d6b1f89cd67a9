use std::collections::VecDeque;
use std::time::Duration;

use tracing::debug;

use super::coords::{ContentSize, CoordinateMapper, TileCoord, Vec2};
use super::flags::Direction;
use super::locations::{ArrivalTrigger, LocationResolver};
use super::planner::{PathPlanner, PathStep};

/// Identifies one started per-tile animation. Completions carrying any other
/// ticket than the live one are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationTicket(u64);

/// Where the user tapped, and the tile the plan was aimed at (differs from
/// `tile` when the tapped tile was impassable).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapTarget {
    pub pixel: Vec2,
    pub tile: TileCoord,
    pub planned_goal: TileCoord,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementState {
    Idle,
    /// `target` is `None` while settling onto a tile after a redirect that
    /// produced no path.
    Moving { target: Option<TapTarget> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MovementEvent {
    StepStarted {
        ticket: AnimationTicket,
        from: Vec2,
        to: Vec2,
        tile: TileCoord,
        facing: Direction,
    },
    StepCompleted {
        ticket: AnimationTicket,
        tile: TileCoord,
    },
    Arrived {
        tile: TileCoord,
        trigger: Option<ArrivalTrigger>,
    },
    Settled {
        tile: TileCoord,
    },
    Stopped {
        position: Vec2,
    },
}

/// What a completed path is resolved against.
#[derive(Debug, Clone, Copy)]
pub struct ArrivalContext<'a> {
    pub locations: &'a LocationResolver,
    pub mapper: CoordinateMapper,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct StepAnimation {
    ticket: AnimationTicket,
    from: Vec2,
    to: Vec2,
    tile: TileCoord,
    elapsed: Duration,
}

/// Drives one entity along planned paths, one tile-step animation at a time.
#[derive(Debug, Clone)]
pub struct MovementController {
    position: Vec2,
    facing: Direction,
    content: ContentSize,
    /// Last usable content size; stored pixels are expressed against it.
    pixel_basis: Option<ContentSize>,
    step_duration: Duration,
    state: MovementState,
    queue: VecDeque<PathStep>,
    animation: Option<StepAnimation>,
    next_ticket: u64,
}

impl MovementController {
    pub fn new(position: Vec2, content: ContentSize, step_duration: Duration) -> Self {
        Self {
            position,
            facing: Direction::Down,
            content,
            pixel_basis: content.is_usable().then_some(content),
            step_duration,
            state: MovementState::Idle,
            queue: VecDeque::new(),
            animation: None,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, MovementState::Moving { .. })
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn content(&self) -> ContentSize {
        self.content
    }

    pub fn pending_step_count(&self) -> usize {
        self.queue.len()
    }

    pub fn current_ticket(&self) -> Option<AnimationTicket> {
        self.animation.map(|animation| animation.ticket)
    }

    /// Interpolated pixel position, including any in-flight step.
    pub fn position(&self) -> Vec2 {
        match &self.animation {
            Some(animation) => animation.from.lerp(animation.to, self.progress(animation)),
            None => self.position,
        }
    }

    /// Moves the entity without animating; any movement is dropped.
    pub fn place(&mut self, position: Vec2, facing: Direction) {
        self.cancel_in_flight();
        self.position = position;
        self.facing = facing;
        self.state = MovementState::Idle;
    }

    /// Rescales every stored pixel when the measured content size changes.
    pub fn set_content_size(&mut self, content: ContentSize) {
        if content == self.content {
            return;
        }
        self.content = content;
        if !content.is_usable() {
            return;
        }
        let Some(basis) = self.pixel_basis.replace(content) else {
            return;
        };
        if basis == content {
            return;
        }
        let sx = content.width / basis.width;
        let sy = content.height / basis.height;
        let rescale = |pixel: Vec2| Vec2::new(pixel.x * sx, pixel.y * sy);
        self.position = rescale(self.position);
        if let Some(animation) = self.animation.as_mut() {
            animation.from = rescale(animation.from);
            animation.to = rescale(animation.to);
        }
        for step in self.queue.iter_mut() {
            step.pixel = rescale(step.pixel);
        }
        if let MovementState::Moving {
            target: Some(target),
        } = &mut self.state
        {
            target.pixel = rescale(target.pixel);
        }
    }

    /// Handles a tap at `tap` (content pixels). A tap while moving cancels the
    /// in-flight step and replans from the interpolated position.
    pub fn tap(
        &mut self,
        planner: &PathPlanner<'_>,
        tap: Vec2,
        content: ContentSize,
        nearest_passable_max_radius: Option<u32>,
    ) -> Vec<MovementEvent> {
        if !tap.x.is_finite() || !tap.y.is_finite() {
            debug!(tap_x = tap.x, tap_y = tap.y, "non_finite_tap_ignored");
            return Vec::new();
        }
        let was_moving = self.is_moving();
        self.set_content_size(content);
        if was_moving {
            self.cancel_in_flight();
        }

        let mapper = planner.mapper();
        let origin_tile = mapper.footprint_tile(self.position, content);
        let tapped_tile = mapper.pixel_to_tile(tap, content);
        let planned = planner
            .nearest_passable(tapped_tile, nearest_passable_max_radius)
            .map(|goal| planner.plan_tiles(origin_tile, goal, content));

        let Some(path) = planned.filter(|path| !path.is_empty()) else {
            debug!(
                tap_x = tap.x,
                tap_y = tap.y,
                tile_x = tapped_tile.x,
                tile_y = tapped_tile.y,
                "tap_without_path"
            );
            self.state = MovementState::Idle;
            if was_moving {
                return self.settle(mapper, origin_tile).into_iter().collect();
            }
            return Vec::new();
        };

        if was_moving {
            debug!(
                from_x = self.position.x,
                from_y = self.position.y,
                goal_x = path.goal.x,
                goal_y = path.goal.y,
                steps = path.len(),
                "movement_redirected"
            );
        }

        self.state = MovementState::Moving {
            target: Some(TapTarget {
                pixel: tap,
                tile: tapped_tile,
                planned_goal: path.goal,
            }),
        };
        self.queue = path.steps.into();
        self.start_next_step().into_iter().collect()
    }

    /// Advances the built-in step animation by `dt`; time left over after a
    /// step completes carries into the next one.
    pub fn advance(&mut self, dt: Duration, context: ArrivalContext<'_>) -> Vec<MovementEvent> {
        let mut events = Vec::new();
        let mut remaining = dt;
        while let Some(animation) = self.animation.as_mut() {
            let left = self.step_duration.saturating_sub(animation.elapsed);
            if remaining < left {
                animation.elapsed += remaining;
                break;
            }
            remaining -= left;
            let ticket = animation.ticket;
            events.extend(self.complete_step(ticket, context));
        }
        events
    }

    /// Completion entry point for the step animation identified by `ticket`.
    /// Completions of cancelled animations are dropped.
    pub fn complete_step(
        &mut self,
        ticket: AnimationTicket,
        context: ArrivalContext<'_>,
    ) -> Vec<MovementEvent> {
        let animation = match self.animation {
            Some(animation) if animation.ticket == ticket => animation,
            _ => {
                debug!(ticket = ticket.0, "stale_step_completion_ignored");
                return Vec::new();
            }
        };
        self.animation = None;
        self.position = animation.to;

        let mut events = vec![MovementEvent::StepCompleted {
            ticket,
            tile: animation.tile,
        }];
        match self.start_next_step() {
            Some(started) => events.push(started),
            None => events.push(self.finish(animation.tile, context)),
        }
        events
    }

    /// Quiesces the entity where it currently is.
    pub fn stop(&mut self) -> Option<MovementEvent> {
        if !self.is_moving() && self.animation.is_none() {
            return None;
        }
        self.cancel_in_flight();
        self.state = MovementState::Idle;
        Some(MovementEvent::Stopped {
            position: self.position,
        })
    }

    fn progress(&self, animation: &StepAnimation) -> f32 {
        if self.step_duration.is_zero() {
            return 1.0;
        }
        animation.elapsed.as_secs_f32() / self.step_duration.as_secs_f32()
    }

    fn cancel_in_flight(&mut self) {
        self.position = self.position();
        self.animation = None;
        self.queue.clear();
    }

    fn start_next_step(&mut self) -> Option<MovementEvent> {
        let step = self.queue.pop_front()?;
        Some(self.start_animation(step.tile, step.pixel))
    }

    fn start_animation(&mut self, tile: TileCoord, to: Vec2) -> MovementEvent {
        let from = self.position;
        if let Some(facing) = Direction::facing_for(to.x - from.x, to.y - from.y) {
            self.facing = facing;
        }
        let ticket = AnimationTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.animation = Some(StepAnimation {
            ticket,
            from,
            to,
            tile,
            elapsed: Duration::ZERO,
        });
        MovementEvent::StepStarted {
            ticket,
            from,
            to,
            tile,
            facing: self.facing,
        }
    }

    fn settle(&mut self, mapper: &CoordinateMapper, tile: TileCoord) -> Option<MovementEvent> {
        let snapped = mapper.tile_to_pixel(tile, self.content);
        if snapped == self.position {
            return None;
        }
        self.state = MovementState::Moving { target: None };
        Some(self.start_animation(tile, snapped))
    }

    fn finish(&mut self, tile: TileCoord, context: ArrivalContext<'_>) -> MovementEvent {
        let state = std::mem::replace(&mut self.state, MovementState::Idle);
        let MovementState::Moving {
            target: Some(target),
        } = state
        else {
            return MovementEvent::Settled { tile };
        };

        let arrival_point = if tile == target.tile {
            target.pixel
        } else {
            context.mapper.tile_center(tile, self.content)
        };
        let trigger = context
            .locations
            .resolve(arrival_point, self.content)
            .map(|location| ArrivalTrigger::from_location(location, tile));
        MovementEvent::Arrived { tile, trigger }
    }
}
