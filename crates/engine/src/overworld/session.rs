use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::content::{ContentLoadError, MapDataSource, MapEntry};

use super::collision::CollisionIndex;
use super::config::OverworldConfig;
use super::coords::{ContentSize, CoordinateMapper, TileCoord, Vec2};
use super::flags::Direction;
use super::locations::{ArrivalHandler, LocationResolver};
use super::movement::{AnimationTicket, ArrivalContext, MovementController, MovementEvent};
use super::planner::PathPlanner;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot enter map '{map_id}': {source}")]
    UnknownMap {
        map_id: String,
        #[source]
        source: ContentLoadError,
    },
}

/// Everything scoped to the active map. Built fresh on map entry and dropped
/// on exit, never mutated in place.
#[derive(Debug, Clone)]
pub struct MapSession {
    entry: MapEntry,
    index: CollisionIndex,
    mapper: CoordinateMapper,
    locations: LocationResolver,
}

impl MapSession {
    pub fn enter(
        source: &dyn MapDataSource,
        map_id: &str,
        config: &OverworldConfig,
    ) -> Result<Self, SessionError> {
        let entry = source
            .map_entry(map_id)
            .map_err(|source| SessionError::UnknownMap {
                map_id: map_id.to_string(),
                source,
            })?;
        let index = CollisionIndex::initialize(source, map_id, config.missing_flag_policy);
        let mapper = match index.dimensions() {
            Some((width, height)) => CoordinateMapper::new(width, height, config.tile_size_px),
            None => CoordinateMapper::unscaled(config.tile_size_px),
        };
        let locations = LocationResolver::new(entry.locations.clone());
        Ok(Self {
            entry,
            index,
            mapper,
            locations,
        })
    }

    pub fn map_id(&self) -> &str {
        &self.entry.id
    }

    pub fn entry(&self) -> &MapEntry {
        &self.entry
    }

    pub fn index(&self) -> &CollisionIndex {
        &self.index
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn planner(&self, config: &OverworldConfig) -> PathPlanner<'_> {
        PathPlanner::new(&self.index, self.mapper, config.max_path_steps)
    }

    pub fn arrival_context(&self) -> ArrivalContext<'_> {
        ArrivalContext {
            locations: &self.locations,
            mapper: self.mapper,
        }
    }
}

/// Render-facing view of the avatar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarSnapshot {
    pub position: Vec2,
    pub facing: Direction,
    pub tile: TileCoord,
    pub moving: bool,
}

/// The active map session plus the avatar moving on it.
#[derive(Debug, Clone)]
pub struct Overworld {
    config: OverworldConfig,
    session: MapSession,
    controller: MovementController,
}

impl Overworld {
    pub fn new(
        source: &dyn MapDataSource,
        map_id: &str,
        content: ContentSize,
        config: OverworldConfig,
    ) -> Result<Self, SessionError> {
        let session = MapSession::enter(source, map_id, &config)?;
        let spawn = session.entry().spawn;
        let position = session.mapper().tile_to_pixel(spawn, content);
        let controller = MovementController::new(position, content, config.step_duration);
        info!(
            map_id,
            spawn_x = spawn.x,
            spawn_y = spawn.y,
            collision_ready = session.index().is_ready(),
            "overworld_started"
        );
        Ok(Self {
            config,
            session,
            controller,
        })
    }

    pub fn config(&self) -> &OverworldConfig {
        &self.config
    }

    pub fn session(&self) -> &MapSession {
        &self.session
    }

    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    /// Switches maps. The avatar is stopped before the old session is
    /// dropped; a map that cannot be entered leaves everything untouched.
    pub fn enter_map(
        &mut self,
        source: &dyn MapDataSource,
        map_id: &str,
        spawn: Option<TileCoord>,
    ) -> Result<Option<MovementEvent>, SessionError> {
        let session = MapSession::enter(source, map_id, &self.config)?;
        let stopped = self.controller.stop();
        let spawn = spawn.unwrap_or(session.entry().spawn);
        let content = self.controller.content();
        let position = session.mapper().tile_to_pixel(spawn, content);
        info!(
            from_map = self.session.map_id(),
            to_map = map_id,
            spawn_x = spawn.x,
            spawn_y = spawn.y,
            collision_ready = session.index().is_ready(),
            "map_switched"
        );
        self.session = session;
        self.controller.place(position, Direction::Down);
        Ok(stopped)
    }

    pub fn tap(&mut self, pixel: Vec2, content: ContentSize) -> Vec<MovementEvent> {
        let planner = self.session.planner(&self.config);
        self.controller.tap(
            &planner,
            pixel,
            content,
            self.config.nearest_passable_max_radius,
        )
    }

    pub fn update(&mut self, dt: Duration, handler: &mut dyn ArrivalHandler) -> Vec<MovementEvent> {
        let events = self
            .controller
            .advance(dt, self.session.arrival_context());
        dispatch_arrivals(&events, self.session.map_id(), handler);
        events
    }

    pub fn complete_step(
        &mut self,
        ticket: AnimationTicket,
        handler: &mut dyn ArrivalHandler,
    ) -> Vec<MovementEvent> {
        let events = self
            .controller
            .complete_step(ticket, self.session.arrival_context());
        dispatch_arrivals(&events, self.session.map_id(), handler);
        events
    }

    pub fn stop(&mut self) -> Option<MovementEvent> {
        self.controller.stop()
    }

    pub fn snapshot(&self) -> AvatarSnapshot {
        let position = self.controller.position();
        AvatarSnapshot {
            position,
            facing: self.controller.facing(),
            tile: self
                .session
                .mapper()
                .footprint_tile(position, self.controller.content()),
            moving: self.controller.is_moving(),
        }
    }
}

fn dispatch_arrivals(events: &[MovementEvent], map_id: &str, handler: &mut dyn ArrivalHandler) {
    for event in events {
        let MovementEvent::Arrived {
            trigger: Some(trigger),
            ..
        } = event
        else {
            continue;
        };
        info!(
            map_id,
            location_id = %trigger.location_id,
            action = trigger.action.as_token(),
            tile_x = trigger.tile.x,
            tile_y = trigger.tile.y,
            "arrival_trigger"
        );
        handler.on_arrival(trigger);
    }
}
