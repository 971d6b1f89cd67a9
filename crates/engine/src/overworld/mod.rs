mod collision;
mod config;
mod coords;
mod flags;
mod locations;
mod movement;
mod planner;
mod session;
mod tilemap;

pub use collision::CollisionIndex;
pub use config::{OverworldConfig, DEFAULT_MAX_PATH_STEPS, DEFAULT_STEP_DURATION};
pub use coords::{
    ContentSize, CoordinateMapper, NormalizedRect, PixelRect, TileCoord, Vec2,
    DEFAULT_TILE_SIZE_PX,
};
pub use flags::{Direction, MissingFlagPolicy, TileFlags, DIRECTION_MASK};
pub use locations::{
    ArrivalHandler, ArrivalTrigger, Location, LocationAction, LocationResolver, TravelDestination,
};
pub use movement::{
    AnimationTicket, ArrivalContext, MovementController, MovementEvent, MovementState, TapTarget,
};
pub use planner::{PathPlanner, PathStep, PlannedPath};
pub use session::{AvatarSnapshot, MapSession, Overworld, SessionError};
pub use tilemap::{TileMapStore, TilemapError};
