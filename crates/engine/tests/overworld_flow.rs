use std::path::PathBuf;
use std::time::Duration;

use engine::{
    ArrivalHandler, ArrivalTrigger, AssetDirectory, AssetPaths, ContentSize, Direction,
    LocationAction, MovementEvent, Overworld, OverworldConfig, TileCoord, Vec2,
};

const TICK: Duration = Duration::from_millis(16);

#[derive(Default)]
struct RecordingHandler {
    triggers: Vec<ArrivalTrigger>,
}

impl ArrivalHandler for RecordingHandler {
    fn on_arrival(&mut self, trigger: &ArrivalTrigger) {
        self.triggers.push(trigger.clone());
    }
}

fn bundled_assets() -> AssetDirectory {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");
    AssetDirectory::open(&AssetPaths::from_root(root)).expect("bundled assets")
}

fn town_content() -> ContentSize {
    ContentSize::new(480.0, 384.0)
}

fn tile_center(tile: TileCoord) -> Vec2 {
    Vec2::new(tile.x as f32 * 48.0 + 24.0, tile.y as f32 * 48.0 + 24.0)
}

fn run_until_idle(overworld: &mut Overworld, handler: &mut RecordingHandler) -> Vec<MovementEvent> {
    let mut events = Vec::new();
    for _ in 0..1000 {
        events.extend(overworld.update(TICK, handler));
        if !overworld.snapshot().moving {
            break;
        }
    }
    events
}

fn assert_adjacent_steps(events: &[MovementEvent]) {
    let tiles: Vec<TileCoord> = events
        .iter()
        .filter_map(|event| match event {
            MovementEvent::StepCompleted { tile, .. } => Some(*tile),
            _ => None,
        })
        .collect();
    for pair in tiles.windows(2) {
        assert_eq!(pair[0].manhattan_distance(pair[1]), 1, "{tiles:?}");
    }
}

#[test]
fn bundled_town_loads_ready() {
    let assets = bundled_assets();
    let overworld =
        Overworld::new(&assets, "town", town_content(), OverworldConfig::default()).expect("town");
    let index = overworld.session().index();
    assert!(index.is_ready());
    assert_eq!(index.dimensions(), Some((10, 8)));
    // wall, flower bed, tree, fence
    assert!(!index.is_passable(TileCoord::new(3, 0)));
    assert!(index.is_passable(TileCoord::new(1, 3)));
    assert!(!index.is_passable(TileCoord::new(7, 1)));
    assert!(!index.is_passable(TileCoord::new(0, 5)));
    assert_eq!(overworld.snapshot().tile, TileCoord::new(4, 4));
}

#[test]
fn tapping_a_building_walks_to_its_front_and_fires_once() {
    let assets = bundled_assets();
    let mut overworld =
        Overworld::new(&assets, "town", town_content(), OverworldConfig::default()).expect("town");
    let mut handler = RecordingHandler::default();

    let started = overworld.tap(tile_center(TileCoord::new(3, 0)), town_content());
    assert!(!started.is_empty());
    let events = run_until_idle(&mut overworld, &mut handler);
    assert_adjacent_steps(&events);

    assert_eq!(overworld.snapshot().tile, TileCoord::new(1, 0));
    assert_eq!(handler.triggers.len(), 1);
    assert_eq!(handler.triggers[0].location_id, "cafe");
    assert_eq!(
        handler.triggers[0].action,
        LocationAction::Expense {
            category: "food".to_string()
        }
    );
}

#[test]
fn travel_trigger_switches_maps() {
    let assets = bundled_assets();
    let mut overworld =
        Overworld::new(&assets, "town", town_content(), OverworldConfig::default()).expect("town");
    let mut handler = RecordingHandler::default();

    overworld.tap(tile_center(TileCoord::new(9, 7)), town_content());
    let events = run_until_idle(&mut overworld, &mut handler);
    assert_adjacent_steps(&events);
    assert_eq!(overworld.snapshot().tile, TileCoord::new(9, 7));

    let trigger = handler.triggers.last().expect("bus stop trigger");
    let LocationAction::Travel { destinations } = &trigger.action else {
        panic!("expected travel, got {:?}", trigger.action);
    };
    let destination = &destinations[0];
    overworld
        .enter_map(&assets, &destination.map, destination.spawn)
        .expect("enter home");

    assert_eq!(overworld.session().map_id(), "home");
    assert!(overworld.session().index().is_ready());
    let snapshot = overworld.snapshot();
    assert_eq!(snapshot.facing, Direction::Down);
    assert!(!snapshot.moving);
}

#[test]
fn redirect_mid_walk_never_teleports() {
    let assets = bundled_assets();
    let mut overworld =
        Overworld::new(&assets, "town", town_content(), OverworldConfig::default()).expect("town");
    let mut handler = RecordingHandler::default();

    overworld.tap(tile_center(TileCoord::new(9, 4)), town_content());
    overworld.update(Duration::from_millis(290), &mut handler);
    let before = overworld.snapshot().position;

    let events = overworld.tap(tile_center(TileCoord::new(4, 7)), town_content());
    match events.first() {
        Some(MovementEvent::StepStarted { from, .. }) => assert_eq!(*from, before),
        other => panic!("expected a new step, got {other:?}"),
    }
    assert_eq!(overworld.snapshot().position, before);

    let events = run_until_idle(&mut overworld, &mut handler);
    assert_adjacent_steps(&events);
    assert_eq!(overworld.snapshot().tile, TileCoord::new(4, 7));
    assert!(handler.triggers.is_empty());
}
