use std::process::ExitCode;
use std::time::Duration;

use engine::{MovementEvent, Overworld};
use tracing::{debug, error, info, warn};

use super::bootstrap::AppWiring;
use super::dispatch::ActionDispatcher;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        assets,
        mut overworld,
        content,
        taps,
        tick,
        max_sim_time,
    } = app;

    let mut dispatcher = ActionDispatcher::default();
    let mut clock = Duration::ZERO;
    let mut next_tap_at = taps.first().map(|tap| tap.delay);
    let mut taps = taps.into_iter().peekable();

    loop {
        while let (Some(due), Some(tap)) = (next_tap_at, taps.peek()) {
            if clock < due {
                break;
            }
            info!(
                at_ms = clock.as_millis() as u64,
                x = tap.pixel.x,
                y = tap.pixel.y,
                "scripted_tap"
            );
            let events = overworld.tap(tap.pixel, content);
            log_events(&events);
            taps.next();
            next_tap_at = taps.peek().map(|next| due + next.delay);
        }

        if next_tap_at.is_none() && !overworld.controller().is_moving() {
            break;
        }
        if clock >= max_sim_time {
            warn!(
                sim_ms = clock.as_millis() as u64,
                pending_taps = taps.len(),
                "simulation_time_exhausted"
            );
            break;
        }

        let events = overworld.update(tick, &mut dispatcher);
        log_events(&events);
        clock += tick;

        if let Some(travel) = dispatcher.take_travel() {
            match overworld.enter_map(&assets, &travel.map, travel.spawn) {
                Ok(stopped) => {
                    if let Some(event) = stopped {
                        log_events(&[event]);
                    }
                }
                Err(err) => {
                    error!(error = %err, to_map = %travel.map, "travel_failed");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    log_snapshot(&overworld, clock, dispatcher.dispatched());
    ExitCode::SUCCESS
}

fn log_events(events: &[MovementEvent]) {
    for event in events {
        match event {
            MovementEvent::StepStarted {
                ticket,
                tile,
                facing,
                ..
            } => debug!(
                ticket = ?ticket,
                tile_x = tile.x,
                tile_y = tile.y,
                facing = facing.as_token(),
                "step_started"
            ),
            MovementEvent::StepCompleted { tile, .. } => {
                debug!(tile_x = tile.x, tile_y = tile.y, "step_completed")
            }
            MovementEvent::Arrived { tile, trigger } => info!(
                tile_x = tile.x,
                tile_y = tile.y,
                location_id = trigger.as_ref().map(|t| t.location_id.as_str()),
                "avatar_arrived"
            ),
            MovementEvent::Settled { tile } => {
                info!(tile_x = tile.x, tile_y = tile.y, "avatar_settled")
            }
            MovementEvent::Stopped { position } => {
                info!(x = position.x, y = position.y, "avatar_stopped")
            }
        }
    }
}

fn log_snapshot(overworld: &Overworld, clock: Duration, arrivals: usize) {
    let snapshot = overworld.snapshot();
    info!(
        map_id = overworld.session().map_id(),
        sim_ms = clock.as_millis() as u64,
        x = snapshot.position.x,
        y = snapshot.position.y,
        tile_x = snapshot.tile.x,
        tile_y = snapshot.tile.y,
        facing = snapshot.facing.as_token(),
        moving = snapshot.moving,
        arrivals,
        "replay_finished"
    );
}
