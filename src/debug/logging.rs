use bevy::prelude::*;

use super::modes::{DebugState, DebugStats};
use crate::ar::ArSession;
use crate::core::components::Ball;
use crate::gameplay::placement::PlacementState;
use crate::gameplay::scoring::Scoreboard;

pub fn debug_stats_collect_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    mut stats: ResMut<DebugStats>,
    balls: Query<(), With<Ball>>,
    board: Option<Res<Scoreboard>>,
    placement: Option<Res<PlacementState>>,
    session: Option<Res<ArSession>>,
) {
    state.frame_counter += 1;
    let dt = time.delta_secs();
    stats.frame_time_ms = dt * 1000.0;
    stats.fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
    stats.balls = balls.iter().count();
    stats.score = board.map(|b| b.score()).unwrap_or(0);
    stats.hoop_placed = placement.map(|p| p.hoop_placed()).unwrap_or(false);
    stats.anchors = session.map(|s| s.anchors().count()).unwrap_or(0);
}

pub fn debug_logging_system(time: Res<Time>, mut state: ResMut<DebugState>, stats: Res<DebugStats>) {
    state.time_accum += time.delta_secs();
    if state.time_accum >= state.log_interval {
        state.time_accum = 0.0;
        info!("SIM frame={} t={:.3}s fps={:.1} ft_ms={:.1} balls={} score={} placed={} anchors={} mode={:?}",
            state.frame_counter,
            time.elapsed_secs(),
            stats.fps,
            stats.frame_time_ms,
            stats.balls,
            stats.score,
            stats.hoop_placed,
            stats.anchors,
            state.mode);
    }
}
