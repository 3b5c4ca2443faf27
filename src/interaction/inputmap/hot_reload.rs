use bevy::prelude::*;
use std::{path::PathBuf, time::SystemTime};

use super::parse::parse_input_toml;
use super::plugin::input_config_path;
use super::types::InputMap;

#[derive(Resource, Debug)]
struct InputReloadState { last_modified: Option<SystemTime>, timer: Timer, path: PathBuf }
impl FromWorld for InputReloadState { fn from_world(_: &mut World) -> Self { Self { last_modified: None, timer: Timer::from_seconds(0.5, TimerMode::Repeating), path: PathBuf::from(input_config_path()) } } }

/// Re-reads the input map when the file changes. A map with errors is rejected whole.
pub struct InputMapHotReloadPlugin;
impl Plugin for InputMapHotReloadPlugin { fn build(&self, app: &mut App) { #[cfg(not(target_arch = "wasm32"))] app.init_resource::<InputReloadState>().add_systems(Update, poll_input_map_reload); } }

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn poll_input_map_reload(time: Res<Time>, mut state: ResMut<InputReloadState>, mut input_map: ResMut<InputMap>) {
    if !state.timer.tick(time.delta()).finished() { return; }
    let Ok(mod_time) = std::fs::metadata(&state.path).and_then(|m| m.modified()) else { return; };
    let first = state.last_modified.is_none();
    if state.last_modified.is_some_and(|prev| mod_time <= prev) { return; }
    state.last_modified = Some(mod_time);
    if first { return; } // startup load already applied this version
    let Ok(raw) = std::fs::read_to_string(&state.path) else { return; };
    let parsed = parse_input_toml(&raw, true);
    if !parsed.errors.is_empty() { for e in parsed.errors { warn!(target: "input_map", "INPUT HOT-RELOAD parse error: {e}"); } return; }
    *input_map = parsed.input_map;
    info!(target: "input_map", "Input map hot-reloaded");
}
