use super::modes::{DebugRenderMode, DebugState};
use crate::interaction::inputmap::types::InputMap;
use bevy::prelude::*;
use bevy_rapier3d::render::DebugRenderContext;

pub const TOGGLE_COLLIDERS: &str = "ToggleColliders";

pub fn debug_key_input_system(input_map: Option<Res<InputMap>>, mut state: ResMut<DebugState>) {
    let Some(input_map) = input_map else {
        return;
    };
    if input_map.just_pressed(TOGGLE_COLLIDERS) {
        let next = match state.mode {
            DebugRenderMode::Scene => DebugRenderMode::Colliders,
            DebugRenderMode::Colliders => DebugRenderMode::Scene,
        };
        info!("MODE_CHANGE from={:?} to={:?} frame={}", state.mode, next, state.frame_counter);
        state.mode = next;
    }
}

pub fn toggle_rapier_debug(state: Res<DebugState>, ctx: Option<ResMut<DebugRenderContext>>) {
    let Some(mut c) = ctx else { return };
    if !state.is_changed() {
        return;
    }
    let enable = state.mode == DebugRenderMode::Colliders;
    if c.enabled != enable {
        c.enabled = enable;
    }
}
