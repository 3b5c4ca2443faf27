//! Turns input actions into game requests: screen taps become world rays, Restart becomes a
//! restart request.
use bevy::prelude::*;

use super::inputmap::types::{RESTART, SHOOT};
use super::inputmap::InputMap;
use crate::core::components::ArCamera;
use crate::gameplay::placement::{RestartRequested, SurfaceTap};

pub fn emit_surface_taps(
    input: Res<InputMap>,
    camera: Query<(&Camera, &GlobalTransform), With<ArCamera>>,
    buttons: Query<&Interaction, With<Button>>,
    mut taps: EventWriter<SurfaceTap>,
) {
    if !input.just_pressed(SHOOT) {
        return;
    }
    let Some(screen) = input.tap_position else { return };
    // A click on the control panel is not a tap on the scene.
    if buttons.iter().any(|i| *i != Interaction::None) {
        return;
    }
    let Ok((camera, camera_tf)) = camera.single() else {
        debug!(target: "placement", "tap without an AR camera");
        return;
    };
    match camera.viewport_to_world(camera_tf, screen) {
        Ok(ray) => {
            taps.write(SurfaceTap { screen, ray });
        }
        Err(e) => debug!(target: "placement", "tap at {:?} has no world ray: {e:?}", screen),
    }
}

pub fn emit_restart_requests(input: Res<InputMap>, mut restart: EventWriter<RestartRequested>) {
    if input.just_pressed(RESTART) {
        restart.write(RestartRequested);
    }
}
