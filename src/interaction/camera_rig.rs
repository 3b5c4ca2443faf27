//! Desktop stand-in for walking around with the phone: keyboard moves the AR camera,
//! holding Look turns it with the mouse.
use bevy::prelude::*;

use super::inputmap::types::{LOOK, MOVE_X, MOVE_Y, MOVE_Z};
use super::inputmap::InputMap;
use crate::core::components::ArCamera;
use crate::core::config::GameConfig;

const MAX_PITCH: f32 = 1.45;

pub fn drive_camera_rig(
    time: Res<Time>,
    input: Res<InputMap>,
    cfg: Option<Res<GameConfig>>,
    mut camera: Query<&mut Transform, With<ArCamera>>,
) {
    let Ok(mut t) = camera.single_mut() else { return };
    let (speed, sensitivity) = cfg
        .map(|c| (c.camera.move_speed, c.camera.look_sensitivity))
        .unwrap_or((1.5, 0.003));

    let (mut yaw, mut pitch, _) = t.rotation.to_euler(EulerRot::YXZ);
    if input.pressed(LOOK) && input.pointer_delta != Vec2::ZERO {
        yaw -= input.pointer_delta.x * sensitivity;
        pitch = (pitch - input.pointer_delta.y * sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        t.rotation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);
    }

    let heading = Quat::from_rotation_y(yaw);
    let wish = heading * Vec3::new(input.axis(MOVE_X), 0.0, -input.axis(MOVE_Z)) + Vec3::Y * input.axis(MOVE_Y);
    if wish != Vec3::ZERO {
        t.translation += wish.clamp_length_max(1.0) * speed * time.delta_secs();
    }
}
