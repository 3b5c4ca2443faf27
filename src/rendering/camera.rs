use bevy::prelude::*;

use crate::core::components::ArCamera;
use crate::core::config::GameConfig;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 400.0,
            ..default()
        })
        .add_systems(Startup, setup_camera);
    }
}

/// Camera pose for the configured start position, facing the configured target.
pub fn camera_start_transform(cfg: &GameConfig) -> Transform {
    let start = Vec3::from(cfg.camera.start);
    let target = Vec3::from(cfg.camera.look_at);
    if (target - start).length_squared() < 1e-6 {
        return Transform::from_translation(start);
    }
    Transform::from_translation(start).looking_at(target, Vec3::Y)
}

fn setup_camera(mut commands: Commands, cfg: Res<GameConfig>) {
    commands.spawn((Name::new("ArCamera"), ArCamera, Camera3d::default(), camera_start_transform(&cfg)));
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 6_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(2.0, 6.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_faces_the_wall() {
        let t = camera_start_transform(&GameConfig::default());
        let forward = t.forward();
        assert!(forward.z < -0.9, "{forward:?}");
        assert_eq!(t.translation, Vec3::new(0.0, 1.5, 3.0));
    }
}
