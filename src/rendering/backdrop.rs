//! Stand-in for the room the device would be looking at: one quad per simulated surface.
use bevy::prelude::*;

use crate::ar::session::plane_frame;
use crate::core::config::{GameConfig, SurfaceAlignment};

#[derive(Component)]
pub struct Backdrop;

pub fn spawn_backdrop(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let wall = materials.add(StandardMaterial {
        base_color: Color::srgb(0.72, 0.7, 0.66),
        perceptual_roughness: 0.9,
        ..default()
    });
    let floor = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.38, 0.3),
        perceptual_roughness: 0.8,
        ..default()
    });
    for s in &cfg.ar.surfaces {
        let size = Vec2::from(s.extent);
        let material = match s.alignment {
            SurfaceAlignment::Vertical => wall.clone(),
            SurfaceAlignment::Horizontal => floor.clone(),
        };
        commands.spawn((
            Name::new("backdrop"),
            Backdrop,
            Mesh3d(meshes.add(Rectangle::new(size.x, size.y))),
            MeshMaterial3d(material),
            plane_frame(Vec3::from(s.center), Vec3::from(s.normal)),
        ));
    }
}
