use bevy::prelude::*;

use super::session::{AnchorId, PlaneAnchor, PlaneAnchorEvent};
use crate::core::config::SurfaceAlignment;

/// Translucent quad shown over a detected vertical plane.
#[derive(Component, Debug)]
pub struct PlaneVisual {
    pub anchor: AnchorId,
}

#[derive(Resource, Clone)]
pub struct PlaneVisualAssets {
    pub quad: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

pub fn setup_plane_visual_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(PlaneVisualAssets {
        quad: meshes.add(Rectangle::new(1.0, 1.0)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgba(0.0, 0.0, 1.0, 0.25),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        }),
    });
}

fn visual_transform(anchor: &PlaneAnchor) -> Transform {
    // Nudged off the surface so the quad does not z-fight with the backdrop.
    let mut t = anchor.transform();
    t.translation += anchor.normal * 0.002;
    t.with_scale(Vec3::new(anchor.extent.x, anchor.extent.y, 1.0))
}

pub fn sync_plane_visuals(
    mut commands: Commands,
    mut events: EventReader<PlaneAnchorEvent>,
    assets: Option<Res<PlaneVisualAssets>>,
    mut visuals: Query<(Entity, &PlaneVisual, &mut Transform)>,
) {
    for ev in events.read() {
        match ev {
            PlaneAnchorEvent::Added(anchor) => {
                if anchor.alignment != SurfaceAlignment::Vertical {
                    continue;
                }
                let mut e = commands.spawn((
                    PlaneVisual { anchor: anchor.id },
                    visual_transform(anchor),
                    Visibility::default(),
                    Name::new("plane visual"),
                ));
                if let Some(a) = assets.as_ref() {
                    e.insert((Mesh3d(a.quad.clone()), MeshMaterial3d(a.material.clone())));
                }
            }
            PlaneAnchorEvent::Updated(anchor) => {
                for (_, v, mut t) in visuals.iter_mut() {
                    if v.anchor == anchor.id {
                        *t = visual_transform(anchor);
                    }
                }
            }
            PlaneAnchorEvent::Removed(id) => {
                for (e, v, _) in visuals.iter() {
                    if v.anchor == *id {
                        commands.entity(e).despawn();
                    }
                }
            }
        }
    }
}
