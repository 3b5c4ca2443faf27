use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::config::GameConfig;

pub struct PhysicsSetupPlugin; // our wrapper to configure Rapier for the court

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .add_systems(Startup, configure_gravity);
        let debug_render = app
            .world()
            .get_resource::<GameConfig>()
            .map(|c| c.physics.debug_render)
            .unwrap_or(false);
        // The debug build always carries the collider overlay so F1 can toggle it.
        if debug_render || cfg!(feature = "debug") {
            app.add_plugins(RapierDebugRenderPlugin {
                enabled: debug_render,
                ..default()
            });
        }
    }
}

// RapierConfiguration lives on the context entity, so it is queried rather than taken as a resource.
fn configure_gravity(mut q_cfg: Query<&mut RapierConfiguration>, game_cfg: Res<GameConfig>) {
    if let Ok(mut cfg) = q_cfg.single_mut() {
        cfg.gravity = Vect::new(0.0, game_cfg.physics.gravity_y, 0.0);
    }
}
