pub mod backdrop;
pub mod camera;
pub mod hud;

use bevy::prelude::*;

pub use camera::CameraPlugin;
pub use hud::HudPlugin;

/// Camera, lights, backdrop and HUD.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((CameraPlugin, HudPlugin));
        if app.world().contains_resource::<Assets<Mesh>>()
            && app.world().contains_resource::<Assets<StandardMaterial>>()
        {
            app.add_systems(Startup, backdrop::spawn_backdrop);
        }
    }
}
