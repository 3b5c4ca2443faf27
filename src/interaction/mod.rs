pub mod camera_rig;
pub mod inputmap;
pub mod session;
pub mod taps;

use bevy::prelude::*;

use crate::core::system::GameFlowSet;

/// Input map, tap/restart routing and the desktop camera rig.
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(inputmap::InputActionsPlugin).add_systems(
            Update,
            (
                taps::emit_surface_taps,
                taps::emit_restart_requests,
                camera_rig::drive_camera_rig,
            )
                .in_set(GameFlowSet::Input),
        );
        #[cfg(feature = "debug")]
        app.add_plugins(inputmap::hot_reload::InputMapHotReloadPlugin);
    }
}
