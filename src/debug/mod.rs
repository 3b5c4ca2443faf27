//! Debug module: feature gated stats logging and the collider overlay toggle.
//! Built only when compiled with `--features debug`.

#[cfg(feature = "debug")]
pub mod keys; // pub for testing
#[cfg(feature = "debug")]
mod logging;
#[cfg(feature = "debug")]
mod modes;

#[cfg(feature = "debug")]
pub use modes::*;

#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
pub struct DebugPlugin;
#[cfg(feature = "debug")]
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        use crate::core::config::GameConfig;
        use crate::core::system::GameFlowSet;
        // Start in whatever mode the config asked Rapier's debug renderer for.
        let colliders = app
            .world()
            .get_resource::<GameConfig>()
            .is_some_and(|c| c.physics.debug_render);
        app.insert_resource(DebugState {
            mode: if colliders { DebugRenderMode::Colliders } else { DebugRenderMode::Scene },
            ..default()
        })
        .init_resource::<DebugStats>()
            .add_systems(
                Update,
                (
                    keys::debug_key_input_system,
                    keys::toggle_rapier_debug,
                    logging::debug_stats_collect_system,
                    logging::debug_logging_system,
                )
                    .chain()
                    .after(GameFlowSet::Hud),
            );
    }
}
