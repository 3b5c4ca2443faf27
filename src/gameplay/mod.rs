pub mod cleanup;
pub mod factory;
pub mod placement;
pub mod scoring;

use bevy::prelude::*;

use crate::core::system::GameFlowSet;

pub use factory::{BallSpec, HoopAssembly, HoopPart, HoopTemplate, PartShape, SceneAssets};
pub use placement::{PlacementPlugin, PlacementState, RestartRequested, SurfaceTap};
pub use scoring::{ScoreChanged, Scoreboard, ScoringPlugin, ShotPhase};

/// Scoring, placement and the fallen-ball sweep.
pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ScoringPlugin, PlacementPlugin))
            .add_systems(Update, cleanup::sweep_fallen_balls.in_set(GameFlowSet::Cleanup));
        if app.world().contains_resource::<Assets<Mesh>>()
            && app.world().contains_resource::<Assets<StandardMaterial>>()
        {
            app.add_systems(Startup, factory::setup_scene_assets);
        }
    }
}
