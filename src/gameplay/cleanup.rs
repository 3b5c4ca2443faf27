use bevy::prelude::*;

use super::scoring::Scoreboard;
use crate::core::components::Ball;
use crate::core::config::GameConfig;

const DEFAULT_FLOOR_Y: f32 = -10.0;

/// Despawn every ball that has dropped below the floor height.
pub fn sweep_fallen_balls(
    mut commands: Commands,
    cfg: Option<Res<GameConfig>>,
    mut board: Option<ResMut<Scoreboard>>,
    balls: Query<(Entity, &Transform), With<Ball>>,
) {
    let floor_y = cfg.map(|c| c.cleanup.floor_y).unwrap_or(DEFAULT_FLOOR_Y);
    for (e, t) in &balls {
        if t.translation.y < floor_y {
            commands.entity(e).despawn();
            if let Some(board) = board.as_mut() {
                board.forget(e);
            }
            debug!(target: "cleanup", "ball {:?} fell to {:.2}", e, t.translation.y);
        }
    }
}
