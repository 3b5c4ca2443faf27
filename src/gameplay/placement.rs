//! Tap routing and the hoop-placed lifecycle.
//!
//! Before a hoop exists a tap is a placement attempt against detected walls; afterwards every
//! tap throws a ball. Flipping the placed flag always goes through
//! [`PlacementState::set_hoop_placed`], which reconfigures the AR session on the spot.
use bevy::prelude::*;

use super::factory::{spawn_ball, spawn_hoop, BallSpec, HoopAssembly, HoopTemplate, SceneAssets};
use super::scoring::{ScoreChanged, Scoreboard};
use crate::ar::{ArSession, PlaneDetection, RunOptions, TrackingConfiguration};
use crate::core::components::{ArCamera, SceneNode};
use crate::core::config::{GameConfig, SurfaceAlignment};

/// A tap on the view, already turned into a world-space ray from the camera.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTap {
    pub screen: Vec2,
    pub ray: Ray3d,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestartRequested;

#[derive(Resource, Debug, Default)]
pub struct PlacementState {
    hoop_placed: bool,
}

impl PlacementState {
    pub fn hoop_placed(&self) -> bool {
        self.hoop_placed
    }

    /// Placed: stop looking for planes. Not placed: look for floors and walls again.
    /// Either way the session is re-run and drops its anchors.
    pub fn set_hoop_placed(&mut self, placed: bool, session: &mut ArSession, light_estimation: bool) {
        self.hoop_placed = placed;
        let plane_detection = if placed {
            PlaneDetection::NONE
        } else {
            PlaneDetection::HORIZONTAL | PlaneDetection::VERTICAL
        };
        session.run(
            TrackingConfiguration {
                plane_detection,
                light_estimation,
            },
            RunOptions::REMOVE_EXISTING_ANCHORS,
        );
    }
}

fn light_estimation(cfg: &Option<Res<GameConfig>>) -> bool {
    cfg.as_ref().map(|c| c.session.light_estimation).unwrap_or(true)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_taps(
    mut commands: Commands,
    mut taps: EventReader<SurfaceTap>,
    mut state: ResMut<PlacementState>,
    mut session: ResMut<ArSession>,
    template: Res<HoopTemplate>,
    cfg: Option<Res<GameConfig>>,
    assets: Option<Res<SceneAssets>>,
    camera: Query<&Transform, With<ArCamera>>,
) {
    let ball_cfg = cfg.as_ref().map(|c| c.ball.clone()).unwrap_or_default();
    for tap in taps.read() {
        if state.hoop_placed() {
            let Some(frame) = session.current_frame(camera.single().ok()) else {
                debug!(target: "placement", "no camera frame; ball not thrown");
                continue;
            };
            let spec = BallSpec::from_camera(&frame.camera, &ball_cfg);
            let ball = spawn_ball(&mut commands, &spec, assets.as_deref());
            debug!(target: "placement", "ball {:?} thrown, impulse {:?}", ball, spec.impulse);
            continue;
        }
        let Some(hit) = session.hit_test(tap.ray).into_iter().next() else {
            debug!(target: "placement", "tap at {:?} hit no plane", tap.screen);
            continue;
        };
        if hit.alignment != SurfaceAlignment::Vertical {
            debug!(target: "placement", "tap hit a {:?} plane; hoops go on walls", hit.alignment);
            continue;
        }
        if let Some(plane) = session.anchor(hit.anchor) {
            debug!(target: "placement", "placing on anchor {:?} ({:?} m)", hit.anchor, plane.extent);
        }
        let assembly = HoopAssembly::build(&template, hit.world_transform);
        let hoop = spawn_hoop(&mut commands, &assembly, assets.as_deref());
        state.set_hoop_placed(true, &mut session, light_estimation(&cfg));
        info!(target: "placement", "hoop {:?} placed at {:?}", hoop, hit.point);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_restart(
    mut commands: Commands,
    mut requests: EventReader<RestartRequested>,
    mut state: ResMut<PlacementState>,
    mut session: ResMut<ArSession>,
    mut board: ResMut<Scoreboard>,
    mut changed: EventWriter<ScoreChanged>,
    cfg: Option<Res<GameConfig>>,
    nodes: Query<Entity, With<SceneNode>>,
) {
    if requests.read().count() == 0 {
        return;
    }
    state.set_hoop_placed(false, &mut session, light_estimation(&cfg));
    board.reset();
    changed.write(ScoreChanged { score: 0 });
    let mut removed = 0;
    for e in &nodes {
        commands.entity(e).despawn();
        removed += 1;
    }
    info!(target: "placement", "restart: removed {} scene nodes", removed);
}

pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<HoopTemplate>() {
            app.insert_resource(HoopTemplate::regulation());
        }
        app.init_resource::<PlacementState>()
            .add_event::<SurfaceTap>()
            .add_event::<RestartRequested>()
            .add_systems(
                Update,
                (handle_taps, handle_restart)
                    .chain()
                    .in_set(crate::core::system::GameFlowSet::Placement),
            );
    }
}
