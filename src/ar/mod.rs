//! Stand-in for the device AR stack: session lifecycle, plane anchors, hit-testing and light
//! estimation, plus the translucent overlays drawn over detected walls.
pub mod plane_visuals;
pub mod session;
pub mod tracker;

use bevy::prelude::*;
use bevy::window::WindowFocused;

use crate::core::config::GameConfig;
use crate::core::system::GameFlowSet;

pub use plane_visuals::{PlaneVisual, PlaneVisualAssets};
pub use session::{
    AnchorId, ArFrame, ArSession, HitResult, PlaneAnchor, PlaneAnchorEvent, PlaneDetection,
    RunOptions, SessionState, TrackingConfiguration,
};
pub use tracker::{SimulatedTracker, SurfaceObservation, SurfaceTracker};

pub struct ArPlugin;

impl Plugin for ArPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<ArSession>() {
            let tracker = app
                .world()
                .get_resource::<GameConfig>()
                .map(|c| SimulatedTracker::from_config(&c.ar))
                .unwrap_or_else(|| SimulatedTracker::from_config(&Default::default()));
            app.insert_resource(ArSession::new(tracker));
        }
        app.add_event::<PlaneAnchorEvent>()
            .add_event::<WindowFocused>()
            .add_systems(Startup, start_session)
            .add_systems(
                Update,
                (
                    session::publish_anchor_events,
                    plane_visuals::sync_plane_visuals,
                    apply_light_estimate,
                    pause_on_focus_change,
                )
                    .chain()
                    .in_set(GameFlowSet::Session),
            );
        if app.world().contains_resource::<Assets<Mesh>>()
            && app.world().contains_resource::<Assets<StandardMaterial>>()
        {
            app.add_systems(Startup, plane_visuals::setup_plane_visual_assets);
        }
    }
}

fn start_session(mut session: ResMut<ArSession>, cfg: Option<Res<GameConfig>>) {
    let light_estimation = cfg.map(|c| c.session.light_estimation).unwrap_or(true);
    session.run(
        TrackingConfiguration {
            plane_detection: PlaneDetection::ALL,
            light_estimation,
        },
        RunOptions::KEEP_ANCHORS,
    );
}

fn apply_light_estimate(session: Res<ArSession>, ambient: Option<ResMut<AmbientLight>>) {
    let (Some(lux), Some(mut ambient)) = (session.light_estimate(), ambient) else {
        return;
    };
    if ambient.brightness != lux {
        ambient.brightness = lux;
    }
}

/// Losing window focus stands in for the view disappearing.
fn pause_on_focus_change(mut focus: EventReader<WindowFocused>, mut session: ResMut<ArSession>) {
    for ev in focus.read() {
        if ev.focused {
            session.resume();
        } else {
            session.pause();
        }
    }
}
