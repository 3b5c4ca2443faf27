//! The AR session: tracking configuration, run/pause lifecycle, plane anchors and hit-testing.
//!
//! Anchor changes are queued inside the session and published as [`PlaneAnchorEvent`]s by
//! [`publish_anchor_events`], so a `run` issued from any system reaches the visuals one frame later.
use bevy::prelude::*;
use std::collections::BTreeMap;
use std::ops::BitOr;

use super::tracker::{SurfaceObservation, SurfaceTracker};
use crate::core::config::SurfaceAlignment;

/// Which plane alignments the tracker should look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaneDetection {
    pub horizontal: bool,
    pub vertical: bool,
}

impl PlaneDetection {
    pub const NONE: PlaneDetection = PlaneDetection { horizontal: false, vertical: false };
    pub const HORIZONTAL: PlaneDetection = PlaneDetection { horizontal: true, vertical: false };
    pub const VERTICAL: PlaneDetection = PlaneDetection { horizontal: false, vertical: true };
    pub const ALL: PlaneDetection = PlaneDetection { horizontal: true, vertical: true };

    pub fn detects(self, alignment: SurfaceAlignment) -> bool {
        match alignment {
            SurfaceAlignment::Horizontal => self.horizontal,
            SurfaceAlignment::Vertical => self.vertical,
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl BitOr for PlaneDetection {
    type Output = PlaneDetection;
    fn bitor(self, rhs: Self) -> Self::Output {
        PlaneDetection {
            horizontal: self.horizontal || rhs.horizontal,
            vertical: self.vertical || rhs.vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingConfiguration {
    pub plane_detection: PlaneDetection,
    pub light_estimation: bool,
}

impl Default for TrackingConfiguration {
    fn default() -> Self {
        Self {
            plane_detection: PlaneDetection::ALL,
            light_estimation: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub remove_existing_anchors: bool,
}

impl RunOptions {
    pub const KEEP_ANCHORS: RunOptions = RunOptions { remove_existing_anchors: false };
    pub const REMOVE_EXISTING_ANCHORS: RunOptions = RunOptions { remove_existing_anchors: true };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnchorId(pub u64);

/// A detected planar surface. Local +Z of [`PlaneAnchor::transform`] is the surface normal,
/// local X/Y span `extent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneAnchor {
    pub id: AnchorId,
    pub alignment: SurfaceAlignment,
    pub center: Vec3,
    pub normal: Vec3,
    pub extent: Vec2,
}

impl PlaneAnchor {
    pub fn transform(&self) -> Transform {
        plane_frame(self.center, self.normal)
    }

    /// World point where `ray` meets this plane inside its extent, with the ray distance.
    pub fn intersect(&self, ray: Ray3d) -> Option<(Vec3, f32)> {
        let n = self.normal;
        let denom = ray.direction.dot(n);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (self.center - ray.origin).dot(n) / denom;
        if t < 0.0 {
            return None;
        }
        let point = ray.get_point(t);
        let local = self.transform().rotation.inverse() * (point - self.center);
        let half = self.extent * 0.5;
        (local.x.abs() <= half.x && local.y.abs() <= half.y).then_some((point, t))
    }
}

/// Frame with origin `center` and local +Z along `normal`.
pub fn plane_frame(center: Vec3, normal: Vec3) -> Transform {
    let n = normal.normalize_or(Vec3::Z);
    let up = if n.dot(Vec3::Y).abs() > 0.99 { Vec3::NEG_Z } else { Vec3::Y };
    Transform::from_translation(center).looking_to(-n, up)
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PlaneAnchorEvent {
    Added(PlaneAnchor),
    Updated(PlaneAnchor),
    Removed(AnchorId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub anchor: AnchorId,
    pub alignment: SurfaceAlignment,
    pub point: Vec3,
    pub distance: f32,
    /// Anchor orientation at the hit point (local +Z = surface normal).
    pub world_transform: Transform,
}

/// Camera pose and lighting for the current tick; absent while the session is not running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArFrame {
    pub camera: Transform,
    pub light_estimate: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    NotStarted,
    Running,
    Paused,
}

#[derive(Resource)]
pub struct ArSession {
    tracker: Box<dyn SurfaceTracker>,
    configuration: TrackingConfiguration,
    state: SessionState,
    anchors: BTreeMap<AnchorId, PlaneAnchor>,
    by_key: BTreeMap<u32, AnchorId>,
    next_id: u64,
    pending: Vec<PlaneAnchorEvent>,
    light_estimate: Option<f32>,
    runs: u32,
}

impl ArSession {
    pub fn new(tracker: impl SurfaceTracker) -> Self {
        Self {
            tracker: Box::new(tracker),
            configuration: TrackingConfiguration::default(),
            state: SessionState::NotStarted,
            anchors: BTreeMap::new(),
            by_key: BTreeMap::new(),
            next_id: 1,
            pending: Vec::new(),
            light_estimate: None,
            runs: 0,
        }
    }

    pub fn run(&mut self, configuration: TrackingConfiguration, options: RunOptions) {
        self.configuration = configuration;
        if options.remove_existing_anchors {
            self.remove_all_anchors();
            self.tracker.reset();
        }
        if !configuration.light_estimation {
            self.light_estimate = None;
        }
        self.state = SessionState::Running;
        self.runs += 1;
        info!(
            target: "ar_session",
            "session run #{}: horizontal={} vertical={} light={} remove_anchors={}",
            self.runs,
            configuration.plane_detection.horizontal,
            configuration.plane_detection.vertical,
            configuration.light_estimation,
            options.remove_existing_anchors
        );
    }

    pub fn pause(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Paused;
            info!(target: "ar_session", "session paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state == SessionState::Paused {
            self.state = SessionState::Running;
            info!(target: "ar_session", "session resumed");
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn configuration(&self) -> TrackingConfiguration {
        self.configuration
    }

    /// Number of `run` calls so far.
    pub fn run_count(&self) -> u32 {
        self.runs
    }

    pub fn anchors(&self) -> impl Iterator<Item = &PlaneAnchor> {
        self.anchors.values()
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&PlaneAnchor> {
        self.anchors.get(&id)
    }

    pub fn light_estimate(&self) -> Option<f32> {
        self.light_estimate
    }

    /// Advance the tracker and fold its observations into anchors.
    pub fn poll(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }
        let observations = self.tracker.poll(dt, self.configuration.plane_detection);
        for obs in observations {
            self.observe(obs);
        }
        if self.configuration.light_estimation {
            self.light_estimate = self.tracker.light_estimate();
        }
    }

    fn observe(&mut self, obs: SurfaceObservation) {
        match self.by_key.get(&obs.key).copied() {
            Some(id) => {
                let Some(anchor) = self.anchors.get_mut(&id) else {
                    return;
                };
                if anchor.center == obs.center && anchor.extent == obs.extent && anchor.normal == obs.normal {
                    return;
                }
                anchor.center = obs.center;
                anchor.normal = obs.normal;
                anchor.extent = obs.extent;
                self.pending.push(PlaneAnchorEvent::Updated(*anchor));
            }
            None => {
                let id = AnchorId(self.next_id);
                self.next_id += 1;
                let anchor = PlaneAnchor {
                    id,
                    alignment: obs.alignment,
                    center: obs.center,
                    normal: obs.normal,
                    extent: obs.extent,
                };
                debug!(target: "ar_session", "anchor {:?} added ({:?})", id, obs.alignment);
                self.by_key.insert(obs.key, id);
                self.anchors.insert(id, anchor);
                self.pending.push(PlaneAnchorEvent::Added(anchor));
            }
        }
    }

    fn remove_all_anchors(&mut self) {
        let removed = self.anchors.len();
        for id in std::mem::take(&mut self.anchors).into_keys() {
            self.pending.push(PlaneAnchorEvent::Removed(id));
        }
        self.by_key.clear();
        if removed > 0 {
            debug!(target: "ar_session", "removed {} anchors", removed);
        }
    }

    pub fn drain_events(&mut self) -> Vec<PlaneAnchorEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Hits against existing planes, bounded by their extent, nearest first.
    pub fn hit_test(&self, ray: Ray3d) -> Vec<HitResult> {
        let mut hits: Vec<HitResult> = self
            .anchors
            .values()
            .filter_map(|a| {
                a.intersect(ray).map(|(point, distance)| HitResult {
                    anchor: a.id,
                    alignment: a.alignment,
                    point,
                    distance,
                    world_transform: plane_frame(point, a.normal),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    pub fn current_frame(&self, camera: Option<&Transform>) -> Option<ArFrame> {
        if !self.is_running() {
            return None;
        }
        camera.map(|c| ArFrame {
            camera: *c,
            light_estimate: self.light_estimate,
        })
    }
}

pub fn publish_anchor_events(
    time: Res<Time>,
    mut session: ResMut<ArSession>,
    mut out: EventWriter<PlaneAnchorEvent>,
) {
    session.poll(time.delta_secs());
    out.write_batch(session.drain_events());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ar::tracker::SimulatedTracker;
    use crate::core::config::SimulatedSurface;

    fn session() -> ArSession {
        let mut s = ArSession::new(SimulatedTracker::new(vec![SimulatedSurface::default()], 250.0));
        s.run(TrackingConfiguration::default(), RunOptions::KEEP_ANCHORS);
        s
    }

    fn toward_wall() -> Ray3d {
        Ray3d::new(Vec3::new(0.0, 1.8, 3.0), Dir3::NEG_Z)
    }

    #[test]
    fn anchors_are_added_then_updated() {
        let mut s = session();
        s.poll(1.0);
        let ev = s.drain_events();
        assert!(matches!(ev.as_slice(), [PlaneAnchorEvent::Added(_)]));
        s.poll(0.5);
        assert!(matches!(s.drain_events().as_slice(), [PlaneAnchorEvent::Updated(_)]));
        assert_eq!(s.light_estimate(), Some(250.0));
    }

    #[test]
    fn run_with_removal_clears_anchors() {
        let mut s = session();
        s.poll(1.0);
        s.drain_events();
        s.run(
            TrackingConfiguration { plane_detection: PlaneDetection::NONE, light_estimation: true },
            RunOptions::REMOVE_EXISTING_ANCHORS,
        );
        assert_eq!(s.anchors().count(), 0);
        assert!(matches!(s.drain_events().as_slice(), [PlaneAnchorEvent::Removed(_)]));
        s.poll(10.0);
        assert_eq!(s.anchors().count(), 0, "detection is off");
        assert_eq!(s.run_count(), 2);
    }

    #[test]
    fn hit_test_respects_extent() {
        let mut s = session();
        s.poll(10.0);
        let hits = s.hit_test(toward_wall());
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point - Vec3::new(0.0, 1.8, -2.0)).length() < 1e-4);
        assert!((hits[0].distance - 5.0).abs() < 1e-4);
        let plane = s.anchor(hits[0].anchor).copied();
        assert_eq!(plane.map(|p| p.alignment), Some(SurfaceAlignment::Vertical));
        assert_eq!(plane.map(|p| p.extent), Some(Vec2::new(3.0, 2.4)));
        let wide = Ray3d::new(Vec3::new(10.0, 1.8, 3.0), Dir3::NEG_Z);
        assert!(s.hit_test(wide).is_empty());
        let away = Ray3d::new(Vec3::new(0.0, 1.8, 3.0), Dir3::Z);
        assert!(s.hit_test(away).is_empty());
    }

    #[test]
    fn hit_transform_faces_out_of_the_wall() {
        let mut s = session();
        s.poll(10.0);
        let hit = s.hit_test(toward_wall())[0];
        let z = hit.world_transform.rotation * Vec3::Z;
        assert!((z - Vec3::Z).length() < 1e-4);
        let y = hit.world_transform.rotation * Vec3::Y;
        assert!((y - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn paused_session_has_no_frame() {
        let mut s = session();
        let cam = Transform::from_xyz(0.0, 1.5, 3.0);
        assert!(s.current_frame(Some(&cam)).is_some());
        assert!(s.current_frame(None).is_none());
        s.pause();
        assert!(s.current_frame(Some(&cam)).is_none());
        s.poll(10.0);
        assert_eq!(s.anchors().count(), 0, "paused sessions do not track");
        s.resume();
        assert!(s.current_frame(Some(&cam)).is_some());
    }

    #[test]
    fn detection_union() {
        assert_eq!(PlaneDetection::HORIZONTAL | PlaneDetection::VERTICAL, PlaneDetection::ALL);
        assert!(PlaneDetection::NONE.is_none());
    }
}
