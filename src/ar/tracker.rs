//! Source of surface observations feeding the session.
//!
//! A device build would put the platform plane detector behind [`SurfaceTracker`];
//! the desktop build ships [`SimulatedTracker`], which "discovers" the surfaces listed in
//! `GameConfig.ar.surfaces` after a short scan and grows them to full size.
use bevy::prelude::*;

use super::session::PlaneDetection;
use crate::core::config::{ArConfig, SimulatedSurface, SurfaceAlignment};

/// One sighting of a real-world surface. `key` is stable for the same surface until reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceObservation {
    pub key: u32,
    pub alignment: SurfaceAlignment,
    pub center: Vec3,
    pub normal: Vec3,
    pub extent: Vec2,
}

pub trait SurfaceTracker: Send + Sync + 'static {
    /// Advance tracking by `dt` seconds and report every surface currently seen
    /// whose alignment is enabled in `detection`.
    fn poll(&mut self, dt: f32, detection: PlaneDetection) -> Vec<SurfaceObservation>;
    /// Forget everything seen so far; surfaces must be rediscovered.
    fn reset(&mut self);
    /// Ambient intensity estimate, if the tracker has one.
    fn light_estimate(&self) -> Option<f32>;
}

#[derive(Debug, Clone)]
pub struct SimulatedTracker {
    surfaces: Vec<SimulatedSurface>,
    ambient_lux: f32,
    scanned: f32,
}

impl SimulatedTracker {
    pub fn new(surfaces: Vec<SimulatedSurface>, ambient_lux: f32) -> Self {
        Self {
            surfaces,
            ambient_lux,
            scanned: 0.0,
        }
    }

    pub fn from_config(cfg: &ArConfig) -> Self {
        Self::new(cfg.surfaces.clone(), cfg.ambient_lux)
    }

    fn observe(&self, key: u32, s: &SimulatedSurface) -> Option<SurfaceObservation> {
        if self.scanned < s.discover_after {
            return None;
        }
        let normal = Vec3::from(s.normal).normalize_or_zero();
        if normal == Vec3::ZERO {
            return None;
        }
        let grown = if s.grow_secs <= 0.0 {
            1.0
        } else {
            ((self.scanned - s.discover_after) / s.grow_secs).clamp(0.2, 1.0)
        };
        Some(SurfaceObservation {
            key,
            alignment: s.alignment,
            center: Vec3::from(s.center),
            normal,
            extent: Vec2::from(s.extent) * grown,
        })
    }
}

impl SurfaceTracker for SimulatedTracker {
    fn poll(&mut self, dt: f32, detection: PlaneDetection) -> Vec<SurfaceObservation> {
        self.scanned += dt.max(0.0);
        self.surfaces
            .iter()
            .enumerate()
            .filter(|(_, s)| detection.detects(s.alignment))
            .filter_map(|(i, s)| self.observe(i as u32, s))
            .collect()
    }

    fn reset(&mut self) {
        self.scanned = 0.0;
    }

    fn light_estimate(&self) -> Option<f32> {
        Some(self.ambient_lux)
    }
}
