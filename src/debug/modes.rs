use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugRenderMode {
    Scene,
    Colliders,
}

#[derive(Resource, Debug)]
pub struct DebugState {
    pub mode: DebugRenderMode,
    pub log_interval: f32,
    pub time_accum: f32,
    pub frame_counter: u64,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            mode: DebugRenderMode::Scene,
            log_interval: 1.0,
            time_accum: 0.0,
            frame_counter: 0,
        }
    }
}

#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct DebugStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub balls: usize,
    pub score: u32,
    pub hoop_placed: bool,
    pub anchors: usize,
}
