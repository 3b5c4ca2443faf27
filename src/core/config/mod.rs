pub mod config;

pub use config::{
    ArConfig, BallConfig, CameraConfig, CleanupConfig, GameConfig, HudConfig, PhysicsConfig,
    ScoreTracking, ScoringConfig, SessionConfig, SimulatedSurface, SurfaceAlignment, WindowConfig,
};
