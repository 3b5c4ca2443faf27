pub mod app;
pub mod ar;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::{ConfigReport, GamePlugin};
pub use core::components::{ArCamera, Ball, Hoop, SceneNode};
pub use core::config::{GameConfig, WindowConfig};
pub use gameplay::{HoopTemplate, PlacementState, Scoreboard};
pub use physics::{BodyCategory, BodyMasks};
