pub mod types;
pub mod parse;
pub mod plugin;
pub mod systems;
#[cfg(feature = "debug")] pub mod hot_reload;

pub use plugin::{InputActionUpdateSet, InputActionsPlugin, INPUT_CONFIG_PATH};
pub use types::InputMap;
