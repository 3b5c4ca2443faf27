use bevy::prelude::*;

use super::parse::parse_input_toml;
use super::systems::{system_collect_inputs, system_evaluate_bindings};
use super::types::InputMap;

pub const INPUT_CONFIG_PATH: &str = "assets/config/input.toml";

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct InputActionUpdateSet;

pub struct InputActionsPlugin;
impl Plugin for InputActionsPlugin { fn build(&self, app: &mut App) { app
        .init_resource::<InputMap>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<ButtonInput<MouseButton>>()
        .init_resource::<Touches>()
        .add_event::<bevy::input::mouse::MouseMotion>()
        .configure_sets(PreUpdate, InputActionUpdateSet.after(bevy::input::InputSystem))
        .add_systems(PreStartup, load_initial_input_map)
        .add_systems(PreUpdate, (system_collect_inputs, system_evaluate_bindings).chain().in_set(InputActionUpdateSet)); } }

pub fn input_config_path() -> String { std::env::var("INPUT_CONFIG_PATH").unwrap_or_else(|_| INPUT_CONFIG_PATH.into()) }

fn load_initial_input_map(mut commands: Commands) {
    #[cfg(target_arch = "wasm32")] let raw: String = include_str!("../../../assets/config/input.toml").to_string();
    #[cfg(not(target_arch = "wasm32"))] let raw: String = std::fs::read_to_string(input_config_path()).unwrap_or_else(|e| { warn!(target: "input_map", "{}: {e}; using built-in bindings", input_config_path()); include_str!("../../../assets/config/input.toml").to_string() });
    let parsed = parse_input_toml(&raw, cfg!(feature = "debug"));
    for e in &parsed.errors { error!(target: "input_map", "INPUT MAP ERROR: {e}"); }
    info!(target: "input_map", "Input map loaded: {} actions, {} bindings", parsed.input_map.actions.len(), parsed.input_map.bindings.len());
    commands.insert_resource(parsed.input_map); }
