use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::HashMap;

pub const SHOOT: &str = "Shoot";
pub const RESTART: &str = "Restart";
pub const LOOK: &str = "Look";
pub const MOVE_X: &str = "MoveX";
pub const MOVE_Y: &str = "MoveY";
pub const MOVE_Z: &str = "MoveZ";

/// Binary actions follow their bindings; Gesture actions fire once per recognised tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind { Binary, Gesture }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub u16); // internal index (array position)

#[derive(Debug, Clone)]
pub struct ActionMeta { pub id: ActionId, pub name: String, pub description: String, pub kind: ActionKind }

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionState { pub pressed: bool, pub just_pressed: bool, pub just_released: bool }
impl ActionState { pub fn clear_transitions(&mut self) { self.just_pressed = false; self.just_released = false; } }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawBindingToken { Key(KeyCode), MouseBtn(MouseButton), TouchTap }

#[derive(Debug, Clone)]
pub struct Binding { pub id: u32, pub tokens: SmallVec<[RawBindingToken; 2]>, pub hold_secs: f32 }

#[derive(Debug, Default, Clone)]
pub struct BindingRuntime { pub active: bool, pub just_pressed: bool, pub just_released: bool, pub hold_elapsed: f32 }

/// Keyboard axis: `pos` held gives +scale, `neg` held gives -scale.
#[derive(Debug, Clone)]
pub struct VirtualAxis { pub name: String, pub pos: RawBindingToken, pub neg: RawBindingToken, pub scale: f32 }

#[derive(Debug, Clone)]
pub struct GestureConfig { pub tap_max_time: f32, pub tap_max_move: f32 }
impl Default for GestureConfig { fn default() -> Self { Self { tap_max_time: 0.35, tap_max_move: 12.0 } } }

#[derive(Debug, Default, Clone)]
pub struct GestureRuntime { pub pointer_down: bool, pub pointer_start: Vec2, pub pointer_last: Vec2, pub time_down: f32, pub max_moved: f32 }

#[derive(Resource, Debug, Default)]
pub struct InputMap {
    pub actions: Vec<ActionMeta>,
    pub name_to_id: HashMap<String, ActionId>,
    pub bindings_index: HashMap<ActionId, Vec<u32>>, // mapping to binding ids
    pub bindings: Vec<Binding>,
    pub bindings_runtime: Vec<BindingRuntime>,
    pub chord_map: HashMap<SmallVec<[RawBindingToken; 2]>, u32>,
    pub states: Vec<ActionState>,
    pub virtual_axes: Vec<VirtualAxis>,
    pub virtual_axis_values: Vec<f32>,
    pub gesture_cfg: GestureConfig,
    pub gesture_rt: GestureRuntime,
    /// Window position of the last recognised tap (top-left origin, logical pixels).
    pub tap_position: Option<Vec2>,
    /// Accumulated mouse motion this frame.
    pub pointer_delta: Vec2,
    pub frame_counter: u64,
}

impl InputMap {
    pub fn state(&self, name: &str) -> Option<&ActionState> { self.name_to_id.get(name).and_then(|id| self.states.get(id.0 as usize)) }
    pub fn state_mut(&mut self, name: &str) -> Option<&mut ActionState> { let id = self.name_to_id.get(name)?; self.states.get_mut(id.0 as usize) }
    pub fn pressed(&self, name: &str) -> bool { self.state(name).is_some_and(|s| s.pressed) }
    pub fn just_pressed(&self, name: &str) -> bool { self.state(name).is_some_and(|s| s.just_pressed) }
    pub fn just_released(&self, name: &str) -> bool { self.state(name).is_some_and(|s| s.just_released) }
    pub fn axis(&self, name: &str) -> f32 { self.virtual_axes.iter().position(|a| a.name == name).and_then(|i| self.virtual_axis_values.get(i)).copied().unwrap_or(0.0) }
    pub fn kind(&self, name: &str) -> Option<ActionKind> { self.name_to_id.get(name).and_then(|id| self.actions.get(id.0 as usize)).map(|m| m.kind) }
}
