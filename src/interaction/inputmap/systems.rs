//! Systems for input action evaluation.
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::types::*;

/// Step the tap recogniser. Returns the tap position when a press ends as a tap.
pub fn advance_gesture(rt: &mut GestureRuntime, cfg: &GestureConfig, pointer: Option<Vec2>, down: bool, dt: f32) -> Option<Vec2> {
    match (rt.pointer_down, down, pointer) {
        (false, true, Some(p)) => { *rt = GestureRuntime { pointer_down: true, pointer_start: p, pointer_last: p, time_down: 0.0, max_moved: 0.0 }; None }
        (true, true, p) => { rt.time_down += dt; if let Some(p) = p { rt.pointer_last = p; rt.max_moved = rt.max_moved.max((p - rt.pointer_start).length()); } None }
        (true, false, _) => { rt.pointer_down = false; (rt.time_down <= cfg.tap_max_time && rt.max_moved <= cfg.tap_max_move).then_some(rt.pointer_last) }
        _ => None,
    }
}

pub fn system_collect_inputs(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut input_map: ResMut<InputMap>,
) {
    input_map.frame_counter += 1;
    for st in &mut input_map.states { st.clear_transitions(); }
    input_map.tap_position = None;
    input_map.pointer_delta = motion_evr.read().map(|ev| ev.delta).sum();

    let touch = touches.iter().next().map(|t| t.position());
    let pointer = touch.or_else(|| windows.single().ok().and_then(|w| w.cursor_position()));
    let down = touch.is_some() || mouse_buttons.pressed(MouseButton::Left);
    let cfg = input_map.gesture_cfg.clone();
    let tap = advance_gesture(&mut input_map.gesture_rt, &cfg, pointer, down, time.delta_secs());

    if let Some(pos) = tap {
        input_map.tap_position = Some(pos);
        let gesture_actions: Vec<ActionId> = input_map.actions.iter().filter(|a| a.kind == ActionKind::Gesture).map(|a| a.id).collect();
        for aid in gesture_actions {
            let bound = input_map.bindings_index.get(&aid).is_some_and(|ids| ids.iter().any(|id| input_map.bindings[*id as usize].tokens.contains(&RawBindingToken::TouchTap)));
            if !bound { continue; }
            if let Some(st) = input_map.states.get_mut(aid.0 as usize) { st.pressed = true; st.just_pressed = true; st.just_released = true; }
        }
    }

    // Compute virtual axes
    let token_held = |t: RawBindingToken| match t { RawBindingToken::Key(k) => keyboard.pressed(k), RawBindingToken::MouseBtn(b) => mouse_buttons.pressed(b), RawBindingToken::TouchTap => false };
    let vals: Vec<f32> = input_map.virtual_axes.iter().map(|va| {
        let v = (token_held(va.pos) as i32 - token_held(va.neg) as i32) as f32;
        (v * va.scale).clamp(-1.0, 1.0)
    }).collect();
    input_map.virtual_axis_values = vals;
}

pub fn system_evaluate_bindings(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut input_map: ResMut<InputMap>,
) {
    let dt = time.delta_secs();
    let total_bindings = input_map.bindings.len();
    if input_map.bindings_runtime.len() < total_bindings { input_map.bindings_runtime.resize(total_bindings, BindingRuntime::default()); }
    let map = &mut *input_map;
    for (binding, rt) in map.bindings.iter().zip(map.bindings_runtime.iter_mut()) {
        rt.just_pressed = false;
        rt.just_released = false;
        let all_active = binding.tokens.iter().all(|t| match t { RawBindingToken::Key(k) => keyboard.pressed(*k), RawBindingToken::MouseBtn(b) => mouse_buttons.pressed(*b), RawBindingToken::TouchTap => false });
        if all_active { if !rt.active { rt.active = true; rt.just_pressed = binding.hold_secs <= 0.0; rt.hold_elapsed = 0.0; } else { let before = rt.hold_elapsed; rt.hold_elapsed += dt; if binding.hold_secs > 0.0 && before < binding.hold_secs && rt.hold_elapsed >= binding.hold_secs { rt.just_pressed = true; } } }
        else if rt.active { rt.active = false; rt.just_released = true; }
    }
    for (aid, bids) in &map.bindings_index {
        if map.actions.get(aid.0 as usize).is_some_and(|a| a.kind == ActionKind::Gesture) { continue; }
        let Some(state) = map.states.get_mut(aid.0 as usize) else { continue; };
        let mut pressed = false;
        for bid in bids {
            let (binding, rt) = (&map.bindings[*bid as usize], &map.bindings_runtime[*bid as usize]);
            let held_long_enough = rt.active && rt.hold_elapsed >= binding.hold_secs;
            pressed |= held_long_enough;
            if rt.just_pressed { state.just_pressed = true; }
            if rt.just_released && rt.hold_elapsed >= binding.hold_secs { state.just_released = true; }
        }
        state.pressed = pressed;
    }
}
