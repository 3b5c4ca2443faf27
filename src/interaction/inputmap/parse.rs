use super::types::*;
use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ParsedInputConfig { pub input_map: InputMap, pub errors: Vec<String> }

#[derive(Debug, serde::Deserialize)]
struct ActionDecl { description: Option<String>, kind: Option<String> }

#[derive(Debug, serde::Deserialize)]
struct GestureToml { tap_max_time: Option<f32>, tap_max_move: Option<f32> }

#[derive(Debug, serde::Deserialize)]
struct VirtualAxisToml { name: String, pos: String, neg: String, scale: Option<f32> }

#[derive(Debug, serde::Deserialize)]
struct RootToml {
    actions: Option<BTreeMap<String, ActionDecl>>,
    bindings: Option<BTreeMap<String, Vec<String>>>,
    debug_bindings: Option<BTreeMap<String, Vec<String>>>,
    virtual_axes: Option<Vec<VirtualAxisToml>>,
    gesture: Option<GestureToml>,
}

/// Parse an input map. Errors are collected rather than returned; every valid entry still applies.
pub fn parse_input_toml(raw: &str, debug_layer: bool) -> ParsedInputConfig {
    let mut result = ParsedInputConfig::default();
    let root: RootToml = match toml::from_str(raw) { Ok(r) => r, Err(e) => { result.errors.push(format!("Top-level parse: {e}")); return result; } };
    let mut actions: Vec<ActionMeta> = Vec::new();
    let mut name_to_id = HashMap::new();
    for (name, decl) in root.actions.unwrap_or_default() {
        if !validate_action_name(&name) { result.errors.push(format!("Invalid action name '{}': must be PascalCase", name)); continue; }
        let kind = match decl.kind.as_deref().unwrap_or("Binary") { "Binary" => ActionKind::Binary, "Gesture" => ActionKind::Gesture, other => { result.errors.push(format!("Action {} unknown kind '{}': expected Binary|Gesture", name, other)); ActionKind::Binary } };
        let id = ActionId(actions.len() as u16);
        actions.push(ActionMeta { id, name: name.clone(), description: decl.description.unwrap_or_default(), kind });
        name_to_id.insert(name, id);
    }

    let states = vec![ActionState::default(); actions.len()];
    let mut input_map = InputMap { actions, name_to_id, states, ..Default::default() };

    // Merge bindings (normal + debug overlay if allowed)
    let mut all_bindings: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (k, v) in root.bindings.unwrap_or_default() { all_bindings.entry(k).or_default().extend(v); }
    if debug_layer { for (k, v) in root.debug_bindings.unwrap_or_default() { all_bindings.entry(k).or_default().extend(v); } }

    let mut binding_id: u32 = 0;
    for (action_name, list) in all_bindings {
        let Some(aid) = input_map.name_to_id.get(&action_name).copied() else { result.errors.push(format!("Binding references unknown action '{}'", action_name)); continue; };
        for spec in &list {
            match parse_binding(spec) {
                Ok((mut tokens, hold)) => {
                    canonical_sort_tokens(&mut tokens);
                    if let Some(prev) = input_map.chord_map.get(&tokens) { result.errors.push(format!("[binding {} '{}'] chord already bound (binding {})", action_name, spec, prev)); continue; }
                    input_map.bindings_index.entry(aid).or_default().push(binding_id);
                    input_map.chord_map.insert(tokens.clone(), binding_id);
                    input_map.bindings.push(Binding { id: binding_id, tokens, hold_secs: hold });
                    binding_id += 1;
                }
                Err(err) => result.errors.push(format!("[binding {} '{}'] {err}", action_name, spec)),
            }
        }
    }
    input_map.bindings_runtime = vec![BindingRuntime::default(); input_map.bindings.len()];

    for va in root.virtual_axes.unwrap_or_default() {
        match (parse_token(&va.pos), parse_token(&va.neg)) {
            (Ok(p), Ok(n)) => input_map.virtual_axes.push(VirtualAxis { name: va.name, pos: p, neg: n, scale: va.scale.unwrap_or(1.0) }),
            (Err(e), _) => result.errors.push(format!("VirtualAxis pos error '{}': {e}", va.name)),
            (_, Err(e)) => result.errors.push(format!("VirtualAxis neg error '{}': {e}", va.name)),
        }
    }
    input_map.virtual_axis_values = vec![0.0; input_map.virtual_axes.len()];

    if let Some(g) = root.gesture { let d = GestureConfig::default(); input_map.gesture_cfg = GestureConfig { tap_max_time: g.tap_max_time.unwrap_or(d.tap_max_time), tap_max_move: g.tap_max_move.unwrap_or(d.tap_max_move) }; }
    result.input_map = input_map;
    result
}

fn validate_action_name(name: &str) -> bool { let bytes = name.as_bytes(); if bytes.is_empty() || !bytes[0].is_ascii_uppercase() { return false; } name.chars().all(|c| c.is_ascii_alphanumeric()) }

fn canonical_sort_tokens(tokens: &mut SmallVec<[RawBindingToken; 2]>) { tokens.sort_by_key(token_sort_key); }

fn token_sort_key(t: &RawBindingToken) -> (u8, u16) { match t { RawBindingToken::Key(k) => (0, keycode_rank(*k)), RawBindingToken::MouseBtn(b) => (1, mouse_rank(*b)), RawBindingToken::TouchTap => (2, 0) } }

fn keycode_rank(k: KeyCode) -> u16 { KEYS.iter().position(|(_, kc)| *kc == k).map(|p| p as u16).unwrap_or(u16::MAX) }
fn mouse_rank(b: MouseButton) -> u16 { match b { MouseButton::Left => 1, MouseButton::Right => 2, MouseButton::Middle => 3, MouseButton::Back => 4, MouseButton::Forward => 5, MouseButton::Other(x) => 10 + x } }

fn parse_binding(spec: &str) -> Result<(SmallVec<[RawBindingToken; 2]>, f32), String> {
    let mut tokens: SmallVec<[RawBindingToken; 2]> = SmallVec::new();
    let mut hold: f32 = 0.0;
    let mut seen: HashSet<RawBindingToken> = HashSet::new();
    for part in spec.split('+') {
        let mut p = part.trim();
        if p.is_empty() { continue; }
        if let Some(rest) = p.strip_prefix("hold>") {
            let (secs, after) = rest.split_once(':').ok_or_else(|| format!("Malformed hold qualifier '{}': missing ':'", p))?;
            hold = secs.parse::<f32>().map_err(|_| format!("Invalid hold seconds '{}'", secs))?;
            p = after;
        }
        let token = parse_token(p)?;
        if !seen.insert(token) { return Err(format!("Duplicate token in chord: {:?}", token)); }
        tokens.push(token);
    }
    if tokens.is_empty() { return Err("Empty binding".into()); }
    Ok((tokens, hold))
}

fn parse_token(s: &str) -> Result<RawBindingToken, String> {
    if let Some(rest) = s.strip_prefix("Key:") { return parse_keycode(rest); }
    if let Some(rest) = s.strip_prefix("Mouse:") { return match rest { "Left" => Ok(RawBindingToken::MouseBtn(MouseButton::Left)), "Right" => Ok(RawBindingToken::MouseBtn(MouseButton::Right)), "Middle" => Ok(RawBindingToken::MouseBtn(MouseButton::Middle)), other => Err(format!("Unknown mouse button '{}'", other)) }; }
    if s == "Touch:Tap" { return Ok(RawBindingToken::TouchTap); }
    Err(format!("Unrecognized token '{}'", s))
}

const KEYS: &[(&str, KeyCode)] = &[
    ("Space", KeyCode::Space), ("Escape", KeyCode::Escape), ("Enter", KeyCode::Enter),
    ("ShiftLeft", KeyCode::ShiftLeft), ("ControlLeft", KeyCode::ControlLeft), ("F1", KeyCode::F1),
    ("A", KeyCode::KeyA), ("D", KeyCode::KeyD), ("E", KeyCode::KeyE), ("Q", KeyCode::KeyQ),
    ("R", KeyCode::KeyR), ("S", KeyCode::KeyS), ("W", KeyCode::KeyW),
    ("ArrowUp", KeyCode::ArrowUp), ("ArrowDown", KeyCode::ArrowDown), ("ArrowLeft", KeyCode::ArrowLeft), ("ArrowRight", KeyCode::ArrowRight),
];

fn parse_keycode(name: &str) -> Result<RawBindingToken, String> {
    let short = name.strip_prefix("Key").filter(|s| s.len() == 1).unwrap_or(name);
    KEYS.iter().find(|(n, _)| *n == short).map(|(_, k)| RawBindingToken::Key(*k)).ok_or_else(|| format!("Unsupported KeyCode '{}' (extend parser)", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[actions]
Shoot = { kind = "Gesture", description = "Tap to place the hoop or throw" }
Restart = { description = "Start over" }
Look = {}

[bindings]
Shoot = ["Touch:Tap"]
Restart = ["Key:R"]
Look = ["Mouse:Right"]

[debug_bindings]
Restart = ["Key:ControlLeft+Key:R"]

[[virtual_axes]]
name = "MoveX"
pos = "Key:D"
neg = "Key:A"
"#;

    #[test]
    fn sample_parses_cleanly() {
        let p = parse_input_toml(SAMPLE, false);
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        assert_eq!(p.input_map.actions.len(), 3);
        assert_eq!(p.input_map.kind(SHOOT), Some(ActionKind::Gesture));
        assert_eq!(p.input_map.bindings.len(), 3);
        assert_eq!(p.input_map.virtual_axes.len(), 1);
    }

    #[test]
    fn debug_layer_adds_bindings() {
        let p = parse_input_toml(SAMPLE, true);
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        assert_eq!(p.input_map.bindings.len(), 4);
    }

    #[test]
    fn bad_entries_are_reported_and_rest_kept() {
        let raw = r#"
[actions]
Restart = {}
lowercase = {}

[bindings]
Restart = ["Key:R", "Key:Nope", "Key:R+Key:R"]
Missing = ["Key:W"]
"#;
        let p = parse_input_toml(raw, false);
        assert_eq!(p.input_map.actions.len(), 1);
        assert_eq!(p.input_map.bindings.len(), 1);
        assert_eq!(p.errors.len(), 4, "{:?}", p.errors);
    }

    #[test]
    fn hold_qualifier_and_chord_order() {
        let (tokens, hold) = parse_binding("Key:R + hold>0.5:Key:ShiftLeft").expect("valid chord");
        assert_eq!(hold, 0.5);
        let mut sorted = tokens.clone();
        canonical_sort_tokens(&mut sorted);
        assert_eq!(sorted[0], RawBindingToken::Key(KeyCode::ShiftLeft));
        assert_eq!(parse_keycode("KeyW"), Ok(RawBindingToken::Key(KeyCode::KeyW)));
    }

    #[test]
    fn garbage_is_a_top_level_error() {
        let p = parse_input_toml("[actions", false);
        assert_eq!(p.errors.len(), 1);
        assert!(p.input_map.actions.is_empty());
    }
}
