use hoop_shot::gameplay::factory::{HoopAssembly, HoopPart, DEFAULT_HOOP_SCENE};
use hoop_shot::interaction::inputmap::parse::parse_input_toml;
use hoop_shot::interaction::inputmap::types::{ActionKind, RESTART, SHOOT};
use hoop_shot::interaction::inputmap::INPUT_CONFIG_PATH;
use hoop_shot::{GameConfig, HoopTemplate};

#[test]
fn base_config_matches_defaults() {
    let cfg = GameConfig::load_from_file("assets/config/game.ron").expect("game.ron parses");
    assert_eq!(cfg, GameConfig::default());
    assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
}

#[test]
fn shipped_hoop_scene_matches_regulation_hoop() {
    let hoop = HoopTemplate::load(DEFAULT_HOOP_SCENE).expect("hoop.ron loads");
    assert_eq!(hoop, HoopTemplate::regulation());
    let assembly = HoopAssembly::build(&hoop, bevy::prelude::Transform::IDENTITY);
    assert!(HoopPart::ALL.iter().all(|p| assembly.part(*p).is_some()));
}

#[test]
fn shipped_input_map_is_clean() {
    let raw = std::fs::read_to_string(INPUT_CONFIG_PATH).expect("input.toml readable");
    for debug_layer in [false, true] {
        let parsed = parse_input_toml(&raw, debug_layer);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.input_map.kind(SHOOT), Some(ActionKind::Gesture));
        assert_eq!(parsed.input_map.kind(RESTART), Some(ActionKind::Binary));
        assert_eq!(parsed.input_map.virtual_axes.len(), 3);
    }
}
