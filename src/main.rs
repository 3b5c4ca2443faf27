use std::path::PathBuf;

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use hoop_shot::gameplay::factory::DEFAULT_HOOP_SCENE;
use hoop_shot::{ConfigReport, GameConfig, GamePlugin, HoopTemplate};

const BASE_CONFIG: &str = "assets/config/game.ron";
const LOCAL_CONFIG: &str = "assets/config/game.local.ron";

#[derive(Parser, Debug)]
#[command(name = "hoop_shot", version, about = "Place a hoop on a wall and shoot baskets")]
struct Args {
    /// Config layers, later ones override earlier ones. Defaults to game.ron then game.local.ron.
    #[arg(long = "config", value_name = "PATH")]
    config: Vec<PathBuf>,
    /// Hoop scene description.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_HOOP_SCENE)]
    hoop_scene: PathBuf,
    /// Exit after this many seconds (overrides window.autoClose).
    #[arg(long, value_name = "SECS")]
    auto_close: Option<f32>,
    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(args: &Args) -> (GameConfig, ConfigReport) {
    let layers: Vec<PathBuf> = if args.config.is_empty() {
        vec![BASE_CONFIG.into(), LOCAL_CONFIG.into()]
    } else {
        args.config.clone()
    };
    let (cfg, layers, errors) = GameConfig::load_layered(&layers);
    (cfg, ConfigReport { layers, errors, warnings: Vec::new() })
}

#[cfg(target_arch = "wasm32")]
fn load_config(_args: &Args) -> (GameConfig, ConfigReport) {
    const RAW: &str = include_str!("../assets/config/game.ron");
    match ron::from_str(RAW) {
        Ok(cfg) => (cfg, ConfigReport { layers: vec![BASE_CONFIG.into()], ..default() }),
        Err(e) => (GameConfig::default(), ConfigReport { errors: vec![format!("parse RON: {e}")], ..default() }),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_hoop(args: &Args) -> anyhow::Result<HoopTemplate> {
    HoopTemplate::load(&args.hoop_scene)
}

#[cfg(target_arch = "wasm32")]
fn load_hoop(_args: &Args) -> anyhow::Result<HoopTemplate> {
    HoopTemplate::from_ron_str(include_str!("../assets/scenes/hoop.ron"))
}

fn main() -> anyhow::Result<()> {
    #[cfg(target_arch = "wasm32")]
    {
        // Better panic messages on wasm
        console_error_panic_hook::set_once();
    }

    let args = Args::parse();
    let (mut cfg, mut report) = load_config(&args);
    if let Some(secs) = args.auto_close {
        cfg.window.auto_close = secs;
    }
    report.warnings = cfg.validate();

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg).context("serializing config")?);
        return Ok(());
    }

    let hoop = load_hoop(&args).context("the hoop scene is required to start")?;

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: cfg.window.title.clone(),
                        resolution: (cfg.window.width, cfg.window.height).into(),
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: cfg.log_filter.clone(),
                    ..default()
                }),
        )
        .insert_resource(cfg)
        .insert_resource(report)
        .insert_resource(hoop)
        .add_plugins(GamePlugin)
        .run();
    Ok(())
}
