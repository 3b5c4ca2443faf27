use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Automatically close the app after this many seconds. 0.0 (or omitted) = run indefinitely.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Hoop Shot".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity_y: f32,
    /// Draw Rapier collider wireframes (sensors included).
    pub debug_render: bool,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: -9.81,
            debug_render: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub mass: f32,
    /// Impulse magnitude applied along the camera's viewing direction at spawn.
    pub launch_power: f32,
    pub restitution: f32,
}
impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 0.125,
            mass: 0.570,
            launch_power: 5.0,
            restitution: 0.6,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CleanupConfig {
    /// Balls whose y drops below this are removed on the next sweep.
    pub floor_y: f32,
}
impl Default for CleanupConfig {
    fn default() -> Self {
        Self { floor_y: -10.0 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub light_estimation: bool,
}
impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            light_estimation: true,
        }
    }
}

/// How the "passed the top sensor" flag is scoped.
///
/// Written as a quoted string in RON (`"PerBall"`): layered loading goes through
/// `ron::Value`, which drops the names of bare unit variants.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "String", into = "String")]
pub enum ScoreTracking {
    /// One flag for the whole game; overlapping passes by two balls count once.
    #[default]
    Shared,
    /// One flag per ball entity; overlapping passes each count.
    PerBall,
}
impl TryFrom<String> for ScoreTracking {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "Shared" => Ok(Self::Shared),
            "PerBall" => Ok(Self::PerBall),
            other => Err(format!("unknown score tracking '{other}' (expected Shared|PerBall)")),
        }
    }
}
impl From<ScoreTracking> for String {
    fn from(t: ScoreTracking) -> Self {
        match t {
            ScoreTracking::Shared => "Shared".into(),
            ScoreTracking::PerBall => "PerBall".into(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ScoringConfig {
    pub tracking: ScoreTracking,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HudConfig {
    /// Label template; `{score}` is replaced by the current score.
    pub score_format: String,
    pub font_size: f32,
}
impl Default for HudConfig {
    fn default() -> Self {
        Self {
            score_format: "Score: {score}".into(),
            font_size: 28.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub start: [f32; 3],
    pub look_at: [f32; 3],
    /// Metres per second for the desktop device rig.
    pub move_speed: f32,
    /// Radians per pixel of mouse motion while looking around.
    pub look_sensitivity: f32,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start: [0.0, 1.5, 3.0],
            look_at: [0.0, 1.8, -2.0],
            move_speed: 1.5,
            look_sensitivity: 0.003,
        }
    }
}

/// Quoted in RON for the same reason as [`ScoreTracking`].
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum SurfaceAlignment {
    Horizontal,
    Vertical,
}
impl TryFrom<String> for SurfaceAlignment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "Horizontal" => Ok(Self::Horizontal),
            "Vertical" => Ok(Self::Vertical),
            other => Err(format!("unknown alignment '{other}' (expected Horizontal|Vertical)")),
        }
    }
}
impl From<SurfaceAlignment> for String {
    fn from(a: SurfaceAlignment) -> Self {
        match a {
            SurfaceAlignment::Horizontal => "Horizontal".into(),
            SurfaceAlignment::Vertical => "Vertical".into(),
        }
    }
}

/// A real-world surface the simulated tracker will "discover".
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulatedSurface {
    pub alignment: SurfaceAlignment,
    pub center: [f32; 3],
    /// Outward facing normal (towards the viewer for walls).
    pub normal: [f32; 3],
    /// Full width and height of the surface once completely discovered.
    pub extent: [f32; 2],
    /// Seconds of scanning before the surface is first reported.
    pub discover_after: f32,
    /// Seconds for the reported extent to grow to the full extent.
    pub grow_secs: f32,
}
impl Default for SimulatedSurface {
    fn default() -> Self {
        Self {
            alignment: SurfaceAlignment::Vertical,
            center: [0.0, 1.8, -2.0],
            normal: [0.0, 0.0, 1.0],
            extent: [3.0, 2.4],
            discover_after: 0.5,
            grow_secs: 2.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ArConfig {
    /// Ambient brightness reported by the simulated light estimate.
    pub ambient_lux: f32,
    pub surfaces: Vec<SimulatedSurface>,
}
impl Default for ArConfig {
    fn default() -> Self {
        Self {
            ambient_lux: 400.0,
            surfaces: vec![
                SimulatedSurface::default(),
                SimulatedSurface {
                    alignment: SurfaceAlignment::Horizontal,
                    center: [0.0, 0.0, 0.0],
                    normal: [0.0, 1.0, 0.0],
                    extent: [4.0, 4.0],
                    discover_after: 0.2,
                    grow_secs: 1.5,
                },
            ],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub ball: BallConfig,
    pub cleanup: CleanupConfig,
    pub session: SessionConfig,
    pub scoring: ScoringConfig,
    pub hud: HudConfig,
    pub camera: CameraConfig,
    pub ar: ArConfig,
    /// `LogPlugin` filter directive string.
    pub log_filter: String,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            physics: Default::default(),
            ball: Default::default(),
            cleanup: Default::default(),
            session: Default::default(),
            scoring: Default::default(),
            hud: Default::default(),
            camera: Default::default(),
            ar: Default::default(),
            log_filter: "wgpu=error,naga=warn,hoop_shot=info".into(),
        }
    }
}

impl GameConfig {
    /// Load from a single RON file (errors contain human-readable context).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Load file; on failure returns default config plus error string.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load multiple layers; later overrides earlier (deep merge).
    /// Skips missing files; returns (config, used_paths, errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        for p in paths {
            let path_ref = p.as_ref();
            if !path_ref.exists() {
                continue;
            }
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match merged.as_mut() {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    /// Produce validation warnings (non-fatal) for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative; treated as disabled",
                self.window.auto_close
            ));
        }
        if self.physics.gravity_y >= 0.0 {
            w.push(format!(
                "physics.gravity_y {} not downward; balls will never fall below the floor",
                self.physics.gravity_y
            ));
        }
        if self.ball.radius <= 0.0 {
            w.push("ball.radius must be > 0".into());
        }
        if self.ball.mass <= 0.0 {
            w.push("ball.mass must be > 0".into());
        }
        if self.ball.launch_power <= 0.0 {
            w.push("ball.launch_power must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.ball.restitution) {
            w.push(format!(
                "ball.restitution {} outside 0..1",
                self.ball.restitution
            ));
        }
        if self.cleanup.floor_y >= self.camera.start[1] {
            w.push(format!(
                "cleanup.floor_y {} is above the camera start height; balls are swept immediately",
                self.cleanup.floor_y
            ));
        }
        if !self.hud.score_format.contains("{score}") {
            w.push("hud.score_format has no {score} placeholder".into());
        }
        if self.hud.font_size <= 0.0 {
            w.push("hud.font_size must be > 0".into());
        }
        if self.camera.move_speed < 0.0 {
            w.push("camera.move_speed negative".into());
        }
        if !self
            .ar
            .surfaces
            .iter()
            .any(|s| s.alignment == SurfaceAlignment::Vertical)
        {
            w.push("ar.surfaces has no vertical surface; the hoop can never be placed".into());
        }
        for (i, s) in self.ar.surfaces.iter().enumerate() {
            if s.extent[0] <= 0.0 || s.extent[1] <= 0.0 {
                w.push(format!("ar.surfaces[{i}].extent must be > 0"));
            }
            let n = Vec3::from_array(s.normal);
            if n.length_squared() < 1e-6 {
                w.push(format!("ar.surfaces[{i}].normal is zero"));
            } else {
                let vertical_normal = n.normalize().y.abs() > 0.9;
                let expect_vertical_normal = s.alignment == SurfaceAlignment::Horizontal;
                if vertical_normal != expect_vertical_normal {
                    w.push(format!(
                        "ar.surfaces[{i}] normal {:?} does not match alignment {:?}",
                        s.normal, s.alignment
                    ));
                }
            }
            if s.discover_after < 0.0 || s.grow_secs < 0.0 {
                w.push(format!("ar.surfaces[{i}] timings must be >= 0"));
            }
        }
        w
    }
}

fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
    use ron::value::Value;
    match (base, overlay) {
        (Value::Map(bm), Value::Map(om)) => {
            for (k, v) in om.into_iter() {
                let mut incoming = Some(v);
                for (ek, ev) in bm.iter_mut() {
                    if *ek == k {
                        if let Some(val) = incoming.take() {
                            merge_value(ev, val);
                        }
                        break;
                    }
                }
                if let Some(val) = incoming {
                    bm.insert(k, val);
                }
            }
        }
        (b, o) => *b = o,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_sample_config() {
        let sample = r#"(
            window: (width: 800.0, height: 600.0, title: "Test"),
            physics: (gravity_y: -9.8, debug_render: true),
            ball: (radius: 0.2, mass: 0.6, launch_power: 6.0, restitution: 0.5),
            cleanup: (floor_y: -20.0),
            scoring: (tracking: "PerBall"),
            hud: (score_format: "Points {score}", font_size: 20.0),
            ar: (
                ambient_lux: 250.0,
                surfaces: [
                    (alignment: "Vertical", center: (0.0, 2.0, -3.0), normal: (0.0, 0.0, 1.0), extent: (2.0, 2.0)),
                ],
            ),
        )"#;
        let cfg = GameConfig::load_from_file(write_temp(sample).path()).expect("parse config");
        assert_eq!(cfg.window.width, 800.0);
        assert_eq!(cfg.ball.launch_power, 6.0);
        assert_eq!(cfg.cleanup.floor_y, -20.0);
        assert_eq!(cfg.scoring.tracking, ScoreTracking::PerBall);
        assert_eq!(cfg.ar.surfaces.len(), 1);
        assert_eq!(cfg.ar.surfaces[0].discover_after, 0.5, "omitted field keeps default");
        assert!(cfg.validate().is_empty(), "expected no warnings: {:?}", cfg.validate());
    }

    #[test]
    fn defaults_match_game_constants() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.ball.launch_power, 5.0);
        assert_eq!(cfg.ball.radius, 0.125);
        assert!((cfg.ball.mass - 0.57).abs() < 1e-6);
        assert_eq!(cfg.cleanup.floor_y, -10.0);
        assert!(cfg.session.light_estimation);
        assert_eq!(cfg.scoring.tracking, ScoreTracking::Shared);
        assert!(cfg.validate().is_empty(), "defaults warn: {:?}", cfg.validate());
    }

    #[test]
    fn validate_detects_warnings() {
        let mut bad = GameConfig::default();
        bad.window.width = -1.0;
        bad.physics.gravity_y = 0.0;
        bad.ball.radius = 0.0;
        bad.ball.mass = -1.0;
        bad.ball.launch_power = 0.0;
        bad.ball.restitution = 1.5;
        bad.hud.score_format = "Score".into();
        bad.ar.surfaces = vec![SimulatedSurface {
            alignment: SurfaceAlignment::Horizontal,
            normal: [0.0, 0.0, 1.0],
            ..Default::default()
        }];
        let warnings = bad.validate();
        let joined = warnings.join(" | ");
        assert!(joined.contains("window dimensions must be > 0"));
        assert!(joined.contains("gravity_y"));
        assert!(joined.contains("ball.radius must be > 0"));
        assert!(joined.contains("ball.mass must be > 0"));
        assert!(joined.contains("ball.launch_power must be > 0"));
        assert!(joined.contains("ball.restitution"));
        assert!(joined.contains("{score}"));
        assert!(joined.contains("no vertical surface"));
        assert!(joined.contains("does not match alignment"));
    }

    #[test]
    fn load_or_default_missing_file() {
        let (cfg, err) = GameConfig::load_or_default("this/file/does/not/exist.ron");
        assert!(err.is_some());
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn layered_merge_overrides() {
        let base = r"(
            window: (width: 900.0),
            ball: (launch_power: 4.0, mass: 0.5),
        )";
        let override_one = r#"(
            window: (title: "Custom Title"),
            ball: (launch_power: 7.5),
        )"#;
        let base_file = write_temp(base);
        let override_file = write_temp(override_one);
        let (cfg, used, errors) = GameConfig::load_layered([
            base_file.path().to_path_buf(),
            override_file.path().to_path_buf(),
            std::path::PathBuf::from("missing/layer.ron"),
        ]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(used.len(), 2, "missing layer is skipped silently");
        assert_eq!(cfg.window.width, 900.0);
        assert_eq!(cfg.window.title, "Custom Title");
        assert_eq!(cfg.ball.launch_power, 7.5);
        assert_eq!(cfg.ball.mass, 0.5);
        assert_eq!(cfg.window.height, WindowConfig::default().height);
    }

    #[test]
    fn layered_keeps_quoted_variants() {
        let base = r#"(scoring: (tracking: "PerBall"))"#;
        let surfaces = r#"(ar: (surfaces: [(alignment: "Vertical", extent: (1.0, 1.0))]))"#;
        let a = write_temp(base);
        let b = write_temp(surfaces);
        let (cfg, _, errors) = GameConfig::load_layered([a.path(), b.path()]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(cfg.scoring.tracking, ScoreTracking::PerBall);
        assert_eq!(cfg.ar.surfaces[0].alignment, SurfaceAlignment::Vertical);
        assert_eq!(cfg.ar.surfaces[0].extent, [1.0, 1.0]);
    }

    #[test]
    fn unknown_variant_is_a_parse_error() {
        let bad = write_temp(r#"(scoring: (tracking: "Sometimes"))"#);
        let err = GameConfig::load_from_file(bad.path()).unwrap_err();
        assert!(err.contains("Sometimes"), "{err}");
    }

    #[test]
    fn layered_parse_error_reported() {
        let broken = write_temp("(window: (width: ");
        let (cfg, used, errors) = GameConfig::load_layered([broken.path()]);
        assert!(used.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("parse error"));
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn parse_autoclose_and_validate() {
        let sample = r"(window: (autoClose: 3.25))";
        let cfg = GameConfig::load_from_file(write_temp(sample).path()).expect("parse config");
        assert!((cfg.window.auto_close - 3.25).abs() < 1e-6);

        let neg_sample = r"(window: (autoClose: -5.0))";
        let cfg2 = GameConfig::load_from_file(write_temp(neg_sample).path()).expect("parse config");
        assert!(
            cfg2.validate().iter().any(|w| w.contains("window.autoClose")),
            "expected warning for negative autoClose"
        );
    }

    // Helper: create a temp file with given contents; returns handle (kept for lifetime)
    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tmp");
        f.write_all(contents.as_bytes()).unwrap();
        f
    }
}
