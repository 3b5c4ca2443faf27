//! Builders for the two kinds of scene objects: the hoop assembly and basketballs.
//!
//! Construction is split in two steps. `HoopAssembly::build` / `BallSpec::from_camera` are pure
//! and fully deterministic; `spawn_hoop` / `spawn_ball` turn the result into entities.
use anyhow::{bail, Context};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::f32::consts::PI;
use std::path::Path;

use crate::core::components::{Ball, Hoop, SceneNode};
use crate::core::config::BallConfig;
use crate::physics::categories::{BodyCategory, BodyMasks};

pub const DEFAULT_HOOP_SCENE: &str = "assets/scenes/hoop.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoopPart {
    Board,
    Rim,
    TopSensor,
    BottomSensor,
}

impl HoopPart {
    pub const ALL: [HoopPart; 4] = [
        HoopPart::Board,
        HoopPart::Rim,
        HoopPart::TopSensor,
        HoopPart::BottomSensor,
    ];

    pub fn category(self) -> BodyCategory {
        match self {
            HoopPart::Board => BodyCategory::Board,
            HoopPart::Rim => BodyCategory::Rim,
            HoopPart::TopSensor => BodyCategory::TopSensor,
            HoopPart::BottomSensor => BodyCategory::BottomSensor,
        }
    }
}

/// Geometry of one part, in the hoop's local frame (+Y up, +Z out of the wall).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartShape {
    Cuboid { half_extents: [f32; 3] },
    /// Horizontal ring; the collider is a loop of capsules.
    Ring { radius: f32, tube_radius: f32, segments: u32 },
    /// Thin horizontal disc.
    Disc { radius: f32, half_thickness: f32 },
}

impl PartShape {
    pub fn collider(&self) -> Collider {
        match *self {
            PartShape::Cuboid { half_extents: [x, y, z] } => Collider::cuboid(x, y, z),
            PartShape::Disc { radius, half_thickness } => Collider::cylinder(half_thickness, radius),
            PartShape::Ring { radius, tube_radius, segments } => {
                let n = segments.max(3);
                let half_len = radius * (PI / n as f32).sin();
                let pieces = (0..n)
                    .map(|i| {
                        let mid = (i as f32 + 0.5) * 2.0 * PI / n as f32;
                        let center = Vec3::new(mid.cos(), 0.0, mid.sin()) * radius * (PI / n as f32).cos();
                        let tangent = Vec3::new(-mid.sin(), 0.0, mid.cos());
                        (
                            center,
                            Quat::from_rotation_arc(Vec3::Y, tangent),
                            Collider::capsule_y(half_len, tube_radius),
                        )
                    })
                    .collect();
                Collider::compound(pieces)
            }
        }
    }

    pub fn mesh(&self) -> Mesh {
        match *self {
            PartShape::Cuboid { half_extents: [x, y, z] } => Cuboid::new(x * 2.0, y * 2.0, z * 2.0).into(),
            PartShape::Disc { radius, half_thickness } => Cylinder::new(radius, half_thickness * 2.0).into(),
            PartShape::Ring { radius, tube_radius, .. } => {
                Torus::new(radius - tube_radius, radius + tube_radius).into()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoopPartTemplate {
    pub part: HoopPart,
    pub shape: PartShape,
    pub offset: [f32; 3],
    #[serde(default = "default_part_color")]
    pub color: [f32; 4],
}

fn default_part_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

/// Hoop scene description, loaded once at startup.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoopTemplate {
    pub parts: Vec<HoopPartTemplate>,
}

impl HoopTemplate {
    /// Backboard 1.8 x 1.05 m, rim 0.45 m across, sensors inside the rim and just below it.
    pub fn regulation() -> Self {
        Self {
            parts: vec![
                HoopPartTemplate {
                    part: HoopPart::Board,
                    shape: PartShape::Cuboid { half_extents: [0.9, 0.525, 0.02] },
                    offset: [0.0, 0.0, 0.02],
                    color: [0.95, 0.95, 0.95, 1.0],
                },
                HoopPartTemplate {
                    part: HoopPart::Rim,
                    shape: PartShape::Ring { radius: 0.23, tube_radius: 0.015, segments: 16 },
                    offset: [0.0, -0.3, 0.3],
                    color: [0.9, 0.35, 0.05, 1.0],
                },
                HoopPartTemplate {
                    part: HoopPart::TopSensor,
                    shape: PartShape::Disc { radius: 0.2, half_thickness: 0.005 },
                    offset: [0.0, -0.3, 0.3],
                    color: [0.0, 1.0, 0.0, 0.0],
                },
                HoopPartTemplate {
                    part: HoopPart::BottomSensor,
                    shape: PartShape::Disc { radius: 0.2, half_thickness: 0.005 },
                    offset: [0.0, -0.5, 0.3],
                    color: [1.0, 0.0, 0.0, 0.0],
                },
            ],
        }
    }

    pub fn from_ron_str(text: &str) -> anyhow::Result<Self> {
        let template: HoopTemplate = ron::from_str(text).context("parsing hoop scene")?;
        template.check()?;
        Ok(template)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading hoop scene {}", path.display()))?;
        Self::from_ron_str(&text).with_context(|| format!("loading hoop scene {}", path.display()))
    }

    /// Every part must appear exactly once.
    pub fn check(&self) -> anyhow::Result<()> {
        for part in HoopPart::ALL {
            let n = self.parts.iter().filter(|p| p.part == part).count();
            if n != 1 {
                bail!("hoop scene must contain exactly one {:?} part, found {}", part, n);
            }
        }
        Ok(())
    }

    pub fn part(&self, part: HoopPart) -> Option<&HoopPartTemplate> {
        self.parts.iter().find(|p| p.part == part)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPart {
    pub part: HoopPart,
    pub masks: BodyMasks,
    pub local: Transform,
    pub shape: PartShape,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoopAssembly {
    pub root: Transform,
    pub parts: SmallVec<[BuiltPart; 4]>,
}

impl HoopAssembly {
    pub fn build(template: &HoopTemplate, root: Transform) -> Self {
        let parts = template
            .parts
            .iter()
            .map(|p| {
                let masks = BodyMasks::for_category(p.part.category());
                BuiltPart {
                    part: p.part,
                    masks,
                    local: Transform::from_translation(Vec3::from(p.offset)),
                    shape: p.shape.clone(),
                    visible: !masks.is_sensor(),
                }
            })
            .collect();
        Self { root, parts }
    }

    pub fn part(&self, part: HoopPart) -> Option<&BuiltPart> {
        self.parts.iter().find(|p| p.part == part)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSpec {
    pub transform: Transform,
    pub impulse: Vec3,
    pub radius: f32,
    pub mass: f32,
    pub restitution: f32,
    pub masks: BodyMasks,
}

impl BallSpec {
    /// The ball starts exactly at the camera pose and is pushed along the view direction.
    pub fn from_camera(camera: &Transform, cfg: &BallConfig) -> Self {
        let forward = camera.rotation * Vec3::NEG_Z;
        Self {
            transform: *camera,
            impulse: forward * cfg.launch_power,
            radius: cfg.radius,
            mass: cfg.mass,
            restitution: cfg.restitution,
            masks: BodyMasks::BALL,
        }
    }
}

#[derive(Resource, Clone)]
pub struct SceneAssets {
    pub ball_mesh: Handle<Mesh>,
    pub ball_material: Handle<StandardMaterial>,
    pub parts: Vec<(HoopPart, Handle<Mesh>, Handle<StandardMaterial>)>,
}

impl SceneAssets {
    fn part(&self, part: HoopPart) -> Option<(Handle<Mesh>, Handle<StandardMaterial>)> {
        self.parts
            .iter()
            .find(|(p, _, _)| *p == part)
            .map(|(_, m, mat)| (m.clone(), mat.clone()))
    }
}

pub fn setup_scene_assets(
    mut commands: Commands,
    template: Option<Res<HoopTemplate>>,
    cfg: Option<Res<crate::core::config::GameConfig>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let radius = cfg.map(|c| c.ball.radius).unwrap_or(0.125);
    let template = template.map(|t| t.clone()).unwrap_or_else(HoopTemplate::regulation);
    let parts = template
        .parts
        .iter()
        .map(|p| {
            let [r, g, b, a] = p.color;
            (
                p.part,
                meshes.add(p.shape.mesh()),
                materials.add(StandardMaterial {
                    base_color: Color::srgba(r, g, b, a),
                    perceptual_roughness: 0.6,
                    ..default()
                }),
            )
        })
        .collect();
    commands.insert_resource(SceneAssets {
        ball_mesh: meshes.add(Sphere::new(radius).mesh().uv(32, 18)),
        ball_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.85, 0.4, 0.1),
            perceptual_roughness: 0.8,
            ..default()
        }),
        parts,
    });
}

fn physics_bundle(masks: BodyMasks) -> (BodyCategory, BodyMasks, CollisionGroups, SolverGroups, ActiveEvents) {
    (
        masks.category,
        masks,
        masks.collision_groups(),
        masks.solver_groups(),
        masks.active_events(),
    )
}

pub fn spawn_hoop(commands: &mut Commands, assembly: &HoopAssembly, assets: Option<&SceneAssets>) -> Entity {
    commands
        .spawn((Hoop, SceneNode, Name::new("hoop"), assembly.root, Visibility::default()))
        .with_children(|root| {
            for part in &assembly.parts {
                let mut e = root.spawn((
                    Name::new(format!("{:?}", part.part)),
                    part.local,
                    RigidBody::Fixed,
                    part.shape.collider(),
                    physics_bundle(part.masks),
                    if part.visible { Visibility::Inherited } else { Visibility::Hidden },
                ));
                if part.masks.is_sensor() {
                    e.insert(Sensor);
                }
                if let Some((mesh, material)) = assets.and_then(|a| a.part(part.part)) {
                    e.insert((Mesh3d(mesh), MeshMaterial3d(material)));
                }
            }
        })
        .id()
}

pub fn spawn_ball(commands: &mut Commands, spec: &BallSpec, assets: Option<&SceneAssets>) -> Entity {
    let mut e = commands.spawn((
        Ball,
        SceneNode,
        Name::new("ball"),
        spec.transform,
        Visibility::default(),
        RigidBody::Dynamic,
        Collider::ball(spec.radius),
        ColliderMassProperties::Mass(spec.mass),
        Restitution::coefficient(spec.restitution),
        ExternalImpulse {
            impulse: spec.impulse,
            torque_impulse: Vec3::ZERO,
        },
        Ccd::enabled(),
        physics_bundle(spec.masks),
    ));
    if let Some(a) = assets {
        e.insert((Mesh3d(a.ball_mesh.clone()), MeshMaterial3d(a.ball_material.clone())));
    }
    e.id()
}
