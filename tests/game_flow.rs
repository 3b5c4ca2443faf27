use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionEvent, ExternalImpulse};
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

use hoop_shot::ar::{ArPlugin, ArSession, PlaneDetection};
use hoop_shot::core::config::SimulatedSurface;
use hoop_shot::core::system::SystemOrderPlugin;
use hoop_shot::gameplay::placement::{RestartRequested, SurfaceTap};
use hoop_shot::gameplay::GameplayPlugin;
use hoop_shot::physics::ContactBridgePlugin;
use hoop_shot::rendering::hud::{HudPlugin, ScoreLabel};
use hoop_shot::{ArCamera, Ball, BodyCategory, GameConfig, Hoop, PlacementState, SceneNode, Scoreboard};

const CAMERA: Vec3 = Vec3::new(0.0, 1.5, 3.0);

fn game_app() -> App {
    let mut cfg = GameConfig::default();
    cfg.ar.surfaces = vec![SimulatedSurface {
        discover_after: 0.0,
        grow_secs: 0.0,
        ..SimulatedSurface::default()
    }];
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(cfg)
        .add_plugins((SystemOrderPlugin, ContactBridgePlugin, ArPlugin, GameplayPlugin, HudPlugin));
    app.world_mut().spawn((
        ArCamera,
        Transform::from_translation(CAMERA).looking_at(Vec3::new(0.0, 1.8, -2.0), Vec3::Y),
    ));
    app.update();
    app.world_mut().resource_mut::<ArSession>().poll(0.1);
    app.update();
    app
}

fn tap(app: &mut App) {
    app.world_mut().send_event(SurfaceTap {
        screen: Vec2::new(640.0, 360.0),
        ray: Ray3d::new(CAMERA, Dir3::new(Vec3::new(0.0, 0.3, -5.0)).unwrap_or(Dir3::NEG_Z)),
    });
    app.update();
}

fn entities_with<C: Component>(app: &mut App) -> Vec<Entity> {
    app.world_mut()
        .query_filtered::<Entity, With<C>>()
        .iter(app.world())
        .collect()
}

fn part(app: &mut App, category: BodyCategory) -> Entity {
    app.world_mut()
        .query::<(Entity, &BodyCategory)>()
        .iter(app.world())
        .find(|(_, c)| **c == category)
        .map(|(e, _)| e)
        .unwrap_or(Entity::PLACEHOLDER)
}

fn swish(app: &mut App, ball: Entity) {
    let top = part(app, BodyCategory::TopSensor);
    let bottom = part(app, BodyCategory::BottomSensor);
    app.world_mut()
        .send_event(CollisionEvent::Started(ball, top, CollisionEventFlags::SENSOR));
    app.world_mut()
        .send_event(CollisionEvent::Started(ball, bottom, CollisionEventFlags::SENSOR));
    app.world_mut()
        .send_event(CollisionEvent::Stopped(ball, top, CollisionEventFlags::SENSOR));
    app.world_mut()
        .send_event(CollisionEvent::Stopped(bottom, ball, CollisionEventFlags::SENSOR));
    app.update();
}

fn label(app: &mut App) -> String {
    app.world_mut()
        .query_filtered::<&Text, With<ScoreLabel>>()
        .iter(app.world())
        .next()
        .map(|t| t.0.clone())
        .unwrap_or_default()
}

#[test]
fn place_shoot_and_score() {
    let mut app = game_app();
    tap(&mut app);
    assert!(app.world().resource::<PlacementState>().hoop_placed());
    assert_eq!(entities_with::<Hoop>(&mut app).len(), 1);
    assert_eq!(app.world().resource::<Scoreboard>().score(), 0);

    tap(&mut app);
    let balls = entities_with::<Ball>(&mut app);
    assert_eq!(balls.len(), 1);
    let camera = app
        .world_mut()
        .query_filtered::<&Transform, With<ArCamera>>()
        .single(app.world())
        .copied()
        .unwrap_or_default();
    let ball_tf = app.world().get::<Transform>(balls[0]).copied().unwrap_or_default();
    assert_eq!(ball_tf, camera);
    let impulse = app.world().get::<ExternalImpulse>(balls[0]).map(|i| i.impulse).unwrap_or_default();
    assert!((impulse - camera.forward().as_vec3() * 5.0).length() < 1e-5);

    swish(&mut app, balls[0]);
    assert_eq!(app.world().resource::<Scoreboard>().score(), 1);
    assert_eq!(label(&mut app), "Score: 1");
}

#[test]
fn airball_is_swept_without_scoring() {
    let mut app = game_app();
    tap(&mut app);
    tap(&mut app);
    let ball = entities_with::<Ball>(&mut app)[0];
    let rim = part(&mut app, BodyCategory::Rim);
    app.world_mut()
        .send_event(CollisionEvent::Started(ball, rim, CollisionEventFlags::empty()));
    app.update();
    if let Some(mut t) = app.world_mut().get_mut::<Transform>(ball) {
        t.translation.y = -10.5;
    }
    app.update();
    assert!(entities_with::<Ball>(&mut app).is_empty());
    assert_eq!(app.world().resource::<Scoreboard>().score(), 0);
    assert_eq!(label(&mut app), "Score: 0");
}

#[test]
fn restart_mid_game_resets_everything() {
    let mut app = game_app();
    tap(&mut app);
    tap(&mut app);
    let shooter = entities_with::<Ball>(&mut app)[0];
    for _ in 0..3 {
        swish(&mut app, shooter);
    }
    tap(&mut app);
    assert_eq!(app.world().resource::<Scoreboard>().score(), 3);
    assert_eq!(entities_with::<Ball>(&mut app).len(), 2);
    assert_eq!(label(&mut app), "Score: 3");

    app.world_mut().send_event(RestartRequested);
    app.update();

    assert!(entities_with::<SceneNode>(&mut app).is_empty());
    assert!(entities_with::<Ball>(&mut app).is_empty());
    assert_eq!(label(&mut app), "Score: 0");
    assert!(!app.world().resource::<PlacementState>().hoop_placed());
    let session = app.world().resource::<ArSession>();
    assert_eq!(session.configuration().plane_detection, PlaneDetection::ALL);

    // Scanning resumes: the wall is found again and can take a new hoop.
    app.world_mut().resource_mut::<ArSession>().poll(0.1);
    app.update();
    tap(&mut app);
    assert_eq!(entities_with::<Hoop>(&mut app).len(), 1);
}

#[test]
fn despawned_ball_leaving_sensor_does_not_score() {
    let mut app = game_app();
    tap(&mut app);
    tap(&mut app);
    let ball = entities_with::<Ball>(&mut app)[0];
    let top = part(&mut app, BodyCategory::TopSensor);
    let bottom = part(&mut app, BodyCategory::BottomSensor);
    app.world_mut()
        .send_event(CollisionEvent::Started(ball, top, CollisionEventFlags::SENSOR));
    app.world_mut().send_event(CollisionEvent::Stopped(
        ball,
        bottom,
        CollisionEventFlags::SENSOR | CollisionEventFlags::REMOVED,
    ));
    app.update();
    assert_eq!(app.world().resource::<Scoreboard>().score(), 0);
}
