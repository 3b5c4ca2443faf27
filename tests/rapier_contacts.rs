//! Balls dropped through the regulation hoop under the real Rapier pipeline.
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::{NoUserData, RapierPhysicsPlugin};

use hoop_shot::core::config::BallConfig;
use hoop_shot::core::system::{GameFlowSet, SystemOrderPlugin};
use hoop_shot::gameplay::cleanup::sweep_fallen_balls;
use hoop_shot::gameplay::factory::{spawn_ball, spawn_hoop, BallSpec, HoopAssembly};
use hoop_shot::gameplay::ScoringPlugin;
use hoop_shot::physics::ContactBridgePlugin;
use hoop_shot::{Ball, BodyMasks, HoopTemplate, Scoreboard};

fn physics_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(1.0 / 60.0)))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins((SystemOrderPlugin, ContactBridgePlugin, ScoringPlugin))
        .add_systems(Update, sweep_fallen_balls.in_set(GameFlowSet::Cleanup));
    app.update();
    let assembly = HoopAssembly::build(&HoopTemplate::regulation(), Transform::IDENTITY);
    let mut commands = app.world_mut().commands();
    spawn_hoop(&mut commands, &assembly, None);
    app.world_mut().flush();
    app
}

fn drop_ball(app: &mut App, at: Vec3) -> Entity {
    let cfg = BallConfig::default();
    let spec = BallSpec {
        transform: Transform::from_translation(at),
        impulse: Vec3::ZERO,
        radius: cfg.radius,
        mass: cfg.mass,
        restitution: cfg.restitution,
        masks: BodyMasks::BALL,
    };
    let mut commands = app.world_mut().commands();
    let ball = spawn_ball(&mut commands, &spec, None);
    app.world_mut().flush();
    ball
}

fn ball_y(app: &App, ball: Entity) -> Option<f32> {
    app.world().get::<Transform>(ball).map(|t| t.translation.y)
}

#[test]
fn ball_through_the_rim_scores_once() {
    let mut app = physics_app();
    // Centred over the sensors, which sit 0.3 m out from the board.
    let ball = drop_ball(&mut app, Vec3::new(0.0, 0.5, 0.3));
    for _ in 0..60 {
        app.update();
    }
    assert_eq!(app.world().resource::<Scoreboard>().score(), 1);
    let y = ball_y(&app, ball).unwrap_or(f32::NAN);
    assert!(y < -0.7, "sensors must not hold the ball up (y = {y})");
}

#[test]
fn ball_beside_the_hoop_falls_away_without_scoring() {
    let mut app = physics_app();
    let ball = drop_ball(&mut app, Vec3::new(1.5, 0.5, 0.3));
    for _ in 0..240 {
        app.update();
    }
    assert_eq!(app.world().resource::<Scoreboard>().score(), 0);
    assert!(app.world().get_entity(ball).is_err(), "swept below the floor");
    let balls = app
        .world_mut()
        .query_filtered::<(), With<Ball>>()
        .iter(app.world())
        .count();
    assert_eq!(balls, 0);
}
