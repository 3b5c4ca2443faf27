//! Score label and the restart control panel.
use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::core::system::GameFlowSet;
use crate::gameplay::placement::{PlacementState, RestartRequested};
use crate::gameplay::scoring::ScoreChanged;

const DEFAULT_SCORE_FORMAT: &str = "Score: {score}";

#[derive(Component)]
pub struct ScoreLabel;

/// Panel holding the restart button; hidden until a hoop is placed.
#[derive(Component)]
pub struct ControlPanel;

#[derive(Component)]
pub struct RestartButton;

pub fn format_score(format: &str, score: u32) -> String {
    format.replace("{score}", &score.to_string())
}

fn score_format(cfg: &Option<Res<GameConfig>>) -> String {
    cfg.as_ref()
        .map(|c| c.hud.score_format.clone())
        .unwrap_or_else(|| DEFAULT_SCORE_FORMAT.to_string())
}

pub fn spawn_hud(mut commands: Commands, cfg: Option<Res<GameConfig>>) {
    let font_size = cfg.as_ref().map(|c| c.hud.font_size).unwrap_or(28.0);
    commands.spawn((
        Name::new("ScoreLabel"),
        ScoreLabel,
        Text::new(format_score(&score_format(&cfg), 0)),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            left: Val::Px(20.0),
            ..default()
        },
    ));
    commands
        .spawn((
            Name::new("ControlPanel"),
            ControlPanel,
            Visibility::Hidden,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                padding: UiRect::horizontal(Val::Px(20.0)),
                ..default()
            },
        ))
        .with_children(|panel| {
            panel
                .spawn((
                    Name::new("RestartButton"),
                    RestartButton,
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(24.0), Val::Px(10.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.1, 0.1, 0.1, 0.7)),
                ))
                .with_child((
                    Text::new("Restart"),
                    TextFont {
                        font_size: font_size * 0.8,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
        });
}

/// Shows the newest score message of the frame; older ones are superseded.
pub fn apply_score_changes(
    mut changes: EventReader<ScoreChanged>,
    cfg: Option<Res<GameConfig>>,
    mut labels: Query<&mut Text, With<ScoreLabel>>,
) {
    let Some(latest) = changes.read().last().copied() else { return };
    let text = format_score(&score_format(&cfg), latest.score);
    for mut label in &mut labels {
        label.0.clone_from(&text);
    }
}

pub fn sync_control_panel(
    placement: Res<PlacementState>,
    mut panels: Query<&mut Visibility, With<ControlPanel>>,
) {
    if !placement.is_changed() {
        return;
    }
    let visibility = if placement.hoop_placed() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut v in &mut panels {
        v.set_if_neq(visibility);
    }
}

pub fn restart_button(
    buttons: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
    mut restart: EventWriter<RestartRequested>,
) {
    if buttons.iter().any(|i| *i == Interaction::Pressed) {
        restart.write(RestartRequested);
    }
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ScoreChanged>()
            .add_event::<RestartRequested>()
            .add_systems(Startup, spawn_hud)
            .add_systems(Update, restart_button.in_set(GameFlowSet::Input))
            .add_systems(
                Update,
                (apply_score_changes, sync_control_panel).in_set(GameFlowSet::Hud),
            );
    }
}
