//! Made-shot detection.
//!
//! A shot counts when a ball starts touching the top sensor and later stops touching the
//! bottom sensor. Everything else (rim bounces, a ball lingering on the top plane, a ball
//! leaving the bottom plane upwards before ever passing the top) is ignored.
use bevy::prelude::*;
use std::collections::HashMap;

use crate::core::config::{GameConfig, ScoreTracking};
use crate::core::system::GameFlowSet;
use crate::physics::categories::BodyCategory;
use crate::physics::contacts::{translate_collision_events, BodyContact, ContactPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotPhase {
    #[default]
    Idle,
    PassedTop,
}

/// Score message for the display. Only the newest one in a frame matters.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChanged {
    pub score: u32,
}

#[derive(Resource, Debug, Default)]
pub struct Scoreboard {
    tracking: ScoreTracking,
    phase: ShotPhase,
    passed_top: HashMap<Entity, ShotPhase>,
    score: u32,
}

impl Scoreboard {
    pub fn new(tracking: ScoreTracking) -> Self {
        Self {
            tracking,
            ..default()
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tracking(&self) -> ScoreTracking {
        self.tracking
    }

    /// Shared phase, or the phase of `ball` when tracking per ball.
    pub fn phase(&self, ball: Option<Entity>) -> ShotPhase {
        match (self.tracking, ball) {
            (ScoreTracking::PerBall, Some(e)) => {
                self.passed_top.get(&e).copied().unwrap_or_default()
            }
            _ => self.phase,
        }
    }

    fn phase_mut(&mut self, ball: Entity) -> &mut ShotPhase {
        match self.tracking {
            ScoreTracking::Shared => &mut self.phase,
            ScoreTracking::PerBall => self.passed_top.entry(ball).or_default(),
        }
    }

    /// Feed one contact. Returns the new score when the contact completed a shot.
    pub fn observe(&mut self, contact: &BodyContact) -> Option<u32> {
        match contact.phase {
            ContactPhase::Begin => {
                let (ball, _) = contact.pair(BodyCategory::Ball, BodyCategory::TopSensor)?;
                let phase = self.phase_mut(ball.entity);
                if *phase == ShotPhase::Idle {
                    *phase = ShotPhase::PassedTop;
                    debug!(target: "scoring", "ball {:?} passed the top sensor", ball.entity);
                }
                None
            }
            ContactPhase::End => {
                let (ball, _) = contact.pair(BodyCategory::Ball, BodyCategory::BottomSensor)?;
                let phase = self.phase_mut(ball.entity);
                if *phase != ShotPhase::PassedTop {
                    return None;
                }
                *phase = ShotPhase::Idle;
                if self.tracking == ScoreTracking::PerBall {
                    self.passed_top.remove(&ball.entity);
                }
                self.score += 1;
                info!(target: "scoring", "made shot by {:?}, score {}", ball.entity, self.score);
                Some(self.score)
            }
        }
    }

    pub fn reset(&mut self) {
        self.phase = ShotPhase::Idle;
        self.passed_top.clear();
        self.score = 0;
    }

    /// Drop per-ball state for a ball that no longer exists.
    pub fn forget(&mut self, ball: Entity) {
        self.passed_top.remove(&ball);
    }
}

pub struct ScoringPlugin;

impl Plugin for ScoringPlugin {
    fn build(&self, app: &mut App) {
        let tracking = app
            .world()
            .get_resource::<GameConfig>()
            .map(|c| c.scoring.tracking)
            .unwrap_or_default();
        app.insert_resource(Scoreboard::new(tracking))
            .add_event::<BodyContact>()
            .add_event::<ScoreChanged>()
            .add_systems(
                Update,
                score_contacts
                    .after(translate_collision_events)
                    .in_set(GameFlowSet::Contacts),
            );
    }
}

pub fn score_contacts(
    mut contacts: EventReader<BodyContact>,
    mut board: ResMut<Scoreboard>,
    mut changed: EventWriter<ScoreChanged>,
) {
    for c in contacts.read() {
        if let Some(score) = board.observe(c) {
            changed.write(ScoreChanged { score });
        }
    }
}
