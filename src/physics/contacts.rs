//! Bridge from Rapier collision events to category-tagged contact events.
//!
//! Rapier reports the two colliders in arbitrary order; consumers match on
//! [`BodyContact::pair`] which hands back the bodies in the order they asked for.
use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

use super::categories::BodyCategory;
use crate::core::system::GameFlowSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBody {
    pub entity: Entity,
    pub category: BodyCategory,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyContact {
    pub phase: ContactPhase,
    pub first: ContactBody,
    pub second: ContactBody,
}

impl BodyContact {
    /// Returns `(a, b)` bodies when the contact involves categories `a` and `b`, in either order.
    pub fn pair(&self, a: BodyCategory, b: BodyCategory) -> Option<(ContactBody, ContactBody)> {
        if self.first.category == a && self.second.category == b {
            Some((self.first, self.second))
        } else if self.first.category == b && self.second.category == a {
            Some((self.second, self.first))
        } else {
            None
        }
    }
}

pub struct ContactBridgePlugin;

impl Plugin for ContactBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionEvent>()
            .add_event::<BodyContact>()
            .add_systems(
                Update,
                translate_collision_events.in_set(GameFlowSet::Contacts),
            );
    }
}

pub fn translate_collision_events(
    mut collisions: EventReader<CollisionEvent>,
    categories: Query<&BodyCategory>,
    mut out: EventWriter<BodyContact>,
) {
    for ev in collisions.read() {
        let (e1, e2, phase) = match *ev {
            CollisionEvent::Started(e1, e2, _) => (e1, e2, ContactPhase::Begin),
            CollisionEvent::Stopped(e1, e2, flags) => {
                // A despawned collider is not a ball leaving a sensor.
                if flags.contains(CollisionEventFlags::REMOVED) {
                    continue;
                }
                (e1, e2, ContactPhase::End)
            }
        };
        let (Ok(c1), Ok(c2)) = (categories.get(e1), categories.get(e2)) else {
            continue;
        };
        trace!(target: "scoring", "{:?} {} / {}", phase, c1.label(), c2.label());
        out.write(BodyContact {
            phase,
            first: ContactBody { entity: e1, category: *c1 },
            second: ContactBody { entity: e2, category: *c2 },
        });
    }
}
