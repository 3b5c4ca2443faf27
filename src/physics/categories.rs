//! Body classification: a closed set of physical categories expressed as bit flags,
//! plus the per-body masks derived from them.
//!
//! Mapping onto Rapier:
//! * `CollisionGroups` = category / (collides_with | reports_contact_with) -> pair is tested at all
//! * `SolverGroups`    = category / collides_with -> pair exchanges forces
//!
//! A ball therefore overlaps the sensor planes (contact events) without ever being deflected.
use bevy::prelude::*;
use bevy_rapier3d::prelude::{ActiveEvents, CollisionGroups, Group, SolverGroups};
use std::ops::BitOr;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyCategory {
    Ball,
    Board,
    Rim,
    TopSensor,
    BottomSensor,
}

impl BodyCategory {
    pub const ALL: [BodyCategory; 5] = [
        BodyCategory::Ball,
        BodyCategory::Board,
        BodyCategory::Rim,
        BodyCategory::TopSensor,
        BodyCategory::BottomSensor,
    ];

    pub const fn bits(self) -> u32 {
        match self {
            BodyCategory::Ball => 1,
            BodyCategory::Board => 2,
            BodyCategory::Rim => 4,
            BodyCategory::TopSensor => 8,
            BodyCategory::BottomSensor => 16,
        }
    }

    pub const fn mask(self) -> CategoryMask {
        CategoryMask(self.bits())
    }

    pub fn label(self) -> &'static str {
        match self {
            BodyCategory::Ball => "ball",
            BodyCategory::Board => "board",
            BodyCategory::Rim => "rim",
            BodyCategory::TopSensor => "top sensor",
            BodyCategory::BottomSensor => "bottom sensor",
        }
    }
}

/// Union of categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CategoryMask(pub u32);

impl CategoryMask {
    pub const NONE: CategoryMask = CategoryMask(0);
    pub const ALL: CategoryMask = CategoryMask(0b1_1111);

    pub const fn contains(self, category: BodyCategory) -> bool {
        self.0 & category.bits() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn group(self) -> Group {
        Group::from_bits_truncate(self.0)
    }
}

impl BitOr for CategoryMask {
    type Output = CategoryMask;
    fn bitor(self, rhs: Self) -> Self::Output {
        CategoryMask(self.0 | rhs.0)
    }
}

impl BitOr<BodyCategory> for CategoryMask {
    type Output = CategoryMask;
    fn bitor(self, rhs: BodyCategory) -> Self::Output {
        CategoryMask(self.0 | rhs.bits())
    }
}

impl BitOr for BodyCategory {
    type Output = CategoryMask;
    fn bitor(self, rhs: Self) -> Self::Output {
        CategoryMask(self.bits() | rhs.bits())
    }
}

impl From<BodyCategory> for CategoryMask {
    fn from(c: BodyCategory) -> Self {
        c.mask()
    }
}

/// Category plus collision / contact masks. Inserted once at spawn, never mutated.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyMasks {
    pub category: BodyCategory,
    pub collides_with: CategoryMask,
    pub reports_contact_with: CategoryMask,
}

impl BodyMasks {
    pub const BALL: BodyMasks = BodyMasks {
        category: BodyCategory::Ball,
        collides_with: CategoryMask(
            BodyCategory::Ball.bits() | BodyCategory::Board.bits() | BodyCategory::Rim.bits(),
        ),
        reports_contact_with: CategoryMask(
            BodyCategory::TopSensor.bits() | BodyCategory::BottomSensor.bits(),
        ),
    };
    pub const BOARD: BodyMasks = BodyMasks {
        category: BodyCategory::Board,
        collides_with: CategoryMask::ALL,
        reports_contact_with: CategoryMask::NONE,
    };
    pub const RIM: BodyMasks = BodyMasks {
        category: BodyCategory::Rim,
        collides_with: CategoryMask::ALL,
        reports_contact_with: CategoryMask::NONE,
    };
    pub const TOP_SENSOR: BodyMasks = BodyMasks {
        category: BodyCategory::TopSensor,
        collides_with: CategoryMask(BodyCategory::Ball.bits()),
        reports_contact_with: CategoryMask(BodyCategory::Ball.bits()),
    };
    pub const BOTTOM_SENSOR: BodyMasks = BodyMasks {
        category: BodyCategory::BottomSensor,
        collides_with: CategoryMask(BodyCategory::Ball.bits()),
        reports_contact_with: CategoryMask(BodyCategory::Ball.bits()),
    };

    pub fn for_category(category: BodyCategory) -> BodyMasks {
        match category {
            BodyCategory::Ball => Self::BALL,
            BodyCategory::Board => Self::BOARD,
            BodyCategory::Rim => Self::RIM,
            BodyCategory::TopSensor => Self::TOP_SENSOR,
            BodyCategory::BottomSensor => Self::BOTTOM_SENSOR,
        }
    }

    /// Sensors only report; they never take part in the contact solver.
    pub fn is_sensor(&self) -> bool {
        matches!(
            self.category,
            BodyCategory::TopSensor | BodyCategory::BottomSensor
        )
    }

    pub fn collision_groups(&self) -> CollisionGroups {
        CollisionGroups::new(
            self.category.mask().group(),
            (self.collides_with | self.reports_contact_with).group(),
        )
    }

    pub fn solver_groups(&self) -> SolverGroups {
        SolverGroups::new(self.category.mask().group(), self.collides_with.group())
    }

    pub fn active_events(&self) -> ActiveEvents {
        if self.reports_contact_with.is_empty() {
            ActiveEvents::empty()
        } else {
            ActiveEvents::COLLISION_EVENTS
        }
    }

    /// Whether Rapier's group test lets these two bodies interact at all.
    pub fn interacts_with(&self, other: &BodyMasks) -> bool {
        let a = self.collision_groups();
        let b = other.collision_groups();
        a.memberships.intersects(b.filters) && b.memberships.intersects(a.filters)
    }

    /// Whether the two bodies exchange forces (solver groups on both sides agree).
    pub fn deflects(&self, other: &BodyMasks) -> bool {
        if self.is_sensor() || other.is_sensor() {
            return false;
        }
        let a = self.solver_groups();
        let b = other.solver_groups();
        a.memberships.intersects(b.filters) && b.memberships.intersects(a.filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_bits_are_distinct_single_flags() {
        let mut seen = 0u32;
        for c in BodyCategory::ALL {
            assert_eq!(c.bits().count_ones(), 1, "{c:?} must be a single flag");
            assert_eq!(seen & c.bits(), 0, "{c:?} overlaps another category");
            seen |= c.bits();
        }
        assert_eq!(CategoryMask(seen), CategoryMask::ALL);
    }

    #[test]
    fn ball_masks_match_shooting_rules() {
        let m = BodyMasks::BALL;
        assert_eq!(
            m.collides_with,
            BodyCategory::Ball | BodyCategory::Board | BodyCategory::Rim
        );
        assert_eq!(
            m.reports_contact_with,
            BodyCategory::TopSensor | BodyCategory::BottomSensor
        );
        assert_eq!(m.active_events(), ActiveEvents::COLLISION_EVENTS);
    }

    #[test]
    fn ball_touches_sensors_without_deflection() {
        let ball = BodyMasks::BALL;
        for sensor in [BodyMasks::TOP_SENSOR, BodyMasks::BOTTOM_SENSOR] {
            assert!(ball.interacts_with(&sensor));
            assert!(!ball.deflects(&sensor));
        }
        for solid in [BodyMasks::BOARD, BodyMasks::RIM, BodyMasks::BALL] {
            assert!(ball.interacts_with(&solid));
            assert!(ball.deflects(&solid));
        }
    }

    #[test]
    fn hoop_parts_ignore_each_other_as_sensors() {
        assert!(!BodyMasks::TOP_SENSOR.interacts_with(&BodyMasks::BOTTOM_SENSOR));
        assert!(!BodyMasks::TOP_SENSOR.interacts_with(&BodyMasks::RIM));
        assert_eq!(BodyMasks::BOARD.active_events(), ActiveEvents::empty());
    }

    #[test]
    fn labels_are_distinct() {
        let labels: std::collections::HashSet<_> = BodyCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), BodyCategory::ALL.len());
        assert_eq!(BodyCategory::TopSensor.label(), "top sensor");
    }

    #[test]
    fn for_category_round_trips() {
        for c in BodyCategory::ALL {
            assert_eq!(BodyMasks::for_category(c).category, c);
        }
    }
}
