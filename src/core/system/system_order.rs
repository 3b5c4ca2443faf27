//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level, all in `Update`, chained):
//! 1. Input (raw input -> actions -> taps / restart requests)
//! 2. Session (AR tracker poll, anchor events, plane visuals, light estimate)
//! 3. Contacts (Rapier collision events -> body contacts -> scoring)
//! 4. Placement (tap routing, hoop / ball spawning, restart)
//! 5. Cleanup (fallen ball sweep)
//! 6. Hud (score label, control panel)
//!
//! Rapier itself steps in `PostUpdate`; its collision events are read on the next frame.
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum GameFlowSet {
    Input,
    Session,
    Contacts,
    Placement,
    Cleanup,
    Hud,
}

pub struct SystemOrderPlugin;

impl Plugin for SystemOrderPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                GameFlowSet::Input,
                GameFlowSet::Session,
                GameFlowSet::Contacts,
                GameFlowSet::Placement,
                GameFlowSet::Cleanup,
                GameFlowSet::Hud,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Trace(Vec<&'static str>);

    #[test]
    fn sets_run_in_declared_order() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SystemOrderPlugin);
        app.init_resource::<Trace>();
        // Registered in reverse so ordering comes only from the set chain.
        app.add_systems(
            Update,
            (
                (|mut t: ResMut<Trace>| t.0.push("hud")).in_set(GameFlowSet::Hud),
                (|mut t: ResMut<Trace>| t.0.push("cleanup")).in_set(GameFlowSet::Cleanup),
                (|mut t: ResMut<Trace>| t.0.push("placement")).in_set(GameFlowSet::Placement),
                (|mut t: ResMut<Trace>| t.0.push("contacts")).in_set(GameFlowSet::Contacts),
                (|mut t: ResMut<Trace>| t.0.push("session")).in_set(GameFlowSet::Session),
                (|mut t: ResMut<Trace>| t.0.push("input")).in_set(GameFlowSet::Input),
            ),
        );
        app.update();
        assert_eq!(
            app.world().resource::<Trace>().0,
            vec!["input", "session", "contacts", "placement", "cleanup", "hud"]
        );
    }
}
