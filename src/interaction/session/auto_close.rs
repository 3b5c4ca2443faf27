use crate::core::config::GameConfig;
use bevy::prelude::*;

/// Countdown to a clean exit; present only when `window.autoClose` is positive.
#[derive(Resource, Deref, DerefMut)]
pub struct AutoCloseTimer(Timer);

pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AppExit>()
            .add_systems(Startup, setup_autoclose)
            .add_systems(Update, check_autoclose);
    }
}

fn setup_autoclose(mut commands: Commands, cfg: Option<Res<GameConfig>>) {
    let secs = cfg.map(|c| c.window.auto_close).unwrap_or(0.0);
    if secs > 0.0 {
        info!(seconds = secs, "AutoClose: will exit after {secs} seconds");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn check_autoclose(
    time: Res<Time>,
    timer: Option<ResMut<AutoCloseTimer>>,
    mut ev_exit: EventWriter<AppExit>,
) {
    let Some(mut t) = timer else { return };
    if t.tick(time.delta()).just_finished() {
        info!("AutoClose: timer finished, requesting app exit");
        ev_exit.write(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn app(auto_close: f32) -> App {
        let mut cfg = GameConfig::default();
        cfg.window.auto_close = auto_close;
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)))
            .insert_resource(cfg)
            .add_plugins(AutoClosePlugin);
        app.update();
        app
    }

    #[test]
    fn zero_means_never() {
        let app = app(0.0);
        assert!(app.world().get_resource::<AutoCloseTimer>().is_none());
    }

    #[test]
    fn finished_timer_requests_exit() {
        let mut app = app(0.5);
        let mut updates = 0;
        while app.should_exit().is_none() && updates < 10 {
            let elapsed = app.world().resource::<AutoCloseTimer>().elapsed_secs();
            assert!(elapsed < 0.5, "exit not requested at {elapsed}s");
            app.update();
            updates += 1;
        }
        assert_eq!(app.should_exit(), Some(AppExit::Success));
        assert!(updates <= 3, "took {updates} steps of 0.2 s");
    }
}
