use bevy::prelude::*;

/// Config loading outcome, gathered before logging is up and reported once it is.
#[derive(Resource, Debug, Default, Clone)]
pub struct ConfigReport {
    pub layers: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub struct ConfigReportPlugin;

impl Plugin for ConfigReportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, log_config_report);
    }
}

fn log_config_report(report: Option<Res<ConfigReport>>) {
    let Some(report) = report else { return };
    if report.layers.is_empty() {
        info!("No config layers found; using defaults");
    } else {
        info!(layers = ?report.layers, "Config layers loaded");
    }
    for e in &report.errors {
        warn!("CONFIG LOAD ISSUE: {e}");
    }
    for w in &report.warnings {
        warn!("CONFIG WARNING: {w}");
    }
}
