pub mod game;
pub mod report;

pub use game::GamePlugin;
pub use report::ConfigReport;
