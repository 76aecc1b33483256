#![deny(warnings)]
pub mod engine;
pub mod generator;
pub mod leaderboard;
pub mod matchmaker;
pub mod model;
pub mod rating;
pub mod settings;
pub mod store;

pub use engine::{AddedName, DecisionSummary, EngineError, Ranker, SessionStats};
pub use settings::Settings;
pub use store::{Store, StoreError};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "namepair"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "namepair");
        assert!(!AppInfo::version().is_empty());
    }
}
