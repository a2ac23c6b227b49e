//! `amlens-engine` — client risk scoring and transaction monitoring.
//!
//! Pure engine crate: receives pre-loaded rows, returns scored clients and
//! monitoring cases. No CLI, network, or persistence dependencies.

pub mod cases;
pub mod config;
pub mod dates;
pub mod detect;
pub mod engine;
pub mod error;
pub mod group;
pub mod model;
pub mod normalize;
pub mod score;
pub mod summary;

pub use config::EngineConfig;
pub use engine::run;
pub use error::EngineError;
pub use model::{MonitoringCase, RunInput, RunResult, ScoredClient};
