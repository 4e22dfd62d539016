pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, EncounterConfig};
pub use error::{GameError, Result};
pub use types::{Direction, Millis, Vec2};
