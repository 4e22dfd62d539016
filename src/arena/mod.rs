//! Arena around the boss fight: playable bounds and the lead-in waves

pub mod bounds;
pub mod waves;

pub use bounds::{Arena, ArenaBounds};
pub use waves::{WaveDirector, WaveEvent, WaveStage, WaveTick};
