//! Boss encounter controller
//!
//! Bottom-up: the action catalog and spawn descriptors, the advisory
//! bridge and its fallback, the phase controller and the sequencer, tied
//! together by [`Encounter`].

pub mod actions;
pub mod advisory;
pub mod catalog;
pub mod constants;
pub mod encounter;
pub mod fallback;
pub mod phases;
pub mod sequencer;
pub mod spawns;
pub mod state;

pub use actions::{legal_actions, ActionClass, BossAction};
pub use advisory::{AdvisoryAdapter, AdvisoryMailbox, SequenceAdvisor};
pub use encounter::{BossTickReport, Encounter, EncounterOutcome};
pub use fallback::FallbackPlanner;
pub use phases::{PhaseController, PhaseEvent};
pub use sequencer::ActionSequencer;
pub use spawns::{Spawn, SpawnKind};
pub use state::BossState;
