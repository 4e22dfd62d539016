//! Pending-action queue and the advisory/fallback interleave

use crate::boss::actions::BossAction;
use crate::boss::advisory::AdvisoryAdapter;
use crate::boss::fallback::FallbackPlanner;
use crate::boss::state::BossState;
use crate::core::types::Millis;

/// What the sequencer did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequencerStep {
    /// Action popped for execution, if the cooldown allowed one
    pub action: Option<BossAction>,
    /// A new advisory request went out
    pub requested: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ActionSequencer {
    fallback: FallbackPlanner,
}

impl ActionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill the queue if needed, then release the next action
    ///
    /// Refill order: a finished advisory result, else a fresh request. If
    /// no request ends up in flight (disabled, cooling down) the fallback
    /// plan is queued on the same tick; otherwise the boss waits for it.
    pub fn step(&self, boss: &mut BossState, adapter: &AdvisoryAdapter, now: Millis) -> SequencerStep {
        let mut step = SequencerStep::default();
        boss.mailbox.poll();

        if boss.queue.is_empty() {
            if let Some(sequence) = boss.mailbox.take_pending() {
                boss.queue.extend(sequence);
            } else {
                step.requested = adapter.request_sequence(boss, now);
                if !boss.mailbox.in_flight() {
                    tracing::debug!("Boss: queueing fallback sequence");
                    boss.queue.extend(self.fallback.plan());
                }
            }
        }

        if !boss.queue.is_empty() && boss.cooldowns.action_ready(now) {
            boss.cooldowns.last_action_at = Some(now);
            step.action = boss.queue.pop_front();
        }

        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EncounterConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn boss() -> BossState {
        let mut rng = StdRng::seed_from_u64(2);
        BossState::new(&EncounterConfig::default(), 0, &mut rng)
    }

    #[test]
    fn test_fallback_when_advisor_disabled() {
        let sequencer = ActionSequencer::new();
        let adapter = AdvisoryAdapter::disabled();
        let mut boss = boss();

        let step = sequencer.step(&mut boss, &adapter, 0);
        assert_eq!(step.action, Some(BossAction::SpreadShot));
        assert!(!step.requested);
        assert_eq!(boss.queue.len(), 4);
    }

    #[test]
    fn test_action_cooldown() {
        let sequencer = ActionSequencer::new();
        let adapter = AdvisoryAdapter::disabled();
        let mut boss = boss();

        assert!(sequencer.step(&mut boss, &adapter, 0).action.is_some());
        assert!(sequencer.step(&mut boss, &adapter, 16).action.is_none());
        assert!(sequencer.step(&mut boss, &adapter, 249).action.is_none());
        assert_eq!(
            sequencer.step(&mut boss, &adapter, 250).action,
            Some(BossAction::MoveRight)
        );
    }

    #[test]
    fn test_queued_actions_run_in_order() {
        let sequencer = ActionSequencer::new();
        let adapter = AdvisoryAdapter::disabled();
        let mut boss = boss();
        boss.queue.extend([BossAction::LayMines, BossAction::Dodge]);

        assert_eq!(sequencer.step(&mut boss, &adapter, 0).action, Some(BossAction::LayMines));
        assert_eq!(sequencer.step(&mut boss, &adapter, 250).action, Some(BossAction::Dodge));
        // Queue ran dry: fallback takes over
        assert_eq!(
            sequencer.step(&mut boss, &adapter, 500).action,
            Some(BossAction::SpreadShot)
        );
    }

    #[test]
    fn test_pending_result_adopted_before_request() {
        let sequencer = ActionSequencer::new();
        let adapter = AdvisoryAdapter::disabled();
        let mut boss = boss();

        let reply = boss.mailbox.arm();
        reply
            .send(vec![BossAction::HomingMissile, BossAction::MoveLeft])
            .unwrap();

        let step = sequencer.step(&mut boss, &adapter, 0);
        assert_eq!(step.action, Some(BossAction::HomingMissile));
        assert_eq!(boss.queue.iter().copied().collect::<Vec<_>>(), vec![BossAction::MoveLeft]);
        assert!(!boss.mailbox.in_flight());
    }

    #[test]
    fn test_waits_while_request_in_flight() {
        let sequencer = ActionSequencer::new();
        let adapter = AdvisoryAdapter::disabled();
        let mut boss = boss();

        // Outstanding request, nothing published yet
        let _reply = boss.mailbox.arm();
        let step = sequencer.step(&mut boss, &adapter, 0);
        assert!(step.action.is_none());
        assert!(boss.queue.is_empty());
    }
}
