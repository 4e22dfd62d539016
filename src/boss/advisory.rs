//! Non-blocking bridge from the tick loop to the external advisor
//!
//! A request runs as a tokio task. It publishes exactly one sequence
//! (the advisor's, or the fallback on any failure) through a oneshot
//! channel, and the tick loop picks it up with `try_recv`. Holding the
//! receiver is what "in flight" means, so the result and the end of the
//! in-flight period arrive together.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::boss::actions::BossAction;
use crate::boss::fallback::FallbackPlanner;
use crate::boss::state::BossState;
use crate::core::config::AdvisoryConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::Millis;
use crate::llm::client::LlmClient;
use crate::llm::context::AdvisoryRequest;
use crate::llm::parser::{parse_sequence, SequenceRules};

/// Anything that can answer an advisory request with free-form text
#[async_trait]
pub trait SequenceAdvisor: Send + Sync {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<String>;
}

#[async_trait]
impl SequenceAdvisor for LlmClient {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<String> {
        self.complete(&request.system_prompt(), &request.user_prompt())
            .await
    }
}

/// Single-slot handoff between the advisory task and the tick loop
#[derive(Default)]
pub struct AdvisoryMailbox {
    inbox: Option<oneshot::Receiver<Vec<BossAction>>>,
    pending: Option<Vec<BossAction>>,
}

impl fmt::Debug for AdvisoryMailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryMailbox")
            .field("in_flight", &self.in_flight())
            .field("pending", &self.pending)
            .finish()
    }
}

impl AdvisoryMailbox {
    /// Open a new request slot; the sender goes to the background task
    pub fn arm(&mut self) -> oneshot::Sender<Vec<BossAction>> {
        let (tx, rx) = oneshot::channel();
        self.inbox = Some(rx);
        tx
    }

    /// Move a finished result into the pending slot
    ///
    /// Returns true on the poll that observed the result.
    pub fn poll(&mut self) -> bool {
        let Some(inbox) = self.inbox.as_mut() else {
            return false;
        };

        match inbox.try_recv() {
            Ok(sequence) => {
                self.inbox = None;
                self.pending = Some(sequence);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                // Task died without publishing; free the slot so a new request can go out
                tracing::warn!("Advisory task ended without a result");
                self.inbox = None;
                false
            }
        }
    }

    pub fn in_flight(&self) -> bool {
        self.inbox.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take_pending(&mut self) -> Option<Vec<BossAction>> {
        self.pending.take()
    }
}

/// Issues advisory requests on a tokio runtime
#[derive(Clone)]
pub struct AdvisoryAdapter {
    advisor: Option<Arc<dyn SequenceAdvisor>>,
    runtime: Option<Handle>,
    config: AdvisoryConfig,
}

impl fmt::Debug for AdvisoryAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryAdapter")
            .field("enabled", &self.is_enabled())
            .field("config", &self.config)
            .finish()
    }
}

impl AdvisoryAdapter {
    /// Adapter that never issues; the boss runs on fallback alone
    pub fn disabled() -> Self {
        Self {
            advisor: None,
            runtime: None,
            config: AdvisoryConfig {
                enabled: false,
                ..AdvisoryConfig::default()
            },
        }
    }

    pub fn new(advisor: Arc<dyn SequenceAdvisor>, runtime: Handle, config: AdvisoryConfig) -> Self {
        Self {
            advisor: Some(advisor),
            runtime: Some(runtime),
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && self.advisor.is_some() && self.runtime.is_some()
    }

    /// Fire off a request if none is outstanding and the cooldown allows
    ///
    /// Returns true when a request was issued. Never blocks.
    pub fn request_sequence(&self, boss: &mut BossState, now: Millis) -> bool {
        if !self.config.enabled
            || boss.mailbox.in_flight()
            || !boss.cooldowns.advisory_ready(now)
        {
            return false;
        }
        let (Some(advisor), Some(runtime)) = (self.advisor.as_ref(), self.runtime.as_ref()) else {
            return false;
        };

        let request = AdvisoryRequest::from_boss(boss);
        let reply = boss.mailbox.arm();
        boss.cooldowns.last_advisory_request_at = Some(now);

        tracing::info!(
            "Advisory: requesting sequence (health {}%, enraged {})",
            request.health_percent,
            request.enraged
        );

        let advisor = Arc::clone(advisor);
        let rules = SequenceRules::from(&self.config);
        let timeout_ms = self.config.timeout_ms;

        runtime.spawn(async move {
            let sequence = resolve_sequence(advisor.as_ref(), &request, &rules, timeout_ms).await;
            if reply.send(sequence).is_err() {
                tracing::debug!("Advisory: encounter gone, result discarded");
            }
        });

        true
    }
}

/// Ask the advisor and validate; any failure yields the fallback plan
pub async fn resolve_sequence(
    advisor: &dyn SequenceAdvisor,
    request: &AdvisoryRequest,
    rules: &SequenceRules,
    timeout_ms: u64,
) -> Vec<BossAction> {
    let outcome = match tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        advisor.advise(request),
    )
    .await
    {
        Ok(Ok(text)) => parse_sequence(&text, &request.legal_actions, rules),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(GameError::AdvisoryTimeout(timeout_ms)),
    };

    match outcome {
        Ok(sequence) => {
            tracing::info!("Advisory: adopted {:?}", sequence);
            sequence
        }
        Err(e) => {
            tracing::warn!("Advisory: {}, using fallback", e);
            FallbackPlanner.plan()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EncounterConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned advisor that counts calls
    struct ScriptedAdvisor {
        reply: std::result::Result<&'static str, &'static str>,
        delay_ms: u64,
        calls: AtomicUsize,
    }

    impl ScriptedAdvisor {
        fn ok(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply),
                delay_ms: 0,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message),
                delay_ms: 0,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(reply: &'static str, delay_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply),
                delay_ms,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SequenceAdvisor for ScriptedAdvisor {
        async fn advise(&self, _request: &AdvisoryRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            self.reply
                .map(str::to_string)
                .map_err(|e| GameError::LlmError(e.into()))
        }
    }

    fn boss() -> BossState {
        let mut rng = StdRng::seed_from_u64(11);
        BossState::new(&EncounterConfig::default(), 0, &mut rng)
    }

    fn adapter(advisor: Arc<ScriptedAdvisor>, timeout_ms: u64) -> AdvisoryAdapter {
        AdvisoryAdapter::new(
            advisor,
            Handle::current(),
            AdvisoryConfig {
                timeout_ms,
                ..AdvisoryConfig::default()
            },
        )
    }

    /// Poll the way the tick loop would until a result lands
    async fn wait_for_result(boss: &mut BossState) -> Vec<BossAction> {
        for _ in 0..200 {
            if boss.mailbox.poll() {
                return boss.mailbox.take_pending().unwrap();
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("advisory result never arrived");
    }

    #[tokio::test]
    async fn test_valid_response_adopted() {
        let advisor = ScriptedAdvisor::ok("SPREAD_SHOT, MOVE_LEFT, BOGUS_ACTION");
        let adapter = adapter(advisor.clone(), 1_000);
        let mut boss = boss();

        assert!(adapter.request_sequence(&mut boss, 0));
        assert!(boss.mailbox.in_flight());
        assert_eq!(boss.cooldowns.last_advisory_request_at, Some(0));

        let sequence = wait_for_result(&mut boss).await;
        assert_eq!(sequence, vec![BossAction::SpreadShot, BossAction::MoveLeft]);
        assert!(!boss.mailbox.in_flight());
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_response_falls_back() {
        let adapter = adapter(ScriptedAdvisor::ok("MOVE_LEFT"), 1_000);
        let mut boss = boss();

        assert!(adapter.request_sequence(&mut boss, 0));
        assert_eq!(wait_for_result(&mut boss).await, FallbackPlanner.plan());
    }

    #[tokio::test]
    async fn test_transport_error_falls_back() {
        let adapter = adapter(ScriptedAdvisor::failing("connection refused"), 1_000);
        let mut boss = boss();

        assert!(adapter.request_sequence(&mut boss, 0));
        assert_eq!(wait_for_result(&mut boss).await, FallbackPlanner.plan());
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let adapter = adapter(ScriptedAdvisor::slow("SINGLE_SHOT, SPREAD_SHOT", 500), 20);
        let mut boss = boss();

        assert!(adapter.request_sequence(&mut boss, 0));
        assert_eq!(wait_for_result(&mut boss).await, FallbackPlanner.plan());
    }

    #[tokio::test]
    async fn test_one_request_in_flight() {
        let advisor = ScriptedAdvisor::slow("SINGLE_SHOT, SPREAD_SHOT", 50);
        let adapter = adapter(advisor.clone(), 1_000);
        let mut boss = boss();
        boss.cooldowns.advisory_cooldown_ms = 0;

        assert!(adapter.request_sequence(&mut boss, 0));
        assert!(!adapter.request_sequence(&mut boss, 16));
        wait_for_result(&mut boss).await;
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 1);

        // Slot is free again once the result was observed
        assert!(adapter.request_sequence(&mut boss, 32));
    }

    #[tokio::test]
    async fn test_cooldown_measured_from_last_request() {
        let adapter = adapter(ScriptedAdvisor::ok("SINGLE_SHOT, DODGE"), 1_000);
        let mut boss = boss();

        assert!(adapter.request_sequence(&mut boss, 1_000));
        wait_for_result(&mut boss).await;

        assert!(!adapter.request_sequence(&mut boss, 10_999));
        assert!(adapter.request_sequence(&mut boss, 11_000));
    }

    #[tokio::test]
    async fn test_disabled_never_issues() {
        let mut boss = boss();
        assert!(!AdvisoryAdapter::disabled().request_sequence(&mut boss, 0));
        assert!(!boss.mailbox.in_flight());
        assert_eq!(boss.cooldowns.last_advisory_request_at, None);
    }

    #[tokio::test]
    async fn test_late_result_after_drop_is_harmless() {
        let advisor = ScriptedAdvisor::slow("SINGLE_SHOT, SPREAD_SHOT", 20);
        let adapter = adapter(advisor.clone(), 1_000);
        let mut boss = boss();

        assert!(adapter.request_sequence(&mut boss, 0));
        drop(boss);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closed_inbox_frees_slot() {
        let mut mailbox = AdvisoryMailbox::default();
        let tx = mailbox.arm();
        assert!(mailbox.in_flight());
        drop(tx);
        assert!(!mailbox.poll());
        assert!(!mailbox.in_flight());
        assert!(!mailbox.has_pending());
    }
}
