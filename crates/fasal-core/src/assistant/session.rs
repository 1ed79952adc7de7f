use crate::assistant::guide::OfflineGuide;
use crate::assistant::remote::RemoteAdvisor;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(15);

/// Appended to an offline answer that replaced a failed remote attempt.
pub const OFFLINE_SWITCH_NOTE: &str = " (Switched to Offline Knowledge Base)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    Idle,
    AwaitingRemote,
    Responding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplySource {
    Remote,
    Offline { after_remote_failure: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub seq: u64,
    pub text: String,
    pub source: ReplySource,
    /// States this turn passed through, starting and ending at `Idle`.
    pub states: Vec<ChatState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    Answered(ChatReply),
    /// A newer turn was answered first; this turn's text was dropped.
    Stale { seq: u64 },
}

impl TurnOutcome {
    pub fn reply(&self) -> Option<&ChatReply> {
        match self {
            TurnOutcome::Answered(reply) => Some(reply),
            TurnOutcome::Stale { .. } => None,
        }
    }
}

/// Chat front end that prefers a remote advisor and falls back to the
/// offline guide.
pub struct Assistant {
    guide: Arc<OfflineGuide>,
    advisor: Option<Arc<dyn RemoteAdvisor>>,
    remote_timeout: Duration,
    online: AtomicBool,
    next_seq: AtomicU64,
    latest_answered: AtomicU64,
    in_flight: AtomicUsize,
}

impl Assistant {
    pub fn new(guide: Arc<OfflineGuide>) -> Self {
        Self {
            guide,
            advisor: None,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
            online: AtomicBool::new(true),
            next_seq: AtomicU64::new(0),
            latest_answered: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn RemoteAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    pub fn set_connectivity(&self, connectivity: Connectivity) {
        self.online
            .store(connectivity == Connectivity::Online, Ordering::SeqCst);
    }

    pub fn connectivity(&self) -> Connectivity {
        if self.online.load(Ordering::SeqCst) {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }

    /// `AwaitingRemote` while any turn waits on the advisor.
    pub fn state(&self) -> ChatState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            ChatState::AwaitingRemote
        } else {
            ChatState::Idle
        }
    }

    /// Run one chat turn. Blank queries start no turn and return `None`.
    pub async fn ask(&self, query: &str) -> Option<TurnOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut states = vec![ChatState::Idle];

        let remote = match (&self.advisor, self.connectivity()) {
            (Some(advisor), Connectivity::Online) => Some(advisor),
            _ => None,
        };

        let (text, source) = match remote {
            Some(advisor) => {
                states.push(ChatState::AwaitingRemote);
                self.in_flight.fetch_add(1, Ordering::SeqCst);
                let result = tokio::time::timeout(self.remote_timeout, advisor.advise(query)).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);

                match result {
                    Ok(Ok(text)) if !text.trim().is_empty() => (text, ReplySource::Remote),
                    Ok(Ok(_)) => {
                        tracing::warn!(seq, backend = advisor.backend_name(), "advisor returned empty answer");
                        self.fallback(query)
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(seq, backend = advisor.backend_name(), error = %e, "advisor failed");
                        self.fallback(query)
                    }
                    Err(_) => {
                        tracing::warn!(
                            seq,
                            backend = advisor.backend_name(),
                            timeout_secs = self.remote_timeout.as_secs(),
                            "advisor timed out"
                        );
                        self.fallback(query)
                    }
                }
            }
            None => (
                self.guide.answer_offline(query),
                ReplySource::Offline {
                    after_remote_failure: false,
                },
            ),
        };

        states.push(ChatState::Responding);
        let previous = self.latest_answered.fetch_max(seq, Ordering::SeqCst);
        if previous > seq {
            tracing::debug!(seq, newer = previous, "dropping stale reply");
            return Some(TurnOutcome::Stale { seq });
        }
        states.push(ChatState::Idle);

        Some(TurnOutcome::Answered(ChatReply {
            seq,
            text,
            source,
            states,
        }))
    }

    fn fallback(&self, query: &str) -> (String, ReplySource) {
        let mut text = self.guide.answer_offline(query);
        text.push_str(OFFLINE_SWITCH_NOTE);
        (
            text,
            ReplySource::Offline {
                after_remote_failure: true,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FasalError;
    use async_trait::async_trait;

    struct FixedAdvisor(Result<String, String>);

    #[async_trait]
    impl RemoteAdvisor for FixedAdvisor {
        async fn advise(&self, _query: &str) -> Result<String, FasalError> {
            self.0.clone().map_err(FasalError::RemoteUnavailable)
        }

        fn backend_name(&self) -> &str {
            "fixed"
        }
    }

    /// Sleeps for a number of seconds taken from the query's first word.
    struct SleepyAdvisor;

    #[async_trait]
    impl RemoteAdvisor for SleepyAdvisor {
        async fn advise(&self, query: &str) -> Result<String, FasalError> {
            let secs: u64 = query
                .split_whitespace()
                .next()
                .and_then(|w| w.parse().ok())
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_secs(secs)).await;
            Ok(format!("remote: {query}"))
        }

        fn backend_name(&self) -> &str {
            "sleepy"
        }
    }

    fn guide() -> Arc<OfflineGuide> {
        Arc::new(OfflineGuide::builtin().unwrap())
    }

    fn answered(outcome: Option<TurnOutcome>) -> ChatReply {
        match outcome {
            Some(TurnOutcome::Answered(reply)) => reply,
            other => panic!("expected an answer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remote_success() {
        let assistant = Assistant::new(guide())
            .with_advisor(Arc::new(FixedAdvisor(Ok("Use 120 kg N".into()))));
        let reply = answered(assistant.ask("wheat fertilizer").await);
        assert_eq!(reply.text, "Use 120 kg N");
        assert_eq!(reply.source, ReplySource::Remote);
        assert_eq!(
            reply.states,
            vec![
                ChatState::Idle,
                ChatState::AwaitingRemote,
                ChatState::Responding,
                ChatState::Idle
            ]
        );
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_with_note() {
        let g = guide();
        let assistant =
            Assistant::new(g.clone()).with_advisor(Arc::new(FixedAdvisor(Err("503".into()))));
        let reply = answered(assistant.ask("fertilizer for wheat").await);
        let expected = format!("{}{}", g.answer_offline("fertilizer for wheat"), OFFLINE_SWITCH_NOTE);
        assert_eq!(reply.text, expected);
        assert_eq!(
            reply.source,
            ReplySource::Offline {
                after_remote_failure: true
            }
        );
    }

    #[tokio::test]
    async fn test_empty_remote_answer_falls_back() {
        let assistant =
            Assistant::new(guide()).with_advisor(Arc::new(FixedAdvisor(Ok("   ".into()))));
        let reply = answered(assistant.ask("rice pest").await);
        assert!(reply.text.ends_with(OFFLINE_SWITCH_NOTE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let assistant = Assistant::new(guide()).with_advisor(Arc::new(SleepyAdvisor));
        let reply = answered(assistant.ask("60 harvest maize").await);
        assert!(reply.text.starts_with("Harvest Maize"));
        assert!(reply.text.ends_with(OFFLINE_SWITCH_NOTE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_within_timeout_is_remote() {
        let assistant = Assistant::new(guide()).with_advisor(Arc::new(SleepyAdvisor));
        let reply = answered(assistant.ask("14 harvest maize").await);
        assert_eq!(reply.source, ReplySource::Remote);
    }

    #[tokio::test]
    async fn test_offline_mode_skips_advisor() {
        let assistant = Assistant::new(guide())
            .with_advisor(Arc::new(FixedAdvisor(Ok("remote".into()))));
        assistant.set_connectivity(Connectivity::Offline);
        let reply = answered(assistant.ask("tomato disease").await);
        assert!(!reply.text.ends_with(OFFLINE_SWITCH_NOTE));
        assert!(reply.text.contains("Leaf Curl Virus"));
        assert_eq!(
            reply.states,
            vec![ChatState::Idle, ChatState::Responding, ChatState::Idle]
        );
    }

    #[tokio::test]
    async fn test_no_advisor_has_no_note() {
        let assistant = Assistant::new(guide());
        let reply = answered(assistant.ask("xyz").await);
        assert_eq!(reply.text, guide().not_found_message());
        assert_eq!(
            reply.source,
            ReplySource::Offline {
                after_remote_failure: false
            }
        );
    }

    #[tokio::test]
    async fn test_blank_query_ignored() {
        let assistant = Assistant::new(guide());
        assert!(assistant.ask("   ").await.is_none());
        let reply = answered(assistant.ask("wheat").await);
        assert_eq!(reply.seq, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_older_turn_is_stale() {
        let assistant = Assistant::new(guide()).with_advisor(Arc::new(SleepyAdvisor));
        let (slow, fast) = tokio::join!(assistant.ask("5 wheat"), assistant.ask("1 rice"));
        assert_eq!(slow, Some(TurnOutcome::Stale { seq: 1 }));
        let fast = answered(fast);
        assert_eq!(fast.seq, 2);
        assert_eq!(fast.text, "remote: 1 rice");
        assert_eq!(assistant.state(), ChatState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_order_turns_both_answered() {
        let assistant = Assistant::new(guide()).with_advisor(Arc::new(SleepyAdvisor));
        let (first, second) = tokio::join!(assistant.ask("1 wheat"), assistant.ask("5 rice"));
        assert_eq!(answered(first).seq, 1);
        assert_eq!(answered(second).seq, 2);
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = TurnOutcome::Stale { seq: 3 };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "stale");
        assert_eq!(json["seq"], 3);
    }
}
