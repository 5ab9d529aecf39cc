//! Trigger dispatch
//!
//! Runs one cross-seed trigger per confirmed info hash, strictly after the
//! selection session has ended. Each call is bounded by a timeout and a
//! failure never stops the rest of the batch.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::api::cross_seed::TriggerError;

/// Per-request bound for a single trigger call
pub const DEFAULT_TRIGGER_TIMEOUT: Duration = Duration::from_secs(30);

/// Fields sent with every trigger call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerRequest {
    pub info_hash: String,
    pub include_single_episodes: bool,
}

/// Something that can ask the cross-seed service to search for one torrent
pub trait Trigger {
    fn trigger(
        &self,
        request: &TriggerRequest,
    ) -> impl Future<Output = Result<(), TriggerError>> + Send;
}

/// Result of one trigger call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemStatus {
    Success,
    Failed { reason: String },
}

/// Per-hash outcome as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub info_hash: String,
    #[serde(flatten)]
    pub status: ItemStatus,
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ItemStatus::Success)
    }
}

/// Aggregate outcome of a dispatch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<ItemOutcome>,
}

impl DispatchReport {
    fn record(&mut self, outcome: ItemOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.items.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Sequential dispatcher over a [`Trigger`]
pub struct Dispatcher<T> {
    trigger: T,
    include_single_episodes: bool,
    timeout: Duration,
}

impl<T: Trigger> Dispatcher<T> {
    /// Create a dispatcher with the default per-request timeout
    pub fn new(trigger: T, include_single_episodes: bool) -> Self {
        Self {
            trigger,
            include_single_episodes,
            timeout: DEFAULT_TRIGGER_TIMEOUT,
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn trigger(&self) -> &T {
        &self.trigger
    }

    /// Trigger every hash in order, calling `on_item` as each one completes
    pub async fn run<F>(&self, info_hashes: &[String], on_item: F) -> DispatchReport
    where
        F: FnMut(&ItemOutcome),
    {
        self.run_with_progress(info_hashes, |_| {}, on_item).await
    }

    /// Like [`Dispatcher::run`], also calling `on_start` before each request
    pub async fn run_with_progress<S, F>(
        &self,
        info_hashes: &[String],
        mut on_start: S,
        mut on_item: F,
    ) -> DispatchReport
    where
        S: FnMut(&str),
        F: FnMut(&ItemOutcome),
    {
        let mut report = DispatchReport::default();

        for info_hash in info_hashes {
            on_start(info_hash);
            let request = TriggerRequest {
                info_hash: info_hash.clone(),
                include_single_episodes: self.include_single_episodes,
            };

            let result = match tokio::time::timeout(self.timeout, self.trigger.trigger(&request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(TriggerError::Timeout(self.timeout)),
            };

            let status = match result {
                Ok(()) => {
                    tracing::info!(%info_hash, "Successfully triggered cross-seed");
                    ItemStatus::Success
                }
                Err(e) => {
                    tracing::error!(%info_hash, error = %e, "Failed to trigger cross-seed");
                    ItemStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            let outcome = ItemOutcome {
                info_hash: info_hash.clone(),
                status,
            };
            on_item(&outcome);
            report.record(outcome);
        }

        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "Dispatch completed"
        );
        report
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Fails for hashes listed in `failing`, records every request
    #[derive(Default)]
    struct ScriptedTrigger {
        failing: Vec<&'static str>,
        seen: Mutex<Vec<TriggerRequest>>,
    }

    impl Trigger for ScriptedTrigger {
        async fn trigger(&self, request: &TriggerRequest) -> Result<(), TriggerError> {
            self.seen.lock().unwrap().push(request.clone());
            if self.failing.contains(&request.info_hash.as_str()) {
                Err(TriggerError::Status(500))
            } else {
                Ok(())
            }
        }
    }

    fn hashes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let trigger = ScriptedTrigger {
            failing: vec!["B"],
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(trigger, true);

        let report = dispatcher.run(&hashes(&["A", "B", "C"]), |_| {}).await;

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total(), 3);
        assert!(!report.all_succeeded());
        assert_eq!(dispatcher.trigger().seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_callback_sees_items_in_order() {
        let dispatcher = Dispatcher::new(ScriptedTrigger::default(), false);
        let mut order = Vec::new();

        dispatcher
            .run(&hashes(&["x", "y"]), |item| order.push(item.info_hash.clone()))
            .await;

        assert_eq!(order, ["x", "y"]);
    }

    #[tokio::test]
    async fn test_start_reported_before_request_completes() {
        let trigger = ScriptedTrigger {
            failing: vec!["y"],
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(trigger, true);
        let events = std::cell::RefCell::new(Vec::new());

        dispatcher
            .run_with_progress(
                &hashes(&["x", "y"]),
                |hash| {
                    let sent = dispatcher.trigger().seen.lock().unwrap().len();
                    events.borrow_mut().push(format!("start {} after {}", hash, sent));
                },
                |item| {
                    events
                        .borrow_mut()
                        .push(format!("done {} {}", item.info_hash, item.is_success()))
                },
            )
            .await;

        assert_eq!(
            events.into_inner(),
            [
                "start x after 0",
                "done x true",
                "start y after 1",
                "done y false"
            ]
        );
    }

    #[tokio::test]
    async fn test_include_single_episodes_forwarded() {
        let dispatcher = Dispatcher::new(ScriptedTrigger::default(), false);
        dispatcher.run(&hashes(&["a", "b"]), |_| {}).await;

        let seen = dispatcher.trigger().seen.lock().unwrap();
        assert!(seen.iter().all(|r| !r.include_single_episodes));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let dispatcher = Dispatcher::new(ScriptedTrigger::default(), true);
        let report = dispatcher.run(&[], |_| {}).await;
        assert_eq!(report, DispatchReport::default());
        assert!(report.all_succeeded());
    }

    #[test]
    fn test_report_serializes_status() {
        let mut report = DispatchReport::default();
        report.record(ItemOutcome {
            info_hash: "A".into(),
            status: ItemStatus::Success,
        });
        report.record(ItemOutcome {
            info_hash: "B".into(),
            status: ItemStatus::Failed {
                reason: "timed out".into(),
            },
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["succeeded"], 1);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["items"][0]["status"], "success");
        assert_eq!(json["items"][1]["status"], "failed");
        assert_eq!(json["items"][1]["reason"], "timed out");
    }
}
