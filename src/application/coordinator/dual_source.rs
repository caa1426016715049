//! The dual-source analysis coordinator.
//!
//! Holds the single live [`AnalysisSession`] behind a mutex. Producer
//! completions arrive on arbitrary tasks in arbitrary order; the slot
//! mutation and merge check run inside the critical section, while
//! presentation happens after the lock is released. The `merged` flag is
//! set before the lock drops, so a concurrent duplicate completion can
//! never trigger a second merge even while presentation is in flight.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::domain::analysis::{AnalysisReport, ContextSnapshot, SectionResult};
use crate::domain::foundation::CorrelationToken;
use crate::ports::ResultPresenter;

use super::{AnalysisSession, MergeOutcome, ProducerSlot};

/// Observable coordinator state, derived from the session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No analysis in flight.
    Idle,
    /// Both producers launched; zero or one result received.
    AwaitingBoth,
    /// Both results received; presentation is running or about to.
    Merged,
}

/// Coordinates the two producers of a dual-source analysis.
pub struct AnalysisCoordinator {
    current: Mutex<Option<AnalysisSession>>,
    presenter: Arc<dyn ResultPresenter>,
}

impl AnalysisCoordinator {
    /// Creates a coordinator that hands merged reports to the presenter.
    pub fn new(presenter: Arc<dyn ResultPresenter>) -> Self {
        Self {
            current: Mutex::new(None),
            presenter,
        }
    }

    /// Starts a new session, superseding any live one.
    ///
    /// Returns the fresh correlation token both producers must report
    /// under. Late results for the superseded session are discarded by
    /// token mismatch.
    pub fn begin(&self, snapshot: ContextSnapshot) -> CorrelationToken {
        let token = CorrelationToken::new();
        let mut guard = self.lock();
        if let Some(old) = guard.take() {
            debug!(
                superseded = %old.token,
                new = %token,
                "superseding in-flight analysis session"
            );
        }
        *guard = Some(AnalysisSession::new(token, snapshot));
        token
    }

    /// Clears the session after an unrecoverable setup failure.
    ///
    /// No-op if the token no longer identifies the live session.
    pub fn abort(&self, token: CorrelationToken) {
        let mut guard = self.lock();
        if guard.as_ref().is_some_and(|s| s.token == token) {
            *guard = None;
        }
    }

    /// Records the direct LLM producer's result.
    pub async fn record_primary(
        &self,
        token: CorrelationToken,
        result: SectionResult,
    ) -> MergeOutcome {
        self.record(ProducerSlot::Primary, token, result).await
    }

    /// Records the delayed workflow producer's result.
    pub async fn record_secondary(
        &self,
        token: CorrelationToken,
        result: SectionResult,
    ) -> MergeOutcome {
        self.record(ProducerSlot::Secondary, token, result).await
    }

    /// Returns the live session's token, if any.
    pub fn current_token(&self) -> Option<CorrelationToken> {
        self.lock().as_ref().map(|s| s.token)
    }

    /// Returns the observable phase of the coordinator.
    pub fn phase(&self) -> SessionPhase {
        match self.lock().as_ref() {
            None => SessionPhase::Idle,
            Some(session) if session.merged => SessionPhase::Merged,
            Some(_) => SessionPhase::AwaitingBoth,
        }
    }

    async fn record(
        &self,
        slot: ProducerSlot,
        token: CorrelationToken,
        result: SectionResult,
    ) -> MergeOutcome {
        let report = {
            let mut guard = self.lock();
            let Some(session) = guard.as_mut() else {
                debug!(%token, ?slot, "dropping result: no live session");
                return MergeOutcome::Stale;
            };
            if session.token != token {
                debug!(%token, live = %session.token, ?slot, "dropping result for superseded session");
                return MergeOutcome::Stale;
            }
            if session.merged {
                debug!(%token, ?slot, "dropping result: session already merged");
                return MergeOutcome::Duplicate;
            }
            if !session.record(slot, result) {
                debug!(%token, ?slot, "dropping result: slot already filled");
                return MergeOutcome::Duplicate;
            }
            if !session.is_complete() {
                return MergeOutcome::Recorded;
            }

            session.merged = true;
            AnalysisReport::new(
                session.token,
                session.snapshot.clone(),
                session
                    .primary
                    .clone()
                    .unwrap_or_else(SectionResult::empty),
                session
                    .secondary
                    .clone()
                    .unwrap_or_else(SectionResult::empty),
            )
        };

        // Lock released; duplicates arriving from here on hit the merged
        // flag (or an empty slot after the clear below).
        self.presenter.present_report(report).await;

        let mut guard = self.lock();
        if guard.as_ref().is_some_and(|s| s.token == token) {
            *guard = None;
        }
        MergeOutcome::Merged
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<AnalysisSession>> {
        self.current
            .lock()
            .expect("AnalysisCoordinator: session lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::presentation::MemoryPresenter;
    use crate::domain::analysis::AnalysisKind;
    use serde_json::json;

    fn setup() -> (Arc<MemoryPresenter>, AnalysisCoordinator) {
        let presenter = Arc::new(MemoryPresenter::new());
        let coordinator = AnalysisCoordinator::new(presenter.clone());
        (presenter, coordinator)
    }

    fn snapshot() -> ContextSnapshot {
        ContextSnapshot::new(AnalysisKind::Objectives, "a logistics startup", None)
    }

    #[tokio::test]
    async fn primary_then_secondary_merges_once() {
        let (presenter, coordinator) = setup();
        let token = coordinator.begin(snapshot());

        let first = coordinator
            .record_primary(token, SectionResult::ready(json!({"objectives": []})))
            .await;
        assert_eq!(first, MergeOutcome::Recorded);
        assert_eq!(coordinator.phase(), SessionPhase::AwaitingBoth);

        let second = coordinator
            .record_secondary(token, SectionResult::ready(json!({"insights": []})))
            .await;
        assert_eq!(second, MergeOutcome::Merged);

        let reports = presenter.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].primary.is_ready());
        assert!(reports[0].secondary.is_ready());
        assert_eq!(coordinator.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn secondary_then_primary_merges_identically() {
        let (presenter, coordinator) = setup();
        let token = coordinator.begin(snapshot());

        assert_eq!(
            coordinator
                .record_secondary(token, SectionResult::ready(json!({"insights": []})))
                .await,
            MergeOutcome::Recorded
        );
        assert_eq!(
            coordinator
                .record_primary(token, SectionResult::failed("model unavailable"))
                .await,
            MergeOutcome::Merged
        );

        let reports = presenter.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].primary,
            SectionResult::failed("model unavailable")
        );
    }

    #[tokio::test]
    async fn placeholder_results_still_merge() {
        let (presenter, coordinator) = setup();
        let token = coordinator.begin(snapshot());

        coordinator
            .record_primary(token, SectionResult::failed("boom"))
            .await;
        coordinator
            .record_secondary(token, SectionResult::empty())
            .await;

        let reports = presenter.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].primary, SectionResult::failed("boom"));
        assert_eq!(reports[0].secondary, SectionResult::empty());
    }

    #[tokio::test]
    async fn duplicate_completion_after_merge_is_ignored() {
        let (presenter, coordinator) = setup();
        let token = coordinator.begin(snapshot());

        coordinator
            .record_primary(token, SectionResult::ready(json!({})))
            .await;
        coordinator
            .record_secondary(token, SectionResult::ready(json!({})))
            .await;

        let outcome = coordinator
            .record_secondary(token, SectionResult::ready(json!({"late": true})))
            .await;
        assert_eq!(outcome, MergeOutcome::Stale);
        assert_eq!(presenter.reports().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_before_merge_does_not_overwrite() {
        let (presenter, coordinator) = setup();
        let token = coordinator.begin(snapshot());

        coordinator
            .record_secondary(token, SectionResult::ready(json!({"v": 1})))
            .await;
        let outcome = coordinator
            .record_secondary(token, SectionResult::ready(json!({"v": 2})))
            .await;
        assert_eq!(outcome, MergeOutcome::Duplicate);

        coordinator
            .record_primary(token, SectionResult::ready(json!({})))
            .await;
        assert_eq!(presenter.reports()[0].secondary.payload().unwrap()["v"], 1);
    }

    #[tokio::test]
    async fn stale_token_is_dropped_without_mutation() {
        let (presenter, coordinator) = setup();
        let _token = coordinator.begin(snapshot());
        let stranger = CorrelationToken::new();

        let outcome = coordinator
            .record_primary(stranger, SectionResult::ready(json!({})))
            .await;
        assert_eq!(outcome, MergeOutcome::Stale);
        assert_eq!(coordinator.phase(), SessionPhase::AwaitingBoth);
        assert!(presenter.reports().is_empty());
    }

    #[tokio::test]
    async fn new_analysis_supersedes_previous_session() {
        let (presenter, coordinator) = setup();
        let old = coordinator.begin(snapshot());
        coordinator
            .record_primary(old, SectionResult::ready(json!({})))
            .await;

        let new = coordinator.begin(snapshot());
        assert_eq!(coordinator.current_token(), Some(new));

        // The superseded session's eventual result is discarded.
        let outcome = coordinator
            .record_secondary(old, SectionResult::ready(json!({})))
            .await;
        assert_eq!(outcome, MergeOutcome::Stale);
        assert!(presenter.reports().is_empty());

        // The new session still merges normally.
        coordinator
            .record_primary(new, SectionResult::ready(json!({})))
            .await;
        coordinator
            .record_secondary(new, SectionResult::empty())
            .await;
        assert_eq!(presenter.reports().len(), 1);
    }

    #[tokio::test]
    async fn abort_clears_only_matching_session() {
        let (_presenter, coordinator) = setup();
        let token = coordinator.begin(snapshot());
        coordinator.abort(CorrelationToken::new());
        assert_eq!(coordinator.phase(), SessionPhase::AwaitingBoth);

        coordinator.abort(token);
        assert_eq!(coordinator.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn session_without_secondary_waits_indefinitely() {
        let (presenter, coordinator) = setup();
        let token = coordinator.begin(snapshot());
        coordinator
            .record_primary(token, SectionResult::ready(json!({})))
            .await;

        // No timeout fires; the session stays parked until superseded.
        assert_eq!(coordinator.phase(), SessionPhase::AwaitingBoth);
        assert!(presenter.reports().is_empty());
    }
}
