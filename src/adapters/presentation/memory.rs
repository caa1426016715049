//! Capturing presenter for tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::analysis::{AnalysisKind, AnalysisReport};
use crate::ports::ResultPresenter;

/// How long [`MemoryPresenter::wait_for_report`] polls before giving up.
const WAIT_LIMIT: Duration = Duration::from_secs(2);

/// Presenter that records everything it is handed.
#[derive(Default)]
pub struct MemoryPresenter {
    reports: Mutex<Vec<AnalysisReport>>,
    errors: Mutex<Vec<(AnalysisKind, String)>>,
}

impl MemoryPresenter {
    /// Creates an empty capture presenter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports presented so far.
    pub fn reports(&self) -> Vec<AnalysisReport> {
        self.reports
            .lock()
            .expect("MemoryPresenter: reports lock poisoned")
            .clone()
    }

    /// All inline errors presented so far.
    pub fn errors(&self) -> Vec<(AnalysisKind, String)> {
        self.errors
            .lock()
            .expect("MemoryPresenter: errors lock poisoned")
            .clone()
    }

    /// Polls until at least one report has been presented, then returns
    /// all reports. Panics after two seconds - producers run on spawned
    /// tasks, and a test that never presents is a failing test.
    pub async fn wait_for_report(&self) -> Vec<AnalysisReport> {
        let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
        loop {
            let reports = self.reports();
            if !reports.is_empty() {
                return reports;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("no report presented within {:?}", WAIT_LIMIT);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl ResultPresenter for MemoryPresenter {
    async fn present_report(&self, report: AnalysisReport) {
        self.reports
            .lock()
            .expect("MemoryPresenter: reports lock poisoned")
            .push(report);
    }

    async fn present_error(&self, kind: AnalysisKind, message: String) {
        self.errors
            .lock()
            .expect("MemoryPresenter: errors lock poisoned")
            .push((kind, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{ContextSnapshot, SectionResult};
    use crate::domain::foundation::CorrelationToken;
    use serde_json::json;

    #[tokio::test]
    async fn captures_reports_and_errors() {
        let presenter = MemoryPresenter::new();
        presenter
            .present_report(AnalysisReport::new(
                CorrelationToken::new(),
                ContextSnapshot::new(AnalysisKind::Swot, "desc", None),
                SectionResult::ready(json!({})),
                SectionResult::empty(),
            ))
            .await;
        presenter
            .present_error(AnalysisKind::Swot, "bad input".to_string())
            .await;

        assert_eq!(presenter.reports().len(), 1);
        assert_eq!(presenter.errors().len(), 1);
        assert_eq!(presenter.wait_for_report().await.len(), 1);
    }
}
