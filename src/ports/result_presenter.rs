//! Result Presenter Port - Delivery of finished analysis output.
//!
//! The presenter is the boundary to whatever displays results (connected
//! websocket clients in production, a capture buffer in tests). The
//! application guarantees it is only ever handed fully-merged, validated
//! reports - never partial state - plus inline errors for failed setup.

use async_trait::async_trait;

use crate::domain::analysis::{AnalysisKind, AnalysisReport};

/// Port for presenting analysis output to the user.
#[async_trait]
pub trait ResultPresenter: Send + Sync {
    /// Presents a fully-merged analysis report.
    async fn present_report(&self, report: AnalysisReport);

    /// Presents an inline error for an analysis that failed during setup,
    /// before any producer launched.
    async fn present_error(&self, kind: AnalysisKind, message: String);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn ResultPresenter) {}
}
