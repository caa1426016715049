//! The generic single-producer analysis template.
//!
//! Direct-only kinds run one completion with an explicit timeout - the one
//! cancellation point in the system - then validate, annotate, and present.
//! A producer failure still presents a report whose primary section is the
//! failure placeholder; only setup failures return errors.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::analysis::{
    AnalysisKind, AnalysisReport, AttachedFile, ContextSnapshot, SectionResult,
};
use crate::domain::foundation::{AuthenticatedUser, CorrelationToken, ValidationError};
use crate::ports::{
    AiProvider, ExtractionError, ResultPresenter, ShapeValidator, TextExtractor,
};

use super::run_analysis::run_completion;

/// Command to run a direct-only analysis.
#[derive(Debug, Clone)]
pub struct DirectAnalysisCommand {
    /// Which analysis to run; must not be a dual-source kind.
    pub kind: AnalysisKind,
    /// The user's business description.
    pub business_description: String,
    /// Optional document attachment.
    pub attachment: Option<AttachedFile>,
}

/// Setup-time failures; nothing was presented when one of these is returned.
#[derive(Debug, Error)]
pub enum DirectAnalysisError {
    /// Required input missing or empty.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The attachment could not be converted to text.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The kind uses the workflow producer and belongs to the dual-source path.
    #[error("analysis kind '{kind}' uses the workflow producer")]
    UnsupportedKind {
        /// The offending kind.
        kind: AnalysisKind,
    },
}

/// Handler for the direct-only analysis kinds.
pub struct DirectAnalysisHandler {
    ai: Arc<dyn AiProvider>,
    extractor: Arc<dyn TextExtractor>,
    shapes: Arc<dyn ShapeValidator>,
    presenter: Arc<dyn ResultPresenter>,
    timeout: Duration,
}

impl DirectAnalysisHandler {
    /// Creates a handler with the given completion timeout.
    pub fn new(
        ai: Arc<dyn AiProvider>,
        extractor: Arc<dyn TextExtractor>,
        shapes: Arc<dyn ShapeValidator>,
        presenter: Arc<dyn ResultPresenter>,
        timeout: Duration,
    ) -> Self {
        Self {
            ai,
            extractor,
            shapes,
            presenter,
            timeout,
        }
    }

    /// Runs the analysis to completion and presents the report.
    pub async fn handle(
        &self,
        command: DirectAnalysisCommand,
        user: &AuthenticatedUser,
    ) -> Result<AnalysisReport, DirectAnalysisError> {
        let kind = command.kind;
        if kind.is_dual_source() {
            return Err(DirectAnalysisError::UnsupportedKind { kind });
        }

        let snapshot = match self.gather(&command) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.presenter.present_error(kind, err.to_string()).await;
                return Err(err);
            }
        };

        info!(kind = %kind, user = %user.id, "direct analysis started");

        let primary = match tokio::time::timeout(
            self.timeout,
            run_completion(self.ai.as_ref(), self.shapes.as_ref(), &snapshot),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(kind = %kind, timeout_secs = self.timeout.as_secs(), "completion timed out");
                SectionResult::failed(format!(
                    "analysis failed: no response within {}s",
                    self.timeout.as_secs()
                ))
            }
        };

        let report = AnalysisReport::new(
            CorrelationToken::new(),
            snapshot,
            primary,
            SectionResult::empty(),
        );
        self.presenter.present_report(report.clone()).await;
        Ok(report)
    }

    fn gather(
        &self,
        command: &DirectAnalysisCommand,
    ) -> Result<ContextSnapshot, DirectAnalysisError> {
        if command.business_description.trim().is_empty() {
            return Err(ValidationError::empty_field("business_description").into());
        }

        let document_text = command
            .attachment
            .as_ref()
            .map(|file| self.extractor.extract(file))
            .transpose()?;

        Ok(ContextSnapshot::new(
            command.kind,
            command.business_description.trim(),
            document_text,
        ))
    }
}
