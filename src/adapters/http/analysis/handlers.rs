//! HTTP handlers for analysis endpoints.
//!
//! The start endpoint accepts a multipart form (`kind`,
//! `business_description`, optional `document` file) and dispatches to the
//! dual-source launcher or the direct-only template depending on the kind.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::handlers::{
    DirectAnalysisCommand, DirectAnalysisError, DirectAnalysisHandler, RunAnalysisCommand,
    RunAnalysisError, RunAnalysisHandler,
};
use crate::domain::analysis::{AnalysisKind, AttachedFile};

use super::super::middleware::RequireAuth;
use super::dto::{AnalysisStartedResponse, ErrorResponse, ReportResponse};

/// Shared state for the analysis endpoints.
#[derive(Clone)]
pub struct AnalysisAppState {
    pub run_handler: Arc<RunAnalysisHandler>,
    pub direct_handler: Arc<DirectAnalysisHandler>,
}

impl AnalysisAppState {
    pub fn new(
        run_handler: Arc<RunAnalysisHandler>,
        direct_handler: Arc<DirectAnalysisHandler>,
    ) -> Self {
        Self {
            run_handler,
            direct_handler,
        }
    }
}

/// Parsed multipart form for starting an analysis.
struct StartAnalysisForm {
    kind: AnalysisKind,
    business_description: String,
    attachment: Option<AttachedFile>,
}

/// Start an analysis.
///
/// POST /api/analyses
pub async fn start_analysis(
    State(state): State<AnalysisAppState>,
    RequireAuth(user): RequireAuth,
    multipart: Multipart,
) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(message)),
            )
                .into_response()
        }
    };

    if form.kind.is_dual_source() {
        let command = RunAnalysisCommand {
            kind: form.kind,
            business_description: form.business_description,
            attachment: form.attachment,
        };
        match state.run_handler.handle(command, &user).await {
            Ok(started) => (
                StatusCode::ACCEPTED,
                Json(AnalysisStartedResponse::processing(started.token, form.kind)),
            )
                .into_response(),
            Err(err) => run_error_response(err),
        }
    } else {
        let command = DirectAnalysisCommand {
            kind: form.kind,
            business_description: form.business_description,
            attachment: form.attachment,
        };
        match state.direct_handler.handle(command, &user).await {
            Ok(report) => (StatusCode::OK, Json(ReportResponse { report })).into_response(),
            Err(err) => direct_error_response(err),
        }
    }
}

/// Reads the start-analysis multipart form.
async fn read_form(mut multipart: Multipart) -> Result<StartAnalysisForm, String> {
    let mut kind: Option<AnalysisKind> = None;
    let mut business_description: Option<String> = None;
    let mut attachment: Option<AttachedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("malformed multipart body: {}", e))?
    {
        // field.text()/bytes() consume the field, so copy the name first.
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("kind") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| format!("unreadable 'kind' field: {}", e))?;
                kind = Some(raw.parse().map_err(|_| format!("unknown kind '{}'", raw))?);
            }
            Some("business_description") => {
                business_description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| format!("unreadable 'business_description' field: {}", e))?,
                );
            }
            Some("document") => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("unreadable 'document' field: {}", e))?;
                attachment = Some(AttachedFile::new(file_name, content_type, bytes.to_vec()));
            }
            _ => {
                // Unknown fields are ignored for forward compatibility.
            }
        }
    }

    Ok(StartAnalysisForm {
        kind: kind.ok_or("missing 'kind' field")?,
        business_description: business_description.ok_or("missing 'business_description' field")?,
        attachment,
    })
}

fn run_error_response(err: RunAnalysisError) -> Response {
    match err {
        RunAnalysisError::Validation(_) | RunAnalysisError::UnsupportedKind { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(err.to_string())),
        )
            .into_response(),
        RunAnalysisError::Extraction(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::unprocessable(err.to_string())),
        )
            .into_response(),
    }
}

fn direct_error_response(err: DirectAnalysisError) -> Response {
    match err {
        DirectAnalysisError::Validation(_) | DirectAnalysisError::UnsupportedKind { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(err.to_string())),
        )
            .into_response(),
        DirectAnalysisError::Extraction(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::unprocessable(err.to_string())),
        )
            .into_response(),
    }
}
