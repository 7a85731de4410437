//! GitHub webhook receiver
//!
//! Turns `check_run` and `status` events into a check update for the
//! commit they refer to. Every other event type is acknowledged and dropped.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::checks::github::CHECK_NAME;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Header carrying the event type
pub const EVENT_HEADER: &str = "x-github-event";

#[derive(Debug, Deserialize)]
struct CheckRunEvent {
    #[serde(default)]
    action: Option<String>,
    check_run: CheckRun,
}

#[derive(Debug, Deserialize)]
struct CheckRun {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    head_sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusEvent {
    sha: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub event: String,
    pub dispatched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Decide which commit, if any, an event asks us to refresh.
///
/// A `check_run` named after our own check is skipped unless a user
/// re-requested it; reacting to it would loop on our own updates.
pub fn commit_to_update(event: &str, body: &[u8]) -> Result<Option<String>, ApiError> {
    match event {
        "check_run" => {
            let payload: CheckRunEvent = serde_json::from_slice(body)
                .map_err(|e| ApiError::bad_request(format!("invalid check_run payload: {}", e)))?;

            let rerequested = payload.action.as_deref() == Some("rerequested");
            if payload.check_run.name.as_deref() != Some(CHECK_NAME) || rerequested {
                payload
                    .check_run
                    .head_sha
                    .map(Some)
                    .ok_or_else(|| ApiError::bad_request("check_run.head_sha is required"))
            } else {
                Ok(None)
            }
        }
        "status" => {
            let payload: StatusEvent = serde_json::from_slice(body)
                .map_err(|e| ApiError::bad_request(format!("invalid status payload: {}", e)))?;
            Ok(Some(payload.sha))
        }
        _ => Ok(None),
    }
}

/// POST /api/v1/github/webhook
async fn receive(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let event = headers
        .get(EVENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let sha = commit_to_update(&event, &body)?;

    match sha {
        Some(ref sha) => {
            tracing::info!(event = %event, sha = %sha, "updating check from webhook");
            state.checks.create_or_update_check(sha).await?;
        }
        None => tracing::debug!(event = %event, "webhook event ignored"),
    }

    Ok(Json(WebhookResponse {
        event,
        dispatched: sha.is_some(),
        sha,
    }))
}

/// Webhook routes, under the current path and the legacy PHP one
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/github/webhook", post(receive))
        .route("/api/v1/GitHub/webhook.php", post(receive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_event_forwards_sha() {
        let sha = commit_to_update("status", br#"{"sha": "abc123", "state": "success"}"#).unwrap();
        assert_eq!(sha.as_deref(), Some("abc123"));
    }

    #[test]
    fn own_check_run_is_ignored() {
        let body = br#"{"action": "completed", "check_run": {"name": "CDash", "head_sha": "abc"}}"#;
        assert_eq!(commit_to_update("check_run", body).unwrap(), None);
    }

    #[test]
    fn own_check_run_without_sha_is_still_ignored() {
        let body = br#"{"action": "created", "check_run": {"name": "CDash"}}"#;
        assert_eq!(commit_to_update("check_run", body).unwrap(), None);
    }

    #[test]
    fn rerequested_own_check_run_forwards_sha() {
        let body = br#"{"action": "rerequested", "check_run": {"name": "CDash", "head_sha": "abc"}}"#;
        assert_eq!(commit_to_update("check_run", body).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn foreign_check_run_forwards_sha() {
        let body = br#"{"action": "completed", "check_run": {"name": "ci/travis", "head_sha": "def"}}"#;
        assert_eq!(commit_to_update("check_run", body).unwrap().as_deref(), Some("def"));
    }

    #[test]
    fn check_run_without_name_forwards_sha() {
        let body = br#"{"action": "completed", "check_run": {"head_sha": "abc"}}"#;
        assert_eq!(commit_to_update("check_run", body).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn unknown_events_are_ignored_without_parsing() {
        assert_eq!(commit_to_update("push", b"not json").unwrap(), None);
        assert_eq!(commit_to_update("", b"").unwrap(), None);
    }

    #[test]
    fn status_without_sha_is_bad_request() {
        let err = commit_to_update("status", br#"{"state": "pending"}"#).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[test]
    fn foreign_check_run_without_sha_is_bad_request() {
        let body = br#"{"check_run": {"name": "other"}}"#;
        assert!(matches!(
            commit_to_update("check_run", body),
            Err(ApiError::BadRequest { .. })
        ));
    }
}
