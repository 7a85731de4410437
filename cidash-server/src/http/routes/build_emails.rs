//! Read-only view of the emails sent for a build

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::BuildEmailRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct SentEmail {
    pub user_id: Option<i32>,
    pub email: Option<String>,
    pub category: Option<i16>,
    pub time: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub struct SentEmailsResponse {
    pub build_id: i32,
    pub count: usize,
    pub emails: Vec<SentEmail>,
}

/// GET /api/v1/builds/{build_id}/emails
async fn list_sent(
    State(state): State<Arc<AppState>>,
    Path(build_id): Path<i32>,
) -> Result<Json<SentEmailsResponse>, ApiError> {
    let collection = BuildEmailRepo::new(&state.pool).sent_for_build(build_id).await?;

    let emails: Vec<SentEmail> = collection
        .iter()
        .map(|e| SentEmail {
            user_id: e.user_id(),
            email: e.email().map(str::to_owned),
            category: e.category(),
            time: e.time(),
        })
        .collect();

    Ok(Json(SentEmailsResponse {
        build_id,
        count: emails.len(),
        emails,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/builds/{build_id}/emails", get(list_sent))
}
