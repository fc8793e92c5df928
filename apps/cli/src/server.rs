//! HTTP service for profile lookups.
//!
//! `GET /api/v1/profile/:username` runs one fetch + extraction and replies
//! with the same JSON body the `fetch` command prints. Success replies are
//! `200`, unusable pages `503`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use color_eyre::eyre::Result;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use profilescout_core::{ProfileResponse, scrape_profile};
use profilescout_fetcher::PageFetcher;
use profilescout_shared::ProfileScoutError;

/// Shared handler state.
#[derive(Clone)]
pub(crate) struct AppState {
    fetcher: Arc<dyn PageFetcher>,
    url_template: Arc<str>,
    /// Expected bearer token; `None` disables authentication.
    auth_token: Option<Arc<str>>,
}

impl AppState {
    pub(crate) fn new(
        fetcher: Arc<dyn PageFetcher>,
        url_template: String,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            url_template: url_template.into(),
            auth_token: auth_token.map(Into::into),
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.auth_token else {
            return true;
        };
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| tokens_match(token.as_bytes(), expected.as_bytes()))
    }
}

/// Byte-exact comparison whose running time does not depend on where the
/// inputs first differ.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

/// Build the axum Router with all endpoints.
pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/profile/:username", get(get_profile))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub(crate) async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("profile service listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response {
    let span = info_span!("profile_request", request_id = %Uuid::now_v7(), %username);

    async move {
        if !state.authorized(&headers) {
            warn!("rejected request with missing or wrong token");
            return reply(StatusCode::UNAUTHORIZED, ProfileResponse::failure("unauthorized"));
        }

        match scrape_profile(state.fetcher.as_ref(), &state.url_template, &username).await {
            Ok(response) if response.is_ok() => reply(StatusCode::OK, response),
            Ok(response) => reply(StatusCode::SERVICE_UNAVAILABLE, response),
            Err(ProfileScoutError::Validation { message }) => {
                info!(%message, "invalid profile request");
                reply(StatusCode::BAD_REQUEST, ProfileResponse::failure("invalid username"))
            }
            Err(e) => {
                warn!(error = %e, "profile request failed before fetching");
                reply(StatusCode::INTERNAL_SERVER_ERROR, ProfileResponse::failure("internal error"))
            }
        }
    }
    .instrument(span)
    .await
}

fn reply(status: StatusCode, body: ProfileResponse) -> Response {
    (status, Json(body)).into_response()
}
