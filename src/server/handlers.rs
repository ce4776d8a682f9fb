//INFO: Request handlers for the data gateway
//NOTE: Stateless; the bearer token arrives in every request body

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use super::error::GatewayError;
use super::GatewayState;
use crate::integrations::{EventSummary, MessageSummary};

pub const DEFAULT_MAX_RESULTS: u32 = 10;

const GMAIL_FAILURE: &str = "Failed to fetch Gmail messages";
const CALENDAR_FAILURE: &str = "Failed to fetch calendar events";

//INFO: Body accepted by both endpoints
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl FetchRequest {
    //INFO: Missing or zero means the default
    pub fn max_results(&self) -> u32 {
        self.max_results
            .filter(|count| *count > 0)
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<EventSummary>,
}

//INFO: Parses the body and pulls out a usable token
//NOTE: An unreadable body is reported like an upstream failure
fn parse_request(body: &Bytes, failure: &'static str) -> Result<(String, u32), GatewayError> {
    let request: FetchRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            let source = anyhow::Error::new(e).context("Invalid request body");
            return Err(GatewayError::upstream(failure, source));
        }
    };

    let max_results = request.max_results();
    let access_token = request
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or(GatewayError::MissingAccessToken)?;

    Ok((access_token, max_results))
}

//INFO: POST /api/gmail
pub async fn gmail_messages(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<MessagesResponse>, GatewayError> {
    let (access_token, max_results) = parse_request(&body, GMAIL_FAILURE).inspect_err(log_failure)?;
    info!("Fetching up to {} Gmail messages", max_results);

    let messages = state
        .google
        .list_inbox_messages(&access_token, max_results)
        .await
        .map_err(|e| GatewayError::upstream(GMAIL_FAILURE, e))
        .inspect_err(log_failure)?;

    Ok(Json(MessagesResponse { messages }))
}

//INFO: POST /api/calendar
pub async fn calendar_events(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<EventsResponse>, GatewayError> {
    let (access_token, max_results) =
        parse_request(&body, CALENDAR_FAILURE).inspect_err(log_failure)?;
    info!("Fetching up to {} calendar events", max_results);

    let events = state
        .google
        .list_upcoming_events(&access_token, max_results, Utc::now())
        .await
        .map_err(|e| GatewayError::upstream(CALENDAR_FAILURE, e))
        .inspect_err(log_failure)?;

    Ok(Json(EventsResponse { events }))
}

//INFO: GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn log_failure(error: &GatewayError) {
    match error {
        GatewayError::MissingAccessToken => info!("Rejected request without access token"),
        GatewayError::Upstream { message, source } => error!("{}: {:#}", message, source),
    }
}
