//INFO: Gmail inbox listing for the data gateway
//NOTE: Lists INBOX ids, then fetches every message in full and flattens it

use anyhow::Result;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::google_api::GoogleApi;

//INFO: Longest body excerpt returned, in characters
pub const BODY_PREVIEW_LIMIT: usize = 500;

//INFO: Flattened message handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub date: String,
    pub snippet: Option<String>,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Option<Vec<MessageRef>>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GmailMessage {
    snippet: Option<String>,
    payload: Option<MessagePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessagePart {
    mime_type: Option<String>,
    #[serde(default)]
    headers: Vec<MessageHeader>,
    body: Option<MessagePartBody>,
    parts: Option<Vec<MessagePart>>,
}

#[derive(Debug, Deserialize)]
struct MessageHeader {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct MessagePartBody {
    data: Option<String>,
}

impl GoogleApi {
    //INFO: Most recent inbox messages, newest first as Gmail orders them
    pub async fn list_inbox_messages(
        &self,
        access_token: &str,
        max_results: u32,
    ) -> Result<Vec<MessageSummary>> {
        let list: MessageList = self
            .get_json(
                &self.gmail_url("/users/me/messages"),
                access_token,
                &[
                    ("maxResults", max_results.to_string()),
                    ("labelIds", "INBOX".to_string()),
                ],
            )
            .await?;

        let references = list.messages.unwrap_or_default();
        debug!("Fetching {} Gmail messages", references.len());

        let summaries = references
            .iter()
            .map(|item| self.get_message_summary(access_token, &item.id));
        try_join_all(summaries).await
    }

    async fn get_message_summary(&self, access_token: &str, id: &str) -> Result<MessageSummary> {
        let message: GmailMessage = self
            .get_json(
                &self.gmail_url(&format!("/users/me/messages/{}", id)),
                access_token,
                &[("format", "full".to_string())],
            )
            .await?;

        Ok(summarize_message(id, message))
    }
}

fn summarize_message(id: &str, message: GmailMessage) -> MessageSummary {
    let payload = message.payload.unwrap_or_default();

    MessageSummary {
        id: id.to_string(),
        subject: header_or(&payload.headers, "Subject", "No Subject"),
        from: header_or(&payload.headers, "From", "Unknown"),
        date: header_or(&payload.headers, "Date", ""),
        snippet: message.snippet,
        body: truncate_chars(&extract_body(&payload), BODY_PREVIEW_LIMIT),
    }
}

//INFO: First header with exactly this name; empty values count as missing
fn header_value<'a>(headers: &'a [MessageHeader], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|header| header.name == name)
        .map(|header| header.value.as_str())
        .filter(|value| !value.is_empty())
}

fn header_or(headers: &[MessageHeader], name: &str, fallback: &str) -> String {
    header_value(headers, name).unwrap_or(fallback).to_string()
}

//INFO: Plain text body of a message
//NOTE: Multipart payloads only look at their first text/plain part
fn extract_body(payload: &MessagePart) -> String {
    let data = match &payload.parts {
        Some(parts) => parts
            .iter()
            .find(|part| part.mime_type.as_deref() == Some("text/plain"))
            .and_then(|part| part.body.as_ref())
            .and_then(|body| body.data.as_deref()),
        None => payload.body.as_ref().and_then(|body| body.data.as_deref()),
    };

    data.map(decode_body_data).unwrap_or_default()
}

//INFO: Gmail sends base64url; accept standard alphabet and padding too
fn decode_body_data(data: &str) -> String {
    let trimmed = data.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .unwrap_or_default();

    String::from_utf8_lossy(&bytes).into_owned()
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
