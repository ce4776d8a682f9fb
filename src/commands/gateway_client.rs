//INFO: Presentation-side client for the data gateway
//NOTE: Only success or failure matters here; error bodies are not interpreted

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::integrations::{EventSummary, MessageSummary};
use crate::server::{EventsResponse, FetchRequest, MessagesResponse};

#[derive(Debug, Error)]
pub enum GatewayClientError {
    #[error("Gateway rejected the request ({status})")]
    Rejected { status: StatusCode },

    #[error("Gateway unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub struct GatewayClient {
    http_client: Client,
    base_url: Url,
}

impl GatewayClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
        }
    }

    pub async fn fetch_messages(
        &self,
        access_token: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<MessageSummary>, GatewayClientError> {
        self.post("/api/gmail", access_token, max_results)
            .await
            .map(|response: MessagesResponse| response.messages)
    }

    pub async fn fetch_events(
        &self,
        access_token: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<EventSummary>, GatewayClientError> {
        self.post("/api/calendar", access_token, max_results)
            .await
            .map(|response: EventsResponse| response.events)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
        max_results: Option<u32>,
    ) -> Result<T, GatewayClientError> {
        let body = FetchRequest {
            access_token: Some(access_token.to_string()),
            max_results,
        };

        let response = self
            .http_client
            .post(self.base_url.join(path)?)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayClientError::Rejected {
                status: response.status(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_messages_posts_token_and_limit() {
        let server = MockServer::start().await;
        let messages = json!({"messages": [{
            "id": "m1", "subject": "Hi", "from": "a@b.c", "date": "", "snippet": null, "body": ""
        }]});
        Mock::given(method("POST"))
            .and(path("/api/gmail"))
            .and(body_json(json!({"accessToken": "abc123", "maxResults": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(messages))
            .mount(&server)
            .await;

        let client = GatewayClient::new(Url::parse(&server.uri()).unwrap());
        let messages = client.fetch_messages("abc123", Some(5)).await.unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].subject, "Hi");
    }

    #[tokio::test]
    async fn test_fetch_events() {
        let server = MockServer::start().await;
        let events = json!({"events": [{
            "id": "e1", "summary": "Sync", "description": "", "start": "2026-10-16",
            "end": null, "location": null, "attendees": []
        }]});
        Mock::given(method("POST"))
            .and(path("/api/calendar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(events))
            .mount(&server)
            .await;

        let client = GatewayClient::new(Url::parse(&server.uri()).unwrap());
        let events = client.fetch_events("t", None).await.unwrap();

        assert_eq!(events[0].summary, "Sync");
    }

    #[tokio::test]
    async fn test_non_success_is_rejected() {
        let server = MockServer::start().await;
        let failure = json!({"error": "Failed to fetch Gmail messages"});
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(failure))
            .mount(&server)
            .await;

        let client = GatewayClient::new(Url::parse(&server.uri()).unwrap());
        let error = client.fetch_messages("t", None).await.unwrap_err();

        assert!(matches!(
            error,
            GatewayClientError::Rejected { status } if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }
}
