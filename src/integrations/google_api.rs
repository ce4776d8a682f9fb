//INFO: Shared HTTP plumbing for the Google REST APIs
//NOTE: Stateless; every call carries the caller's bearer token

use anyhow::{anyhow, Context, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::DeserializeOwned;

pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

//INFO: Google API client
#[derive(Debug, Clone)]
pub struct GoogleApi {
    http_client: Client,
    gmail_base: String,
    calendar_base: String,
}

impl Default for GoogleApi {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleApi {
    pub fn new() -> Self {
        Self::with_base_urls(GMAIL_API_BASE, CALENDAR_API_BASE)
    }

    //INFO: Points the client somewhere other than googleapis.com
    pub fn with_base_urls(gmail_base: impl Into<String>, calendar_base: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            gmail_base: gmail_base.into().trim_end_matches('/').to_string(),
            calendar_base: calendar_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn gmail_url(&self, path: &str) -> String {
        format!("{}{}", self.gmail_base, path)
    }

    pub(crate) fn calendar_url(&self, path: &str) -> String {
        format!("{}{}", self.calendar_base, path)
    }

    //INFO: Authorized GET that decodes a JSON body
    //NOTE: Any non-2xx status is an error carrying Google's response text
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Google API error ({}): {}", status, error_text));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Invalid response from {}", url))
    }
}
