//INFO: "Ask me anything" commands
//NOTE: A failed fetch is reported to the user and never touches the session

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use super::gateway_client::GatewayClient;
use super::load_session;
use crate::agent::{classify, Intent};
use crate::config::AppConfig;
use crate::integrations::{EventSummary, MessageSummary};

const NOT_SIGNED_IN: &str = "Not signed in. Run `parley login` first.";
const UNKNOWN_QUESTION: &str = "Try asking about your emails or your calendar.";

//INFO: Routes a free-text question to the matching fetch
pub async fn ask(config: &AppConfig, question: &str, max_results: Option<u32>) -> Result<Intent> {
    let intent = classify(question);
    info!("Question classified as {:?}", intent);

    match intent {
        Intent::Emails => show_emails(config, max_results).await?,
        Intent::Events => show_events(config, max_results).await?,
        Intent::Unknown => println!("{}", UNKNOWN_QUESTION),
    }

    Ok(intent)
}

pub async fn show_emails(config: &AppConfig, max_results: Option<u32>) -> Result<()> {
    let access_token = signed_in_token(config)?;
    let client = GatewayClient::new(config.gateway_url.clone());

    let messages = client
        .fetch_messages(&access_token, max_results)
        .await
        .inspect_err(|e| warn!("Email fetch failed: {}", e))?;

    print!("{}", render_messages(&messages));
    Ok(())
}

pub async fn show_events(config: &AppConfig, max_results: Option<u32>) -> Result<()> {
    let access_token = signed_in_token(config)?;
    let client = GatewayClient::new(config.gateway_url.clone());

    let events = client
        .fetch_events(&access_token, max_results)
        .await
        .inspect_err(|e| warn!("Calendar fetch failed: {}", e))?;

    print!("{}", render_events(&events));
    Ok(())
}

fn signed_in_token(config: &AppConfig) -> Result<String> {
    let controller = load_session(config)?;
    controller
        .access_token()
        .map(str::to_string)
        .ok_or_else(|| anyhow!(NOT_SIGNED_IN))
}

pub fn render_messages(messages: &[MessageSummary]) -> String {
    if messages.is_empty() {
        return "No messages in your inbox.\n".to_string();
    }

    let mut output = String::new();
    for message in messages {
        output.push_str(&format!("{}\n  From: {}\n", message.subject, message.from));
        if !message.date.is_empty() {
            output.push_str(&format!("  Date: {}\n", message.date));
        }
        if let Some(snippet) = message.snippet.as_deref().filter(|s| !s.is_empty()) {
            output.push_str(&format!("  {}\n", snippet));
        }
        output.push('\n');
    }
    output
}

pub fn render_events(events: &[EventSummary]) -> String {
    if events.is_empty() {
        return "No upcoming events.\n".to_string();
    }

    let mut output = String::new();
    for event in events {
        output.push_str(&format!("{}\n", event.summary));
        match (&event.start, &event.end) {
            (Some(start), Some(end)) => output.push_str(&format!("  {} - {}\n", start, end)),
            (Some(start), None) => output.push_str(&format!("  {}\n", start)),
            _ => {}
        }
        if let Some(location) = &event.location {
            output.push_str(&format!("  At: {}\n", location));
        }
        if !event.attendees.is_empty() {
            output.push_str(&format!("  With: {}\n", event.attendees.join(", ")));
        }
        output.push('\n');
    }
    output
}
