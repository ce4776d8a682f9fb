//INFO: Upcoming events from the primary Google Calendar
//NOTE: Recurring events are expanded and ordered by start time

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::google_api::GoogleApi;

//INFO: Flattened event handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: Option<String>,
    pub summary: String,
    pub description: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    pub attendees: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EventList {
    items: Option<Vec<GoogleCalendarEvent>>,
}

#[derive(Debug, Deserialize)]
struct GoogleCalendarEvent {
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    start: Option<GoogleDateTime>,
    end: Option<GoogleDateTime>,
    location: Option<String>,
    attendees: Option<Vec<Attendee>>,
}

//NOTE: Timed events carry dateTime, all-day events only date
#[derive(Debug, Deserialize)]
struct GoogleDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Attendee {
    email: Option<String>,
}

impl GoogleApi {
    //INFO: Events on the primary calendar starting from `time_min`
    pub async fn list_upcoming_events(
        &self,
        access_token: &str,
        max_results: u32,
        time_min: DateTime<Utc>,
    ) -> Result<Vec<EventSummary>> {
        let list: EventList = self
            .get_json(
                &self.calendar_url("/calendars/primary/events"),
                access_token,
                &[
                    (
                        "timeMin",
                        time_min.to_rfc3339_opts(SecondsFormat::Millis, true),
                    ),
                    ("maxResults", max_results.to_string()),
                    ("singleEvents", "true".to_string()),
                    ("orderBy", "startTime".to_string()),
                ],
            )
            .await?;

        let events: Vec<EventSummary> = list
            .items
            .unwrap_or_default()
            .into_iter()
            .map(summarize_event)
            .collect();
        debug!("Retrieved {} calendar events", events.len());

        Ok(events)
    }
}

fn summarize_event(event: GoogleCalendarEvent) -> EventSummary {
    EventSummary {
        id: event.id,
        summary: non_empty(event.summary).unwrap_or_else(|| "No Title".to_string()),
        description: event.description.unwrap_or_default(),
        start: event.start.and_then(GoogleDateTime::resolve),
        end: event.end.and_then(GoogleDateTime::resolve),
        location: event.location,
        attendees: event
            .attendees
            .unwrap_or_default()
            .into_iter()
            .filter_map(|attendee| attendee.email)
            .collect(),
    }
}

impl GoogleDateTime {
    fn resolve(self) -> Option<String> {
        non_empty(self.date_time).or_else(|| non_empty(self.date))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}
