use reqwest::StatusCode;
use serde::Deserialize;

use crate::models::calendar::{EventPayload, ExistingEvent};
use crate::service::calendar_service::CalendarError;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3/calendars";

#[derive(Debug, Deserialize)]
struct EventsListResponse {
    #[serde(default)]
    items: Vec<ExistingEvent>,
}

pub async fn list_events(
    access_token: &str,
    calendar_id: &str,
    time_min: &str,
    time_max: &str,
) -> Result<Vec<ExistingEvent>, CalendarError> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/{}/events", CALENDAR_API_BASE, calendar_id))
        .bearer_auth(access_token)
        .query(&[
            ("timeMin", time_min),
            ("timeMax", time_max),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
        ])
        .send()
        .await
        .map_err(|err| CalendarError::Transport(err.to_string()))?;

    let body = read_success_body(response).await?;
    let parsed: EventsListResponse = serde_json::from_str(&body)
        .map_err(|err| CalendarError::InvalidResponse(format!("{}: {}", err, body)))?;
    Ok(parsed.items)
}

pub async fn insert_event(
    access_token: &str,
    calendar_id: &str,
    payload: &EventPayload,
) -> Result<ExistingEvent, CalendarError> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/{}/events", CALENDAR_API_BASE, calendar_id))
        .bearer_auth(access_token)
        .json(payload)
        .send()
        .await
        .map_err(|err| CalendarError::Transport(err.to_string()))?;

    parse_event_body(response).await
}

pub async fn update_event(
    access_token: &str,
    calendar_id: &str,
    event_id: &str,
    payload: &EventPayload,
) -> Result<ExistingEvent, CalendarError> {
    let client = reqwest::Client::new();
    let response = client
        .put(format!(
            "{}/{}/events/{}",
            CALENDAR_API_BASE, calendar_id, event_id
        ))
        .bearer_auth(access_token)
        .json(payload)
        .send()
        .await
        .map_err(|err| CalendarError::Transport(err.to_string()))?;

    parse_event_body(response).await
}

// Read the body once, then decide from the status. 401/403 means the stored
// credential is missing or stale.
async fn read_success_body(response: reqwest::Response) -> Result<String, CalendarError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| CalendarError::Transport(err.to_string()))?;
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(CalendarError::AuthRequired(body));
    }
    if !status.is_success() {
        return Err(CalendarError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(body)
}

async fn parse_event_body(response: reqwest::Response) -> Result<ExistingEvent, CalendarError> {
    let body = read_success_body(response).await?;
    serde_json::from_str(&body)
        .map_err(|err| CalendarError::InvalidResponse(format!("{}: {}", err, body)))
}
