use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

use crate::clients::google_calendar;
use crate::models::calendar::{EventPayload, ExistingEvent};

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar authorization required: {0}")]
    AuthRequired(String),
    #[error("calendar request failed: {0}")]
    Transport(String),
    #[error("calendar API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected calendar response: {0}")]
    InvalidResponse(String),
}

// The two operations the engine consumes from the calendar collaborator,
// split into insert/update so the reconciler can choose explicitly.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Tz>,
        time_max: DateTime<Tz>,
    ) -> Result<Vec<ExistingEvent>, CalendarError>;

    async fn insert_event(
        &self,
        calendar_id: &str,
        payload: &EventPayload,
    ) -> Result<ExistingEvent, CalendarError>;

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        payload: &EventPayload,
    ) -> Result<ExistingEvent, CalendarError>;
}

pub struct GoogleCalendarService {
    access_token: String,
}

impl GoogleCalendarService {
    pub fn new(access_token: String) -> Self {
        Self { access_token }
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarService {
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Tz>,
        time_max: DateTime<Tz>,
    ) -> Result<Vec<ExistingEvent>, CalendarError> {
        google_calendar::list_events(
            &self.access_token,
            calendar_id,
            &time_min.to_rfc3339(),
            &time_max.to_rfc3339(),
        )
        .await
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        payload: &EventPayload,
    ) -> Result<ExistingEvent, CalendarError> {
        google_calendar::insert_event(&self.access_token, calendar_id, payload).await
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        payload: &EventPayload,
    ) -> Result<ExistingEvent, CalendarError> {
        google_calendar::update_event(&self.access_token, calendar_id, event_id, payload).await
    }
}
