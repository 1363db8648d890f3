use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Asia::Seoul;
use chrono_tz::Tz;
use tokio::sync::Mutex as TokioMutex;

use scheduleBot::models::calendar::{EventPayload, ExistingEvent};
use scheduleBot::models::schedule::{
    ReconciliationOutcome, RegistrationReport, ScheduleDraft, TimeField,
};
use scheduleBot::service::calendar_service::{CalendarApi, CalendarError};
use scheduleBot::service::reconcile_service::ReconcileService;

// Calendar whose list responses are scripted per call, in order.
struct ScriptedCalendar {
    list_results: TokioMutex<VecDeque<Result<Vec<ExistingEvent>, CalendarError>>>,
    inserted: TokioMutex<u32>,
}

impl ScriptedCalendar {
    fn new(list_results: Vec<Result<Vec<ExistingEvent>, CalendarError>>) -> Self {
        Self {
            list_results: TokioMutex::new(list_results.into()),
            inserted: TokioMutex::new(0),
        }
    }
}

#[async_trait]
impl CalendarApi for ScriptedCalendar {
    async fn list_events(
        &self,
        _calendar_id: &str,
        _time_min: DateTime<Tz>,
        _time_max: DateTime<Tz>,
    ) -> Result<Vec<ExistingEvent>, CalendarError> {
        let mut results = self.list_results.lock().await;
        results
            .pop_front()
            .unwrap_or_else(|| Err(CalendarError::Transport("script exhausted".to_string())))
    }

    async fn insert_event(
        &self,
        _calendar_id: &str,
        _payload: &EventPayload,
    ) -> Result<ExistingEvent, CalendarError> {
        let mut inserted = self.inserted.lock().await;
        *inserted += 1;
        Ok(existing_event(&format!("created-{}", *inserted)))
    }

    async fn update_event(
        &self,
        _calendar_id: &str,
        event_id: &str,
        _payload: &EventPayload,
    ) -> Result<ExistingEvent, CalendarError> {
        Ok(existing_event(event_id))
    }
}

fn existing_event(id: &str) -> ExistingEvent {
    ExistingEvent {
        id: id.to_string(),
        summary: None,
        location: None,
        start: None,
        end: None,
    }
}

fn draft(event: &str, time: Option<&str>) -> ScheduleDraft {
    ScheduleDraft {
        time: time.map(|value| TimeField {
            value: value.to_string(),
        }),
        location: None,
        event: event.to_string(),
    }
}

fn three_timed_drafts() -> Vec<ScheduleDraft> {
    vec![
        draft("팀 회의", Some("2026-08-08T15:00:00+09:00")),
        draft("저녁", Some("2026-08-08T19:00:00+09:00")),
        draft("발표", Some("2026-08-09T10:00:00+09:00")),
    ]
}

#[tokio::test]
async fn one_failed_item_does_not_abort_the_batch() {
    let calendar = ScriptedCalendar::new(vec![
        Ok(Vec::new()),
        Err(CalendarError::Transport("connection reset".to_string())),
        Ok(vec![existing_event("busy")]),
    ]);
    let drafts = three_timed_drafts();

    let outcomes = ReconcileService::reconcile_batch(&calendar, "primary", &drafts, Seoul)
        .await
        .expect("non-auth failures stay inside the batch");

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0].1,
        ReconciliationOutcome::Created {
            event_id: "created-1".to_string()
        }
    );
    assert!(matches!(
        outcomes[1].1,
        ReconciliationOutcome::Failed { .. }
    ));
    assert_eq!(
        outcomes[2].1,
        ReconciliationOutcome::Updated {
            event_id: "busy".to_string()
        }
    );
}

#[tokio::test]
async fn auth_failure_aborts_the_whole_batch() {
    let calendar = ScriptedCalendar::new(vec![
        Ok(Vec::new()),
        Err(CalendarError::AuthRequired("token expired".to_string())),
        Ok(Vec::new()),
    ]);
    let drafts = three_timed_drafts();

    let err = ReconcileService::reconcile_batch(&calendar, "primary", &drafts, Seoul)
        .await
        .expect_err("auth failures abort the batch");

    assert!(matches!(err, CalendarError::AuthRequired(_)));
    // The third draft was never attempted.
    assert!(calendar.list_results.lock().await.len() == 1);
}

#[tokio::test]
async fn timeless_drafts_are_skipped_inside_the_batch() {
    let calendar = ScriptedCalendar::new(vec![Ok(Vec::new())]);
    let drafts = vec![
        draft("일정", None),
        draft("팀 회의", Some("2026-08-08T15:00:00+09:00")),
    ];

    let outcomes = ReconcileService::reconcile_batch(&calendar, "primary", &drafts, Seoul)
        .await
        .expect("batch should succeed");

    assert_eq!(
        outcomes[0].1,
        ReconciliationOutcome::Skipped {
            reason: "no time".to_string()
        }
    );
    assert_eq!(
        outcomes[1].1,
        ReconciliationOutcome::Created {
            event_id: "created-1".to_string()
        }
    );
}

#[tokio::test]
async fn registration_report_summarizes_the_batch() {
    let calendar = ScriptedCalendar::new(vec![
        Ok(Vec::new()),
        Err(CalendarError::Transport("connection reset".to_string())),
        Ok(vec![existing_event("busy")]),
    ]);
    let drafts = three_timed_drafts();

    let outcomes = ReconcileService::reconcile_batch(&calendar, "primary", &drafts, Seoul)
        .await
        .expect("batch should succeed");
    let report = RegistrationReport::from_outcomes(&outcomes);

    // Updated ids are reported alongside created ones.
    assert_eq!(report.created_event_ids, vec!["created-1", "busy"]);
    assert_eq!(report.failed_items.len(), 1);
    assert_eq!(report.failed_items[0].schedule.event, "저녁");
    assert!(report.skipped_items.is_empty());
}
