use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use log::{info, warn};
use uuid::Uuid;

use crate::extract::event_labeler::FALLBACK_EVENT_LABEL;
use crate::models::calendar::{EventPayload, EventTime};
use crate::models::schedule::{DuplicateHit, ReconciliationOutcome, ScheduleDraft};
use crate::service::calendar_service::{CalendarApi, CalendarError};

// Every event is assumed to run for one hour; explicit end times are not
// part of the input.
pub const DEFAULT_EVENT_DURATION_HOURS: i64 = 1;

pub struct ReconcileService;

impl ReconcileService {
    // Decides create-vs-update for one draft. Only AuthRequired surfaces as
    // Err so a batch can abort on it; every other calendar failure becomes a
    // per-item Failed outcome.
    pub async fn reconcile_one<C: CalendarApi + ?Sized>(
        calendar: &C,
        calendar_id: &str,
        draft: &ScheduleDraft,
        tz: Tz,
    ) -> Result<ReconciliationOutcome, CalendarError> {
        let Some(start) = draft.start_time(tz) else {
            return Ok(ReconciliationOutcome::Skipped {
                reason: "no time".to_string(),
            });
        };
        let end = start + Duration::hours(DEFAULT_EVENT_DURATION_HOURS);

        let existing = match calendar.list_events(calendar_id, start, end).await {
            Ok(events) => events,
            Err(err) => return fail_or_abort(err),
        };

        let payload = build_payload(draft, &start, &end, tz);
        // Overlap in time alone decides the outcome; the first listed event
        // is the collision target.
        match existing.first() {
            Some(event) => match calendar.update_event(calendar_id, &event.id, &payload).await {
                Ok(updated) => Ok(ReconciliationOutcome::Updated {
                    event_id: updated.id,
                }),
                Err(err) => fail_or_abort(err),
            },
            None => match calendar.insert_event(calendar_id, &payload).await {
                Ok(created) => Ok(ReconciliationOutcome::Created {
                    event_id: created.id,
                }),
                Err(err) => fail_or_abort(err),
            },
        }
    }

    // Sequential on purpose: concurrent windows could both decide "create"
    // before either write lands.
    pub async fn reconcile_batch<C: CalendarApi + ?Sized>(
        calendar: &C,
        calendar_id: &str,
        drafts: &[ScheduleDraft],
        tz: Tz,
    ) -> Result<Vec<(ScheduleDraft, ReconciliationOutcome)>, CalendarError> {
        let batch_id = Uuid::new_v4();
        info!("Reconciling batch {} with {} draft(s)", batch_id, drafts.len());
        let mut outcomes = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let outcome = Self::reconcile_one(calendar, calendar_id, draft, tz).await?;
            if let ReconciliationOutcome::Failed { reason } = &outcome {
                warn!("Batch {}: {:?} failed: {}", batch_id, draft.event, reason);
            }
            outcomes.push((draft.clone(), outcome));
        }
        Ok(outcomes)
    }

    // Read-only collision report: the first existing event in each draft's
    // window, without writing anything.
    pub async fn check_duplicates<C: CalendarApi + ?Sized>(
        calendar: &C,
        calendar_id: &str,
        drafts: &[ScheduleDraft],
        tz: Tz,
    ) -> Result<Vec<DuplicateHit>, CalendarError> {
        let mut duplicates = Vec::new();
        for draft in drafts {
            let Some(start) = draft.start_time(tz) else {
                continue;
            };
            let end = start + Duration::hours(DEFAULT_EVENT_DURATION_HOURS);
            let existing = calendar.list_events(calendar_id, start, end).await?;
            if let Some(event) = existing.into_iter().next() {
                duplicates.push(DuplicateHit {
                    schedule: draft.clone(),
                    existing_event: event,
                });
            }
        }
        Ok(duplicates)
    }
}

fn fail_or_abort(err: CalendarError) -> Result<ReconciliationOutcome, CalendarError> {
    match err {
        CalendarError::AuthRequired(_) => Err(err),
        other => Ok(ReconciliationOutcome::Failed {
            reason: other.to_string(),
        }),
    }
}

pub fn build_payload(
    draft: &ScheduleDraft,
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
    tz: Tz,
) -> EventPayload {
    let summary = if draft.event.trim().is_empty() {
        FALLBACK_EVENT_LABEL.to_string()
    } else {
        draft.event.clone()
    };
    EventPayload {
        summary,
        location: draft.location.clone().unwrap_or_default(),
        start: EventTime {
            date_time: start.to_rfc3339(),
            time_zone: tz.name().to_string(),
        },
        end: EventTime {
            date_time: end.to_rfc3339(),
            time_zone: tz.name().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::TimeField;
    use chrono::TimeZone;
    use chrono_tz::Asia::Seoul;

    #[test]
    fn payload_carries_the_civil_timezone_and_window() {
        let draft = ScheduleDraft {
            time: Some(TimeField {
                value: "2026-08-08T15:00:00+09:00".to_string(),
            }),
            location: Some("2층 회의실".to_string()),
            event: "팀 회의".to_string(),
        };
        let start = Seoul.with_ymd_and_hms(2026, 8, 8, 15, 0, 0).unwrap();
        let end = start + Duration::hours(DEFAULT_EVENT_DURATION_HOURS);

        let payload = build_payload(&draft, &start, &end, Seoul);
        assert_eq!(payload.summary, "팀 회의");
        assert_eq!(payload.location, "2층 회의실");
        assert_eq!(payload.start.time_zone, "Asia/Seoul");
        assert_eq!(payload.start.date_time, "2026-08-08T15:00:00+09:00");
        assert_eq!(payload.end.date_time, "2026-08-08T16:00:00+09:00");
    }

    #[test]
    fn empty_summary_falls_back_to_the_default_label() {
        let draft = ScheduleDraft {
            time: None,
            location: None,
            event: "  ".to_string(),
        };
        let start = Seoul.with_ymd_and_hms(2026, 8, 8, 15, 0, 0).unwrap();
        let end = start + Duration::hours(1);
        let payload = build_payload(&draft, &start, &end, Seoul);
        assert_eq!(payload.summary, FALLBACK_EVENT_LABEL);
        assert_eq!(payload.location, "");
    }
}
