use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::calendar::ExistingEvent;

// Extraction output keeps the original's wire shape:
// {"time": {"value": "..."} | null, "location": "..." | null, "event": "..."}.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeField {
    pub value: String,
}

impl TimeField {
    pub fn from_datetime(dt: &DateTime<Tz>) -> Self {
        Self {
            value: dt.to_rfc3339(),
        }
    }

    // Re-parse the stored RFC3339 value; foreign offsets are converted into
    // the engine's civil timezone.
    pub fn resolve(&self, tz: Tz) -> Option<DateTime<Tz>> {
        DateTime::parse_from_rfc3339(&self.value)
            .ok()
            .map(|dt| dt.with_timezone(&tz))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub time: Option<TimeField>,
    pub location: Option<String>,
    pub event: String,
}

impl ScheduleDraft {
    pub fn start_time(&self, tz: Tz) -> Option<DateTime<Tz>> {
        self.time.as_ref().and_then(|t| t.resolve(tz))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconciliationOutcome {
    Created { event_id: String },
    Updated { event_id: String },
    Skipped { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    pub schedule: ScheduleDraft,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    pub schedule: ScheduleDraft,
    pub reason: String,
}

// A draft whose one-hour window already holds a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateHit {
    pub schedule: ScheduleDraft,
    pub existing_event: ExistingEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationReport {
    pub created_event_ids: Vec<String>,
    pub failed_items: Vec<FailedItem>,
    pub skipped_items: Vec<SkippedItem>,
}

impl RegistrationReport {
    // Updated ids land in created_event_ids alongside created ones, which is
    // what the registration endpoint always reported.
    pub fn from_outcomes(outcomes: &[(ScheduleDraft, ReconciliationOutcome)]) -> Self {
        let mut report = Self::default();
        for (schedule, outcome) in outcomes {
            match outcome {
                ReconciliationOutcome::Created { event_id }
                | ReconciliationOutcome::Updated { event_id } => {
                    report.created_event_ids.push(event_id.clone());
                }
                ReconciliationOutcome::Skipped { reason } => {
                    report.skipped_items.push(SkippedItem {
                        schedule: schedule.clone(),
                        reason: reason.clone(),
                    });
                }
                ReconciliationOutcome::Failed { reason } => {
                    report.failed_items.push(FailedItem {
                        schedule: schedule.clone(),
                        error: reason.clone(),
                    });
                }
            }
        }
        report
    }
}
