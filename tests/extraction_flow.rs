use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use chrono_tz::Asia::Seoul;
use chrono_tz::Tz;

use scheduleBot::extract::segmenter::ExtractError;
use scheduleBot::models::lexicon::Lexicon;
use scheduleBot::service::extraction_service::ExtractionService;

fn engine() -> ExtractionService {
    ExtractionService::new(Arc::new(Lexicon::default()), Seoul)
}

fn fixed_now() -> DateTime<Tz> {
    // Friday morning.
    Seoul.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap()
}

#[tokio::test]
async fn meeting_clause_resolves_time_location_and_event() {
    let drafts = engine()
        .parse_schedules("내일 오후 3시 2층 회의실에서 팀 회의", fixed_now())
        .await
        .expect("extraction should succeed");

    assert_eq!(drafts.len(), 1);
    let draft = &drafts[0];

    let time = draft.time.as_ref().expect("time should resolve");
    assert!(time.value.starts_with("2026-08-08T15:00:00"));
    assert_eq!(
        draft.start_time(Seoul).unwrap(),
        Seoul.with_ymd_and_hms(2026, 8, 8, 15, 0, 0).unwrap()
    );

    let location = draft.location.as_ref().expect("location should resolve");
    assert!(location.contains("회의실"));
    assert!(location.contains("2층"));

    assert_eq!(draft.event, "팀 회의");
}

#[tokio::test]
async fn station_clause_without_eseo_still_finds_a_location() {
    let drafts = engine()
        .parse_schedules("저녁 7시 강남역", fixed_now())
        .await
        .expect("extraction should succeed");

    let draft = &drafts[0];
    let time = draft.time.as_ref().expect("time should resolve");
    assert!(time.value.starts_with("2026-08-07T19:00:00"));
    assert_eq!(draft.location.as_deref(), Some("강남역"));
    // Without an 에서 residual the label comes from the keyword list.
    assert_eq!(draft.event, "저녁");
}

#[tokio::test]
async fn unparseable_time_fragment_yields_a_timeless_draft() {
    let drafts = engine()
        .parse_schedules("어쩌구시 회의", fixed_now())
        .await
        .expect("extraction should succeed");

    let draft = &drafts[0];
    assert!(draft.time.is_none());
    assert_eq!(draft.event, "회의");
}

#[tokio::test]
async fn clause_without_si_keeps_the_full_text_as_the_event() {
    let drafts = engine()
        .parse_schedules("팀 미팅 준비", fixed_now())
        .await
        .expect("extraction should succeed");

    let draft = &drafts[0];
    assert!(draft.time.is_none());
    assert!(draft.location.is_none());
    assert_eq!(draft.event, "팀 미팅 준비");
}

#[tokio::test]
async fn clauses_are_processed_independently_and_in_order() {
    let drafts = engine()
        .parse_schedules(
            "내일 오후 3시 2층 회의실에서 팀 회의, 어쩌구시 회의, 저녁 7시 강남역",
            fixed_now(),
        )
        .await
        .expect("extraction should succeed");

    assert_eq!(drafts.len(), 3);
    assert_eq!(drafts[0].event, "팀 회의");
    assert!(drafts[0].time.is_some());
    assert!(drafts[1].time.is_none());
    assert_eq!(drafts[2].location.as_deref(), Some("강남역"));
}

#[tokio::test]
async fn next_week_weekday_resolves_at_least_seven_days_out() {
    let drafts = engine()
        .parse_schedules("다음주 월요일 오전 10시 본사 1층에서 발표", fixed_now())
        .await
        .expect("extraction should succeed");

    let draft = &drafts[0];
    assert_eq!(
        draft.start_time(Seoul).unwrap(),
        Seoul.with_ymd_and_hms(2026, 8, 17, 10, 0, 0).unwrap()
    );
    assert_eq!(draft.location.as_deref(), Some("본사 1층"));
    assert_eq!(draft.event, "발표");
}

#[tokio::test]
async fn empty_input_is_rejected_up_front() {
    let result = engine().parse_schedules("   ", fixed_now()).await;
    assert_eq!(result.unwrap_err(), ExtractError::InvalidInput);
}
