use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::Text;
use serde_json::json;

use scheduleBot::models::schedule::{RegistrationReport, ScheduleDraft};
use scheduleBot::extract::location_selector::NO_LOCATION_MARKER;
use scheduleBot::service::calendar_service::GoogleCalendarService;
use scheduleBot::service::extraction_service::ExtractionService;
use scheduleBot::service::reconcile_service::ReconcileService;

use crate::config::AppConfig;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract schedules from comma-separated Korean text.
    Parse { text: String },
    /// Extract and report collisions with existing calendar events.
    Check { text: String },
    /// Extract and create-or-update each schedule on the calendar.
    Register { text: String },
    /// Prompt for the schedule text interactively, then extract.
    ParsePrompt {},
}

pub async fn cli(engine: Arc<ExtractionService>, config: AppConfig) {
    // Fine to panic here
    let cli = Cli::parse();
    let tz = config.timezone();
    let now = Utc::now().with_timezone(&tz);

    match &cli.command {
        Commands::Parse { text } => match engine.parse_schedules(text, now).await {
            Ok(drafts) => print_drafts(&drafts),
            Err(err) => println!("Failed to parse schedules: {}", err),
        },
        Commands::ParsePrompt {} => {
            let text = match specify_prompt() {
                Ok(text) => text,
                Err(_) => {
                    println!("No schedule text supplied");
                    return;
                }
            };
            match engine.parse_schedules(&text, now).await {
                Ok(drafts) => print_drafts(&drafts),
                Err(err) => println!("Failed to parse schedules: {}", err),
            }
        }
        Commands::Check { text } => {
            let Some((drafts, calendar)) = extract_with_calendar(&engine, &config, text, now).await
            else {
                return;
            };
            match ReconcileService::check_duplicates(&calendar, &config.calendar_id(), &drafts, tz)
                .await
            {
                Ok(duplicates) => {
                    let report = json!({
                        "has_duplicates": !duplicates.is_empty(),
                        "duplicates": duplicates,
                    });
                    println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
                }
                Err(err) => println!("Duplicate check aborted: {}", err),
            }
        }
        Commands::Register { text } => {
            let Some((drafts, calendar)) = extract_with_calendar(&engine, &config, text, now).await
            else {
                return;
            };
            match ReconcileService::reconcile_batch(&calendar, &config.calendar_id(), &drafts, tz)
                .await
            {
                Ok(outcomes) => {
                    let report = RegistrationReport::from_outcomes(&outcomes);
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&report).unwrap_or_default()
                    );
                }
                Err(err) => println!("Reconciliation aborted: {}", err),
            }
        }
    }
}

async fn extract_with_calendar(
    engine: &ExtractionService,
    config: &AppConfig,
    text: &str,
    now: chrono::DateTime<chrono_tz::Tz>,
) -> Option<(Vec<ScheduleDraft>, GoogleCalendarService)> {
    let drafts = match engine.parse_schedules(text, now).await {
        Ok(drafts) => drafts,
        Err(err) => {
            println!("Failed to parse schedules: {}", err);
            return None;
        }
    };
    let Some(token) = config.access_token() else {
        println!("GOOGLE_ACCESS_TOKEN is required to reach the calendar.");
        return None;
    };
    Some((drafts, GoogleCalendarService::new(token)))
}

fn print_drafts(drafts: &[ScheduleDraft]) {
    let rendered: Vec<_> = drafts
        .iter()
        .map(|draft| {
            json!({
                "time": draft.time,
                "location": draft
                    .location
                    .clone()
                    .unwrap_or_else(|| NO_LOCATION_MARKER.to_string()),
                "event": draft.event,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "schedules": rendered })).unwrap_or_default()
    );
}

fn specify_prompt() -> Result<String, Box<dyn std::error::Error>> {
    Ok(Text::new("등록할 일정을 입력하세요.").prompt()?)
}
