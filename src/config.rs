use std::collections::HashMap;
use std::env;
use std::fs;

use chrono_tz::Tz;
use log::warn;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Seoul;
pub const DEFAULT_CALENDAR_ID: &str = "primary";

// KEY=VALUE config file, optional. Every lookup falls back to the process
// environment so a config file is never required.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if (value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\''))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| env::var(key).ok())
    }

    // The single civil timezone every timestamp in the engine uses.
    pub fn timezone(&self) -> Tz {
        let Some(name) = self.get("TIMEZONE") else {
            return DEFAULT_TIMEZONE;
        };
        match name.parse() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "Unknown TIMEZONE {:?}, falling back to {}",
                    name,
                    DEFAULT_TIMEZONE.name()
                );
                DEFAULT_TIMEZONE
            }
        }
    }

    pub fn calendar_id(&self) -> String {
        self.get("CALENDAR_ID")
            .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string())
    }

    pub fn access_token(&self) -> Option<String> {
        self.get("GOOGLE_ACCESS_TOKEN")
    }

    pub fn location_keywords_path(&self) -> Option<String> {
        self.get("LOCATION_KEYWORDS_FILE")
    }

    pub fn event_keywords_path(&self) -> Option<String> {
        self.get("EVENT_KEYWORDS_FILE")
    }

    pub fn tagger_url(&self) -> Option<String> {
        self.get("NLP_TAGGER_URL")
    }
}
