use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

static NEXT_WEEK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"다음\s*주\s*(월요일|화요일|수요일|목요일|금요일|토요일|일요일)")
        .expect("valid next-week regex")
});
static YEAR_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}년|\d{4}[-/]").expect("valid year token regex"));
static MERIDIEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(오전|오후|아침|새벽|저녁|점심)\s*(\d{1,2})\s*시(?:\s*(\d{1,2})\s*분)?")
        .expect("valid meridiem regex")
});
static BARE_HOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s*시(?:\s*(\d{1,2})\s*분)?").expect("valid bare hour regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static YEAR_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})년").expect("valid year marker regex"));
static MONTH_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})월").expect("valid month marker regex"));
static DAY_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(\d{1,2})일\s*").expect("valid day marker regex"));
static SEP_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*").expect("valid separator spacing regex"));
static REPEAT_SEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-{2,}").expect("valid repeated separator regex"));
static YEAR_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-").expect("valid year prefix regex"));

const WEEKDAYS: [(&str, i64); 7] = [
    ("월요일", 0),
    ("화요일", 1),
    ("수요일", 2),
    ("목요일", 3),
    ("금요일", 4),
    ("토요일", 5),
    ("일요일", 6),
];

// Rewrites a raw Korean time fragment, stage by stage, into something a
// date parser can resolve against `now` in one fixed civil timezone.
pub struct TimeNormalizer {
    tz: Tz,
}

impl TimeNormalizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    // Returns None when no stage produces a parseable result; callers treat
    // that as "no time", never as a batch-level error.
    pub fn normalize(&self, raw_fragment: &str, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
        let today = now.date_naive();
        let text = substitute_relative_days(raw_fragment, today);
        let text = substitute_relative_weekday(&text, today);
        let (text, year_inferred) = ensure_year(&text, now.year());
        let text = convert_meridiem(&text);
        let canonical = canonicalize(&text);
        let resolved = self.parse_canonical(&canonical, now, year_inferred);
        if resolved.is_none() {
            warn!("Time fragment did not parse after normalization: {:?}", canonical);
        }
        resolved
    }

    fn parse_canonical(
        &self,
        canonical: &str,
        now: DateTime<Tz>,
        year_inferred: bool,
    ) -> Option<DateTime<Tz>> {
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(canonical, format) {
                return self.resolve_with_year_bias(naive, now, year_inferred);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(canonical, "%Y-%m-%d") {
            return self.resolve_with_year_bias(date.and_hms_opt(0, 0, 0)?, now, year_inferred);
        }

        // Time-only fragments still carry the inferred year prefix
        // ("2026-19:00") because year inference runs before parsing.
        let time_only = YEAR_PREFIX_RE.replace(canonical, "");
        if let Ok(time) = NaiveTime::parse_from_str(time_only.as_ref(), "%H:%M") {
            let today_candidate = self.resolve_local(now.date_naive().and_time(time))?;
            if today_candidate > now {
                return Some(today_candidate);
            }
            // A clock time that already passed means the next day.
            return self.resolve_local((now.date_naive() + Duration::days(1)).and_time(time));
        }
        None
    }

    // A date whose year was inferred and which lands in the past moves one
    // year forward, matching future-preferring resolution.
    fn resolve_with_year_bias(
        &self,
        naive: NaiveDateTime,
        now: DateTime<Tz>,
        year_inferred: bool,
    ) -> Option<DateTime<Tz>> {
        let resolved = self.resolve_local(naive)?;
        if year_inferred && resolved < now {
            let bumped = naive.with_year(naive.year() + 1)?;
            return self.resolve_local(bumped);
        }
        Some(resolved)
    }

    fn resolve_local(&self, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
        self.tz.from_local_datetime(&naive).earliest()
    }
}

fn format_korean_date(date: NaiveDate) -> String {
    date.format("%Y년 %m월 %d일").to_string()
}

// Stage 1: 오늘/내일/모레 become absolute dates. Substituted text contains
// none of the tokens, so the stage is idempotent.
fn substitute_relative_days(text: &str, today: NaiveDate) -> String {
    let text = text.replace("오늘", &format_korean_date(today));
    let text = text.replace("내일", &format_korean_date(today + Duration::days(1)));
    text.replace("모레", &format_korean_date(today + Duration::days(2)))
}

// Stage 2: "다음주 <weekday>" resolves to that weekday at least 7 days out.
fn substitute_relative_weekday(text: &str, today: NaiveDate) -> String {
    let Some(caps) = NEXT_WEEK_RE.captures(text) else {
        return text.to_string();
    };
    let target = weekday_index(&caps[1]);
    let current = today.weekday().num_days_from_monday() as i64;
    let days_until = (target - current).rem_euclid(7) + 7;
    let date = format_korean_date(today + Duration::days(days_until));
    NEXT_WEEK_RE.replace_all(text, date.as_str()).into_owned()
}

fn weekday_index(name: &str) -> i64 {
    WEEKDAYS
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, idx)| *idx)
        .unwrap_or(0)
}

// Stage 3: prefix the current year when no 4-digit year token exists. The
// flag feeds the future-preference rule in the parse stage.
fn ensure_year(text: &str, year: i32) -> (String, bool) {
    if YEAR_TOKEN_RE.is_match(text) {
        (text.trim().to_string(), false)
    } else {
        (format!("{}년 {}", year, text.trim()), true)
    }
}

// Stage 4: daypart + hour markers become a 24-hour clock. A second pass
// converts bare "N시" the same way.
fn convert_meridiem(text: &str) -> String {
    let text = MERIDIEM_RE.replace_all(text, |caps: &regex::Captures| {
        let hour: u32 = caps[2].parse().unwrap_or(0);
        let minute: u32 = caps
            .get(3)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        format!("{:02}:{:02}", daypart_hour(&caps[1], hour), minute)
    });
    BARE_HOUR_RE
        .replace_all(text.as_ref(), |caps: &regex::Captures| {
            let hour: u32 = caps[1].parse().unwrap_or(0);
            let minute: u32 = caps
                .get(2)
                .map(|m| m.as_str().parse().unwrap_or(0))
                .unwrap_or(0);
            format!("{:02}:{:02}", hour % 24, minute)
        })
        .into_owned()
}

// 오후/저녁/점심 behave as PM (hour 12 stays 12), 오전/아침/새벽 as AM
// (hour 12 wraps to 0).
fn daypart_hour(daypart: &str, hour: u32) -> u32 {
    match daypart {
        "오후" | "저녁" | "점심" => {
            if hour < 12 {
                hour + 12
            } else {
                hour
            }
        }
        _ => {
            if hour == 12 {
                0
            } else {
                hour
            }
        }
    }
}

// Stage 5: collapse whitespace, turn 년/월 markers into separators, strip
// 일 markers, and tidy the separators into one date-like token.
fn canonicalize(text: &str) -> String {
    let text = WHITESPACE_RE.replace_all(text.trim(), " ");
    let text = YEAR_MARKER_RE.replace_all(&text, "${1}-");
    let text = MONTH_MARKER_RE.replace_all(&text, "${1}-");
    let text = DAY_MARKER_RE.replace_all(&text, "${1} ");
    let text = SEP_SPACE_RE.replace_all(&text, "-");
    let text = REPEAT_SEP_RE.replace_all(&text, "-");
    text.trim_matches(['-', ' ']).to_string()
}
