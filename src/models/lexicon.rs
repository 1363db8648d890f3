use std::fs;

use log::warn;

// Built-in location anchors used when no keyword file is configured.
const DEFAULT_LOCATION_KEYWORDS: &[&str] = &[
    "본사", "회의실", "사무실", "지점", "센터", "빌딩", "타워", "강의실",
    "세미나실", "라운지", "카페", "식당", "도서관", "강당", "호텔", "학교",
    "병원", "공원", "역", "터미널", "공항",
];

// Unit suffixes that extend a location candidate (2층, 301호, 3번 출구).
const UNIT_SUFFIXES: &[&str] = &["층", "호", "번", "출구", "동"];

// Extra place-like words accepted by the lexical check even when they are
// not anchors themselves.
const PLACE_SUFFIX_WORDS: &[&str] = &[
    "회의실", "카페", "도서관", "라운지", "세미나실", "출구", "동", "호", "층",
];

const DEFAULT_EVENT_KEYWORDS: &[&str] = &[
    "회의", "미팅", "약속", "발표", "세미나", "워크숍", "면접", "수업",
    "스터디", "모임", "점심", "저녁", "식사", "생일", "회식",
];

// Keyword configuration, loaded once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Lexicon {
    location_keywords: Vec<String>,
    location_keywords_extended: Vec<String>,
    event_keywords: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::from_lists(
            DEFAULT_LOCATION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_EVENT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl Lexicon {
    fn from_lists(location_keywords: Vec<String>, event_keywords: Vec<String>) -> Self {
        let mut extended = location_keywords.clone();
        for suffix in UNIT_SUFFIXES {
            let suffix = suffix.to_string();
            if !extended.contains(&suffix) {
                extended.push(suffix);
            }
        }
        Self {
            location_keywords,
            location_keywords_extended: extended,
            event_keywords,
        }
    }

    // Missing or malformed keyword files degrade to the built-in lists.
    pub fn load(location_path: Option<&str>, event_path: Option<&str>) -> Self {
        let location = load_keyword_file(location_path, "location").unwrap_or_else(|| {
            DEFAULT_LOCATION_KEYWORDS.iter().map(|s| s.to_string()).collect()
        });
        let event = load_keyword_file(event_path, "event")
            .unwrap_or_else(|| DEFAULT_EVENT_KEYWORDS.iter().map(|s| s.to_string()).collect());
        Self::from_lists(location, event)
    }

    pub fn location_keywords(&self) -> &[String] {
        &self.location_keywords
    }

    pub fn location_keywords_extended(&self) -> &[String] {
        &self.location_keywords_extended
    }

    pub fn event_keywords(&self) -> &[String] {
        &self.event_keywords
    }

    pub fn is_place_like(&self, text: &str) -> bool {
        self.location_keywords_extended
            .iter()
            .any(|word| text.contains(word.as_str()))
            || PLACE_SUFFIX_WORDS.iter().any(|word| text.contains(word))
    }

    // Number of extended-keyword occurrences, the tie-break signal when two
    // candidates have the same length.
    pub fn keyword_hits(&self, text: &str) -> usize {
        self.location_keywords_extended
            .iter()
            .map(|word| text.matches(word.as_str()).count())
            .sum()
    }
}

fn load_keyword_file(path: Option<&str>, kind: &str) -> Option<Vec<String>> {
    let path = path?;
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Vec<String>>(&content) {
            Ok(list) if !list.is_empty() => Some(list),
            Ok(_) => {
                warn!("{} keyword file {} is empty, using defaults", kind, path);
                None
            }
            Err(err) => {
                warn!("Failed to parse {} keyword file {}: {}", kind, path, err);
                None
            }
        },
        Err(err) => {
            warn!("Failed to read {} keyword file {}: {}", kind, path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lexicon_extends_anchors_with_unit_suffixes() {
        let lexicon = Lexicon::default();
        assert!(lexicon.location_keywords_extended().contains(&"층".to_string()));
        assert!(lexicon.location_keywords_extended().contains(&"회의실".to_string()));
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let lexicon = Lexicon::load(Some("/nonexistent/location.json"), None);
        assert_eq!(
            lexicon.location_keywords().len(),
            DEFAULT_LOCATION_KEYWORDS.len()
        );
        assert!(lexicon.event_keywords().contains(&"회의".to_string()));
    }

    #[test]
    fn place_like_accepts_suffix_words() {
        let lexicon = Lexicon::default();
        assert!(lexicon.is_place_like("2층 회의실"));
        assert!(lexicon.is_place_like("강남역"));
        assert!(!lexicon.is_place_like("내일"));
    }

    #[test]
    fn keyword_hits_counts_every_occurrence() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.keyword_hits("3층회의실"), 2);
        assert_eq!(lexicon.keyword_hits("서울카페"), 1);
    }
}
