use std::sync::Arc;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::boundary;
use crate::extract::tagger::{EntityTagger, TaggedSpan};
use crate::models::lexicon::Lexicon;

// Shown by callers when no candidate survives selection.
pub const NO_LOCATION_MARKER: &str = "위치 정보 없음";

const MAX_UNIT_TOKENS: usize = 3;

static UNIT_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d{1,3}(층|호|번|출구)?").expect("valid unit token regex"));
static TRAILING_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[0-9A-Za-z가-힣]+").expect("valid trailing word regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    Boundary,
    Keyword,
    EntityTag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCandidate {
    pub text: String,
    pub source: CandidateSource,
}

impl LocationCandidate {
    fn new(text: String, source: CandidateSource) -> Self {
        Self { text, source }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn score(&self, lexicon: &Lexicon) -> (usize, usize) {
        (self.char_len(), lexicon.keyword_hits(&self.text))
    }
}

// Pools candidates from every strategy and picks one deterministically.
pub struct LocationSelector {
    lexicon: Arc<Lexicon>,
    tagger: Option<Arc<dyn EntityTagger>>,
}

impl LocationSelector {
    pub fn new(lexicon: Arc<Lexicon>, tagger: Option<Arc<dyn EntityTagger>>) -> Self {
        Self { lexicon, tagger }
    }

    pub async fn select(&self, clause: &str) -> Option<LocationCandidate> {
        let mut pool: Vec<LocationCandidate> = Vec::new();

        // The text between 시 and 에서 is a strong candidate on its own.
        let parts = boundary::split_clause(clause);
        if let Some(place) = parts.place_part {
            push_unique(&mut pool, LocationCandidate::new(place, CandidateSource::Boundary));
        }

        for text in self.keyword_candidates(clause) {
            push_unique(&mut pool, LocationCandidate::new(text, CandidateSource::Keyword));
        }

        // Entity spans rank after the rule-based candidates.
        if let Some(tagger) = &self.tagger {
            match tagger.tag(clause).await {
                Ok(spans) => {
                    for span in &spans {
                        if let Some(text) = entity_candidate(clause, span) {
                            push_unique(
                                &mut pool,
                                LocationCandidate::new(text, CandidateSource::EntityTag),
                            );
                        }
                    }
                }
                Err(err) => warn!("Entity tagger unavailable, continuing without it: {}", err),
            }
        }

        self.pick(pool)
    }

    // A candidate opens at the start of the token containing a lexicon
    // keyword and extends over trailing unit tokens (2층, 301호), then over
    // one trailing word such as a room name.
    fn keyword_candidates(&self, clause: &str) -> Vec<String> {
        let mut found = Vec::new();
        for keyword in self.lexicon.location_keywords_extended() {
            for (idx, _) in clause.match_indices(keyword.as_str()) {
                let start = token_start(clause, idx);
                let end = extend_span(clause, idx + keyword.len());
                let text = clean_candidate(&clause[start..end]);
                if !text.is_empty() && !found.contains(&text) {
                    found.push(text);
                }
            }
        }
        found
    }

    fn pick(&self, pool: Vec<LocationCandidate>) -> Option<LocationCandidate> {
        let filtered: Vec<LocationCandidate> = pool
            .into_iter()
            .filter(|c| c.char_len() > 1 && !is_purely_numeric(&c.text))
            .collect();

        let mut place_like: Vec<LocationCandidate> = filtered
            .iter()
            .filter(|c| self.lexicon.is_place_like(&c.text))
            .cloned()
            .collect();
        if !place_like.is_empty() {
            // Stable sort keeps the pooling order on ties, so rule-based
            // candidates win over entity spans with equal scores.
            place_like.sort_by(|a, b| b.score(&self.lexicon).cmp(&a.score(&self.lexicon)));
            return place_like.into_iter().next();
        }

        let mut rest = filtered;
        rest.sort_by(|a, b| b.char_len().cmp(&a.char_len()));
        rest.into_iter().next()
    }
}

fn push_unique(pool: &mut Vec<LocationCandidate>, candidate: LocationCandidate) {
    if !pool.iter().any(|c| c.text == candidate.text) {
        pool.push(candidate);
    }
}

fn is_purely_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

// Walks back to the start of the whitespace-delimited token containing idx.
fn token_start(text: &str, idx: usize) -> usize {
    match text[..idx].rfind(|c: char| c.is_whitespace()) {
        Some(ws) => ws + text[ws..].chars().next().map_or(1, char::len_utf8),
        None => 0,
    }
}

fn extend_span(text: &str, mut end: usize) -> usize {
    let mut units = 0;
    while units < MAX_UNIT_TOKENS {
        let Some(m) = UNIT_TOKEN_RE.find(&text[end..]) else {
            break;
        };
        end += m.end();
        units += 1;
    }
    if units > 0 {
        if let Some(m) = TRAILING_WORD_RE.find(&text[end..]) {
            end += m.end();
        }
    }
    end
}

fn clean_candidate(text: &str) -> String {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix("에서").unwrap_or(trimmed);
    trimmed.trim().to_string()
}

// Entity spans are located in the clause and extended with the same
// trailing-unit rule as keyword candidates.
fn entity_candidate(clause: &str, span: &TaggedSpan) -> Option<String> {
    if !span.label.is_location_like() || span.text.is_empty() {
        return None;
    }
    let idx = clause.find(&span.text)?;
    let end = extend_span(clause, idx + span.text.len());
    let candidate = clean_candidate(&clause[idx..end]);
    if candidate.is_empty() { None } else { Some(candidate) }
}
