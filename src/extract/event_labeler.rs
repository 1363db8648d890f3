use std::sync::Arc;

use log::warn;

use crate::extract::tagger::NounExtractor;
use crate::models::lexicon::Lexicon;

pub const FALLBACK_EVENT_LABEL: &str = "일정";

// Picks an event title. Always returns a non-empty string.
pub struct EventLabeler {
    lexicon: Arc<Lexicon>,
    noun_extractor: Option<Arc<dyn NounExtractor>>,
}

impl EventLabeler {
    pub fn new(lexicon: Arc<Lexicon>, noun_extractor: Option<Arc<dyn NounExtractor>>) -> Self {
        Self {
            lexicon,
            noun_extractor,
        }
    }

    // Policy order: residual verbatim, first configured keyword in the
    // clause, last extracted noun, fixed fallback.
    pub async fn label(&self, clause: &str, residual: &str) -> String {
        let residual = residual.trim();
        if !residual.is_empty() {
            return residual.to_string();
        }

        if let Some(keyword) = self
            .lexicon
            .event_keywords()
            .iter()
            .find(|kw| clause.contains(kw.as_str()))
        {
            return keyword.clone();
        }

        if let Some(extractor) = &self.noun_extractor {
            match extractor.nouns(clause).await {
                Ok(nouns) => {
                    if let Some(last) = nouns.iter().rev().find(|n| !n.trim().is_empty()) {
                        return last.trim().to_string();
                    }
                }
                Err(err) => warn!("Noun extractor unavailable, falling back: {}", err),
            }
        }

        FALLBACK_EVENT_LABEL.to_string()
    }
}
