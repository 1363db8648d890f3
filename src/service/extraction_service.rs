use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;
use log::debug;

use crate::extract::boundary;
use crate::extract::event_labeler::EventLabeler;
use crate::extract::location_selector::LocationSelector;
use crate::extract::segmenter::{self, ExtractError};
use crate::extract::tagger::{EntityTagger, NounExtractor};
use crate::extract::time_normalizer::TimeNormalizer;
use crate::models::lexicon::Lexicon;
use crate::models::schedule::{ScheduleDraft, TimeField};

// Segments input and assembles one ScheduleDraft per clause. Holds the
// immutable lexicon and the optional NLP collaborators for the process
// lifetime.
pub struct ExtractionService {
    normalizer: TimeNormalizer,
    location_selector: LocationSelector,
    event_labeler: EventLabeler,
    delimiter: char,
}

impl ExtractionService {
    pub fn new(lexicon: Arc<Lexicon>, tz: Tz) -> Self {
        Self::with_taggers(lexicon, tz, None, None)
    }

    pub fn with_taggers(
        lexicon: Arc<Lexicon>,
        tz: Tz,
        entity_tagger: Option<Arc<dyn EntityTagger>>,
        noun_extractor: Option<Arc<dyn NounExtractor>>,
    ) -> Self {
        Self {
            normalizer: TimeNormalizer::new(tz),
            location_selector: LocationSelector::new(lexicon.clone(), entity_tagger),
            event_labeler: EventLabeler::new(lexicon, noun_extractor),
            delimiter: segmenter::DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub async fn parse_schedules(
        &self,
        raw_text: &str,
        now: DateTime<Tz>,
    ) -> Result<Vec<ScheduleDraft>, ExtractError> {
        let clauses = segmenter::segment(raw_text, self.delimiter)?;
        let mut drafts = Vec::with_capacity(clauses.len());
        for clause in &clauses {
            let draft = self.assemble(clause, now).await;
            debug!(
                "Clause {:?} -> time={:?} location={:?} event={:?}",
                clause, draft.time, draft.location, draft.event
            );
            drafts.push(draft);
        }
        Ok(drafts)
    }

    // Pure composition of the three extractors; missing sub-results become
    // explicit None/fallback states and never abort the clause.
    pub async fn assemble(&self, clause: &str, now: DateTime<Tz>) -> ScheduleDraft {
        let parts = boundary::split_clause(clause);
        let time = parts
            .time_part
            .as_deref()
            .and_then(|fragment| self.normalizer.normalize(fragment, now))
            .map(|dt| TimeField::from_datetime(&dt));
        let location = self
            .location_selector
            .select(clause)
            .await
            .map(|candidate| candidate.text);
        let event = self.event_labeler.label(clause, &parts.event_part).await;
        ScheduleDraft {
            time,
            location,
            event,
        }
    }
}
