use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// Categories the external entity tagger may attach to a span. The set
// mirrors the labels the original pipeline treated as location-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanLabel {
    #[serde(rename = "LOC")]
    Location,
    #[serde(rename = "GPE")]
    GeoPolitical,
    #[serde(rename = "FAC")]
    Facility,
    #[serde(rename = "ORG")]
    Organization,
    #[serde(rename = "LC")]
    LocationContext,
    #[serde(other)]
    Other,
}

impl SpanLabel {
    pub fn is_location_like(&self) -> bool {
        !matches!(self, SpanLabel::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub text: String,
    pub label: SpanLabel,
}

// Optional collaborator supplying entity spans. The engine must work with
// this entirely absent.
#[async_trait]
pub trait EntityTagger: Send + Sync {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, String>;
}

// Optional collaborator supplying nouns for the event-label fallback.
#[async_trait]
pub trait NounExtractor: Send + Sync {
    async fn nouns(&self, text: &str) -> Result<Vec<String>, String>;
}
