use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::extract::tagger::{EntityTagger, NounExtractor, TaggedSpan};

// HTTP client for the optional Korean NLP sidecar. Configuring no sidecar
// leaves both collaborators absent; the engine works either way.
pub struct HttpNlpTagger {
    base_url: String,
}

#[derive(Debug, Serialize)]
struct TagRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct NounsResponse {
    #[serde(default)]
    nouns: Vec<String>,
}

impl HttpNlpTagger {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_text(&self, path: &str, text: &str) -> Result<String, String> {
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/{}", self.base_url, path))
            .json(&TagRequest { text })
            .send()
            .await
            .map_err(|err| format!("NLP sidecar request failed: {}", err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| format!("NLP sidecar read failed: {}", err))?;
        if !status.is_success() {
            return Err(format!("NLP sidecar returned {}: {}", status, body));
        }
        Ok(body)
    }
}

#[async_trait]
impl EntityTagger for HttpNlpTagger {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, String> {
        let body = self.post_text("entities", text).await?;
        serde_json::from_str(&body).map_err(|err| format!("Failed to parse entity spans: {}", err))
    }
}

#[async_trait]
impl NounExtractor for HttpNlpTagger {
    async fn nouns(&self, text: &str) -> Result<Vec<String>, String> {
        let body = self.post_text("nouns", text).await?;
        let parsed: NounsResponse =
            serde_json::from_str(&body).map_err(|err| format!("Failed to parse nouns: {}", err))?;
        Ok(parsed.nouns)
    }
}
