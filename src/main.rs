#![allow(non_snake_case)]

mod cli;
mod config;

use std::env;
use std::sync::Arc;

use scheduleBot::clients::nlp_client::HttpNlpTagger;
use scheduleBot::extract::tagger::{EntityTagger, NounExtractor};
use scheduleBot::models::lexicon::Lexicon;
use scheduleBot::service::extraction_service::ExtractionService;

use crate::config::AppConfig;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    };

    let lexicon = Arc::new(Lexicon::load(
        config.location_keywords_path().as_deref(),
        config.event_keywords_path().as_deref(),
    ));

    let engine = match config.tagger_url() {
        Some(url) => {
            let tagger = Arc::new(HttpNlpTagger::new(url));
            let entity_tagger: Arc<dyn EntityTagger> = tagger.clone();
            let noun_extractor: Arc<dyn NounExtractor> = tagger;
            ExtractionService::with_taggers(
                lexicon,
                config.timezone(),
                Some(entity_tagger),
                Some(noun_extractor),
            )
        }
        None => ExtractionService::new(lexicon, config.timezone()),
    };

    cli::cli(Arc::new(engine), config).await;
}
