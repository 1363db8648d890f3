pub mod boundary;
pub mod event_labeler;
pub mod location_selector;
pub mod segmenter;
pub mod tagger;
pub mod time_normalizer;
