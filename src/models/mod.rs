pub mod calendar;
pub mod lexicon;
pub mod schedule;
