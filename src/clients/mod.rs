pub mod google_calendar;
pub mod nlp_client;
