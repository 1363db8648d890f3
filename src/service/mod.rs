pub mod calendar_service;
pub mod extraction_service;
pub mod reconcile_service;
