//INFO: Integrations module - Google REST APIs behind the data gateway

pub mod google_api;
pub mod google_calendar;
pub mod google_gmail;

pub use google_api::GoogleApi;
pub use google_calendar::EventSummary;
pub use google_gmail::MessageSummary;
