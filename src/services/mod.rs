pub mod checklist;
pub mod cleaning_service;
pub use cleaning_service::CleaningService;
pub mod facility_service;
pub use facility_service::FacilityService;
pub mod rotation;
