pub mod cleaning_repo;
pub use cleaning_repo::CleaningRepository;
pub mod facility_repo;
pub use facility_repo::FacilityRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
