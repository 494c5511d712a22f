pub mod auth;
pub mod cleaning;
pub mod facility;
