pub mod cleaning;
pub mod facilities;
