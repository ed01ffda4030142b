pub mod analysis;
pub mod lenient;
pub mod provenance;
pub mod resume;
pub mod suggestion;
