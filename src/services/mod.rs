// Service exports
pub mod catalog;
pub mod scoring;

pub use catalog::CatalogStore;
pub use scoring::ScoringService;
