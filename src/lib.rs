pub mod cache;
pub mod config;
pub mod docs;
pub mod doctor;
pub mod scrape;
pub mod service;

pub use config::Config;
pub use service::ShadcnSvelteService;
