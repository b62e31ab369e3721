pub mod advisor;
pub mod cli;
pub mod config;
pub mod data;
pub mod embeddings;
pub mod errors;
pub mod logging;
pub mod models;
pub mod plans;
pub mod rag;


pub use advisor::Catalog;
pub use advisor::PlanAdvisor;
pub use advisor::Recommendation;
pub use config::AppConfig;
pub use errors::*;
