//! Application service layer - use cases, config, repository wiring

pub mod config;
pub mod repository;
pub mod services;

pub use config::{AiConfig, Config};
pub use services::Portal;
