pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{agent, session};
pub use config::{AppConfig, ConfigError};
pub use domain::types;
pub use infrastructure::{device, model, phone, server};
