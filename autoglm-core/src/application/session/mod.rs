//! Single-session orchestration: one agent per process, driven by four
//! commands (initialize, run task, status, reset).

mod controller;
mod errors;
mod registry;


pub use controller::SessionController;
pub use errors::{ConfigurationError, SessionError};
pub use registry::{Session, SessionRegistry, TaskGuard};
