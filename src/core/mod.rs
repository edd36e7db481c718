//! Core - engine-wide plumbing shared by every other module
//!
//! - log     - console logging macros (must be first for macro export!)
//! - error   - the `SimError` taxonomy
//! - config  - JSON-loadable simulation settings

#[macro_use]
pub mod log;
pub mod config;
pub mod error;

pub use config::SimulationConfig;
pub use error::SimError;
