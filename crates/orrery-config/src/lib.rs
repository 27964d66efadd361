//! Configuration for the orrery.
//!
//! Runtime settings and the body table persist to disk as a RON file. CLI
//! flags override loaded values; unknown or missing fields fall back to
//! defaults so old and new config files keep loading.

mod bodies;
mod cli;
mod config;
mod error;

pub use bodies::{BodyConfig, RingConfig, default_bodies};
pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, RenderConfig, SimulationConfig, SphereConfig, WindowConfig,
};
pub use error::ConfigError;
