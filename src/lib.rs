// NOTE: Allow these for the whole project.
#![allow(clippy::collapsible_if)]

pub mod log;
pub mod engine;
pub mod minimap;
pub mod utils;
pub mod world;

pub use engine::config::{ConfigError, MinimapConfig, MinimapConfigs};
pub use minimap::Minimap;
