//! Configuration loading
//!
//! Client settings from environment variables and TOML/JSON files.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, find_config_file, Settings};
