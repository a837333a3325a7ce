//! Runtime configuration: config file, environment and master key.

pub mod settings;

pub use settings::{master_key, master_key_from, Settings};
