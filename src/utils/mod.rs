//! Utility modules.

pub mod yaml;

pub use yaml::json_to_yaml;
