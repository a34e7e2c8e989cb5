//! Data models: engine results, wire payloads, configuration.

pub mod config;
pub mod output;
pub mod text;
