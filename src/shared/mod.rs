//! Shared application concerns: configuration.

pub mod config;
