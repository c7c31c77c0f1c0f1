//! Infrastructure adapters. Implement outbound ports.
//!
//! VK HTTP API, media retrieval/stamping, terminal UI. Map errors to DomainError.

pub mod media;
pub mod ui;
pub mod vk;
