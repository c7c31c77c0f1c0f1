//! VK API adapter: reqwest client, wire types, and mapping to domain.

pub mod api_types;
pub mod client;
pub mod mapper;

pub use client::VkHttpGateway;
