//! vk-archiver: archive photo/video attachments from VK private messaging
//! history, preserving original capture timestamps. Hexagonal architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
