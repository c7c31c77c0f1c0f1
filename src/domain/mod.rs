//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    Attachment, ConversationLabel, ConversationRef, DownloadStats, MediaItem, MessageNode,
    PeerKind, PhotoAttachment, PhotoSize, VideoAttachment,
};
pub use errors::DomainError;
