//! Media retrieval and metadata stamping adapters.

pub mod downloader;
pub mod stamper;

pub use downloader::MediaDownloader;
