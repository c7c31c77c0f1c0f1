//! Application configuration. Credentials, paths, rate limiting.

use serde::Deserialize;
use std::time::Duration;

/// Politeness delay between successive paginated API calls. The platform
/// allows about three requests per second.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 330;

/// Default capacity for the progress event channel. Progress is lossy when
/// the consumer lags; a small buffer is enough.
pub const DEFAULT_PROGRESS_QUEUE_SIZE: usize = 64;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Opaque VK bearer token. Read from VK_ARCHIVER_TOKEN.
    pub token: Option<String>,

    /// Destination root; one subdirectory created per selected conversation.
    /// Read from VK_ARCHIVER_OUTPUT_DIR.
    pub output_dir: Option<String>,

    /// Delay in ms between paginated API requests. Read from
    /// VK_ARCHIVER_PAGE_DELAY_MS.
    #[serde(default)]
    pub page_delay_ms: Option<u64>,

    /// yt-dlp binary name or path. Read from VK_ARCHIVER_YTDLP_PATH.
    #[serde(default)]
    pub ytdlp_path: Option<String>,

    /// Progress channel buffer size. Read from VK_ARCHIVER_PROGRESS_QUEUE_SIZE.
    #[serde(default)]
    pub progress_queue_size: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("VK_ARCHIVER"));
        if let Ok(path) = std::env::var("VK_ARCHIVER_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Politeness delay between page fetches. Defaults to 330 ms.
    pub fn page_delay_or_default(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms.unwrap_or(DEFAULT_PAGE_DELAY_MS))
    }

    /// yt-dlp binary. Defaults to "yt-dlp" on PATH.
    pub fn ytdlp_path_or_default(&self) -> String {
        self.ytdlp_path
            .clone()
            .unwrap_or_else(|| "yt-dlp".to_string())
    }

    /// Progress channel buffer size. Defaults to DEFAULT_PROGRESS_QUEUE_SIZE.
    pub fn progress_queue_size_or_default(&self) -> usize {
        self.progress_queue_size
            .unwrap_or(DEFAULT_PROGRESS_QUEUE_SIZE)
    }
}
