//! Wiring & DI. Entry point: bootstrap adapters, inject into the pipeline,
//! run the interactive flow. No business logic here.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vk_archiver::adapters::media::MediaDownloader;
use vk_archiver::adapters::ui::tui::TuiInputPort;
use vk_archiver::adapters::vk::VkHttpGateway;
use vk_archiver::ports::{DownloadPort, InputPort, VkGateway};
use vk_archiver::shared::config::AppConfig;
use vk_archiver::usecases::PipelineService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is loaded inside AppConfig::load, keeping config self-contained.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    vk_archiver::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_default();
    let token = cfg.token.clone().unwrap_or_default();
    if token.is_empty() {
        anyhow::bail!(
            "Set VK_ARCHIVER_TOKEN (env or .env) to a VK access token with messages scope"
        );
    }

    let output_dir = PathBuf::from(cfg.output_dir.as_deref().unwrap_or("./vk-media"));
    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| anyhow::anyhow!("create output dir {}: {}", output_dir.display(), e))?;
    let output_abs = output_dir.canonicalize().unwrap_or_else(|_| output_dir.clone());
    info!(path = %output_abs.display(), "output directory");

    // --- Adapters ---
    let vk: Arc<dyn VkGateway> = Arc::new(VkHttpGateway::new(token));
    let downloader: Arc<dyn DownloadPort> =
        Arc::new(MediaDownloader::new(cfg.ytdlp_path_or_default()));

    // --- Cancellation: Ctrl-C sets the flag, pipeline polls it ---
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("cancel requested, stopping after the current item");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    // --- Pipeline + progress channel (bounded; UI is the single consumer) ---
    let (progress_tx, progress_rx) = mpsc::channel(cfg.progress_queue_size_or_default());
    let page_delay = cfg.page_delay_or_default();
    info!(page_delay_ms = page_delay.as_millis() as u64, "pagination politeness delay");
    let pipeline = Arc::new(PipelineService::new(
        vk,
        downloader,
        page_delay,
        cancel,
        progress_tx,
    ));

    let input: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(pipeline, output_abs, progress_rx));
    input.run().await.map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
