//! Implements InputPort. Inquire-based interactive flow:
//! enumerate -> multi-select conversations -> download with progress bar.

use crate::adapters::ui::progress;
use crate::domain::{ConversationLabel, DomainError};
use crate::ports::InputPort;
use crate::usecases::PipelineService;
use async_trait::async_trait;
use inquire::MultiSelect;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

fn option_line(label: &ConversationLabel) -> String {
    format!("{} ({})", label.title, label.peer_id)
}

/// TUI adapter. Owns the receiving end of the pipeline's progress channel.
pub struct TuiInputPort {
    pipeline: Arc<PipelineService>,
    output_dir: PathBuf,
    progress_rx: Mutex<Option<mpsc::Receiver<u8>>>,
}

impl TuiInputPort {
    pub fn new(
        pipeline: Arc<PipelineService>,
        output_dir: PathBuf,
        progress_rx: mpsc::Receiver<u8>,
    ) -> Self {
        Self {
            pipeline,
            output_dir,
            progress_rx: Mutex::new(Some(progress_rx)),
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let rx = self
            .progress_rx
            .lock()
            .ok()
            .and_then(|mut guard| guard.take())
            .ok_or_else(|| DomainError::Input("pipeline already running".into()))?;

        let bar = progress::percent_bar();
        bar.set_message("enumerating conversations");
        let driver = progress::drive(bar.clone(), rx);

        // Enumeration must complete before selection is possible.
        let labels = match self.pipeline.list_conversations().await {
            Ok(labels) => labels,
            Err(e) => {
                driver.abort();
                bar.finish_and_clear();
                return Err(e);
            }
        };
        bar.set_position(100);

        let options: Vec<String> = labels.iter().map(option_line).collect();
        let chosen = MultiSelect::new("Select conversations to archive", options)
            .prompt()
            .map_err(|e| DomainError::Input(e.to_string()))?;
        let selected: Vec<ConversationLabel> = labels
            .iter()
            .filter(|label| chosen.contains(&option_line(label)))
            .cloned()
            .collect();
        if selected.is_empty() {
            driver.abort();
            bar.finish_and_clear();
            return Err(DomainError::Input("no conversations selected".into()));
        }

        bar.reset();
        bar.set_message("downloading media");
        let result = self
            .pipeline
            .download_selected(&selected, &self.output_dir)
            .await;
        driver.abort();
        bar.finish_and_clear();
        let stats = result?;

        if stats.canceled {
            println!(
                "Canceled: {} downloaded, {} skipped. Partial output kept in {}",
                stats.downloaded,
                stats.skipped,
                self.output_dir.display()
            );
        } else {
            println!(
                "Done: {} downloaded, {} skipped -> {}",
                stats.downloaded,
                stats.skipped,
                self.output_dir.display()
            );
        }
        Ok(())
    }
}
