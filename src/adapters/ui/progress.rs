//! Renders pipeline progress events (0-100 integers) as an indicatif bar.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A 0-100 percent bar with a phase message on the left.
pub fn percent_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{msg:>28} [{bar:40.cyan/blue}] {pos:>3}%")
            .expect("static progress template")
            .progress_chars("=>-"),
    );
    bar
}

/// Consumes progress events until the channel closes. The pipeline is the
/// single producer; this task is the single consumer.
pub fn drive(bar: ProgressBar, mut rx: mpsc::Receiver<u8>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(percent) = rx.recv().await {
            bar.set_position(u64::from(percent));
        }
    })
}
