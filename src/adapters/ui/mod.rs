//! Terminal UI adapters: banner, progress rendering, interactive prompts.

pub mod banner;
pub mod progress;
pub mod tui;

/// Prints the welcome banner. Call once at startup (after tracing init).
pub fn init_ui() {
    banner::print_welcome();
}
