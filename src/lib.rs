// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires the terminal, config and logging together.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod logging;
pub mod runtime;
pub mod sentences;
pub mod session;
pub mod terminal;
pub mod ui;

pub const TICK_RATE_MS: u64 = 100;
