// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod logging;
pub mod quotes;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod word_units;
