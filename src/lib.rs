// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod board;
pub mod clock;
pub mod error;
pub mod game;
pub mod game_config;
pub mod runtime;
pub mod stats;
pub mod symbols;
pub mod target;
pub mod util;
