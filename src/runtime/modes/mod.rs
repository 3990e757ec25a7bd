//! Mode routing
//!
//! `serve` (or no subcommand) starts the HTTP server; everything else is a
//! one-shot maintenance command.

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::run_server;
