//! System-level modules
//!
//! - Logging initialization
//! - Panic hook that records crashes before the process exits

pub mod logging;
pub mod panic_handler;
