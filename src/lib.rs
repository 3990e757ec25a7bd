//! Portfolio - content and integration backend for a personal portfolio site
//!
//! # Architecture
//! - `storage`: content models and the sea-orm backend (SQLite / MySQL / PostgreSQL)
//! - `services`: upstream integrations (email relay, countries, GitHub)
//! - `api`: HTTP handlers, CMS routes and middleware
//! - `config`: TOML + environment configuration
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging and panic handling

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
