//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - The single-line "OK" confirmations and other output
//! - Tracing subscriber setup
//!
//! ## Structure
//!
//! - `cli` - Command-line definition
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `logging` - `tracing-subscriber` initialisation
//! - `output` - Renders use case reports as text or JSON

pub mod cli;
pub mod factory;
pub mod logging;
pub mod output;

pub use factory::{create_history_query, create_mirror_sync, create_push_hook_sync};
