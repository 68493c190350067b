//! Domain Layer
//!
//! Pure deploy logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Commits, deploy records, deploy history
//! - `value_objects/` - Host identity, shell quoting
//! - `services/` - Prompt matching for interactive runs
//! - `ports/` - Interface definitions for infrastructure (executors, history store, interactive runner)
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never runs commands or touches the network directly
//! 2. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
