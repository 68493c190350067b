//! Mirror Module
//!
//! Deploys a staging clone to a target with a delta copy (rsync). The
//! target needs no git at all.
//!
//! ## Structure
//!
//! - `options` - Request and option types (`MirrorRequest`, `MirrorOptions`)
//! - `result` - Result type (`MirrorReport`)
//! - `use_case` - Orchestration (`MirrorSync`)

mod options;
mod result;
mod use_case;

pub use options::{MirrorOptions, MirrorRequest};
pub use result::MirrorReport;
pub use use_case::{rsync_command, MirrorSync};
