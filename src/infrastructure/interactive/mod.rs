//! Interactive Runners
//!
//! Concrete implementations of the InteractiveRunner port.

mod pty;

pub use pty::PtyRunner;
