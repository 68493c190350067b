//! Domain Services
//!
//! Pure logic with no I/O dependencies.

mod expect;

pub use expect::ExpectMachine;
