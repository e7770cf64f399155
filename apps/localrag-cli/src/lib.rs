//! localrag-cli
//!
//! Startup wiring and the HTTP surface shared by the `localrag` binary and
//! its tests.

pub mod repl;
pub mod server;
pub mod wiring;
