//! IEP & Mechatronics Helper Service
//!
//! Configuration loading, responder wiring and the interactive terminal front
//! end. The `iep-helper` binary is a thin wrapper around this library.

pub mod config;
pub mod repl;
pub mod state;
