//! Campus admin console.
//!
//! Wires the record table and the student form from `campus_core` to the
//! notification bus from `campus_events`, loads configuration and fixtures,
//! and exposes everything over a line-delimited JSON IPC surface. The binary
//! entrypoint lives in `main.rs`.

pub mod config;
pub mod fixture;
pub mod form;
pub mod ipc;
pub mod simulated;
pub mod state;
pub mod table;
