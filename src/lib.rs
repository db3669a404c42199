//! Watchtime: tracks how long videos are actually watched and keeps a
//! bounded per-URL history of it.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
