//! Library entrypoint for maker-cdp-monitor.
//!
//! Exposes all modules so integration tests can import them.

pub mod chain;
pub mod config;
pub mod monitor;
pub mod notify;
