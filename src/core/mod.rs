//! Core types shared across the codebase.

pub mod id;
mod state;

pub use state::{is_shutdown, register_server, register_shutdown_tx, setup_shutdown_handler};
