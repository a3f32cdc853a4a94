//! Configuration utility types.
//!
//! | Module   | Purpose                                      |
//! |----------|----------------------------------------------|
//! | `error`  | Configuration error types                    |
//! | `handle` | Shared configuration handle (atomic reload)  |

mod error;
mod handle;

pub use error::{ConfigDiagnostics, ConfigError};
pub use handle::ConfigHandle;
