//! Shared types, movement loader, errors and logging for movdash

pub mod error;
pub mod logging;
pub mod movements;
pub mod types;
pub mod utils;

#[cfg(feature = "testing")]
pub mod test_utils;

// Re-export commonly used types
pub use error::{MovDashError, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use movements::{load, load_with, LoadOptions, SourceKind};
pub use types::*;
