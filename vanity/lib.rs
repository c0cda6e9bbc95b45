//! Suffix search over witness addresses derived from a Bytom extended
//! public key, plus the configuration and logging the binary runs with.

pub mod app;
pub mod args;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod result;
pub mod sink;
pub mod space;

pub use self::engine::{Budget, SearchEngine, SearchSummary, StopReason, StopSignal, Strategy};
pub use self::error::{ConfigError, SearchError};
pub use self::result::SearchResult;
pub use self::space::IndexSpace;
