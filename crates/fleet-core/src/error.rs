//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `FleetError` where they
//! need to surface a core failure.

use thiserror::Error;

/// The top-level error type for `fleet-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fleet-core`.
pub type FleetResult<T> = Result<T, FleetError>;
