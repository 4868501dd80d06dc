//! Core error type.
//!
//! Only *soft* failures surface here (spec'd to warn and no-op, or to be
//! reported to the caller).  Invariant violations — a non-unit direction
//! vector, a multi-bit direction where a single bit is required — are
//! programming errors and panic instead.

use thiserror::Error;

/// Errors produced by `rail-core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown compass direction name {0:?}")]
    UnknownCompassName(String),

    #[error("invalid direction bitmask {0:#010b}")]
    InvalidDirectionBits(u8),
}

/// Shorthand result type for `rail-core`.
pub type CoreResult<T> = Result<T, CoreError>;
