// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised by the item query and analytics engine.
//!
//! - [`ValidationError`] covers malformed or contradictory input and is
//!   always raised before the store is touched.
//! - [`EngineError`] wraps validation failures together with the outcomes
//!   of store calls ([`NotFound`], [`Cancelled`], [`Store`]) and the loud
//!   [`UnsupportedGrouping`] failure of the aggregator.
//!
//! [`NotFound`]: EngineError::NotFound
//! [`Cancelled`]: EngineError::Cancelled
//! [`Store`]: EngineError::Store
//! [`UnsupportedGrouping`]: EngineError::UnsupportedGrouping

use rusqlite::ErrorCode;
use thiserror::Error;
use uuid::Uuid;

/// Input that cannot be turned into a well-formed request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("parameter '{0}' cannot be empty")]
    EmptyParameter(String),
    #[error("parameter '{0}' is required")]
    MissingParameter(String),
    #[error("parameter 'from' cannot be after 'to'")]
    InvertedRange,
    #[error("invalid '{field}' date '{value}', expected RFC 3339 or YYYY-MM-DD")]
    InvalidDate { field: String, value: String },
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid type '{0}', expected income or expense")]
    InvalidType(String),
    #[error("category must be at least {min} characters, got '{value}'")]
    InvalidCategory { value: String, min: usize },
    #[error("invalid id '{0}'")]
    InvalidId(String),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("item {0} not found")]
    NotFound(Uuid),
    #[error("unsupported group_by value: {0}")]
    UnsupportedGrouping(String),
    #[error("aggregate total exceeds the representable amount range")]
    AmountOverflow,
    #[error("operation cancelled")]
    Cancelled,
    /// Store internals are logged where the error is converted and never
    /// shown to the caller; the underlying error stays reachable via `source()`.
    #[error("internal store failure")]
    Store(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for EngineError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::OperationInterrupted) {
            tracing::warn!("store call interrupted");
            return EngineError::Cancelled;
        }
        tracing::error!(error = %value, "store call failed");
        EngineError::Store(value)
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn interrupted_statement_maps_to_cancelled() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_INTERRUPT),
            None,
        );
        assert!(matches!(EngineError::from(err), EngineError::Cancelled));
    }

    #[test]
    fn store_failure_hides_details() {
        let err = EngineError::from(rusqlite::Error::InvalidColumnName("secret".into()));
        assert_eq!(err.to_string(), "internal store failure");
        assert!(err.source().is_some());
    }
}
