// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for caravan-models.

use caravan_protocol::EnvelopeError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Result type using ModelError
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors returned by model operations.
///
/// Validation problems are aggregated into [`ValidationError`]; the other
/// variants are sentinels that signal a broken invariant or an undecodable
/// record and are propagated to the caller unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// One or more structural validation failures.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The group carries neither an instance nor an evacuating record.
    #[error("ActualLRPGroup invalid")]
    ActualLrpGroupInvalid,

    /// A decoded record has a shape the domain types cannot represent.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The requested state change is not permitted.
    #[error("cannot transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Protobuf decoding failed.
    #[error("protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope around a payload is malformed.
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),
}

impl ModelError {
    /// Get the error code string for this error type.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "INVALID_REQUEST",
            Self::ActualLrpGroupInvalid => "INVALID_RECORD",
            Self::InvalidRecord(_) => "INVALID_RECORD",
            Self::InvalidTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::Decode(_) => "INVALID_PROTOBUF_MESSAGE",
            Self::Json(_) => "INVALID_JSON_MESSAGE",
            Self::Envelope(_) => "DESERIALIZE_ERROR",
        }
    }

    pub(crate) fn invalid_record(message: impl Into<String>) -> Self {
        ModelError::InvalidRecord(message.into())
    }
}
