//! # Response Envelope
//!
//! The base response contract for all operations exposed by integration
//! components. The model separates explicitly:
//!
//! - expected business failures, carried by
//!   [`OperationResult`](crate::values::OperationResult) in a normal
//!   response
//! - technical failures, raised as
//!   [`IntegrationError`](crate::types::IntegrationError) and converted here
//!   exactly once at the boundary, already sanitized
//!
//! Callers outside the boundary only ever see success-and-data or
//! failure-and-generic-message; never stack traces, provider codes, or
//! internal causes.

use serde::{Deserialize, Serialize};

use crate::classify;
use crate::types::IntegrationError;
use crate::values::{CorrelationId, OperationResult, ResultMessage, Timestamp};

/// Outcome metadata for one executed operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Success or controlled business failure. Defaults to success.
    pub result: OperationResult,
    /// Descriptive message associated with the result. A
    /// failure-constructed envelope always carries one.
    pub message: Option<ResultMessage>,
    /// Correlation id of the execution.
    pub correlation_id: Option<CorrelationId>,
    /// When the response was generated, in UTC.
    pub timestamp: Timestamp,
}

impl ResponseEnvelope {
    /// Creates a success-shaped envelope with the timestamp set to now and
    /// no message or correlation id.
    pub fn new() -> Self {
        Self {
            result: OperationResult::success(),
            message: None,
            correlation_id: None,
            timestamp: Timestamp::now(),
        }
    }

    /// Converts a raised error into a sanitized failure response.
    ///
    /// The message comes from [`classify::external_message`], so internal
    /// detail never crosses the boundary. The correlation id is freshly
    /// minted and the one carried by the error is NOT propagated: a caller
    /// that needs end-to-end trace continuity must capture
    /// [`IntegrationError::correlation_id`] before this conversion.
    pub fn failure(err: &IntegrationError) -> Self {
        Self {
            result: OperationResult::failure(),
            message: Some(classify::external_message(err)),
            correlation_id: Some(CorrelationId::new()),
            timestamp: Timestamp::now(),
        }
    }

    /// Builds a failure response from a message the caller asserts is
    /// already safe to expose, bypassing classification.
    pub fn failure_message(message: ResultMessage) -> Self {
        Self {
            result: OperationResult::failure(),
            message: Some(message),
            correlation_id: Some(CorrelationId::new()),
            timestamp: Timestamp::now(),
        }
    }

    /// Sets the correlation id, for collaborators propagating the one from
    /// the originating request.
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Sets the result message.
    pub fn with_message(mut self, message: ResultMessage) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ResponseEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

/// A response envelope for operations that produce data: the base outcome
/// metadata plus a typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponseEnvelope<T> {
    /// Transversal outcome metadata.
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// Data returned by the operation. Unset on controlled failure or when
    /// the operation produces no result.
    pub data: Option<T>,
}

impl<T> DataResponseEnvelope<T> {
    /// Builds a success response around `data`, with a fresh correlation id
    /// and the timestamp set to now.
    pub fn success(data: T) -> Self {
        Self {
            envelope: ResponseEnvelope::new().with_correlation_id(CorrelationId::new()),
            data: Some(data),
        }
    }

    /// Converts a raised error into a sanitized failure response without
    /// payload. See [`ResponseEnvelope::failure`].
    pub fn failure(err: &IntegrationError) -> Self {
        Self {
            envelope: ResponseEnvelope::failure(err),
            data: None,
        }
    }

    /// Sets the correlation id on the underlying envelope.
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.envelope = self.envelope.with_correlation_id(correlation_id);
        self
    }
}
