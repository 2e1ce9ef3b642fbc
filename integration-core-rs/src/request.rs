//! # Request Envelope
//!
//! The base request contract for all integration components: the intent to
//! execute an operation, carrying only the transversal metadata needed for
//! traceability and auditing. No business logic, no provider dependency.
//!
//! A caller builds the envelope, normalizes it, validates it, and only then
//! dispatches. Collaborators receiving an envelope must forward its
//! correlation id to every downstream call.

use serde::{Deserialize, Serialize};

use crate::values::{CorrelationId, RequestSource, Timestamp, ValidationError};

/// Metadata for one operation request.
///
/// All three fields must be populated before dispatch; [`Self::validate`]
/// enforces this. [`Self::new`] pre-populates the timestamp with the current
/// UTC instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Correlation id used to trace the request across components.
    pub correlation_id: Option<CorrelationId>,
    /// The system, service, or application that initiated the request.
    pub source: Option<RequestSource>,
    /// When the request was created, in UTC.
    pub timestamp: Option<Timestamp>,
}

impl RequestEnvelope {
    /// Creates an envelope with the timestamp set to now (UTC) and the other
    /// fields unset.
    pub fn new() -> Self {
        Self {
            correlation_id: None,
            source: None,
            timestamp: Some(Timestamp::now()),
        }
    }

    /// Sets the correlation id.
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Sets the request source.
    pub fn with_source(mut self, source: RequestSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the creation timestamp.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Normalizes the timestamp: unset becomes now (UTC), a set value is
    /// re-normalized to UTC. Idempotent.
    pub fn normalize_timestamp(mut self) -> Self {
        self.timestamp = Some(match self.timestamp {
            Some(timestamp) => Timestamp::from_instant(timestamp.instant()),
            None => Timestamp::now(),
        });
        self
    }

    /// Assigns `default` as the source when none is set.
    pub fn ensure_source(mut self, default: RequestSource) -> Self {
        if self.source.is_none() {
            self.source = Some(default);
        }
        self
    }

    /// Checks that the envelope is ready for dispatch, reporting the first
    /// missing field in fixed order: correlation id, timestamp, source.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.correlation_id.is_none() {
            return Err(ValidationError::MissingField {
                field: "correlation_id",
            });
        }
        if self.timestamp.is_none() {
            return Err(ValidationError::MissingField { field: "timestamp" });
        }
        if self.source.is_none() {
            return Err(ValidationError::MissingField { field: "source" });
        }
        Ok(())
    }
}

impl Default for RequestEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

/// A request envelope for operations that transport data: the base metadata
/// plus a mandatory typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRequestEnvelope<T> {
    /// Transversal request metadata.
    #[serde(flatten)]
    pub envelope: RequestEnvelope,
    /// Data required to execute the operation.
    pub data: T,
}

impl<T> DataRequestEnvelope<T> {
    /// Creates an envelope around `data`, with the timestamp set to now.
    pub fn new(data: T) -> Self {
        Self {
            envelope: RequestEnvelope::new(),
            data,
        }
    }

    /// Sets the correlation id.
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.envelope = self.envelope.with_correlation_id(correlation_id);
        self
    }

    /// Sets the request source.
    pub fn with_source(mut self, source: RequestSource) -> Self {
        self.envelope = self.envelope.with_source(source);
        self
    }

    /// See [`RequestEnvelope::normalize_timestamp`].
    pub fn normalize_timestamp(mut self) -> Self {
        self.envelope = self.envelope.normalize_timestamp();
        self
    }

    /// See [`RequestEnvelope::ensure_source`].
    pub fn ensure_source(mut self, default: RequestSource) -> Self {
        self.envelope = self.envelope.ensure_source(default);
        self
    }

    /// See [`RequestEnvelope::validate`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.envelope.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unset() -> RequestEnvelope {
        RequestEnvelope {
            correlation_id: None,
            source: None,
            timestamp: None,
        }
    }

    #[test]
    fn test_validate_reports_correlation_id_first() {
        assert_eq!(
            unset().validate(),
            Err(ValidationError::MissingField {
                field: "correlation_id"
            })
        );
    }

    #[test]
    fn test_validate_reports_timestamp_second() {
        let request = unset().with_correlation_id(CorrelationId::new());
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField { field: "timestamp" })
        );
    }

    #[test]
    fn test_validate_reports_source_third() {
        let request = unset()
            .with_correlation_id(CorrelationId::new())
            .with_timestamp(Timestamp::now());
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField { field: "source" })
        );
    }

    #[test]
    fn test_normalize_then_validate_scenario() {
        let request = RequestEnvelope {
            correlation_id: Some(CorrelationId::from_raw("abc123").unwrap()),
            source: Some(RequestSource::from_raw("order-service").unwrap()),
            timestamp: None,
        }
        .normalize_timestamp();

        assert!(request.validate().is_ok());
        assert!(request.timestamp.is_some());
    }

    #[test]
    fn test_normalize_timestamp_is_idempotent() {
        let request = RequestEnvelope::new().normalize_timestamp();
        let once = request.timestamp;
        let twice = request.normalize_timestamp().timestamp;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_ensure_source_only_fills_unset() {
        let default = RequestSource::from_raw("internal").unwrap();
        let explicit = RequestSource::from_raw("api-gateway").unwrap();

        let filled = unset().ensure_source(default.clone());
        assert_eq!(filled.source, Some(default.clone()));

        let kept = unset()
            .with_source(explicit.clone())
            .ensure_source(default);
        assert_eq!(kept.source, Some(explicit));
    }

    #[test]
    fn test_data_request_delegates_validation() {
        let request = DataRequestEnvelope::new(vec![1u8, 2, 3])
            .with_correlation_id(CorrelationId::new())
            .ensure_source(RequestSource::from_raw("batch-loader").unwrap());

        assert!(request.validate().is_ok());
        assert_eq!(request.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_data_request_serializes_flattened() {
        let request = DataRequestEnvelope::new(serde_json::json!({ "orderId": 42 }))
            .with_correlation_id(CorrelationId::from_raw("abc123").unwrap())
            .with_source(RequestSource::from_raw("order-service").unwrap());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["correlation_id"], "abc123");
        assert_eq!(json["source"], "order-service");
        assert_eq!(json["data"]["orderId"], 42);
    }
}
