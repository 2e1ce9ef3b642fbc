//! # Identity & Metadata Value Objects
//!
//! This module provides the validated value objects used across the
//! integration contract: correlation identifiers, UTC timestamps,
//! result messages, request sources, and the controlled operation result.
//!
//! Every type here is immutable and self-validating. The only way to obtain
//! an instance is through the validated factory functions; deserialization
//! goes through the same path via `serde(try_from)`.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Raised when a value object or request envelope fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A value that must carry content was empty or whitespace-only.
    #[error("{field} must not be empty or whitespace")]
    Blank { field: &'static str },

    /// A required field was not populated before dispatch.
    #[error("{field} is required")]
    MissingField { field: &'static str },
}

/// Opaque token linking all observability artifacts (logs, metrics, traces)
/// belonging to one logical operation across components.
///
/// Exists to avoid passing bare strings around for operation correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Mints a fresh globally-unique token: 32 lowercase hex characters,
    /// no separators. This format is preferred for headers and transmission
    /// between services.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wraps an externally supplied token.
    ///
    /// Fails when the input is empty or whitespace-only; otherwise the exact
    /// value is stored untouched.
    pub fn from_raw(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::Blank {
                field: "correlation_id",
            });
        }
        Ok(Self(raw))
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CorrelationId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_raw(value)
    }
}

impl From<CorrelationId> for String {
    fn from(id: CorrelationId) -> Self {
        id.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The instant at which a request or response was produced.
///
/// Always normalized to UTC regardless of the offset of the input, so that
/// timestamps compare and log consistently across components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Captures the current instant in UTC.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Normalizes an instant in any offset to UTC. Never fails and is
    /// idempotent: the absolute instant is preserved.
    pub fn from_instant<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        Self(instant.with_timezone(&Utc))
    }

    /// Returns the underlying UTC instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

/// Human-readable description of an operation outcome.
///
/// Stored exactly as provided, no trimming: messages are composed by the
/// caller or by the classifier and are assumed final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResultMessage(String);

impl ResultMessage {
    /// Wraps descriptive text. Fails when the text is empty or
    /// whitespace-only.
    pub fn from_text(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::Blank { field: "message" });
        }
        Ok(Self(text))
    }

    /// Internal path for compile-time constants known to be non-blank.
    pub(crate) fn from_static(text: &'static str) -> Self {
        debug_assert!(!text.trim().is_empty());
        Self(text.to_owned())
    }

    /// Returns the message text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResultMessage {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_text(value)
    }
}

impl From<ResultMessage> for String {
    fn from(message: ResultMessage) -> Self {
        message.0
    }
}

impl fmt::Display for ResultMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logical name of the system, service, or application that initiated a
/// request (e.g. `api-gateway`, `order-service`, `backoffice`).
///
/// Used for auditing and traceability only; carries no authorization
/// semantics. Input is trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestSource(String);

impl RequestSource {
    /// Wraps a source name, trimming surrounding whitespace. Fails when the
    /// input is empty or whitespace-only.
    pub fn from_raw(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Blank { field: "source" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the source name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RequestSource {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_raw(value)
    }
}

impl From<RequestSource> for String {
    fn from(source: RequestSource) -> Self {
        source.0
    }
}

impl fmt::Display for RequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Success or failure of a *controlled* (business) outcome.
///
/// Never represents a technical failure: those are raised as
/// [`IntegrationError`](crate::types::IntegrationError) and sanitized at the
/// boundary. The only construction paths are the two factories below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub struct OperationResult {
    success: bool,
}

impl OperationResult {
    /// A successfully executed operation.
    pub fn success() -> Self {
        Self { success: true }
    }

    /// A controlled business failure.
    pub fn failure() -> Self {
        Self { success: false }
    }

    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<bool> for OperationResult {
    fn from(success: bool) -> Self {
        Self { success }
    }
}

impl From<OperationResult> for bool {
    fn from(result: OperationResult) -> Self {
        result.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_correlation_id_new_format() {
        let id = CorrelationId::new();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_correlation_id_new_is_unique() {
        assert_ne!(CorrelationId::new(), CorrelationId::new());
    }

    #[test]
    fn test_correlation_id_from_raw_preserves_value() {
        let id = CorrelationId::from_raw("abc123").unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_correlation_id_rejects_blank() {
        assert_eq!(
            CorrelationId::from_raw(""),
            Err(ValidationError::Blank {
                field: "correlation_id"
            })
        );
        assert!(CorrelationId::from_raw("   ").is_err());
    }

    #[test]
    fn test_correlation_id_deserialization_is_validated() {
        assert!(serde_json::from_str::<CorrelationId>("\"  \"").is_err());
        let id: CorrelationId = serde_json::from_str("\"trace-1\"").unwrap();
        assert_eq!(id.as_str(), "trace-1");
    }

    #[test]
    fn test_timestamp_normalizes_offset_to_utc() {
        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let ts = Timestamp::from_instant(local);

        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(ts.instant(), expected);
        assert_eq!(ts.instant().offset(), &Utc);
    }

    #[test]
    fn test_timestamp_from_instant_is_idempotent() {
        let ts = Timestamp::now();
        assert_eq!(Timestamp::from_instant(ts.instant()), ts);
    }

    #[test]
    fn test_result_message_keeps_exact_text() {
        let message = ResultMessage::from_text(" record not found ").unwrap();
        assert_eq!(message.as_str(), " record not found ");
    }

    #[test]
    fn test_result_message_rejects_blank() {
        assert_eq!(
            ResultMessage::from_text("\t\n"),
            Err(ValidationError::Blank { field: "message" })
        );
    }

    #[test]
    fn test_request_source_is_trimmed() {
        let source = RequestSource::from_raw("  order-service  ").unwrap();
        assert_eq!(source.as_str(), "order-service");
    }

    #[test]
    fn test_request_source_rejects_blank() {
        assert_eq!(
            RequestSource::from_raw("   "),
            Err(ValidationError::Blank { field: "source" })
        );
    }

    #[test]
    fn test_operation_result_factories() {
        assert!(OperationResult::success().is_success());
        assert!(!OperationResult::failure().is_success());
    }

    #[test]
    fn test_operation_result_serializes_as_bool() {
        let json = serde_json::to_string(&OperationResult::failure()).unwrap();
        assert_eq!(json, "false");
    }
}
