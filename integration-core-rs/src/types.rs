//! # Failure Taxonomy and Error Hierarchy
//!
//! This module provides the closed failure taxonomy shared by all
//! integration components:
//!
//! - [`FailureKind`] classifies *why* a technical failure occurred
//! - [`ComponentKind`] classifies *where* it was observed
//! - [`IntegrationError`] is the closed set of raisable technical errors,
//!   each variant pinned to a fixed [`FailureKind`] at construction
//!
//! Business failures never appear here: they flow through
//! [`OperationResult`](crate::values::OperationResult) in a normal response.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::values::{CorrelationId, Timestamp};

/// A type alias for Result with the error type defaulting to [`IntegrationError`].
pub type Result<T, E = IntegrationError> = std::result::Result<T, E>;

/// Classifies the kind of failure associated with an operation.
///
/// The set is closed. `None` is reserved for success paths and is never
/// assigned to a raised error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FailureKind {
    /// No failure associated with the operation.
    None = 0,
    /// An expected business failure, reflected in controlled responses
    /// rather than raised errors.
    Business = 1,
    /// An unexpected technical failure: infrastructure, execution, or
    /// logic defects.
    Technical = 2,
    /// The operation exceeded its allotted execution time.
    Timeout = 3,
    /// A failure originating in a dependency external to the component.
    Dependency = 4,
}

impl FailureKind {
    /// Stable display label for observability surfaces (logs, metric tags).
    pub const fn label(&self) -> &'static str {
        match self {
            FailureKind::None => "No failure",
            FailureKind::Business => "Business failure",
            FailureKind::Technical => "Technical failure",
            FailureKind::Timeout => "Timeout failure",
            FailureKind::Dependency => "Dependency failure",
        }
    }

    /// Membership check over the raw discriminant.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FailureKind::None),
            1 => Some(FailureKind::Business),
            2 => Some(FailureKind::Technical),
            3 => Some(FailureKind::Timeout),
            4 => Some(FailureKind::Dependency),
            _ => None,
        }
    }

    /// Parses an untrusted string, failing closed to `Technical` for
    /// anything unrecognized. Never panics.
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => FailureKind::None,
            "business" => FailureKind::Business,
            "technical" => FailureKind::Technical,
            "timeout" => FailureKind::Timeout,
            "dependency" => FailureKind::Dependency,
            _ => FailureKind::Technical,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies the functional category of the component where a failure was
/// observed, independent of the specific provider or technology.
///
/// The set is closed. `Unknown` is the safe default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ComponentKind {
    /// Component not identified or not reported.
    Unknown = 0,
    /// File, blob, or object storage operations.
    Storage = 1,
    /// Database access, persistence, and query operations.
    Database = 2,
    /// Message and event publishing or consumption.
    Messaging = 3,
    /// Computational execution and workload processing.
    Compute = 4,
}

impl ComponentKind {
    /// Stable display label for observability surfaces.
    pub const fn label(&self) -> &'static str {
        match self {
            ComponentKind::Unknown => "Unknown",
            ComponentKind::Storage => "Storage",
            ComponentKind::Database => "Database",
            ComponentKind::Messaging => "Messaging",
            ComponentKind::Compute => "Compute",
        }
    }

    /// Membership check over the raw discriminant.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ComponentKind::Unknown),
            1 => Some(ComponentKind::Storage),
            2 => Some(ComponentKind::Database),
            3 => Some(ComponentKind::Messaging),
            4 => Some(ComponentKind::Compute),
            _ => None,
        }
    }

    /// Parses an untrusted string, failing closed to `Unknown` for anything
    /// unrecognized. Never panics.
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "storage" => ComponentKind::Storage,
            "database" => ComponentKind::Database,
            "messaging" => ComponentKind::Messaging,
            "compute" => ComponentKind::Compute,
            _ => ComponentKind::Unknown,
        }
    }
}

impl Default for ComponentKind {
    fn default() -> Self {
        ComponentKind::Unknown
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payload shared by every [`IntegrationError`] variant.
///
/// The correlation id is a weak back-reference to the failed operation: a
/// plain copied lookup key for tracing, never an owned resource.
#[derive(Debug)]
pub struct ErrorDetail {
    /// A unique identifier for this error instance.
    pub id: Uuid,
    /// Detailed error message. Internal only; never exposed verbatim across
    /// the boundary (see [`crate::classify::external_message`]).
    pub message: String,
    /// The component where the failure was detected.
    pub component: ComponentKind,
    /// Correlation id of the failed operation, when known.
    pub correlation_id: Option<CorrelationId>,
    /// The instant the error was created.
    pub timestamp: Timestamp,
    /// The underlying cause, when wrapping another error.
    pub cause: Option<Box<dyn StdError + Send + Sync>>,
}

impl ErrorDetail {
    fn new(message: impl Into<String>, component: ComponentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            component,
            correlation_id: crate::logging::current_correlation_id(),
            timestamp: Timestamp::now(),
            cause: None,
        }
    }
}

/// Root of all raised technical, timeout, and dependency failures.
///
/// The variant set is intentionally closed so the classifier table stays
/// exhaustive: a collaborator introducing a new first-class failure must add
/// a variant here with a fixed [`FailureKind`], never rely on silent
/// fallthrough.
#[derive(Debug)]
pub enum IntegrationError {
    /// Technical concurrency conflict: optimistic locking, conditional
    /// writes, version mismatch.
    Concurrency(ErrorDetail),
    /// A required setting is missing, invalid, or inconsistent.
    Configuration(ErrorDetail),
    /// An external dependency failed: SDK call, third-party service,
    /// network, DNS.
    Dependency(ErrorDetail),
    /// Technical security failure: malformed signature or token, crypto
    /// failure, integrity violation. Not authorization.
    Security(ErrorDetail),
    /// Serialization or deserialization failure: malformed payload,
    /// contract mismatch.
    Serialization(ErrorDetail),
    /// The operation exceeded its allotted execution time.
    Timeout(ErrorDetail),
    /// The operation is not supported by the current provider, region, or
    /// configuration.
    UnsupportedOperation(ErrorDetail),
}

impl IntegrationError {
    /// A concurrency conflict detected in `component`.
    pub fn concurrency(message: impl Into<String>, component: ComponentKind) -> Self {
        Self::Concurrency(ErrorDetail::new(message, component))
    }

    /// A configuration failure detected in `component`.
    pub fn configuration(message: impl Into<String>, component: ComponentKind) -> Self {
        Self::Configuration(ErrorDetail::new(message, component))
    }

    /// An external dependency failure detected in `component`.
    pub fn dependency(message: impl Into<String>, component: ComponentKind) -> Self {
        Self::Dependency(ErrorDetail::new(message, component))
    }

    /// A technical security failure detected in `component`.
    pub fn security(message: impl Into<String>, component: ComponentKind) -> Self {
        Self::Security(ErrorDetail::new(message, component))
    }

    /// A serialization failure detected in `component`.
    pub fn serialization(message: impl Into<String>, component: ComponentKind) -> Self {
        Self::Serialization(ErrorDetail::new(message, component))
    }

    /// A timeout detected in `component`.
    pub fn timeout(message: impl Into<String>, component: ComponentKind) -> Self {
        Self::Timeout(ErrorDetail::new(message, component))
    }

    /// An unsupported operation detected in `component`.
    pub fn unsupported_operation(message: impl Into<String>, component: ComponentKind) -> Self {
        Self::UnsupportedOperation(ErrorDetail::new(message, component))
    }

    /// Attaches the correlation id of the failed operation.
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.detail_mut().correlation_id = Some(correlation_id);
        self
    }

    /// Chains this error with its cause.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.detail_mut().cause = Some(Box::new(cause));
        self
    }

    /// The shared payload of this error.
    pub fn detail(&self) -> &ErrorDetail {
        match self {
            Self::Concurrency(detail)
            | Self::Configuration(detail)
            | Self::Dependency(detail)
            | Self::Security(detail)
            | Self::Serialization(detail)
            | Self::Timeout(detail)
            | Self::UnsupportedOperation(detail) => detail,
        }
    }

    fn detail_mut(&mut self) -> &mut ErrorDetail {
        match self {
            Self::Concurrency(detail)
            | Self::Configuration(detail)
            | Self::Dependency(detail)
            | Self::Security(detail)
            | Self::Serialization(detail)
            | Self::Timeout(detail)
            | Self::UnsupportedOperation(detail) => detail,
        }
    }

    /// The failure kind pinned to this variant at construction.
    ///
    /// `UnsupportedOperation` is a technical limitation of the active
    /// provider or configuration, not a business outcome, so it classifies
    /// as `Technical`.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Concurrency(_) => FailureKind::Technical,
            Self::Configuration(_) => FailureKind::Technical,
            Self::Dependency(_) => FailureKind::Dependency,
            Self::Security(_) => FailureKind::Technical,
            Self::Serialization(_) => FailureKind::Technical,
            Self::Timeout(_) => FailureKind::Timeout,
            Self::UnsupportedOperation(_) => FailureKind::Technical,
        }
    }

    /// The component where the failure was detected.
    pub fn component_kind(&self) -> ComponentKind {
        self.detail().component
    }

    /// The correlation id of the failed operation, when carried.
    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.detail().correlation_id.as_ref()
    }

    /// The internal error message.
    pub fn message(&self) -> &str {
        &self.detail().message
    }

    /// Stable variant name for observability surfaces.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Concurrency(_) => "Concurrency",
            Self::Configuration(_) => "Configuration",
            Self::Dependency(_) => "Dependency",
            Self::Security(_) => "Security",
            Self::Serialization(_) => "Serialization",
            Self::Timeout(_) => "Timeout",
            Self::UnsupportedOperation(_) => "UnsupportedOperation",
        }
    }

    /// Returns true if retrying the operation might succeed: timeouts,
    /// dependency outages, and concurrency conflicts. This crate never
    /// retries; collaborators gate their own retry policy on this flag.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Dependency(_) | Self::Concurrency(_)
        )
    }
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.detail();
        write!(
            f,
            "[{}] {}: {} [Component: {}]",
            self.failure_kind(),
            self.variant_name(),
            detail.message,
            detail.component
        )?;

        if let Some(correlation_id) = &detail.correlation_id {
            write!(f, " [CorrelationId: {}]", correlation_id)?;
        }

        Ok(())
    }
}

impl StdError for IntegrationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.detail()
            .cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_discriminants_round_trip() {
        assert_eq!(FailureKind::from_u8(0), Some(FailureKind::None));
        assert_eq!(FailureKind::from_u8(4), Some(FailureKind::Dependency));
        assert_eq!(FailureKind::from_u8(9), None);
        assert_eq!(FailureKind::Dependency as u8, 4);
    }

    #[test]
    fn test_failure_kind_parse_lossy_fails_closed() {
        assert_eq!(FailureKind::parse_lossy("timeout"), FailureKind::Timeout);
        assert_eq!(FailureKind::parse_lossy(" Business "), FailureKind::Business);
        assert_eq!(FailureKind::parse_lossy("garbage"), FailureKind::Technical);
        assert_eq!(FailureKind::parse_lossy(""), FailureKind::Technical);
    }

    #[test]
    fn test_component_kind_parse_lossy_fails_closed() {
        assert_eq!(ComponentKind::parse_lossy("Messaging"), ComponentKind::Messaging);
        assert_eq!(ComponentKind::parse_lossy("lambda"), ComponentKind::Unknown);
        assert_eq!(ComponentKind::default(), ComponentKind::Unknown);
    }

    #[test]
    fn test_failure_kind_is_fixed_per_variant() {
        let cases = [
            (
                IntegrationError::concurrency("version conflict", ComponentKind::Database),
                FailureKind::Technical,
            ),
            (
                IntegrationError::configuration("missing region", ComponentKind::Unknown),
                FailureKind::Technical,
            ),
            (
                IntegrationError::dependency("sdk call failed", ComponentKind::Messaging),
                FailureKind::Dependency,
            ),
            (
                IntegrationError::security("malformed signature", ComponentKind::Storage),
                FailureKind::Technical,
            ),
            (
                IntegrationError::serialization("contract mismatch", ComponentKind::Compute),
                FailureKind::Technical,
            ),
            (
                IntegrationError::timeout("deadline exceeded", ComponentKind::Database),
                FailureKind::Timeout,
            ),
            (
                IntegrationError::unsupported_operation("not in this region", ComponentKind::Compute),
                FailureKind::Technical,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.failure_kind(), expected, "variant {}", err.variant_name());
        }
    }

    // The constructor-assigned kind is the single source of truth: an
    // unsupported operation is a technical limitation of the provider or
    // configuration, never a business outcome.
    #[test]
    fn test_unsupported_operation_is_technical_not_business() {
        let err = IntegrationError::unsupported_operation(
            "batch writes unavailable for this provider",
            ComponentKind::Database,
        );
        assert_eq!(err.failure_kind(), FailureKind::Technical);
        assert_ne!(err.failure_kind(), FailureKind::Business);
    }

    #[test]
    fn test_is_transient_truth_table() {
        let transient = [
            IntegrationError::timeout("t", ComponentKind::Unknown),
            IntegrationError::dependency("d", ComponentKind::Unknown),
            IntegrationError::concurrency("c", ComponentKind::Unknown),
        ];
        let permanent = [
            IntegrationError::configuration("c", ComponentKind::Unknown),
            IntegrationError::security("s", ComponentKind::Unknown),
            IntegrationError::serialization("s", ComponentKind::Unknown),
            IntegrationError::unsupported_operation("u", ComponentKind::Unknown),
        ];

        for err in &transient {
            assert!(err.is_transient(), "{} should be transient", err.variant_name());
        }
        for err in &permanent {
            assert!(!err.is_transient(), "{} should not be transient", err.variant_name());
        }
    }

    #[test]
    fn test_builder_attaches_correlation_and_cause() {
        let correlation_id = crate::values::CorrelationId::from_raw("abc123").unwrap();
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");

        let err = IntegrationError::dependency("queue unavailable", ComponentKind::Messaging)
            .with_correlation_id(correlation_id.clone())
            .with_cause(io_err);

        assert_eq!(err.correlation_id(), Some(&correlation_id));
        assert_eq!(err.component_kind(), ComponentKind::Messaging);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_constructor_picks_up_ambient_correlation_id() {
        let err = crate::logging::with_correlation_id(
            crate::values::CorrelationId::from_raw("ambient-1").unwrap(),
            || IntegrationError::timeout("deadline exceeded", ComponentKind::Storage),
        );

        assert_eq!(err.correlation_id().map(|id| id.as_str()), Some("ambient-1"));
    }

    #[test]
    fn test_display_carries_classification() {
        let err = IntegrationError::timeout("query exceeded 30s", ComponentKind::Database)
            .with_correlation_id(crate::values::CorrelationId::from_raw("abc123").unwrap());

        let display = err.to_string();
        assert!(display.contains("Timeout failure"));
        assert!(display.contains("query exceeded 30s"));
        assert!(display.contains("Component: Database"));
        assert!(display.contains("CorrelationId: abc123"));
    }
}
