//! # Integration Core
//!
//! The shared failure classification and response envelope contract for
//! independently developed integration components (storage, database,
//! messaging, compute adapters).
//!
//! ## Features
//!
//! - Validated value objects: correlation ids, UTC timestamps, result
//!   messages, request sources
//! - Closed failure and component taxonomies with stable display labels
//! - A sealed error hierarchy with a fixed failure kind per variant
//! - A pure classifier deriving failure kind, sanitized external message,
//!   and retry eligibility from any caught error
//! - Request and response envelopes with construction invariants
//! - Structured logging with correlation id tracking
//!
//! Adapters construct envelopes via this contract, raise an
//! [`IntegrationError`] on technical failure, and read the classification
//! to decide on retry or surfacing. This crate only classifies and carries
//! metadata: retry loops, backoff, and transport belong to collaborators.

pub mod classify;
pub mod logging;
pub mod request;
pub mod response;
pub mod types;
pub mod values;

// Re-export commonly used types
pub use classify::{classify, external_message, is_transient, GENERIC_FAILURE_MESSAGE};
pub use logging::{
    clear_correlation_id, current_correlation_id, init_logging, set_correlation_id,
    with_correlation_id, LoggingConfig,
};
pub use request::{DataRequestEnvelope, RequestEnvelope};
pub use response::{DataResponseEnvelope, ResponseEnvelope};
pub use types::{ComponentKind, ErrorDetail, FailureKind, IntegrationError, Result};
pub use values::{
    CorrelationId, OperationResult, RequestSource, ResultMessage, Timestamp, ValidationError,
};

/// Initializes the logging stack with default settings.
pub fn init() -> Result<()> {
    logging::init_logging(None)
}

/// Initializes the logging stack from a loaded configuration.
pub fn init_with_config(config: config::Config) -> Result<()> {
    let log_config = LoggingConfig::try_from(config).ok();
    logging::init_logging(log_config)
}
