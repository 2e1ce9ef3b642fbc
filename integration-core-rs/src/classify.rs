//! # Failure Classifier
//!
//! Pure, side-effect-free functions mapping a caught error to a
//! [`FailureKind`], a sanitized external message, and a transient flag.
//!
//! Collaborators catch at the boundary, classify here, and convert to a
//! [`ResponseEnvelope`](crate::response::ResponseEnvelope). The transient
//! flag is one input to *their* retry policy; nothing in this crate retries.

use std::error::Error as StdError;

use crate::types::{FailureKind, IntegrationError};
use crate::values::ResultMessage;

/// The only message allowed to cross the boundary for non-business
/// failures. Internal detail (causes, SDK internals, credentials) must never
/// leak through [`external_message`].
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while processing the operation.";

/// Classifies a caught error into a [`FailureKind`].
///
/// Known [`IntegrationError`] variants report their constructor-assigned
/// kind; any unrecognized error type classifies as `Technical`. Never
/// returns `None`: that value is reserved for success paths.
pub fn classify(err: &(dyn StdError + 'static)) -> FailureKind {
    match err.downcast_ref::<IntegrationError>() {
        Some(integration) => integration.failure_kind(),
        None => FailureKind::Technical,
    }
}

/// Extracts a message safe for external exposure from a caught error.
///
/// Only an error classified as a business failure exposes its own message;
/// every other kind gets [`GENERIC_FAILURE_MESSAGE`]. Under the closed
/// taxonomy no raised error classifies as business, so in practice this
/// always returns the generic message; the match keeps the contract shape
/// explicit.
pub fn external_message(err: &(dyn StdError + 'static)) -> ResultMessage {
    match classify(err) {
        FailureKind::Business => ResultMessage::from_text(err.to_string())
            .unwrap_or_else(|_| ResultMessage::from_static(GENERIC_FAILURE_MESSAGE)),
        _ => ResultMessage::from_static(GENERIC_FAILURE_MESSAGE),
    }
}

/// Returns true if the caught error represents a potentially transient
/// failure: timeout, dependency outage, or concurrency conflict.
///
/// Unrecognized error types are never considered transient.
pub fn is_transient(err: &(dyn StdError + 'static)) -> bool {
    err.downcast_ref::<IntegrationError>()
        .map_or(false, IntegrationError::is_transient)
}
