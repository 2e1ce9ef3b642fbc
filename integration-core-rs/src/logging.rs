//! # Structured Logging
//!
//! Structured logging with correlation id tracking across component
//! boundaries. The ambient correlation id is thread-local: collaborators
//! install the id from an incoming request and every error constructed on
//! that thread picks it up automatically.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::types::{ComponentKind, IntegrationError, Result};
use crate::values::CorrelationId;

thread_local! {
    static CORRELATION_ID: RefCell<Option<CorrelationId>> = const { RefCell::new(None) };
}

// Flag to track if logging has been initialized
static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Configuration for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// The log level to use (trace, debug, info, warn, error).
    pub level: String,
    /// The service name for identification.
    pub service_name: String,
    /// Whether to output logs to a file.
    pub file_output: bool,
    /// The directory to store log files in.
    pub log_dir: Option<String>,
    /// Whether to use JSON formatting.
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            service_name: "unknown-service".to_string(),
            file_output: false,
            log_dir: None,
            json_format: true,
        }
    }
}

impl TryFrom<config::Config> for LoggingConfig {
    type Error = config::ConfigError;

    fn try_from(cfg: config::Config) -> std::result::Result<Self, Self::Error> {
        // Start from defaults and selectively override from the provided config.
        let mut base = LoggingConfig::default();

        if let Ok(level) = cfg.get::<String>("logging.level") {
            base.level = level;
        }
        if let Ok(service_name) = cfg.get::<String>("logging.service_name") {
            base.service_name = service_name;
        }
        if let Ok(file_output) = cfg.get::<bool>("logging.file_output") {
            base.file_output = file_output;
        }
        if let Ok(log_dir) = cfg.get::<String>("logging.log_dir") {
            base.log_dir = Some(log_dir);
        }
        if let Ok(json_format) = cfg.get::<bool>("logging.json_format") {
            base.json_format = json_format;
        }

        Ok(base)
    }
}

/// Initializes the structured logging system.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<()> {
    // Don't re-initialize if already done
    if LOGGING_INITIALIZED.load(Ordering::SeqCst) {
        return Ok(());
    }

    let config = config.unwrap_or_default();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Layers are boxed so the JSON and text variants share one composition
    // path.
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(filter.boxed());

    if config.json_format {
        layers.push(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_target(true)
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .boxed(),
        );
    }

    if config.file_output {
        if let Some(log_dir) = &config.log_dir {
            let file_appender = tracing_appender::rolling::daily(
                log_dir,
                format!("{}.log", config.service_name),
            );

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the guard alive for the lifetime of the program so
            // buffered logs are flushed.
            Box::leak(Box::new(guard));

            layers.push(fmt::layer().with_writer(non_blocking).with_ansi(false).boxed());
        }
    }

    let subscriber = Registry::default().with(layers);

    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        IntegrationError::configuration(
            format!("failed to install tracing subscriber: {}", e),
            ComponentKind::Unknown,
        )
    })?;

    LOGGING_INITIALIZED.store(true, Ordering::SeqCst);

    tracing::info!(
        service = %config.service_name,
        level = %config.level,
        json = %config.json_format,
        "Structured logging initialized"
    );

    Ok(())
}

/// Sets the correlation id for the current thread.
pub fn set_correlation_id(correlation_id: CorrelationId) {
    CORRELATION_ID.with(|id| {
        *id.borrow_mut() = Some(correlation_id);
    });
}

/// Mints a new correlation id and installs it for the current thread.
pub fn generate_correlation_id() -> CorrelationId {
    let id = CorrelationId::new();
    set_correlation_id(id.clone());
    id
}

/// Retrieves the current thread's correlation id.
pub fn current_correlation_id() -> Option<CorrelationId> {
    CORRELATION_ID.with(|id| id.borrow().clone())
}

/// Clears the correlation id for the current thread.
pub fn clear_correlation_id() {
    CORRELATION_ID.with(|id| {
        *id.borrow_mut() = None;
    });
}

/// Executes a function with a specific correlation id installed, restoring
/// the previous one afterwards.
pub fn with_correlation_id<F, R>(correlation_id: CorrelationId, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = current_correlation_id();

    set_correlation_id(correlation_id);
    let result = f();

    match previous {
        Some(id) => set_correlation_id(id),
        None => clear_correlation_id(),
    }

    result
}

/// Logs a raised error with its full classification as structured fields.
pub fn log_integration_error(error: &IntegrationError) {
    let correlation_id = error
        .correlation_id()
        .map(CorrelationId::to_string)
        .unwrap_or_else(|| "unknown".to_string());

    tracing::error!(
        error_id = %error.detail().id,
        error_kind = %error.failure_kind(),
        variant = %error.variant_name(),
        component = %error.component_kind(),
        correlation_id = %correlation_id,
        transient = %error.is_transient(),
        message = %error.message(),
        "Integration error occurred"
    );
}
