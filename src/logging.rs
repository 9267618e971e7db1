//! Logging utilities for the importers.
//!
//! Structured helpers around `tracing` so every import leaves a searchable
//! trail: which importer ran on which file, how long it took and what came
//! out of it.

use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::ImportError;

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation failed"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let operation_id = Uuid::new_v4();

    debug!(
        operation = operation,
        operation_id = %operation_id,
        "Starting operation"
    );

    let result = f();

    info!(
        operation = operation,
        operation_id = %operation_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log what an import produced
pub fn log_import_stats(
    importer: &str,
    file_path: &str,
    shape: &[usize],
    variable: &str,
    elapsed: Duration,
) {
    info!(
        operation = "import",
        importer = importer,
        file_path = file_path,
        variable = variable,
        time_steps = shape.first().copied().unwrap_or(0),
        shape = ?shape,
        memory_mb = shape.iter().product::<usize>() * std::mem::size_of::<f32>() / (1024 * 1024),
        duration_ms = elapsed.as_secs_f64() * 1000.0,
        "Import completed"
    );
}

/// Log an error with context
pub fn log_error(error: &ImportError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_kind = error.kind(),
        "Error occurred"
    );
}

/// Generate a unique import ID
pub fn generate_import_id() -> String {
    Uuid::new_v4().to_string()
}
