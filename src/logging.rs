use log::{info, warn, error, debug, trace};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use crate::config::LoggingConfig;
use crate::error::{ErrorSeverity, ParserError};

/// Structured logging context for the watcher
pub struct LogContext {
    pub component: String,
    pub operation: String,
    pub metadata: HashMap<String, Value>,
}

impl LogContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn with_block_number(self, block_number: u64) -> Self {
        self.with_metadata("block_number", json!(block_number))
    }

    pub fn with_address(self, address: &str) -> Self {
        self.with_metadata("address", json!(address))
    }

    pub fn with_duration_ms(self, duration_ms: u64) -> Self {
        self.with_metadata("duration_ms", json!(duration_ms))
    }

    pub fn with_error_code(self, error_code: &str) -> Self {
        self.with_metadata("error_code", json!(error_code))
    }

    fn format_message(&self, level: &str, message: &str) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut log_entry = json!({
            "timestamp": timestamp,
            "level": level,
            "component": self.component,
            "operation": self.operation,
            "message": message,
        });

        for (key, value) in &self.metadata {
            log_entry[key] = value.clone();
        }

        log_entry.to_string()
    }

    pub fn info(&self, message: &str) {
        info!("{}", self.format_message("INFO", message));
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", self.format_message("WARN", message));
    }

    pub fn error(&self, message: &str) {
        error!("{}", self.format_message("ERROR", message));
    }

    pub fn debug(&self, message: &str) {
        debug!("{}", self.format_message("DEBUG", message));
    }

    pub fn trace(&self, message: &str) {
        trace!("{}", self.format_message("TRACE", message));
    }
}

/// Times one operation and logs its outcome
pub struct PerformanceMonitor {
    pub start_time: SystemTime,
    operation: String,
    metadata: HashMap<String, Value>,
}

impl PerformanceMonitor {
    pub fn new(operation: &str) -> Self {
        Self {
            start_time: SystemTime::now(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn finish_with_result<T, E>(self, result: &Result<T, E>) -> u64
    where
        E: std::fmt::Display
    {
        let duration = SystemTime::now()
            .duration_since(self.start_time)
            .unwrap_or_default()
            .as_millis() as u64;

        let mut context = LogContext::new("performance", &self.operation)
            .with_duration_ms(duration);

        for (key, value) in self.metadata {
            context = context.with_metadata(&key, value);
        }

        match result {
            Ok(_) => {
                context.debug(&format!("Operation completed successfully in {}ms", duration));
            }
            Err(e) => {
                context = context.with_metadata("error", json!(e.to_string()));
                context.warn(&format!("Operation failed after {}ms: {}", duration, e));
            }
        }

        duration
    }
}

/// Error logging utilities
pub struct ErrorLogger;

impl ErrorLogger {
    pub fn log_error(error: &ParserError, context: Option<LogContext>) {
        let severity = error.severity();

        let mut log_context = context.unwrap_or_else(|| LogContext::new("error", "unknown"));
        log_context = log_context
            .with_metadata("error_type", json!(format!("{:?}", error)))
            .with_metadata("severity", json!(format!("{:?}", severity)));

        if let Some(status) = error.status_code() {
            log_context = log_context.with_error_code(&status.to_string());
        }

        let message = format!("Error occurred: {}", error);

        match severity {
            ErrorSeverity::Critical => log_context.error(&message),
            ErrorSeverity::High => log_context.error(&message),
            ErrorSeverity::Medium => log_context.warn(&message),
            ErrorSeverity::Low => log_context.info(&message),
        }
    }
}

/// Per-call metrics
pub struct MetricsLogger;

impl MetricsLogger {
    pub fn log_rpc_call(method: &str, duration_ms: u64, success: bool) {
        let context = LogContext::new("metrics", "rpc_call")
            .with_metadata("method", json!(method))
            .with_duration_ms(duration_ms)
            .with_metadata("success", json!(success));

        if success {
            context.debug(&format!("RPC call {} completed in {}ms", method, duration_ms));
        } else {
            context.warn(&format!("RPC call {} failed after {}ms", method, duration_ms));
        }
    }

    pub fn log_fetch_completed(address: &str, transaction_count: usize, current_block: u64) {
        let context = LogContext::new("metrics", "fetch_completed")
            .with_address(address)
            .with_block_number(current_block)
            .with_metadata("transaction_count", json!(transaction_count));

        context.info(&format!(
            "Fetched {} transactions for {} (current block {})",
            transaction_count, address, current_block
        ));
    }
}

/// Initialize logging for the application.
///
/// `RUST_LOG` still wins over the configured level when it is set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = config.format == "json";

    env_logger::Builder::new()
        .parse_filters(&config.level)
        .parse_env("RUST_LOG")
        .format(move |buf, record| {
            use std::io::Write;

            let message = record.args().to_string();
            let structured = serde_json::from_str::<Value>(&message).ok();

            match (json_output, structured) {
                (true, Some(value)) => writeln!(buf, "{}", value),
                (true, None) => writeln!(
                    buf,
                    "{}",
                    json!({
                        "timestamp": chrono::Utc::now().to_rfc3339(),
                        "level": record.level().to_string(),
                        "target": record.target(),
                        "message": message,
                    })
                ),
                (false, Some(value)) => writeln!(buf, "{}", serde_json::to_string_pretty(&value)?),
                (false, None) => writeln!(
                    buf,
                    "{} [{}] {}: {}",
                    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ),
            }
        })
        .try_init()?;

    info!("Logging initialized at level {}", config.level);
    Ok(())
}
