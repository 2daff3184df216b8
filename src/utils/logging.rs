use tracing::{debug, info, warn};

/// Logs the start of an outgoing GET request
pub fn log_http_get(service: &str, url: &str) {
    debug!("HTTP_GET: {} - {}", service, url);
}

/// Logs a completed request with consistent format
pub fn log_http_response(service: &str, url: &str, status: u16, body_len: usize, elapsed_ms: u64) {
    debug!(
        "HTTP_OK: {} - {} returned {} ({} bytes) in {}ms",
        service, url, status, body_len, elapsed_ms
    );
}

/// Logs a failed request with consistent format
pub fn log_http_error(service: &str, url: &str, error: &str) {
    warn!("HTTP_ERROR: {} - {} failed: {}", service, url, error);
}

/// Logs a response body that could not be interpreted
pub fn log_parse_error(service: &str, error: &str) {
    warn!("PARSE_ERROR: {} - {}", service, error);
}

/// Logs timeout events with consistent format
pub fn log_timeout(operation: &str, duration_ms: u64, details: Option<&str>) {
    match details {
        Some(d) => warn!("TIMEOUT: {} after {}ms - {}", operation, duration_ms, d),
        None => warn!("TIMEOUT: {} after {}ms", operation, duration_ms),
    }
}

/// Logs a successful resolution
pub fn log_resolved(timezone: &str, tz_string: &str) {
    info!("RESOLVED: {} -> {}", timezone, tz_string);
}

/// Logs the use of a fallback tz-string after a failed resolution
pub fn log_fallback(tz_string: &str, reason: &str) {
    warn!("FALLBACK: using {} - {}", tz_string, reason);
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
