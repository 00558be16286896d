//! Middleware shared by the binary and the integration tests.

use actix_web::middleware::Logger;

/// Standard request logging:
/// remote-ip "request-line" status-code response-size "referrer" "user-agent"
pub fn standard_middleware() -> Logger {
    Logger::default()
}
