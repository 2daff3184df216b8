/// Consistent-format log helpers
pub mod logging;
/// POSIX tz-string parsing and validation
pub mod tz_string;
/// Query string percent-encoding
pub mod urlencode;
/// Input and configuration validation
pub mod validation;
