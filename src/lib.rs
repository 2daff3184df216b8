//! # Auto Timezone
//!
//! Determines the local timezone automatically from the device's public IP.
//!
//! ## Features
//! - Ask an IP-geolocation service for the timezone name (ipapi, timezonedb,
//!   ipgeolocation, timezoneapi, or any plain-text/JSON service)
//! - Convert the name into a POSIX tz-string with a timezone-to-tzstring service
//! - Percent-encode query values the way form decoders expect
//! - Validate tz-strings before handing them to the C library
//!
//! ```no_run
//! # async fn run() -> auto_timezone::Result<()> {
//! let tz_string = auto_timezone::get_tz_string().await?;
//! println!("TZ={}", tz_string);
//! # Ok(())
//! # }
//! ```

/// Configuration management and environment variables
pub mod config;
/// Error type shared by the resolver and transports
pub mod error;
/// HTTP transport abstraction and the hyper client
pub mod http;
/// Geolocation providers and the tz-string resolver
pub mod services;
/// Utility functions for encoding, validation, tz-strings and logging
pub mod utils;

pub use error::{Error, ErrorKind, Result};
pub use services::resolver::{get_tz_string, get_tz_string_blocking, TimezoneStringResolver};
pub use utils::urlencode::urlencode;
