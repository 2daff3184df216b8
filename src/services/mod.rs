/// IP-geolocation providers and response parsing
pub mod provider;
/// Two-step timezone name to tz-string resolution
pub mod resolver;
