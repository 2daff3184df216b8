//! # Timezone String Resolver
//!
//! Determines the local POSIX tz-string with two dependent requests:
//!
//! 1. GET the IP-geolocation service, which infers the caller's public IP from
//!    the connection and answers with a timezone name such as `Asia/Jerusalem`.
//! 2. GET the timezone-to-tzstring service at a URL built from a template, with
//!    the percent-encoded name substituted for `{{timezone}}`, e.g.
//!    `https://tzstring.example.com/tzstring?timezone={{timezone}}`.
//!
//! The second request is never made when the first one fails. There are no
//! retries; deciding whether to retry or fall back is left to the caller.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{HttpTransport, HyperTransport};
use crate::services::provider::GeolocationProvider;
use crate::utils::logging::{log_http_error, log_http_get, log_http_response, log_parse_error, log_resolved};
use crate::utils::tz_string::TzString;
use crate::utils::urlencode::urlencode;
use crate::utils::validation::TIMEZONE_PLACEHOLDER;

const GEOLOCATION_SERVICE: &str = "geolocation";
const TZ_STRING_SERVICE: &str = "tzstring";

/// Where to send the two requests and how to read the first response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Which geolocation service is configured; selects the response parser.
    pub provider: GeolocationProvider,
    /// URL of the geolocation request.
    pub geolocation_url: String,
    /// URL of the tz-string request, containing the `{{timezone}}` placeholder.
    pub tz_string_url_template: String,
}

/// A successful resolution: the timezone name and its tz-string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTimezone {
    /// Timezone name reported by the geolocation service.
    pub timezone: String,
    /// POSIX tz-string reported by the tz-string service.
    pub tz_string: String,
}

/// Resolves the tz-string for the caller's public IP.
pub struct TimezoneStringResolver<T> {
    config: ResolverConfig,
    transport: T,
}

impl<T: HttpTransport> TimezoneStringResolver<T> {
    /// Creates a resolver issuing its requests through `transport`.
    pub fn new(config: ResolverConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The resolver's configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Runs both requests and returns the timezone name together with its tz-string.
    pub async fn resolve(&self) -> Result<ResolvedTimezone> {
        let timezone = self.fetch_timezone_name().await?;
        let tz_string = self.fetch_tz_string(&timezone).await?;

        log_resolved(&timezone, &tz_string);
        Ok(ResolvedTimezone { timezone, tz_string })
    }

    /// Runs both requests and returns the tz-string.
    pub async fn get_tz_string(&self) -> Result<String> {
        Ok(self.resolve().await?.tz_string)
    }

    /// Blocking variant of [`resolve`](Self::resolve) on a private current-thread runtime.
    ///
    /// Must not be called from within an async runtime.
    pub fn resolve_blocking(&self) -> Result<ResolvedTimezone> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Network(format!("failed to start network runtime: {}", e)))?;
        runtime.block_on(self.resolve())
    }

    /// First request: the timezone name for the caller's public IP.
    pub async fn fetch_timezone_name(&self) -> Result<String> {
        let body = self
            .get_text(GEOLOCATION_SERVICE, &self.config.geolocation_url)
            .await?;

        self.config
            .provider
            .extract_timezone(&body)
            .inspect_err(|e| log_parse_error(GEOLOCATION_SERVICE, &e.to_string()))
    }

    /// Second request: the tz-string for `timezone`.
    pub async fn fetch_tz_string(&self, timezone: &str) -> Result<String> {
        let url = self.tz_string_url(timezone);
        let body = self.get_text(TZ_STRING_SERVICE, &url).await?;

        parse_tz_string_body(&body)
            .inspect_err(|e| log_parse_error(TZ_STRING_SERVICE, &e.to_string()))
    }

    /// The tz-string request URL for `timezone`.
    pub fn tz_string_url(&self, timezone: &str) -> String {
        build_tz_string_url(&self.config.tz_string_url_template, timezone)
    }

    async fn get_text(&self, service: &str, url: &str) -> Result<String> {
        log_http_get(service, url);
        let start = Instant::now();

        let response = self
            .transport
            .get(url)
            .await
            .inspect_err(|e| log_http_error(service, url, &e.to_string()))?;

        if !response.is_success() {
            let error = Error::Network(format!(
                "{} service at {} returned HTTP {}",
                service, url, response.status
            ));
            log_http_error(service, url, &error.to_string());
            return Err(error);
        }

        log_http_response(
            service,
            url,
            response.status,
            response.body.len(),
            start.elapsed().as_millis() as u64,
        );

        String::from_utf8(response.body.to_vec()).map_err(|_| {
            Error::Parse(format!("{} service response is not valid UTF-8", service))
        })
    }
}

impl TimezoneStringResolver<HyperTransport> {
    /// Creates a resolver on the hyper transport with the given per-request timeout.
    pub fn with_timeout(config: ResolverConfig, request_timeout: Duration) -> Result<Self> {
        Ok(Self::new(config, HyperTransport::new(request_timeout)?))
    }

    /// Creates a resolver from application configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(config.resolver_config(), config.http_timeout)
    }
}

/// Substitutes the percent-encoded `timezone` for every `{{timezone}}` in `template`.
pub fn build_tz_string_url(template: &str, timezone: &str) -> String {
    template.replace(TIMEZONE_PLACEHOLDER, &urlencode(timezone))
}

/// Trims a tz-string response body and checks that it is a well-formed tz-string.
pub fn parse_tz_string_body(body: &str) -> Result<String> {
    let tz_string = body.trim();

    if tz_string.is_empty() {
        return Err(Error::Parse(
            "tz-string service returned an empty body".to_string(),
        ));
    }

    TzString::parse(tz_string)?;
    Ok(tz_string.to_string())
}

/// Resolves the tz-string using configuration from the environment and the hyper transport.
///
/// Besides `Network` and `Parse`, fails with [`Error::Config`] when the environment
/// does not hold a usable configuration; no request is made in that case.
pub async fn get_tz_string() -> Result<String> {
    let config = Config::from_env().map_err(|e| Error::Config(e.to_string()))?;
    TimezoneStringResolver::from_config(&config)?
        .get_tz_string()
        .await
}

/// Blocking variant of [`get_tz_string`] for callers without an async runtime.
pub fn get_tz_string_blocking() -> Result<String> {
    let config = Config::from_env().map_err(|e| Error::Config(e.to_string()))?;
    let resolved = TimezoneStringResolver::from_config(&config)?.resolve_blocking()?;
    Ok(resolved.tz_string)
}
