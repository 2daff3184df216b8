use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

use crate::services::provider::GeolocationProvider;
use crate::services::resolver::ResolverConfig;
use crate::utils::tz_string::TzString;
use crate::utils::validation::{validate_service_url, validate_url_template};

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: GeolocationProvider,
    pub geolocation_url: String,
    pub tz_string_url_template: String,
    pub http_timeout: Duration,
    pub fallback_tz_string: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let provider = match non_empty_var("GEOLOCATION_PROVIDER") {
            Some(name) => name
                .parse::<GeolocationProvider>()
                .map_err(|e| anyhow!("Invalid GEOLOCATION_PROVIDER: {}", e))?,
            None => GeolocationProvider::default(),
        };

        let geolocation_url = match non_empty_var("GEOLOCATION_URL") {
            Some(url) => url,
            None => provider
                .default_url()
                .map(str::to_string)
                .ok_or_else(|| {
                    anyhow!("GEOLOCATION_URL must be set for provider {}", provider)
                })?,
        };
        validate_service_url(&geolocation_url)
            .map_err(|e| anyhow!("Invalid GEOLOCATION_URL: {}", e))?;

        let tz_string_url_template = non_empty_var("TZSTRING_URL_TEMPLATE")
            .ok_or_else(|| anyhow!("TZSTRING_URL_TEMPLATE must be set"))?;
        validate_url_template(&tz_string_url_template)
            .map_err(|e| anyhow!("Invalid TZSTRING_URL_TEMPLATE: {}", e))?;

        let timeout_secs = match non_empty_var("HTTP_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| anyhow!("Invalid HTTP_TIMEOUT_SECS"))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let fallback_tz_string = match non_empty_var("FALLBACK_TZ_STRING") {
            Some(value) => {
                TzString::parse(&value)
                    .map_err(|e| anyhow!("Invalid FALLBACK_TZ_STRING: {}", e))?;
                Some(value)
            }
            None => None,
        };

        Ok(Config {
            provider,
            geolocation_url,
            tz_string_url_template,
            http_timeout: Duration::from_secs(timeout_secs),
            fallback_tz_string,
        })
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            provider: self.provider.clone(),
            geolocation_url: self.geolocation_url.clone(),
            tz_string_url_template: self.tz_string_url_template.clone(),
        }
    }
}

/// Reads a variable, treating unset, empty and whitespace-only values alike.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
