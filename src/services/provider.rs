//! IP-geolocation providers and how to read a timezone name out of their responses.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::utils::validation::validate_timezone_name;

/// How a timezone name is carried in a geolocation response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormat {
    /// The whole body is the timezone name.
    PlainText,
    /// The body is JSON and the name is the string at this RFC 6901 pointer.
    JsonPointer(String),
}

impl ResponseFormat {
    /// Extracts the timezone name from a response body.
    pub fn extract_timezone(&self, body: &str) -> Result<String> {
        match self {
            ResponseFormat::PlainText => Ok(validate_timezone_name(body)?.to_string()),
            ResponseFormat::JsonPointer(pointer) => {
                let document: Value = serde_json::from_str(body).map_err(|e| {
                    Error::Parse(format!("geolocation response is not valid JSON: {}", e))
                })?;

                let value = document.pointer(pointer).ok_or_else(|| {
                    Error::Parse(format!("geolocation response has no field at {}", pointer))
                })?;

                let name = value.as_str().ok_or_else(|| {
                    Error::Parse(format!("geolocation field at {} is not a string", pointer))
                })?;

                Ok(validate_timezone_name(name)?.to_string())
            }
        }
    }
}

/// A supported IP-geolocation service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeolocationProvider {
    /// ipapi.co: plain text from `/timezone/`, no API key.
    #[default]
    Ipapi,
    /// timezonedb.com JSON, `zoneName` field. Needs an API key in the URL.
    TimezoneDb,
    /// ipgeolocation.io JSON, `time_zone.name` field. Needs an API key in the URL.
    IpGeolocation,
    /// timezoneapi.io JSON, `data.timezone.id` field. Needs an API key in the URL.
    TimezoneApi,
    /// Any service answering with the bare timezone name.
    CustomText,
    /// Any JSON service, with the timezone name at the given pointer.
    CustomJson(String),
}

impl GeolocationProvider {
    /// Short name, as accepted by [`FromStr`].
    pub fn name(&self) -> String {
        match self {
            GeolocationProvider::Ipapi => "ipapi".to_string(),
            GeolocationProvider::TimezoneDb => "timezonedb".to_string(),
            GeolocationProvider::IpGeolocation => "ipgeolocation".to_string(),
            GeolocationProvider::TimezoneApi => "timezoneapi".to_string(),
            GeolocationProvider::CustomText => "text".to_string(),
            GeolocationProvider::CustomJson(pointer) => format!("json:{}", pointer),
        }
    }

    /// URL to use when none is configured. Only keyless services have one.
    pub fn default_url(&self) -> Option<&'static str> {
        match self {
            GeolocationProvider::Ipapi => Some("https://ipapi.co/timezone/"),
            _ => None,
        }
    }

    /// The parsing strategy for this provider's responses.
    pub fn response_format(&self) -> ResponseFormat {
        match self {
            GeolocationProvider::Ipapi | GeolocationProvider::CustomText => {
                ResponseFormat::PlainText
            }
            GeolocationProvider::TimezoneDb => ResponseFormat::JsonPointer("/zoneName".into()),
            GeolocationProvider::IpGeolocation => {
                ResponseFormat::JsonPointer("/time_zone/name".into())
            }
            GeolocationProvider::TimezoneApi => {
                ResponseFormat::JsonPointer("/data/timezone/id".into())
            }
            GeolocationProvider::CustomJson(pointer) => ResponseFormat::JsonPointer(pointer.clone()),
        }
    }

    /// Extracts the timezone name from a response body of this provider.
    pub fn extract_timezone(&self, body: &str) -> Result<String> {
        self.response_format().extract_timezone(body)
    }
}

impl fmt::Display for GeolocationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for GeolocationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();

        let json_pointer = s
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("json:"))
            .map(|_| &s[5..]);
        if let Some(pointer) = json_pointer {
            if !pointer.starts_with('/') {
                return Err(anyhow!(
                    "JSON pointer '{}' must start with '/', e.g. json:/timezone",
                    pointer
                ));
            }
            return Ok(GeolocationProvider::CustomJson(pointer.to_string()));
        }

        match s.to_lowercase().as_str() {
            "ipapi" => Ok(GeolocationProvider::Ipapi),
            "timezonedb" => Ok(GeolocationProvider::TimezoneDb),
            "ipgeolocation" => Ok(GeolocationProvider::IpGeolocation),
            "timezoneapi" => Ok(GeolocationProvider::TimezoneApi),
            "text" => Ok(GeolocationProvider::CustomText),
            _ => Err(anyhow!(
                "Unknown geolocation provider '{}' (expected ipapi, timezonedb, ipgeolocation, timezoneapi, text or json:<pointer>)",
                s
            )),
        }
    }
}
