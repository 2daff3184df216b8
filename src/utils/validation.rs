use anyhow::anyhow;

use crate::error::{Error, Result};

/// Placeholder replaced by the encoded timezone name in the tz-string URL template.
pub const TIMEZONE_PLACEHOLDER: &str = "{{timezone}}";

/// Checks a timezone name extracted from a geolocation response and returns it trimmed.
///
/// Any non-empty value is accepted as a candidate; the tz-string service is the
/// authority on whether the name actually exists.
pub fn validate_timezone_name(name: &str) -> Result<&str> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::Parse(
            "geolocation response did not contain a timezone name".to_string(),
        ));
    }

    Ok(name)
}

/// Checks that a configured service URL is an absolute http(s) URL.
pub fn validate_service_url(url: &str) -> anyhow::Result<()> {
    let url = url.trim();

    if url.is_empty() {
        return Err(anyhow!("URL cannot be empty"));
    }

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(anyhow!("URL '{}' must start with http:// or https://", url));
    }

    if url.contains(char::is_whitespace) {
        return Err(anyhow!("URL '{}' cannot contain whitespace", url));
    }

    Ok(())
}

/// Checks the tz-string URL template: a valid service URL with the timezone placeholder.
pub fn validate_url_template(template: &str) -> anyhow::Result<()> {
    validate_service_url(template)?;

    if !template.contains(TIMEZONE_PLACEHOLDER) {
        return Err(anyhow!(
            "URL template '{}' must contain the {} placeholder",
            template, TIMEZONE_PLACEHOLDER
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timezone_name_trimmed() {
        assert_eq!(validate_timezone_name("Asia/Jerusalem\n").unwrap(), "Asia/Jerusalem");
        assert_eq!(validate_timezone_name("  UTC ").unwrap(), "UTC");
    }

    #[test]
    fn test_empty_timezone_name_rejected() {
        for name in ["", "   ", "\n", "\r\n\t"] {
            let result = validate_timezone_name(name);
            assert!(matches!(result, Err(Error::Parse(_))), "Should reject: {:?}", name);
        }
    }

    #[test]
    fn test_service_urls() {
        assert!(validate_service_url("https://ipapi.co/timezone/").is_ok());
        assert!(validate_service_url("http://127.0.0.1:8000/timezone").is_ok());

        assert!(validate_service_url("").is_err());
        assert!(validate_service_url("ipapi.co/timezone").is_err());
        assert!(validate_service_url("ftp://example.com").is_err());
        assert!(validate_service_url("https://example.com/a b").is_err());
    }

    #[test]
    fn test_url_templates() {
        assert!(validate_url_template(
            "https://tzstring.example.com/tzstring?timezone={{timezone}}"
        )
        .is_ok());

        let err = validate_url_template("https://tzstring.example.com/tzstring")
            .unwrap_err()
            .to_string();
        assert!(err.contains("{{timezone}}"));
    }
}
