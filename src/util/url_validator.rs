use thiserror::Error;
use url::Url;

/// Errors that can occur while validating a river source URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host to connect to.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates a URL string for use as a river source.
///
/// Only the scheme and host are checked. Rivers are commonly served by an
/// aggregator on the same machine or LAN, so loopback and private addresses
/// are accepted.
///
/// # Errors
///
/// - [`UrlValidationError::InvalidUrl`] if the string does not parse
/// - [`UrlValidationError::UnsupportedScheme`] for anything but `http`/`https`
/// - [`UrlValidationError::MissingHost`] if the URL names no host
///
/// # Examples
///
/// ```
/// use riffle::util::validate_source_url;
///
/// let url = validate_source_url("http://localhost:1337/river.js").unwrap();
/// assert_eq!(url.port(), Some(1337));
///
/// assert!(validate_source_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_source_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_public_and_local_rivers() {
        assert!(validate_source_url("https://rivers.example.com/river.js").is_ok());
        assert!(validate_source_url("http://localhost:1337/river.js").is_ok());
        assert!(validate_source_url("http://127.0.0.1/river").is_ok());
        assert!(validate_source_url("http://192.168.1.20/river").is_ok());
        assert!(validate_source_url("http://[::1]:8080/river").is_ok());
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let url = validate_source_url("  https://example.com/river  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/river");
    }

    #[test]
    fn test_rejects_other_schemes() {
        for bad in ["file:///etc/passwd", "ftp://example.com/river", "javascript:alert(1)"] {
            assert!(
                matches!(
                    validate_source_url(bad),
                    Err(UrlValidationError::UnsupportedScheme(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_unparseable() {
        assert!(matches!(
            validate_source_url("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_source_url("/river.js"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }
}
