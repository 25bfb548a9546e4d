use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::{constants::*, error::ConfigError};

/// Where and how submissions are sent.
///
/// The default targets the built-in tunnel URL with the tunnel's warning-page
/// bypass header; every part can be overridden per environment.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    endpoint: Url,
    headers: HeaderMap,
    timeout: Duration,
    field_name: String,
}

impl EndpointConfig {
    /// Targets `endpoint` with the default bypass header, timeout and field name.
    pub fn new(endpoint: &str) -> Result<Self, ConfigError> {
        let endpoint = parse_endpoint(endpoint)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            TUNNEL_BYPASS_HEADER,
            HeaderValue::from_static(TUNNEL_BYPASS_VALUE),
        );

        Ok(Self {
            endpoint,
            headers,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            field_name: DEFAULT_FIELD_NAME.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(name.to_string()))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| ConfigError::InvalidHeaderValue(name.to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Parses a `NAME:VALUE` pair, as given on the command line.
    pub fn with_header_line(self, line: &str) -> Result<Self, ConfigError> {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ConfigError::MalformedHeader(line.to_string()))?;
        if name.trim().is_empty() {
            return Err(ConfigError::MalformedHeader(line.to_string()));
        }
        self.with_header(name, value)
    }

    pub fn without_headers(mut self) -> Self {
        self.headers.clear();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT).expect("built-in endpoint is a valid URL")
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint {
        url: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
