//! Best-effort IP geolocation for click analytics.
//!
//! Uses the free ip-api.com JSON endpoint. Every failure (network, parse,
//! non-2xx, timeout) maps to `None`: a missing country must never fail a
//! click event.

use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

/// Resolves an IP address to a two-letter country code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoResolver: Send + Sync {
    /// Returns the ISO 3166-1 alpha-2 country code, or `None` on any
    /// failure.
    async fn country_code(&self, ip: IpAddr) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
}

/// HTTP resolver backed by ip-api.com.
pub struct IpApiResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl IpApiResolver {
    /// Creates a resolver against the given service base URL
    /// (e.g. `http://ip-api.com`).
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl GeoResolver for IpApiResolver {
    async fn country_code(&self, ip: IpAddr) -> Option<String> {
        let url = format!(
            "{}/json/{}?fields=countryCode",
            self.endpoint.trim_end_matches('/'),
            ip
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Geolocation request failed for {ip}: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!("Geolocation service returned {} for {ip}", response.status());
            return None;
        }

        let body: GeoResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                debug!("Geolocation response parse failed for {ip}: {e}");
                return None;
            }
        };

        // The service reports empty fields for unresolvable addresses.
        body.country_code.filter(|c| c.len() == 2)
    }
}

/// Resolver used when geolocation is disabled; always returns `None`.
pub struct NullGeoResolver;

#[async_trait]
impl GeoResolver for NullGeoResolver {
    async fn country_code(&self, _ip: IpAddr) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_resolver_returns_none() {
        let resolver = NullGeoResolver;
        let ip: IpAddr = "8.8.8.8".parse().unwrap();
        assert_eq!(resolver.country_code(ip).await, None);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_returns_none() {
        // Reserved TEST-NET address; the request cannot succeed.
        let resolver = IpApiResolver::new("http://192.0.2.1:9").unwrap();
        let ip: IpAddr = "8.8.8.8".parse().unwrap();
        assert_eq!(resolver.country_code(ip).await, None);
    }
}
