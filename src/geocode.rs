//! Address Resolver
//!
//! Turns a free-text address into a normalized address plus coordinates via
//! an external geocoding provider (OpenCage-shaped JSON API). A lookup that
//! returns zero candidates is retried exactly once with a simplified query
//! (leading "unit/floor, number," prefix stripped). Transport failures are
//! logged and surfaced uniformly as `GeocodingFailed`.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GeocodingConfig;
use crate::error::OrderError;
use crate::models::ResolvedAddress;

/// Resolver seam: the admission pipeline only depends on this trait.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text address, retrying once with a simplified query.
    async fn resolve(&self, address: &str) -> Result<ResolvedAddress, OrderError>;
}

// ============================================================================
// Provider response structures
// ============================================================================

#[derive(Deserialize, Debug)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    formatted: String,
    geometry: Option<Geometry>,
    #[serde(default)]
    components: Components,
}

#[derive(Deserialize, Debug)]
struct Geometry {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize, Debug, Default)]
struct Components {
    road: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
    country: Option<String>,
}

impl From<Candidate> for ResolvedAddress {
    fn from(c: Candidate) -> Self {
        let (latitude, longitude) = match c.geometry {
            Some(g) => (Some(g.lat), Some(g.lng)),
            None => (None, None),
        };
        ResolvedAddress {
            formatted: c.formatted,
            latitude,
            longitude,
            street: c.components.road.unwrap_or_default(),
            postal_code: c.components.postcode.unwrap_or_default(),
            city: c.components.city.unwrap_or_default(),
            country: c.components.country.unwrap_or_default(),
        }
    }
}

// ============================================================================
// Address simplification
// ============================================================================

// Leading "unit/floor, number," prefix: digits, slash, digits, comma,
// digits plus optional letter, comma.
static UNIT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+/\d+\s*,\s*\d+[A-Za-z]?\s*,\s*").expect("valid regex"));

/// Strip the unit/floor prefix from an address, if present.
///
/// Returns `None` when the pattern does not match (no retry is worth
/// issuing with an unchanged query).
pub fn simplify_address(address: &str) -> Option<String> {
    let stripped = UNIT_PREFIX.replace(address, "");
    if stripped == address {
        None
    } else {
        Some(stripped.into_owned())
    }
}

// ============================================================================
// HTTP client
// ============================================================================

/// Geocoding provider client over HTTP/JSON.
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(cfg: &GeocodingConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    /// One provider lookup, at most one candidate requested.
    async fn lookup(&self, query: &str) -> Result<Vec<Candidate>, OrderError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", query), ("key", self.api_key.as_str()), ("limit", "1")])
            .send()
            .await
            .map_err(|e| {
                warn!("Geocoding request failed: {}", e);
                OrderError::GeocodingFailed
            })?;

        if !response.status().is_success() {
            warn!("Geocoding provider returned HTTP {}", response.status());
            return Err(OrderError::GeocodingFailed);
        }

        let body: GeocodeResponse = response.json().await.map_err(|e| {
            warn!("Geocoding response decode failed: {}", e);
            OrderError::GeocodingFailed
        })?;

        Ok(body.results)
    }
}

#[async_trait]
impl Geocoder for GeocodeClient {
    async fn resolve(&self, address: &str) -> Result<ResolvedAddress, OrderError> {
        let mut candidates = self.lookup(address).await?;

        if candidates.is_empty() {
            // Zero results: retry exactly once with the simplified address
            match simplify_address(address) {
                Some(simplified) => {
                    debug!("Retrying geocode with simplified address: {}", simplified);
                    candidates = self.lookup(&simplified).await?;
                }
                None => return Err(OrderError::GeocodingFailed),
            }
        }

        match candidates.into_iter().next() {
            Some(first) => Ok(first.into()),
            None => Err(OrderError::GeocodingFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_strips_unit_prefix() {
        assert_eq!(
            simplify_address("12/3, 4B, MG Road").as_deref(),
            Some("MG Road")
        );
        assert_eq!(
            simplify_address("7/1, 22, Brigade Road, Bengaluru").as_deref(),
            Some("Brigade Road, Bengaluru")
        );
    }

    #[test]
    fn test_simplify_requires_full_pattern() {
        // No slash component
        assert_eq!(simplify_address("12, 4B, MG Road"), None);
        // No second comma group
        assert_eq!(simplify_address("12/3, MG Road"), None);
        assert_eq!(simplify_address("MG Road"), None);
        assert_eq!(simplify_address(""), None);
    }

    #[test]
    fn test_decode_full_candidate() {
        let json = r#"{
            "results": [{
                "formatted": "MG Road, Bengaluru 560001, India",
                "geometry": {"lat": 12.9758, "lng": 77.6096},
                "components": {
                    "road": "MG Road",
                    "postcode": "560001",
                    "city": "Bengaluru",
                    "country": "India"
                }
            }]
        }"#;
        let body: GeocodeResponse = serde_json::from_str(json).unwrap();
        let resolved: ResolvedAddress = body.results.into_iter().next().unwrap().into();
        assert_eq!(resolved.formatted, "MG Road, Bengaluru 560001, India");
        assert_eq!(resolved.latitude, Some(12.9758));
        assert_eq!(resolved.longitude, Some(77.6096));
        assert_eq!(resolved.city, "Bengaluru");
        assert_eq!(resolved.country, "India");
    }

    #[test]
    fn test_decode_missing_geometry_and_components() {
        let json = r#"{"results": [{"formatted": "Somewhere"}]}"#;
        let body: GeocodeResponse = serde_json::from_str(json).unwrap();
        let resolved: ResolvedAddress = body.results.into_iter().next().unwrap().into();
        assert_eq!(resolved.latitude, None);
        assert_eq!(resolved.longitude, None);
        // Absent components default to empty strings downstream
        assert_eq!(resolved.street, "");
        assert_eq!(resolved.postal_code, "");
    }

    #[test]
    fn test_decode_empty_result_list() {
        let body: GeocodeResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(body.results.is_empty());
        let body: GeocodeResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(body.results.is_empty());
    }

    // ========================================================================
    // resolve() against a local stub provider
    // ========================================================================

    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned JSON body per expected lookup, recording each
    /// request line. The listener goes away after the last response, so a
    /// surplus lookup fails fast instead of hanging the test.
    async fn stub_provider(
        bodies: Vec<&'static str>,
    ) -> (GeocodingConfig, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = seen.clone();

        tokio::spawn(async move {
            for body in bodies {
                let (mut sock, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = sock.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let request_line = String::from_utf8_lossy(&buf)
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                recorded.lock().unwrap().push(request_line);

                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                sock.write_all(response.as_bytes()).await.unwrap();
            }
        });

        let cfg = GeocodingConfig {
            base_url,
            api_key: "test-key".to_string(),
            timeout_secs: 2,
        };
        (cfg, seen)
    }

    const EMPTY: &str = r#"{"results": []}"#;
    const HIT: &str = r#"{"results": [{
        "formatted": "MG Road, Bengaluru 560001, India",
        "geometry": {"lat": 12.9758, "lng": 77.6096},
        "components": {"road": "MG Road", "city": "Bengaluru"}
    }]}"#;

    #[tokio::test]
    async fn test_resolve_first_hit_issues_no_retry() {
        let (cfg, seen) = stub_provider(vec![HIT]).await;
        let client = GeocodeClient::new(&cfg).unwrap();

        let resolved = client.resolve("MG Road").await.unwrap();
        assert_eq!(resolved.latitude, Some(12.9758));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_retries_once_with_simplified_address() {
        let (cfg, seen) = stub_provider(vec![EMPTY, HIT]).await;
        let client = GeocodeClient::new(&cfg).unwrap();

        let resolved = client.resolve("12/3, 4B, MG Road").await.unwrap();
        assert_eq!(resolved.latitude, Some(12.9758));
        assert_eq!(resolved.longitude, Some(77.6096));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        // First lookup carries the full address, the retry the stripped one
        assert!(seen[0].contains("q=12%2F3"), "{}", seen[0]);
        assert!(seen[1].contains("q=MG+Road"), "{}", seen[1]);
    }

    #[tokio::test]
    async fn test_resolve_fails_when_retry_is_also_empty() {
        let (cfg, seen) = stub_provider(vec![EMPTY, EMPTY]).await;
        let client = GeocodeClient::new(&cfg).unwrap();

        let err = client.resolve("12/3, 4B, MG Road").await.unwrap_err();
        assert!(matches!(err, OrderError::GeocodingFailed));
        assert_eq!(seen.lock().unwrap().len(), 2, "exactly one retry");
    }

    #[tokio::test]
    async fn test_resolve_skips_retry_for_unsimplifiable_address() {
        let (cfg, seen) = stub_provider(vec![EMPTY]).await;
        let client = GeocodeClient::new(&cfg).unwrap();

        let err = client.resolve("MG Road").await.unwrap_err();
        assert!(matches!(err, OrderError::GeocodingFailed));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "no retry with an unchanged query");
    }
}
