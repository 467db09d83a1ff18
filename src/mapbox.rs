//! Mapbox Directions / Optimization adapter.
//!
//! Mapbox answers in the OSRM response format, so parsing is shared with
//! [`crate::osrm`]. The access token is attached as a query parameter and
//! kept out of logged URLs.

use tracing::debug;

use crate::error::ProviderError;
use crate::model::{OptimizedRoute, RouteRequest, TrafficTag};
use crate::osrm::{coordinate_list, into_route, send, wants_trip};
use crate::traits::RouteProvider;

#[derive(Debug, Clone)]
pub struct MapboxConfig {
    pub access_token: String,
    pub base_url: String,
    /// Use the `driving-traffic` profile when the request asks for traffic.
    pub traffic: bool,
    pub timeout_secs: u64,
}

impl MapboxConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: "https://api.mapbox.com".to_string(),
            traffic: true,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapboxClient {
    config: MapboxConfig,
    client: reqwest::blocking::Client,
}

impl MapboxClient {
    pub fn new(config: MapboxConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn profile(&self, request: &RouteRequest) -> (&'static str, TrafficTag) {
        if self.config.traffic && request.wants_traffic() {
            ("driving-traffic", TrafficTag::Live)
        } else {
            ("driving", TrafficTag::Typical)
        }
    }

    /// Request URL without credentials, plus whether it is a trip request.
    fn url(&self, request: &RouteRequest, profile: &str) -> (String, bool) {
        let coords = coordinate_list(request);
        let base = self.config.base_url.trim_end_matches('/');

        if wants_trip(request) {
            let url = format!(
                "{}/optimized-trips/v1/mapbox/{}/{}?overview=full&geometries=polyline&source=first&destination=last&roundtrip=false",
                base, profile, coords
            );
            (url, true)
        } else {
            let url = format!(
                "{}/directions/v5/mapbox/{}/{}?overview=full&geometries=polyline",
                base, profile, coords
            );
            (url, false)
        }
    }

    fn authorized(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        self.client
            .get(url)
            .query(&[("access_token", self.config.access_token.as_str())])
    }
}

impl RouteProvider for MapboxClient {
    fn name(&self) -> &'static str {
        "mapbox"
    }

    fn compute_route(&self, request: &RouteRequest) -> Result<OptimizedRoute, ProviderError> {
        let (profile, tag) = self.profile(request);
        let (url, trip) = self.url(request, profile);
        debug!(provider = self.name(), %url, points = request.waypoints.len() + 2, "requesting route");

        let response = send(self.authorized(&url), self.name(), self.config.timeout_secs)?;
        into_route(response, request, trip, tag)
    }
}
