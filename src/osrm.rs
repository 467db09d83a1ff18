//! OSRM HTTP adapter for routes.
//!
//! Also holds the OSRM response format, which Mapbox Directions and the
//! Mapbox Optimization API share.

use jiff::{SignedDuration, Timestamp};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::model::{OptimizedRoute, RouteRequest, TrafficTag, Waypoint};
use crate::polyline::Polyline;
use crate::traits::RouteProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self, request: &RouteRequest) -> (String, bool) {
        let coords = coordinate_list(request);
        let base = self.config.base_url.trim_end_matches('/');

        if wants_trip(request) {
            let url = format!(
                "{}/trip/v1/{}/{}?overview=full&geometries=polyline&source=first&destination=last&roundtrip=false",
                base, self.config.profile, coords
            );
            (url, true)
        } else {
            let url = format!(
                "{}/route/v1/{}/{}?overview=full&geometries=polyline",
                base, self.config.profile, coords
            );
            (url, false)
        }
    }
}

impl RouteProvider for OsrmClient {
    fn name(&self) -> &'static str {
        "osrm"
    }

    fn compute_route(&self, request: &RouteRequest) -> Result<OptimizedRoute, ProviderError> {
        let (url, trip) = self.url(request);
        debug!(provider = self.name(), %url, points = request.waypoints.len() + 2, "requesting route");

        let response = send(self.client.get(&url), self.name(), self.config.timeout_secs)?;
        into_route(response, request, trip, TrafficTag::Typical)
    }
}

/// OSRM-format response body.
#[derive(Debug, Deserialize)]
pub(crate) struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
    #[serde(default)]
    trips: Vec<OsrmRoute>,
    #[serde(default)]
    waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    /// Meters
    #[serde(default)]
    distance: f64,
    /// Seconds
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    /// Position of this input coordinate in the optimized trip.
    #[serde(default)]
    waypoint_index: Option<usize>,
}

/// Provider optimization only applies when there is something to reorder.
pub(crate) fn wants_trip(request: &RouteRequest) -> bool {
    request.optimize_waypoints && !request.waypoints.is_empty()
}

/// `lng,lat` pairs joined by `;`, in request order.
pub(crate) fn coordinate_list(request: &RouteRequest) -> String {
    request
        .points()
        .iter()
        .map(|point| format!("{:.6},{:.6}", point.longitude, point.latitude))
        .collect::<Vec<_>>()
        .join(";")
}

/// Send a request and decode an OSRM-format body.
///
/// OSRM answers routing failures with a 400 and a JSON body carrying the
/// failure code, so a non-2xx status is decoded before giving up.
pub(crate) fn send(
    request: reqwest::blocking::RequestBuilder,
    provider: &'static str,
    timeout_secs: u64,
) -> Result<OsrmResponse, ProviderError> {
    let transport = |err: reqwest::Error| ProviderError::from_transport(err, provider, timeout_secs);

    let response = request.send().map_err(|err| {
        warn!(provider, error = %err, "route request failed");
        transport(err)
    })?;
    let status = response.status();
    let body = response.text().map_err(transport)?;

    if !status.is_success() {
        warn!(provider, status = status.as_u16(), "route request rejected");
        return match serde_json::from_str::<OsrmResponse>(&body) {
            Ok(parsed) if parsed.code != "Ok" => Err(no_route(parsed)),
            _ => Err(ProviderError::Status {
                status: status.as_u16(),
                message: body,
            }),
        };
    }

    Ok(serde_json::from_str(&body)?)
}

fn no_route(response: OsrmResponse) -> ProviderError {
    ProviderError::NoRoute {
        message: response.message.unwrap_or_default(),
        code: response.code,
    }
}

/// Turn an OSRM-format response into a route for `request`.
pub(crate) fn into_route(
    response: OsrmResponse,
    request: &RouteRequest,
    trip: bool,
    tag: TrafficTag,
) -> Result<OptimizedRoute, ProviderError> {
    if response.code != "Ok" {
        return Err(no_route(response));
    }

    let OsrmResponse {
        mut routes,
        mut trips,
        waypoints: snapped,
        ..
    } = response;
    let candidates = if trip { &mut trips } else { &mut routes };
    if candidates.is_empty() {
        return Err(ProviderError::NoRoute {
            code: "NoRoute".to_string(),
            message: "response contained no routes".to_string(),
        });
    }
    let route = candidates.swap_remove(0);

    let mut path = Polyline::decode(&route.geometry)?.into_waypoints();
    if path.is_empty() {
        return Err(ProviderError::EmptyGeometry);
    }
    if let Some(bad) = path.iter().find(|point| !point.is_valid()) {
        return Err(ProviderError::CoordinateOutOfRange {
            latitude: bad.latitude,
            longitude: bad.longitude,
        });
    }
    pin_endpoints(&mut path, request);

    let (distance_m, duration_s) = if route.legs.is_empty() {
        (route.distance, route.duration)
    } else {
        route.legs.iter().fold((0.0, 0.0), |(distance, duration), leg| {
            (distance + leg.distance, duration + leg.duration)
        })
    };

    let mut waypoints = if trip {
        visiting_order(&request.waypoints, &snapped)
    } else {
        request.waypoints.clone()
    };
    if let Some(departure) = request.departure_time {
        stamp_arrivals(&mut waypoints, &route.legs, departure);
    }

    Ok(OptimizedRoute {
        path,
        total_distance_km: distance_m / 1000.0,
        estimated_duration_min: duration_s / 60.0,
        estimated_fuel_cost: 0.0,
        estimated_toll_cost: 0.0,
        traffic_conditions: tag,
        waypoints,
    })
}

/// Snapped geometry starts and ends near, not at, the requested points.
fn pin_endpoints(path: &mut Vec<Waypoint>, request: &RouteRequest) {
    path[0] = request.origin.clone();
    if path.len() == 1 {
        path.push(request.destination.clone());
    } else if let Some(last) = path.last_mut() {
        *last = request.destination.clone();
    }
}

/// Reorder intermediate stops by their trip position.
///
/// `snapped` lists every input coordinate (origin first, destination last).
/// Falls back to request order if the response doesn't line up.
fn visiting_order(stops: &[Waypoint], snapped: &[OsrmWaypoint]) -> Vec<Waypoint> {
    if snapped.len() != stops.len() + 2 {
        return stops.to_vec();
    }

    let mut indexed = Vec::with_capacity(stops.len());
    for (stop, waypoint) in stops.iter().zip(&snapped[1..]) {
        match waypoint.waypoint_index {
            Some(position) => indexed.push((position, stop)),
            None => return stops.to_vec(),
        }
    }
    indexed.sort_by_key(|(position, _)| *position);
    indexed.into_iter().map(|(_, stop)| stop.clone()).collect()
}

/// Leg `i` ends at stop `i`, so cumulative leg time is the arrival offset.
fn stamp_arrivals(stops: &mut [Waypoint], legs: &[OsrmLeg], departure: Timestamp) {
    let mut elapsed = 0.0;
    for (stop, leg) in stops.iter_mut().zip(legs) {
        elapsed += leg.duration;
        stop.estimated_arrival = departure
            .checked_add(SignedDuration::from_secs(elapsed.round() as i64))
            .ok();
    }
}
