//! Data model shared by the routing engine and its collaborators.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(
    /// Identifier of a delivery order.
    OrderId
);
id_type!(
    /// Identifier of a transporter (vehicle operator).
    TransporterId
);
id_type!(
    /// Identifier of a persisted route.
    RouteId
);

/// A geographic coordinate with optional address/arrival metadata.
///
/// Equality only looks at the coordinate pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<Timestamp>,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
            estimated_arrival: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// (latitude, longitude) pair.
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl PartialEq for Waypoint {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

impl From<(f64, f64)> for Waypoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Vehicle class used for fuel pricing.
///
/// Labels that don't match a known class deserialize to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    TwoWheeler,
    Car,
    Van,
    SmallTruck,
    MediumTruck,
    LargeTruck,
    #[serde(other)]
    Unknown,
}

impl VehicleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::TwoWheeler => "two_wheeler",
            VehicleClass::Car => "car",
            VehicleClass::Van => "van",
            VehicleClass::SmallTruck => "small_truck",
            VehicleClass::MediumTruck => "medium_truck",
            VehicleClass::LargeTruck => "large_truck",
            VehicleClass::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficModel {
    BestGuess,
    Pessimistic,
    Optimistic,
}

/// Input of a single route computation. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Waypoint,
    pub destination: Waypoint,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    pub vehicle_class: VehicleClass,
    #[serde(default)]
    pub traffic_model: Option<TrafficModel>,
    #[serde(default)]
    pub departure_time: Option<Timestamp>,
    /// Let the provider reorder intermediate waypoints.
    #[serde(default)]
    pub optimize_waypoints: bool,
}

impl RouteRequest {
    pub fn new(origin: Waypoint, destination: Waypoint, vehicle_class: VehicleClass) -> Self {
        Self {
            origin,
            destination,
            waypoints: Vec::new(),
            vehicle_class,
            traffic_model: None,
            departure_time: None,
            optimize_waypoints: false,
        }
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Waypoint>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn with_traffic_model(mut self, model: TrafficModel) -> Self {
        self.traffic_model = Some(model);
        self
    }

    pub fn with_departure_time(mut self, departure: Timestamp) -> Self {
        self.departure_time = Some(departure);
        self
    }

    pub fn optimized(mut self) -> Self {
        self.optimize_waypoints = true;
        self
    }

    /// All points in request order: origin, waypoints, destination.
    pub fn points(&self) -> Vec<&Waypoint> {
        std::iter::once(&self.origin)
            .chain(self.waypoints.iter())
            .chain(std::iter::once(&self.destination))
            .collect()
    }

    /// Whether the caller asked for a traffic-aware duration.
    pub fn wants_traffic(&self) -> bool {
        self.traffic_model.is_some() || self.departure_time.is_some()
    }
}

/// Where an [`OptimizedRoute`]'s duration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficTag {
    /// Provider duration reflects live traffic.
    Live,
    /// Provider duration from typical road speeds.
    Typical,
    /// Straight-line estimate, no road data.
    Estimated,
}

impl TrafficTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficTag::Live => "live",
            TrafficTag::Typical => "typical",
            TrafficTag::Estimated => "estimated",
        }
    }
}

impl fmt::Display for TrafficTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed route. Recalculation produces a new value rather than mutating one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub path: Vec<Waypoint>,
    pub total_distance_km: f64,
    pub estimated_duration_min: f64,
    pub estimated_fuel_cost: f64,
    pub estimated_toll_cost: f64,
    pub traffic_conditions: TrafficTag,
    /// Requested stops, excluding origin and destination.
    pub waypoints: Vec<Waypoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl RouteStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RouteStatus::Completed | RouteStatus::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: RouteStatus) -> bool {
        use RouteStatus::*;
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Planned, InProgress) | (InProgress, Completed) | (Planned, Cancelled) | (InProgress, Cancelled)
        )
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RouteStatus::Planned => "PLANNED",
            RouteStatus::InProgress => "IN_PROGRESS",
            RouteStatus::Completed => "COMPLETED",
            RouteStatus::Cancelled => "CANCELLED",
        })
    }
}

/// A route record owned by exactly one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedRoute {
    pub id: RouteId,
    pub order_id: OrderId,
    pub transporter_id: TransporterId,
    pub status: RouteStatus,
    pub vehicle_class: VehicleClass,
    pub route: OptimizedRoute,
    pub actual_duration_min: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

/// The parts of an order record that routing needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub pickup: Waypoint,
    pub delivery: Waypoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transporter {
    pub id: TransporterId,
    pub vehicle_class: VehicleClass,
    pub last_location: Option<Waypoint>,
}

/// A position fix from the live-location feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedLocation {
    pub transporter_id: TransporterId,
    pub order_id: Option<OrderId>,
    pub location: Waypoint,
    pub recorded_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLevel {
    Light,
    Moderate,
    Heavy,
    Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Waypoint,
    pub end: Waypoint,
}

/// Congestion on one path segment. Recomputed per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficCondition {
    pub segment: Segment,
    pub condition: TrafficLevel,
    pub delay_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteProgress {
    pub current_location: Option<Waypoint>,
    pub progress_percent: f64,
    pub estimated_time_remaining_min: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waypoint_equality_ignores_metadata() {
        let a = Waypoint::new(36.1, -115.1).with_address("Depot");
        let b = Waypoint::new(36.1, -115.1);
        assert_eq!(a, b);
        assert_ne!(a, Waypoint::new(36.1, -115.2));
    }

    #[test]
    fn test_unknown_vehicle_label() {
        let class: VehicleClass = serde_json::from_str("\"hovercraft\"").unwrap();
        assert_eq!(class, VehicleClass::Unknown);
        let class: VehicleClass = serde_json::from_str("\"medium_truck\"").unwrap();
        assert_eq!(class, VehicleClass::MediumTruck);
    }

    #[test]
    fn test_status_transitions() {
        use RouteStatus::*;
        assert!(Planned.can_transition_to(InProgress));
        assert!(Planned.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!Planned.can_transition_to(Completed));
        assert!(!Planned.can_transition_to(Planned));
        for next in [Planned, InProgress, Completed, Cancelled] {
            assert!(!Completed.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_waypoint_bounds() {
        assert!(Waypoint::new(90.0, -180.0).is_valid());
        assert!(Waypoint::new(-90.0, 180.0).is_valid());
        assert!(!Waypoint::new(90.5, 0.0).is_valid());
        assert!(!Waypoint::new(0.0, -180.5).is_valid());
        assert!(!Waypoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_terminal_states() {
        assert!(RouteStatus::Completed.is_terminal());
        assert!(RouteStatus::Cancelled.is_terminal());
        assert!(!RouteStatus::Planned.is_terminal());
        assert!(!RouteStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&RouteStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn test_request_points_order() {
        let request = RouteRequest::new((0.0, 0.0).into(), (0.0, 2.0).into(), VehicleClass::Car)
            .with_waypoints(vec![(0.0, 1.0).into()]);
        let points: Vec<(f64, f64)> = request.points().iter().map(|p| p.coords()).collect();
        assert_eq!(points, vec![(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        assert!(!request.wants_traffic());
    }
}
