//! Test fixtures for dispatch-router.
//!
//! Provides:
//! - Real Las Vegas / Henderson locations
//! - A seeded in-memory world (orders, transporters, location fixes)
//! - Deterministic stand-ins for the provider and traffic capabilities

#![allow(dead_code)]

pub mod las_vegas_locations;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use jiff::Timestamp;

use dispatch_router::error::ProviderError;
use dispatch_router::haversine::StraightLine;
use dispatch_router::model::{
    OptimizedRoute, Order, OrderId, RouteRequest, TrafficCondition, TrafficLevel, Transporter,
    TransporterId, VehicleClass, Waypoint,
};
use dispatch_router::store::MemoryStore;
use dispatch_router::traffic::segments;
use dispatch_router::traits::{RouteProvider, TrafficSource};
use dispatch_router::RouteEngine;

pub fn wp(lat: f64, lng: f64) -> Waypoint {
    Waypoint::new(lat, lng)
}

/// `n` equally spaced points along the equator, one degree apart.
pub fn straight_path(n: usize) -> Vec<Waypoint> {
    (0..n).map(|i| wp(0.0, i as f64)).collect()
}

/// Seconds since the epoch as a timestamp.
pub fn at(seconds: i64) -> Timestamp {
    Timestamp::from_second(seconds).unwrap()
}

// ============================================================================
// World
// ============================================================================

pub struct World {
    pub store: MemoryStore,
}

impl World {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }

    pub fn transporter(&self, vehicle_class: VehicleClass, location: Option<Waypoint>) -> TransporterId {
        let id = TransporterId::new();
        self.store.add_transporter(Transporter {
            id,
            vehicle_class,
            last_location: location,
        });
        id
    }

    pub fn order(&self, pickup: Waypoint, delivery: Waypoint) -> OrderId {
        let id = OrderId::new();
        self.store.add_order(Order { id, pickup, delivery });
        id
    }

    /// Engine over the straight-line provider with calm traffic.
    pub fn engine(&self) -> RouteEngine<&MemoryStore, &MemoryStore, FixedTraffic> {
        self.engine_with(Box::new(StraightLine::default()))
    }

    pub fn engine_with(
        &self,
        provider: Box<dyn RouteProvider + Send + Sync>,
    ) -> RouteEngine<&MemoryStore, &MemoryStore, FixedTraffic> {
        RouteEngine::with_provider(provider, &self.store, &self.store).with_traffic(FixedTraffic::light())
    }
}

// ============================================================================
// Capability stand-ins
// ============================================================================

/// Traffic source returning the same level and delay for every segment.
pub struct FixedTraffic {
    pub level: TrafficLevel,
    pub delay_min: f64,
}

impl FixedTraffic {
    pub fn light() -> Self {
        Self {
            level: TrafficLevel::Light,
            delay_min: 0.0,
        }
    }

    pub fn severe(delay_min: f64) -> Self {
        Self {
            level: TrafficLevel::Severe,
            delay_min,
        }
    }
}

impl TrafficSource for FixedTraffic {
    fn sample(&self, path: &[Waypoint]) -> Vec<TrafficCondition> {
        segments(path)
            .into_iter()
            .map(|segment| TrafficCondition {
                segment,
                condition: self.level,
                delay_min: self.delay_min,
            })
            .collect()
    }
}

/// Provider that always fails, counting how often it was asked.
///
/// Clones share the counter, so a test can keep one after boxing the other.
#[derive(Default, Clone)]
pub struct FailingProvider {
    pub calls: Arc<AtomicUsize>,
}

impl FailingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn compute_route(&self, _request: &RouteRequest) -> Result<OptimizedRoute, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Timeout {
            provider: "failing",
            secs: 10,
        })
    }
}

/// Provider that returns a fixed road-like answer: the request points with a
/// midpoint inserted on every leg, and a fixed distance and duration.
pub struct DetailedProvider {
    pub distance_km: f64,
    pub duration_min: f64,
}

impl RouteProvider for DetailedProvider {
    fn name(&self) -> &'static str {
        "detailed"
    }

    fn compute_route(&self, request: &RouteRequest) -> Result<OptimizedRoute, ProviderError> {
        let points = request.points();
        let mut path = vec![points[0].clone()];
        for pair in points.windows(2) {
            path.push(wp(
                (pair[0].latitude + pair[1].latitude) / 2.0,
                (pair[0].longitude + pair[1].longitude) / 2.0,
            ));
            path.push(pair[1].clone());
        }

        Ok(OptimizedRoute {
            path,
            total_distance_km: self.distance_km,
            estimated_duration_min: self.duration_min,
            estimated_fuel_cost: 0.0,
            estimated_toll_cost: 0.0,
            traffic_conditions: dispatch_router::model::TrafficTag::Typical,
            waypoints: request.waypoints.clone(),
        })
    }
}
