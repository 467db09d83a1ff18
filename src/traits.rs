//! Capability seams of the routing engine.
//!
//! The engine only talks to providers, planners, traffic sources and the
//! record store through these traits. Concrete deployments plug in their own
//! implementations; the crate ships one default for each.

use std::sync::Arc;

use crate::error::ProviderError;
use crate::model::{
    Order, OrderId, OptimizedRoute, PersistedRoute, RouteId, RouteRequest, TrackedLocation,
    TrafficCondition, Transporter, TransporterId, Waypoint,
};

/// An external (or local) source of routes between points.
pub trait RouteProvider {
    /// Short provider name for logs and errors.
    fn name(&self) -> &'static str;

    /// Compute a route for the request. Cost fields are left at zero.
    fn compute_route(&self, request: &RouteRequest) -> Result<OptimizedRoute, ProviderError>;
}

/// Chooses the order in which a set of stops is visited.
pub trait TourPlanner {
    /// Returns a permutation of `stops`, starting from `origin`.
    fn order_stops(&self, origin: &Waypoint, stops: &[Waypoint]) -> Vec<Waypoint>;
}

/// Produces per-segment congestion for a path.
///
/// Returns one condition per consecutive pair of points.
pub trait TrafficSource {
    fn sample(&self, path: &[Waypoint]) -> Vec<TrafficCondition>;
}

/// Record store for orders, transporters and routes.
///
/// The store is the single source of truth; the engine keeps no copies.
pub trait RouteStore {
    fn order(&self, id: &OrderId) -> Option<Order>;

    fn transporter(&self, id: &TransporterId) -> Option<Transporter>;

    fn route(&self, id: &RouteId) -> Option<PersistedRoute>;

    fn route_for_order(&self, order_id: &OrderId) -> Option<PersistedRoute>;

    /// Insert a new route. Returns false if the order already owns one.
    fn insert_route(&self, route: PersistedRoute) -> bool;

    /// Overwrite an existing route record, keyed by its id.
    fn save_route(&self, route: &PersistedRoute);
}

/// Live-location feed.
pub trait LocationFeed {
    /// Most recent fix for the transporter, scoped to `order_id` when given.
    fn latest_location(
        &self,
        transporter_id: &TransporterId,
        order_id: Option<&OrderId>,
    ) -> Option<TrackedLocation>;
}

impl<T: RouteStore + ?Sized> RouteStore for &T {
    fn order(&self, id: &OrderId) -> Option<Order> {
        (**self).order(id)
    }

    fn transporter(&self, id: &TransporterId) -> Option<Transporter> {
        (**self).transporter(id)
    }

    fn route(&self, id: &RouteId) -> Option<PersistedRoute> {
        (**self).route(id)
    }

    fn route_for_order(&self, order_id: &OrderId) -> Option<PersistedRoute> {
        (**self).route_for_order(order_id)
    }

    fn insert_route(&self, route: PersistedRoute) -> bool {
        (**self).insert_route(route)
    }

    fn save_route(&self, route: &PersistedRoute) {
        (**self).save_route(route)
    }
}

impl<T: RouteStore + ?Sized> RouteStore for Arc<T> {
    fn order(&self, id: &OrderId) -> Option<Order> {
        (**self).order(id)
    }

    fn transporter(&self, id: &TransporterId) -> Option<Transporter> {
        (**self).transporter(id)
    }

    fn route(&self, id: &RouteId) -> Option<PersistedRoute> {
        (**self).route(id)
    }

    fn route_for_order(&self, order_id: &OrderId) -> Option<PersistedRoute> {
        (**self).route_for_order(order_id)
    }

    fn insert_route(&self, route: PersistedRoute) -> bool {
        (**self).insert_route(route)
    }

    fn save_route(&self, route: &PersistedRoute) {
        (**self).save_route(route)
    }
}

impl<T: LocationFeed + ?Sized> LocationFeed for &T {
    fn latest_location(
        &self,
        transporter_id: &TransporterId,
        order_id: Option<&OrderId>,
    ) -> Option<TrackedLocation> {
        (**self).latest_location(transporter_id, order_id)
    }
}

impl<T: LocationFeed + ?Sized> LocationFeed for Arc<T> {
    fn latest_location(
        &self,
        transporter_id: &TransporterId,
        order_id: Option<&OrderId>,
    ) -> Option<TrackedLocation> {
        (**self).latest_location(transporter_id, order_id)
    }
}
