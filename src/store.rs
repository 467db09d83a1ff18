//! In-memory record store and location feed.

use std::collections::HashMap;

use jiff::Timestamp;
use parking_lot::RwLock;

use crate::model::{
    Order, OrderId, PersistedRoute, RouteId, TrackedLocation, Transporter, TransporterId, Waypoint,
};
use crate::traits::{LocationFeed, RouteStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    orders: RwLock<HashMap<OrderId, Order>>,
    transporters: RwLock<HashMap<TransporterId, Transporter>>,
    routes: RwLock<Routes>,
    locations: RwLock<HashMap<TransporterId, Fixes>>,
}

#[derive(Debug, Default)]
struct Routes {
    by_id: HashMap<RouteId, PersistedRoute>,
    by_order: HashMap<OrderId, RouteId>,
}

/// Latest fixes of one transporter: one per order, one untagged, and the
/// newest of any kind.
#[derive(Debug, Default)]
struct Fixes {
    by_order: HashMap<OrderId, TrackedLocation>,
    untagged: Option<TrackedLocation>,
    any: Option<TrackedLocation>,
}

impl Fixes {
    fn record(&mut self, fix: TrackedLocation) {
        match fix.order_id {
            Some(order_id) => {
                if is_newer(self.by_order.get(&order_id), &fix) {
                    self.by_order.insert(order_id, fix.clone());
                }
            }
            None => {
                if is_newer(self.untagged.as_ref(), &fix) {
                    self.untagged = Some(fix.clone());
                }
            }
        }
        if is_newer(self.any.as_ref(), &fix) {
            self.any = Some(fix);
        }
    }
}

/// Later arrivals win ties on `recorded_at`.
fn is_newer(current: Option<&TrackedLocation>, fix: &TrackedLocation) -> bool {
    current.is_none_or(|current| fix.recorded_at >= current.recorded_at)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_order(&self, order: Order) {
        self.orders.write().insert(order.id, order);
    }

    pub fn add_transporter(&self, transporter: Transporter) {
        self.transporters.write().insert(transporter.id, transporter);
    }

    /// Record a position fix and update the transporter's last known location.
    pub fn record_location(
        &self,
        transporter_id: TransporterId,
        order_id: Option<OrderId>,
        location: Waypoint,
        recorded_at: Timestamp,
    ) {
        if let Some(transporter) = self.transporters.write().get_mut(&transporter_id) {
            transporter.last_location = Some(location.clone());
        }
        self.locations
            .write()
            .entry(transporter_id)
            .or_default()
            .record(TrackedLocation {
                transporter_id,
                order_id,
                location,
                recorded_at,
            });
    }

    pub fn route_count(&self) -> usize {
        self.routes.read().by_id.len()
    }
}

impl RouteStore for MemoryStore {
    fn order(&self, id: &OrderId) -> Option<Order> {
        self.orders.read().get(id).cloned()
    }

    fn transporter(&self, id: &TransporterId) -> Option<Transporter> {
        self.transporters.read().get(id).cloned()
    }

    fn route(&self, id: &RouteId) -> Option<PersistedRoute> {
        self.routes.read().by_id.get(id).cloned()
    }

    fn route_for_order(&self, order_id: &OrderId) -> Option<PersistedRoute> {
        let routes = self.routes.read();
        routes
            .by_order
            .get(order_id)
            .and_then(|id| routes.by_id.get(id))
            .cloned()
    }

    fn insert_route(&self, route: PersistedRoute) -> bool {
        let mut routes = self.routes.write();
        if routes.by_order.contains_key(&route.order_id) {
            return false;
        }
        routes.by_order.insert(route.order_id, route.id);
        routes.by_id.insert(route.id, route);
        true
    }

    fn save_route(&self, route: &PersistedRoute) {
        let mut routes = self.routes.write();
        if let Some(existing) = routes.by_id.get_mut(&route.id) {
            *existing = route.clone();
        }
    }
}

impl LocationFeed for MemoryStore {
    fn latest_location(
        &self,
        transporter_id: &TransporterId,
        order_id: Option<&OrderId>,
    ) -> Option<TrackedLocation> {
        let locations = self.locations.read();
        let fixes = locations.get(transporter_id)?;

        match order_id {
            Some(order_id) => fixes.by_order.get(order_id).or(fixes.untagged.as_ref()).cloned(),
            None => fixes.any.clone(),
        }
    }
}
