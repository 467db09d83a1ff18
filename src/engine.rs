//! Route engine: computes, persists, recalculates and tracks routes.

use jiff::Timestamp;
use tracing::{info, warn};

use crate::config::{EngineConfig, select_provider};
use crate::cost::CostModel;
use crate::error::{ConfigError, DispatchError, EntityKind, Result};
use crate::haversine::nearest_index;
use crate::model::{
    OptimizedRoute, OrderId, PersistedRoute, RouteId, RouteProgress, RouteRequest, RouteStatus,
    TrafficCondition, Transporter, TransporterId, Waypoint,
};
use crate::tour::NearestNeighbor;
use crate::traffic::RandomTraffic;
use crate::traits::{LocationFeed, RouteProvider, RouteStore, TourPlanner, TrafficSource};

pub struct RouteEngine<S, L, T = RandomTraffic, P = NearestNeighbor> {
    provider: Box<dyn RouteProvider + Send + Sync>,
    store: S,
    feed: L,
    traffic: T,
    planner: P,
    costs: CostModel,
}

impl<S, L> RouteEngine<S, L>
where
    S: RouteStore,
    L: LocationFeed,
{
    /// Build an engine with the provider selected from `config`.
    pub fn new(config: &EngineConfig, store: S, feed: L) -> std::result::Result<Self, ConfigError> {
        Ok(Self::with_provider(select_provider(config)?, store, feed))
    }

    pub fn with_provider(provider: Box<dyn RouteProvider + Send + Sync>, store: S, feed: L) -> Self {
        Self {
            provider,
            store,
            feed,
            traffic: RandomTraffic::default(),
            planner: NearestNeighbor,
            costs: CostModel::default(),
        }
    }
}

impl<S, L, T, P> RouteEngine<S, L, T, P> {
    pub fn with_traffic<T2: TrafficSource>(self, traffic: T2) -> RouteEngine<S, L, T2, P> {
        RouteEngine {
            provider: self.provider,
            store: self.store,
            feed: self.feed,
            traffic,
            planner: self.planner,
            costs: self.costs,
        }
    }

    pub fn with_planner<P2: TourPlanner>(self, planner: P2) -> RouteEngine<S, L, T, P2> {
        RouteEngine {
            provider: self.provider,
            store: self.store,
            feed: self.feed,
            traffic: self.traffic,
            planner,
            costs: self.costs,
        }
    }

    pub fn with_cost_model(mut self, costs: CostModel) -> Self {
        self.costs = costs;
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, L, T, P> RouteEngine<S, L, T, P>
where
    S: RouteStore,
    L: LocationFeed,
    T: TrafficSource,
    P: TourPlanner,
{
    /// Compute a route with the configured provider and price it.
    pub fn calculate_optimal_route(&self, request: &RouteRequest) -> Result<OptimizedRoute> {
        let mut route = self.provider.compute_route(request).map_err(|err| {
            warn!(provider = self.provider.name(), error = %err, "route computation failed");
            DispatchError::RouteComputation(err)
        })?;

        route.estimated_fuel_cost = self.costs.fuel_cost(route.total_distance_km, request.vehicle_class);
        route.estimated_toll_cost = self.costs.toll_cost(&route.path);
        Ok(route)
    }

    /// Compute and persist the route for an order. One route per order.
    pub fn create_route(
        &self,
        order_id: OrderId,
        transporter_id: TransporterId,
        request: &RouteRequest,
    ) -> Result<PersistedRoute> {
        if self.store.order(&order_id).is_none() {
            return Err(DispatchError::not_found(EntityKind::Order, order_id));
        }
        self.transporter(&transporter_id)?;
        if self.store.route_for_order(&order_id).is_some() {
            return Err(DispatchError::DuplicateRoute(order_id));
        }

        let route = self.calculate_optimal_route(request)?;
        let now = Timestamp::now();
        let persisted = PersistedRoute {
            id: RouteId::new(),
            order_id,
            transporter_id,
            status: RouteStatus::Planned,
            vehicle_class: request.vehicle_class,
            route,
            actual_duration_min: None,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
        };

        if !self.store.insert_route(persisted.clone()) {
            return Err(DispatchError::DuplicateRoute(order_id));
        }

        info!(
            route_id = %persisted.id,
            %order_id,
            %transporter_id,
            distance_km = persisted.route.total_distance_km,
            "route created"
        );
        Ok(persisted)
    }

    /// Route an order from pickup to delivery with the transporter's vehicle.
    pub fn assign_order(&self, order_id: OrderId, transporter_id: TransporterId) -> Result<PersistedRoute> {
        let order = self
            .store
            .order(&order_id)
            .ok_or_else(|| DispatchError::not_found(EntityKind::Order, order_id))?;
        let transporter = self.transporter(&transporter_id)?;

        let request = RouteRequest::new(order.pickup, order.delivery, transporter.vehicle_class);
        self.create_route(order_id, transporter_id, &request)
    }

    pub fn update_status(
        &self,
        route_id: RouteId,
        new_status: RouteStatus,
        actual_duration_min: Option<f64>,
    ) -> Result<PersistedRoute> {
        let mut route = self.load(&route_id)?;
        if !route.status.can_transition_to(new_status) {
            return Err(DispatchError::InvalidTransition {
                from: route.status,
                to: new_status,
            });
        }

        let now = Timestamp::now();
        match new_status {
            RouteStatus::InProgress => route.started_at = Some(now),
            RouteStatus::Completed => route.completed_at = Some(now),
            RouteStatus::Planned | RouteStatus::Cancelled => {}
        }

        route.actual_duration_min = match (actual_duration_min, new_status, route.started_at) {
            (Some(minutes), _, _) => Some(minutes),
            (None, RouteStatus::Completed, Some(started)) => {
                Some(now.duration_since(started).as_secs_f64() / 60.0)
            }
            _ => route.actual_duration_min,
        };

        info!(%route_id, from = %route.status, to = %new_status, "route status changed");
        route.status = new_status;
        route.updated_at = now;
        self.store.save_route(&route);
        Ok(route)
    }

    /// Order `stops` from the transporter's last location and route through them.
    pub fn optimize_multi_stop(&self, transporter_id: TransporterId, stops: &[Waypoint]) -> Result<OptimizedRoute> {
        if stops.len() < 2 {
            return Err(DispatchError::InsufficientStops(stops.len()));
        }

        let transporter = self.transporter(&transporter_id)?;
        let origin = transporter
            .last_location
            .ok_or(DispatchError::LocationUnavailable(transporter_id))?;

        let mut ordered = self.planner.order_stops(&origin, stops);
        let Some(destination) = ordered.pop() else {
            return Err(DispatchError::InsufficientStops(0));
        };

        let request = RouteRequest::new(origin, destination, transporter.vehicle_class).with_waypoints(ordered);
        self.calculate_optimal_route(&request)
    }

    /// Reroute from `current_location` through the rest of the planned path.
    pub fn recalculate(&self, route_id: RouteId, current_location: Waypoint) -> Result<OptimizedRoute> {
        let mut persisted = self.load(&route_id)?;
        let path = &persisted.route.path;

        let closest = nearest_index(path, &current_location).ok_or(DispatchError::RouteAlreadyComplete(route_id))?;
        let mut remaining = path[closest + 1..].to_vec();
        let Some(destination) = remaining.pop() else {
            return Err(DispatchError::RouteAlreadyComplete(route_id));
        };

        let request =
            RouteRequest::new(current_location, destination, persisted.vehicle_class).with_waypoints(remaining);
        let route = self.calculate_optimal_route(&request)?;

        info!(
            %route_id,
            passed = closest,
            distance_km = route.total_distance_km,
            "route recalculated"
        );
        persisted.route = route.clone();
        persisted.updated_at = Timestamp::now();
        self.store.save_route(&persisted);
        Ok(route)
    }

    /// Progress along the planned path from the latest tracked location.
    pub fn progress(&self, route_id: RouteId) -> Result<RouteProgress> {
        let persisted = self.load(&route_id)?;
        let route = &persisted.route;

        let Some(fix) = self
            .feed
            .latest_location(&persisted.transporter_id, Some(&persisted.order_id))
        else {
            return Ok(RouteProgress {
                current_location: None,
                progress_percent: 0.0,
                estimated_time_remaining_min: route.estimated_duration_min,
            });
        };

        let progress_percent = match route.path.len() {
            0 => 0.0,
            1 => 100.0,
            len => {
                let index = nearest_index(&route.path, &fix.location).unwrap_or(0);
                (index as f64 / (len - 1) as f64 * 100.0).round()
            }
        };

        Ok(RouteProgress {
            current_location: Some(fix.location),
            progress_percent,
            estimated_time_remaining_min: route.estimated_duration_min * (1.0 - progress_percent / 100.0),
        })
    }

    /// Sample congestion along the persisted path.
    pub fn traffic_update(&self, route_id: RouteId) -> Result<Vec<TrafficCondition>> {
        let persisted = self.load(&route_id)?;
        Ok(self.traffic.sample(&persisted.route.path))
    }

    fn load(&self, route_id: &RouteId) -> Result<PersistedRoute> {
        self.store
            .route(route_id)
            .ok_or_else(|| DispatchError::not_found(EntityKind::Route, route_id))
    }

    fn transporter(&self, transporter_id: &TransporterId) -> Result<Transporter> {
        self.store
            .transporter(transporter_id)
            .ok_or_else(|| DispatchError::not_found(EntityKind::Transporter, transporter_id))
    }
}
