//! Fuel and toll cost estimation.

use crate::haversine::path_length_km;
use crate::model::{VehicleClass, Waypoint};

/// Paths at or under this length pay no toll.
pub const TOLL_FREE_KM: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    pub two_wheeler_rate: f64,
    pub car_rate: f64,
    pub van_rate: f64,
    pub small_truck_rate: f64,
    pub medium_truck_rate: f64,
    pub large_truck_rate: f64,
    /// Rate for vehicle classes without a dedicated entry.
    pub default_rate: f64,
    pub toll_rate_per_km: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            two_wheeler_rate: 2.5,
            car_rate: 6.0,
            van_rate: 8.5,
            small_truck_rate: 12.0,
            medium_truck_rate: 16.0,
            large_truck_rate: 22.0,
            default_rate: 8.0,
            toll_rate_per_km: 0.02,
        }
    }
}

impl CostModel {
    /// Fuel cost per kilometer for a vehicle class.
    pub fn per_km_rate(&self, vehicle_class: VehicleClass) -> f64 {
        match vehicle_class {
            VehicleClass::TwoWheeler => self.two_wheeler_rate,
            VehicleClass::Car => self.car_rate,
            VehicleClass::Van => self.van_rate,
            VehicleClass::SmallTruck => self.small_truck_rate,
            VehicleClass::MediumTruck => self.medium_truck_rate,
            VehicleClass::LargeTruck => self.large_truck_rate,
            VehicleClass::Unknown => self.default_rate,
        }
    }

    pub fn fuel_cost(&self, distance_km: f64, vehicle_class: VehicleClass) -> f64 {
        distance_km * self.per_km_rate(vehicle_class)
    }

    pub fn toll_cost(&self, path: &[Waypoint]) -> f64 {
        let total = path_length_km(path);
        if total <= TOLL_FREE_KM {
            0.0
        } else {
            total * self.toll_rate_per_km
        }
    }
}

/// Fuel cost with the default rate table.
pub fn fuel_cost(distance_km: f64, vehicle_class: VehicleClass) -> f64 {
    CostModel::default().fuel_cost(distance_km, vehicle_class)
}

/// Toll cost with the default rate.
pub fn toll_cost(path: &[Waypoint]) -> f64 {
    CostModel::default().toll_cost(path)
}
