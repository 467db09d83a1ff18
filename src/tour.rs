//! Multi-stop tour construction.
//!
//! Nearest neighbor is a greedy O(n²) heuristic, not an exact TSP solver.
//! Callers go through [`TourPlanner`] so a better solver can replace it.

use crate::haversine::distance_km;
use crate::model::Waypoint;
use crate::traits::TourPlanner;

#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl TourPlanner for NearestNeighbor {
    fn order_stops(&self, origin: &Waypoint, stops: &[Waypoint]) -> Vec<Waypoint> {
        let mut remaining: Vec<&Waypoint> = stops.iter().collect();
        let mut ordered = Vec::with_capacity(stops.len());
        let mut current = origin;

        while !remaining.is_empty() {
            // Strict comparison keeps the first stop on ties.
            let mut best = 0;
            let mut best_dist = distance_km(current, remaining[0]);
            for (index, stop) in remaining.iter().enumerate().skip(1) {
                let dist = distance_km(current, stop);
                if dist < best_dist {
                    best = index;
                    best_dist = dist;
                }
            }

            current = remaining.remove(best);
            ordered.push(current.clone());
        }

        ordered
    }
}

/// Length of the tour `origin -> order[0] -> ... -> order[n-1]`.
pub fn tour_length_km(origin: &Waypoint, order: &[Waypoint]) -> f64 {
    let mut current = origin;
    let mut total = 0.0;
    for stop in order {
        total += distance_km(current, stop);
        current = stop;
    }
    total
}
