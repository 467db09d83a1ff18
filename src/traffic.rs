//! Synthetic traffic signal.
//!
//! [`RandomTraffic`] is a stand-in for a real traffic feed, random and only
//! meant for demos and as a default. Deployments plug a real
//! source in through [`TrafficSource`].

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{Segment, TrafficCondition, TrafficLevel, Waypoint};
use crate::traits::TrafficSource;

const HEAVY_PROBABILITY: f64 = 0.3;
const MIN_HEAVY_DELAY_MIN: f64 = 5.0;
const MAX_HEAVY_DELAY_MIN: f64 = 20.0;

/// Segments between consecutive path points.
pub fn segments(path: &[Waypoint]) -> Vec<Segment> {
    path.windows(2)
        .map(|pair| Segment {
            start: pair[0].clone(),
            end: pair[1].clone(),
        })
        .collect()
}

pub fn total_delay_min(conditions: &[TrafficCondition]) -> f64 {
    conditions.iter().map(|condition| condition.delay_min).sum()
}

#[derive(Debug)]
pub struct RandomTraffic {
    rng: Mutex<StdRng>,
    heavy_probability: f64,
}

impl Default for RandomTraffic {
    fn default() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }
}

impl RandomTraffic {
    /// Reproducible generator for demos and tests.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            heavy_probability: HEAVY_PROBABILITY,
        }
    }

    /// Clamped to [0, 1]; NaN counts as 0.
    pub fn with_heavy_probability(mut self, probability: f64) -> Self {
        self.heavy_probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }
}

impl TrafficSource for RandomTraffic {
    fn sample(&self, path: &[Waypoint]) -> Vec<TrafficCondition> {
        let mut rng = self.rng.lock();
        segments(path)
            .into_iter()
            .map(|segment| {
                if rng.random_bool(self.heavy_probability) {
                    TrafficCondition {
                        segment,
                        condition: TrafficLevel::Heavy,
                        delay_min: rng.random_range(MIN_HEAVY_DELAY_MIN..MAX_HEAVY_DELAY_MIN),
                    }
                } else {
                    TrafficCondition {
                        segment,
                        condition: TrafficLevel::Light,
                        delay_min: 0.0,
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> Vec<Waypoint> {
        (0..n).map(|i| Waypoint::new(36.0, -115.0 + i as f64 * 0.01)).collect()
    }

    #[test]
    fn test_one_condition_per_segment() {
        let traffic = RandomTraffic::default();
        assert_eq!(traffic.sample(&path(5)).len(), 4);
        assert!(traffic.sample(&path(1)).is_empty());
        assert!(traffic.sample(&[]).is_empty());
    }

    #[test]
    fn test_segments_follow_path() {
        let points = path(3);
        let conditions = RandomTraffic::seeded(7).sample(&points);
        assert_eq!(conditions[0].segment.start, points[0]);
        assert_eq!(conditions[0].segment.end, points[1]);
        assert_eq!(conditions[1].segment.start, points[1]);
        assert_eq!(conditions[1].segment.end, points[2]);
    }

    #[test]
    fn test_levels_and_delays() {
        let conditions = RandomTraffic::seeded(42).sample(&path(200));
        for condition in &conditions {
            match condition.condition {
                TrafficLevel::Heavy => {
                    assert!(condition.delay_min >= MIN_HEAVY_DELAY_MIN);
                    assert!(condition.delay_min < MAX_HEAVY_DELAY_MIN);
                }
                TrafficLevel::Light => assert_eq!(condition.delay_min, 0.0),
                other => panic!("unexpected level {other:?}"),
            }
        }
    }

    #[test]
    fn test_probability_extremes() {
        let all_light = RandomTraffic::seeded(1).with_heavy_probability(0.0).sample(&path(20));
        assert!(all_light.iter().all(|c| c.condition == TrafficLevel::Light));
        assert_eq!(total_delay_min(&all_light), 0.0);

        let all_heavy = RandomTraffic::seeded(1).with_heavy_probability(1.0).sample(&path(20));
        assert!(all_heavy.iter().all(|c| c.condition == TrafficLevel::Heavy));
        assert!(total_delay_min(&all_heavy) >= 19.0 * MIN_HEAVY_DELAY_MIN);
    }

    #[test]
    fn test_nan_probability_is_light() {
        let traffic = RandomTraffic::seeded(3).with_heavy_probability(f64::NAN);
        let conditions = traffic.sample(&path(10));
        assert!(conditions.iter().all(|c| c.condition == TrafficLevel::Light));

        let traffic = RandomTraffic::seeded(3).with_heavy_probability(7.0);
        assert!(traffic.sample(&path(10)).iter().all(|c| c.condition == TrafficLevel::Heavy));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = RandomTraffic::seeded(9).sample(&path(30));
        let b = RandomTraffic::seeded(9).sample(&path(30));
        assert_eq!(a, b);
    }
}
