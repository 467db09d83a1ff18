//! dispatch-router core
//!
//! Route computation, pricing, multi-stop ordering and progress tracking for
//! delivery dispatch. Mapping providers, traffic data and persistence are
//! pluggable through the traits in [`traits`].

pub mod config;
pub mod cost;
pub mod engine;
pub mod error;
pub mod haversine;
pub mod mapbox;
pub mod model;
pub mod osrm;
pub mod polyline;
pub mod store;
pub mod tour;
pub mod traffic;
pub mod traits;

pub use config::EngineConfig;
pub use engine::RouteEngine;
pub use error::{DispatchError, ProviderError};
