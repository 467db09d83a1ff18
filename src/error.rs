//! Error kinds surfaced by providers and the engine.

use thiserror::Error;

use crate::model::{OrderId, RouteId, RouteStatus, TransporterId};
use crate::polyline::DecodeError;

/// Failure of an external path-finding call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("{provider} did not answer within {secs}s")]
    Timeout { provider: &'static str, secs: u64 },

    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No route found ({code}): {message}")]
    NoRoute { code: String, message: String },

    #[error("Invalid geometry: {0}")]
    Geometry(#[from] DecodeError),

    #[error("Provider returned an empty geometry")]
    EmptyGeometry,

    #[error("Geometry vertex out of range: ({latitude}, {longitude})")]
    CoordinateOutOfRange { latitude: f64, longitude: f64 },
}

impl ProviderError {
    /// Classify a transport error, separating timeouts from other failures.
    pub(crate) fn from_transport(err: reqwest::Error, provider: &'static str, secs: u64) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout { provider, secs }
        } else {
            ProviderError::Request(err)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Route,
    Order,
    Transporter,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EntityKind::Route => "route",
            EntityKind::Order => "order",
            EntityKind::Transporter => "transporter",
        })
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("route computation failed: {0}")]
    RouteComputation(#[source] ProviderError),

    #[error("no known location for transporter {0}")]
    LocationUnavailable(TransporterId),

    #[error("order {0} already has a route")]
    DuplicateRoute(OrderId),

    #[error("cannot move route from {from} to {to}")]
    InvalidTransition { from: RouteStatus, to: RouteStatus },

    #[error("route {0} has no remaining waypoints")]
    RouteAlreadyComplete(RouteId),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("multi-stop optimization needs at least 2 stops, got {0}")]
    InsufficientStops(usize),
}

impl DispatchError {
    pub(crate) fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        DispatchError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

pub type Result<T, E = DispatchError> = std::result::Result<T, E>;
