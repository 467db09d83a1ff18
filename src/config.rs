//! Engine configuration and provider selection.
//!
//! Providers are enabled by the presence of their credentials. Missing
//! credentials select the straight-line fallback; they are never an error.

use tracing::debug;

use crate::error::ConfigError;
use crate::haversine::StraightLine;
use crate::mapbox::{MapboxClient, MapboxConfig};
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::traits::RouteProvider;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub mapbox: Option<MapboxConfig>,
    pub osrm: Option<OsrmConfig>,
    /// Request timeout for whichever provider is selected. Overrides the
    /// provider configs' own `timeout_secs`.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mapbox: None,
            osrm: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout_secs = match get("ROUTING_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ROUTING_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let mapbox = match get("MAPBOX_ACCESS_TOKEN") {
            Some(token) => {
                let mut config = MapboxConfig::new(token);
                config.timeout_secs = timeout_secs;
                if let Some(base_url) = get("MAPBOX_BASE_URL") {
                    config.base_url = base_url;
                }
                if let Some(value) = get("MAPBOX_TRAFFIC") {
                    config.traffic = parse_bool(&value).ok_or(ConfigError::InvalidValue {
                        key: "MAPBOX_TRAFFIC",
                        value,
                    })?;
                }
                Some(config)
            }
            None => None,
        };

        let osrm = get("OSRM_BASE_URL").map(|base_url| OsrmConfig {
            base_url,
            profile: get("OSRM_PROFILE").unwrap_or_else(|| OsrmConfig::default().profile),
            timeout_secs,
        });

        Ok(Self {
            mapbox,
            osrm,
            timeout_secs,
        })
    }

    fn mapbox_config(&self) -> Option<MapboxConfig> {
        self.mapbox.clone().map(|mut config| {
            config.timeout_secs = self.timeout_secs;
            config
        })
    }

    fn osrm_config(&self) -> Option<OsrmConfig> {
        self.osrm.clone().map(|mut config| {
            config.timeout_secs = self.timeout_secs;
            config
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Pick the route provider: Mapbox, then OSRM, then straight line.
pub fn select_provider(config: &EngineConfig) -> Result<Box<dyn RouteProvider + Send + Sync>, ConfigError> {
    let provider: Box<dyn RouteProvider + Send + Sync> = if let Some(mapbox) = config.mapbox_config() {
        Box::new(MapboxClient::new(mapbox)?)
    } else if let Some(osrm) = config.osrm_config() {
        Box::new(OsrmClient::new(osrm)?)
    } else {
        Box::new(StraightLine::default())
    };

    debug!(provider = provider.name(), "selected route provider");
    Ok(provider)
}
