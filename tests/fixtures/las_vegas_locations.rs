//! Real Las Vegas / Henderson locations for dispatch fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use dispatch_router::model::Waypoint;

/// A named location with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn waypoint(&self) -> Waypoint {
        Waypoint::new(self.lat, self.lng).with_address(self.name)
    }
}

// ============================================================================
// Depots (transporter start locations)
// ============================================================================

pub const WYNN: Location = Location::new("Wynn Las Vegas", 36.1263781, -115.1658180);
pub const MGM_GRAND: Location = Location::new("MGM Grand", 36.1023654, -115.1688720);

// ============================================================================
// Drop-offs along the Strip, north to south
// ============================================================================

pub const STRIP_DROPOFFS: &[Location] = &[
    Location::new("Sinatra", 36.1300035, -115.1654850),
    Location::new("Public House", 36.1219193, -115.1689317),
    Location::new("Yard House", 36.1177147, -115.1691992),
    Location::new("Gordon Ramsay Steak", 36.1127744, -115.1712029),
    Location::new("Hard Rock Cafe", 36.1041592, -115.1722166),
];

// ============================================================================
// Outlying drop-offs
// ============================================================================

pub const HENDERSON: Location = Location::new("Green Valley Ranch Area", 36.0308, -115.0825);
pub const NORTH_VEGAS: Location = Location::new("Roberto's Taco Shop", 36.1452953, -115.0478347);
pub const SOUTH_STRIP: Location = Location::new("Bootlegger Bistro", 36.0492047, -115.1715744);
