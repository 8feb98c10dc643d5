//! Geofence check: is a coordinate inside the serviceable disk?

use crate::config::ServiceAreaConfig;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Serviceable area: a fixed center coordinate and a maximum distance.
///
/// Built once from config at startup and shared read-only.
#[derive(Debug, Clone, Copy)]
pub struct ServiceArea {
    center_lat: f64,
    center_lng: f64,
    radius_m: f64,
}

impl ServiceArea {
    pub fn new(center_lat: f64, center_lng: f64, radius_m: f64) -> Self {
        Self {
            center_lat,
            center_lng,
            radius_m,
        }
    }

    pub fn from_config(cfg: &ServiceAreaConfig) -> Self {
        Self::new(cfg.latitude, cfg.longitude, cfg.radius_m)
    }

    /// Serviceable iff the great-circle distance to the center does not
    /// exceed the configured radius.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        haversine_m(self.center_lat, self.center_lng, lat, lng) <= self.radius_m
    }
}

/// Great-circle distance between two coordinates, in meters.
pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    // Bengaluru city center, the default reference point
    const CENTER: (f64, f64) = (12.9716, 77.5946);

    fn area() -> ServiceArea {
        ServiceArea::new(CENTER.0, CENTER.1, 30_000.0)
    }

    #[test]
    fn test_center_is_serviceable() {
        assert!(area().contains(CENTER.0, CENTER.1));
    }

    #[test]
    fn test_nearby_point_is_serviceable() {
        // Whitefield, ~15 km from the center
        assert!(area().contains(12.9698, 77.7500));
    }

    #[test]
    fn test_far_point_is_rejected() {
        // Mysuru, ~130 km away
        assert!(!area().contains(12.2958, 76.6394));
        // Chennai, ~290 km away
        assert!(!area().contains(13.0827, 80.2707));
    }

    #[test]
    fn test_haversine_known_distance() {
        // Bengaluru -> Mysuru is roughly 128-132 km
        let d = haversine_m(12.9716, 77.5946, 12.2958, 76.6394);
        assert!((120_000.0..140_000.0).contains(&d), "got {}", d);
    }

    #[test]
    fn test_boundary_uses_configured_radius() {
        // A point ~1 km out is inside a 30 km disk but outside a 500 m disk
        let tight = ServiceArea::new(CENTER.0, CENTER.1, 500.0);
        assert!(area().contains(12.9806, 77.5946));
        assert!(!tight.contains(12.9806, 77.5946));
    }

    #[test]
    fn test_haversine_zero_distance() {
        assert_eq!(haversine_m(10.0, 20.0, 10.0, 20.0), 0.0);
    }
}
