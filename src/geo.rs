const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        haversine_meters(self.lat, self.lon, other.lat, other.lon)
    }

    /// Coordinate-wise midpoint. Good enough at city scale.
    pub fn midpoint(&self, other: &GeoPoint) -> GeoPoint {
        self.lerp(other, 0.5)
    }

    /// Point a fraction `t` of the way from `self` to `other`, linear in degrees.
    pub fn lerp(&self, other: &GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }
}

/// Great-circle distance using the haversine formula.
/// Input lat/lon in degrees. Output in meters.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Upper bound, in degrees, of a `radius_m` circle around `center` measured along
/// either axis. Used to size bounding-box queries before exact filtering.
pub fn radius_in_degrees(center: &GeoPoint, radius_m: f64) -> f64 {
    let lat_deg = (radius_m / EARTH_RADIUS_M).to_degrees();
    // Longitude degrees shrink with cos(lat); clamp to avoid blowing up at the poles.
    let cos_lat = center.lat.to_radians().cos().max(0.01);
    lat_deg / cos_lat
}
