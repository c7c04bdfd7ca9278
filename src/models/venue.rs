//! Venue model.
//!
//! Venues are the bookable rooms, halls and grounds an event can be held
//! in. Each venue has a seating capacity and, when its map link can be
//! parsed, a geographic location used for distance-weighted scoring.
//!
//! # Map Links
//! Locations are recovered from the map links administrators paste in.
//! Recognised forms:
//! - `https://www.google.com/maps/place/Hall/@27.6887,85.2897,17z`
//! - `https://maps.google.com/?q=27.6887,85.2897`
//! - `ll=`, `query=`, `destination=` and `center=` query parameters
//!
//! Anything else leaves the location unset.

use serde::{Deserialize, Serialize};

/// Mean Earth radius (km).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Query parameters that carry a `lat,lon` pair.
const COORDINATE_PARAMS: [&str; 5] = ["q", "ll", "query", "destination", "center"];

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude (degrees, -90..=90).
    pub latitude: f64,
    /// Longitude (degrees, -180..=180).
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Extracts a location from a map link.
    ///
    /// Tries the `@lat,lon` path segment first, then the coordinate
    /// query parameters. Returns `None` if neither yields a valid pair.
    pub fn from_map_link(link: &str) -> Option<Self> {
        let link = link.trim();
        if link.is_empty() {
            return None;
        }

        if let Some(at) = link.find('@') {
            if let Some(point) = parse_pair(&link[at + 1..]) {
                return Some(point);
            }
        }

        let query = link.split_once('?').map(|(_, q)| q)?;
        let query = query.split('#').next().unwrap_or(query);
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .filter(|(key, _)| COORDINATE_PARAMS.contains(key))
            .find_map(|(_, value)| parse_pair(&value.replace("%2C", ",").replace("%2c", ",")))
    }

    /// Great-circle distance to another point (km), haversine formula.
    pub fn distance_km(&self, other: &Self) -> f64 {
        let (lat1, lon1) = (self.latitude.to_radians(), self.longitude.to_radians());
        let (lat2, lon2) = (other.latitude.to_radians(), other.longitude.to_radians());
        let dlat = lat2 - lat1;
        let dlon = lon2 - lon1;
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// Parses a leading `lat,lon` pair, ignoring any trailing `,zoom` or path.
fn parse_pair(text: &str) -> Option<GeoPoint> {
    let text = text.split(['/', '&', '#']).next().unwrap_or(text);
    let mut parts = text.split(',');
    let latitude = parts.next()?.trim().parse::<f64>().ok()?;
    let longitude = parts.next()?.trim().parse::<f64>().ok()?;
    GeoPoint::new(latitude, longitude)
}

/// A bookable venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    /// Unique venue identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Number of attendees the venue can hold.
    pub capacity: u32,
    /// Map link as entered by an administrator.
    pub map_link: Option<String>,
    /// Location parsed from `map_link`.
    pub location: Option<GeoPoint>,
}

impl Venue {
    /// Creates a venue with the given capacity.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            address: String::new(),
            capacity,
            map_link: None,
            location: None,
        }
    }

    /// Sets the venue name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the street address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets the map link and derives the location from it.
    ///
    /// An unparsable link is kept but leaves `location` unset.
    pub fn with_map_link(mut self, link: impl Into<String>) -> Self {
        let link = link.into();
        self.location = GeoPoint::from_map_link(&link);
        self.map_link = Some(link);
        self
    }

    /// Sets the location directly.
    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    /// Whether the venue can seat `attendees`.
    #[inline]
    pub fn fits(&self, attendees: u32) -> bool {
        self.capacity >= attendees
    }

    /// Seats left empty when hosting `attendees` (0 if it does not fit).
    #[inline]
    pub fn spare_capacity(&self, attendees: u32) -> u32 {
        self.capacity.saturating_sub(attendees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_builder() {
        let v = Venue::new("V1", 120)
            .with_name("Main Hall")
            .with_address("Kalanki, Kathmandu")
            .with_map_link("https://www.google.com/maps/place/Hall/@27.6887,85.2897,17z");

        assert_eq!(v.id, "V1");
        assert_eq!(v.name, "Main Hall");
        assert_eq!(v.capacity, 120);
        let loc = v.location.unwrap();
        assert!((loc.latitude - 27.6887).abs() < 1e-10);
        assert!((loc.longitude - 85.2897).abs() < 1e-10);
    }

    #[test]
    fn test_fits_and_spare_capacity() {
        let v = Venue::new("V1", 50);
        assert!(v.fits(50));
        assert!(v.fits(0));
        assert!(!v.fits(51));
        assert_eq!(v.spare_capacity(40), 10);
        assert_eq!(v.spare_capacity(60), 0);
    }

    #[test]
    fn test_parse_query_link() {
        let p = GeoPoint::from_map_link("https://maps.google.com/?q=27.70,85.32").unwrap();
        assert!((p.latitude - 27.70).abs() < 1e-10);
        assert!((p.longitude - 85.32).abs() < 1e-10);

        let p = GeoPoint::from_map_link("https://maps.example.com/view?z=3&ll=-33.86%2C151.21")
            .unwrap();
        assert!((p.latitude + 33.86).abs() < 1e-10);
        assert!((p.longitude - 151.21).abs() < 1e-10);
    }

    #[test]
    fn test_unparsable_link_leaves_location_unset() {
        let v = Venue::new("V1", 10).with_map_link("https://goo.gl/maps/abc123");
        assert!(v.location.is_none());
        assert_eq!(v.map_link.as_deref(), Some("https://goo.gl/maps/abc123"));

        assert!(GeoPoint::from_map_link("").is_none());
        assert!(GeoPoint::from_map_link("https://maps.google.com/?q=Kathmandu").is_none());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(GeoPoint::from_map_link("https://maps.google.com/@95.0,85.0,17z").is_none());
        assert!(GeoPoint::new(10.0, 181.0).is_none());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn test_distance_km() {
        let a = GeoPoint::new(27.6887106, 85.2897808).unwrap();
        assert!(a.distance_km(&a).abs() < 1e-9);

        // One degree of latitude is ~111.2 km
        let b = GeoPoint::new(28.6887106, 85.2897808).unwrap();
        let d = a.distance_km(&b);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
        assert!((b.distance_km(&a) - d).abs() < 1e-9);
    }
}
