//! Geographic points and coordinate order conversion
//!
//! Geometry and storage work in canonical `[longitude, latitude]` order
//! (GeoJSON). The map surface identifies points in `[latitude, longitude]`
//! order. The conversions in this module are the only place the two meet.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A geographic point in canonical order, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl Point {
    /// Create a point from longitude and latitude
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Check that both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Convert to map display order
    pub fn to_display(self) -> DisplayPoint {
        DisplayPoint {
            lat: self.lat,
            lng: self.lon,
        }
    }

    /// As a vector with x = longitude, y = latitude
    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.lon, self.lat)
    }
}

impl From<[f64; 2]> for Point {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.lon, p.lat]
    }
}

/// A point in the order used by the map surface (latitude first)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct DisplayPoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl DisplayPoint {
    /// Create a display point from latitude and longitude
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Convert to canonical order
    pub fn to_canonical(self) -> Point {
        Point {
            lon: self.lng,
            lat: self.lat,
        }
    }
}

impl From<[f64; 2]> for DisplayPoint {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<DisplayPoint> for [f64; 2] {
    fn from(p: DisplayPoint) -> Self {
        [p.lat, p.lng]
    }
}

impl From<Point> for DisplayPoint {
    fn from(p: Point) -> Self {
        p.to_display()
    }
}

impl From<DisplayPoint> for Point {
    fn from(d: DisplayPoint) -> Self {
        d.to_canonical()
    }
}

/// Convert a canonical point to display order
pub fn to_display(p: Point) -> DisplayPoint {
    p.to_display()
}

/// Convert a display point to canonical order
pub fn to_canonical(d: DisplayPoint) -> Point {
    d.to_canonical()
}
