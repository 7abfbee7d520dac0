//! Rings and ring editing
//!
//! A ring is an open sequence of points; the closing edge from the last
//! point back to the first is implicit and never stored.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::point::Point;

/// Minimum number of vertices for a ring to describe a polygon
pub const MIN_RING_VERTICES: usize = 3;

/// Ring editing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    #[error("Cannot delete a vertex from a ring of {len} points (minimum is 3)")]
    BelowMinimumVertices { len: usize },

    #[error("Vertex index {index} out of range (ring has {len} points)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Axis-aligned bounding box in canonical order (x = lon, y = lat)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Center of the box
    pub fn center(&self) -> Point {
        let c = (self.min + self.max) * 0.5;
        Point::new(c.x, c.y)
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// An ordered, open sequence of geographic points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Create an empty ring
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ring from points
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Vertices in order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A ring is complete once it has enough points to enclose an area
    pub fn is_complete(&self) -> bool {
        self.points.len() >= MIN_RING_VERTICES
    }

    /// Iterate over edges `(i, i + 1 mod n)`, including the implicit closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Bounding box of the ring, if it has any points
    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.points.iter().map(|p| p.as_dvec2());
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Bounds { min, max })
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl From<Vec<Point>> for Ring {
    fn from(points: Vec<Point>) -> Self {
        Self::from_points(points)
    }
}

/// Owns one ring and exposes the edits allowed on it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingEditor {
    ring: Ring,
}

impl RingEditor {
    /// Create an editor over an empty ring
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor over an existing ring
    pub fn from_ring(ring: Ring) -> Self {
        Self { ring }
    }

    /// Add a point as the new last vertex
    pub fn append(&mut self, p: Point) {
        self.ring.points.push(p);
    }

    /// Replace the point at `index`
    pub fn move_vertex(&mut self, index: usize, p: Point) -> Result<(), RingError> {
        let len = self.ring.len();
        let slot = self
            .ring
            .points
            .get_mut(index)
            .ok_or(RingError::IndexOutOfRange { index, len })?;
        *slot = p;
        Ok(())
    }

    /// Remove the point at `index`
    ///
    /// Deletion is only permitted while the ring has more than three points,
    /// so an edited polygon can never drop below a triangle. The size check
    /// comes first: on a ring of three or fewer points any index, valid or
    /// not, yields `BelowMinimumVertices`.
    pub fn delete_vertex(&mut self, index: usize) -> Result<Point, RingError> {
        let len = self.ring.len();
        if len <= MIN_RING_VERTICES {
            return Err(RingError::BelowMinimumVertices { len });
        }
        if index >= len {
            return Err(RingError::IndexOutOfRange { index, len });
        }
        Ok(self.ring.points.remove(index))
    }

    /// Remove every point
    pub fn reset(&mut self) {
        self.ring.points.clear();
    }

    pub fn is_complete(&self) -> bool {
        self.ring.is_complete()
    }

    /// Whether a vertex may currently be deleted
    pub fn is_deletable(&self) -> bool {
        self.ring.len() > MIN_RING_VERTICES
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn into_ring(self) -> Ring {
        self.ring
    }
}
