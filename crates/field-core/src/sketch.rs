//! Field sketch: an outer boundary with excluded holes

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geodesy::net_area;
use crate::ring::{Bounds, Ring, RingEditor};

/// Role of a ring within a sketch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingRole {
    /// The boundary defining the field's total extent
    Outer,
    /// An excluded sub-area (pond, building, ...)
    Hole,
}

/// A ring borrowed together with its role
#[derive(Debug, Clone, Copy)]
pub struct TaggedRing<'a> {
    pub role: RingRole,
    pub ring: &'a Ring,
}

/// A live editing session over one field shape
///
/// Owns every ring exclusively. At most one hole is under construction.
#[derive(Debug, Clone)]
pub struct Sketch {
    /// Session identifier, used to correlate log output
    pub id: Uuid,
    outer: RingEditor,
    holes: Vec<Ring>,
    in_progress_hole: Option<RingEditor>,
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new()
    }
}

impl Sketch {
    /// Create an empty sketch
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            outer: RingEditor::new(),
            holes: Vec::new(),
            in_progress_hole: None,
        }
    }

    // ============== Outer Ring ==============

    pub fn outer(&self) -> &RingEditor {
        &self.outer
    }

    pub fn outer_mut(&mut self) -> &mut RingEditor {
        &mut self.outer
    }

    // ============== Holes ==============

    /// Completed holes, in the order they were finished
    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    pub fn in_progress_hole(&self) -> Option<&RingEditor> {
        self.in_progress_hole.as_ref()
    }

    pub fn in_progress_hole_mut(&mut self) -> Option<&mut RingEditor> {
        self.in_progress_hole.as_mut()
    }

    /// Begin a new hole, replacing any hole already in progress
    pub fn begin_hole(&mut self) {
        self.in_progress_hole = Some(RingEditor::new());
    }

    /// Move the in-progress hole to the completed list
    ///
    /// Returns false and leaves the sketch untouched if there is no hole in
    /// progress or it has fewer than three points.
    pub fn finish_hole(&mut self) -> bool {
        match self.in_progress_hole.take() {
            Some(hole) if hole.is_complete() => {
                tracing::debug!(
                    "Sketch {}: hole {} closed with {} points",
                    self.id,
                    self.holes.len(),
                    hole.len()
                );
                self.holes.push(hole.into_ring());
                true
            }
            other => {
                self.in_progress_hole = other;
                false
            }
        }
    }

    /// Drop the in-progress hole, if any
    pub fn discard_hole(&mut self) -> Option<RingEditor> {
        self.in_progress_hole.take()
    }

    // ============== Active Ring ==============

    /// Role of the ring that receives clicks and vertex edits
    pub fn active_role(&self) -> RingRole {
        if self.in_progress_hole.is_some() {
            RingRole::Hole
        } else {
            RingRole::Outer
        }
    }

    /// The ring that receives clicks and vertex edits
    pub fn active_mut(&mut self) -> &mut RingEditor {
        match self.in_progress_hole.as_mut() {
            Some(hole) => hole,
            None => &mut self.outer,
        }
    }

    pub fn active(&self) -> &RingEditor {
        self.in_progress_hole.as_ref().unwrap_or(&self.outer)
    }

    // ============== Derived Values ==============

    /// Outer ring followed by completed holes, tagged by role
    pub fn rings(&self) -> impl Iterator<Item = TaggedRing<'_>> {
        std::iter::once(TaggedRing {
            role: RingRole::Outer,
            ring: self.outer.ring(),
        })
        .chain(self.holes.iter().map(|ring| TaggedRing {
            role: RingRole::Hole,
            ring,
        }))
    }

    /// Net area of the committed shape in hectares (completed holes only)
    pub fn committed_area(&self) -> f64 {
        net_area(self.outer.ring(), &self.holes)
    }

    /// Net area for live feedback in hectares
    ///
    /// The in-progress hole is subtracted as soon as it has three points.
    pub fn live_area(&self) -> f64 {
        let provisional = self
            .in_progress_hole
            .as_ref()
            .filter(|hole| hole.is_complete())
            .map(|hole| hole.ring());
        net_area(self.outer.ring(), self.holes.iter().chain(provisional))
    }

    /// Bounding box over every ring, including the in-progress hole
    pub fn bounds(&self) -> Option<Bounds> {
        self.rings()
            .map(|tagged| tagged.ring)
            .chain(self.in_progress_hole.as_ref().map(|hole| hole.ring()))
            .filter_map(Ring::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Check if nothing has been drawn yet
    pub fn is_empty(&self) -> bool {
        self.outer.is_empty() && self.holes.is_empty() && self.in_progress_hole.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::ring::RingError;
    use approx::assert_relative_eq;

    fn fill(editor: &mut RingEditor, coords: &[[f64; 2]]) {
        for &c in coords {
            editor.append(Point::from(c));
        }
    }

    const OUTER: [[f64; 2]; 4] = [[0.0, 0.0], [0.01, 0.0], [0.01, 0.01], [0.0, 0.01]];
    const HOLE: [[f64; 2]; 3] = [[0.002, 0.002], [0.004, 0.002], [0.004, 0.004]];

    #[test]
    fn test_active_ring_follows_hole() {
        let mut sketch = Sketch::new();
        assert_eq!(sketch.active_role(), RingRole::Outer);

        fill(sketch.active_mut(), &OUTER);
        sketch.begin_hole();
        assert_eq!(sketch.active_role(), RingRole::Hole);

        fill(sketch.active_mut(), &HOLE[..1]);
        assert_eq!(sketch.outer().len(), 4);
        assert_eq!(sketch.in_progress_hole().map(RingEditor::len), Some(1));
    }

    #[test]
    fn test_finish_hole_requires_complete() {
        let mut sketch = Sketch::new();
        fill(sketch.outer_mut(), &OUTER);
        sketch.begin_hole();
        fill(sketch.active_mut(), &HOLE[..2]);

        assert!(!sketch.finish_hole());
        assert!(sketch.in_progress_hole().is_some());
        assert!(sketch.holes().is_empty());

        fill(sketch.active_mut(), &HOLE[2..]);
        assert!(sketch.finish_hole());
        assert!(sketch.in_progress_hole().is_none());
        assert_eq!(sketch.holes().len(), 1);
    }

    #[test]
    fn test_live_area_includes_complete_in_progress_hole() {
        let mut sketch = Sketch::new();
        fill(sketch.outer_mut(), &OUTER);
        let full = sketch.live_area();

        sketch.begin_hole();
        fill(sketch.active_mut(), &HOLE[..2]);
        assert_eq!(sketch.live_area(), full);

        fill(sketch.active_mut(), &HOLE[2..]);
        assert!(sketch.live_area() < full);
        assert_eq!(sketch.committed_area(), full);

        assert!(sketch.finish_hole());
        assert_relative_eq!(sketch.committed_area(), sketch.live_area());
    }

    #[test]
    fn test_rings_are_tagged() {
        let mut sketch = Sketch::new();
        fill(sketch.outer_mut(), &OUTER);
        sketch.begin_hole();
        fill(sketch.active_mut(), &HOLE);
        sketch.finish_hole();

        let roles: Vec<RingRole> = sketch.rings().map(|t| t.role).collect();
        assert_eq!(roles, vec![RingRole::Outer, RingRole::Hole]);
    }

    #[test]
    fn test_bounds_cover_all_rings() {
        let mut sketch = Sketch::new();
        assert!(sketch.bounds().is_none());

        fill(sketch.outer_mut(), &OUTER);
        sketch.begin_hole();
        fill(sketch.active_mut(), &[[0.02, -0.01]]);

        let bounds = sketch.bounds().unwrap();
        assert_eq!(bounds.min.x, 0.0);
        assert_eq!(bounds.min.y, -0.01);
        assert_eq!(bounds.max.x, 0.02);
        assert_eq!(bounds.max.y, 0.01);
    }

    #[test]
    fn test_active_edit_errors_propagate() {
        let mut sketch = Sketch::new();
        let err = sketch.active_mut().delete_vertex(0).unwrap_err();
        assert_eq!(err, RingError::BelowMinimumVertices { len: 0 });
    }
}
