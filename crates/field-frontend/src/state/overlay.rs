//! Render snapshot for the map surface
//!
//! Everything here is in display order; the map surface never sees
//! canonical points.

use field_core::{Bounds, DisplayPoint, FieldRecord, Ring, RingEditor, RingRole, Sketch};
use glam::DVec2;

/// Highest zoom level offered by the tile source
pub const MAX_ZOOM: u8 = 20;

/// A draggable vertex handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMarker {
    /// Ring the vertex belongs to
    pub role: RingRole,
    /// Index within that ring
    pub index: usize,
    pub position: DisplayPoint,
    /// Whether a delete handle should be shown
    pub deletable: bool,
}

/// A previously saved field, drawn beneath the sketch
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFieldShape {
    pub id: i64,
    pub name: String,
    pub outer: Vec<DisplayPoint>,
    pub holes: Vec<Vec<DisplayPoint>>,
}

impl SavedFieldShape {
    pub fn from_record(record: &FieldRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            outer: display_ring(&record.outer()),
            holes: record.hole_rings().iter().map(display_ring).collect(),
        }
    }
}

/// What the map surface draws: saved fields and the current sketch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapOverlay {
    /// Saved fields, in list order
    pub saved_fields: Vec<SavedFieldShape>,
    /// Outer ring; the renderer closes it
    pub outer: Vec<DisplayPoint>,
    /// Draw the outer ring as a filled polygon (three or more points)
    pub fill_outer: bool,
    pub holes: Vec<Vec<DisplayPoint>>,
    pub in_progress_hole: Option<Vec<DisplayPoint>>,
    /// Handles for the ring currently being edited
    pub markers: Vec<VertexMarker>,
    /// Extent of the sketch, canonical order
    pub bounds: Option<Bounds>,
}

fn display_ring(ring: &Ring) -> Vec<DisplayPoint> {
    ring.points().iter().map(|p| p.to_display()).collect()
}

fn markers(role: RingRole, editor: &RingEditor) -> Vec<VertexMarker> {
    let deletable = editor.is_deletable();
    editor
        .ring()
        .points()
        .iter()
        .enumerate()
        .map(|(index, p)| VertexMarker {
            role,
            index,
            position: p.to_display(),
            deletable,
        })
        .collect()
}

impl MapOverlay {
    /// Build the overlay for a sketch
    ///
    /// Only the active ring gets vertex markers: while a hole is being drawn
    /// the outer ring's handles are hidden.
    pub fn from_sketch(sketch: &Sketch) -> Self {
        let role = sketch.active_role();
        Self {
            outer: display_ring(sketch.outer().ring()),
            fill_outer: sketch.outer().is_complete(),
            holes: sketch.holes().iter().map(display_ring).collect(),
            in_progress_hole: sketch.in_progress_hole().map(|hole| display_ring(hole.ring())),
            markers: markers(role, sketch.active()),
            bounds: sketch.bounds(),
            ..Self::default()
        }
    }

    /// Add a layer for saved fields; records with fewer than three points are skipped
    pub fn with_saved_fields(mut self, fields: &[FieldRecord]) -> Self {
        self.saved_fields = fields
            .iter()
            .filter(|record| record.outer().is_complete())
            .map(SavedFieldShape::from_record)
            .collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.saved_fields.is_empty()
            && self.outer.is_empty()
            && self.holes.is_empty()
            && self.in_progress_hole.is_none()
    }

    /// Center of the drawn shape, for framing the map
    pub fn fit_center(&self) -> Option<DisplayPoint> {
        self.bounds.map(|b| b.center().to_display())
    }

    /// Zoom level at which the drawn shape fits a 256px tile
    pub fn fit_zoom(&self) -> Option<u8> {
        let bounds = self.bounds?;
        let span: DVec2 = bounds.max - bounds.min;
        // Longitude span scales as 360 / 2^z; latitude treated the same at parcel scale
        let extent = span.max_element();
        if extent <= 0.0 || !extent.is_finite() {
            return Some(MAX_ZOOM);
        }
        let zoom = (360.0 / extent).log2().floor();
        Some(zoom.clamp(0.0, MAX_ZOOM as f64) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use field_core::Point;

    fn sketch(outer: &[[f64; 2]]) -> Sketch {
        let mut sketch = Sketch::new();
        for &c in outer {
            sketch.outer_mut().append(Point::from(c));
        }
        sketch
    }

    #[test]
    fn test_outer_in_display_order() {
        let overlay = MapOverlay::from_sketch(&sketch(&[[37.0, 55.0], [37.1, 55.0]]));
        assert_eq!(overlay.outer[0], DisplayPoint::new(55.0, 37.0));
        assert!(!overlay.fill_outer);
        assert_eq!(overlay.markers.len(), 2);
        assert!(overlay.markers.iter().all(|m| m.role == RingRole::Outer && !m.deletable));
    }

    #[test]
    fn test_markers_deletable_above_three() {
        let overlay = MapOverlay::from_sketch(&sketch(&[
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ]));
        assert!(overlay.fill_outer);
        assert!(overlay.markers.iter().all(|m| m.deletable));
        assert_eq!(overlay.markers[3].index, 3);
    }

    #[test]
    fn test_hole_markers_replace_outer_markers() {
        let mut s = sketch(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        s.begin_hole();
        s.active_mut().append(Point::new(0.5, 0.25));

        let overlay = MapOverlay::from_sketch(&s);
        assert_eq!(overlay.markers.len(), 1);
        assert_eq!(overlay.markers[0].role, RingRole::Hole);
        assert_eq!(overlay.markers[0].position, DisplayPoint::new(0.25, 0.5));
        assert_eq!(overlay.in_progress_hole.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_saved_fields_layer() {
        let square = vec![
            Point::new(37.0, 55.0),
            Point::new(37.1, 55.0),
            Point::new(37.1, 55.1),
            Point::new(37.0, 55.1),
        ];
        let pond = vec![
            Point::new(37.02, 55.02),
            Point::new(37.04, 55.02),
            Point::new(37.04, 55.04),
        ];
        let record = |id: i64, coordinates: Vec<Point>, holes: Option<Vec<Vec<Point>>>| {
            FieldRecord {
                id,
                name: format!("Field {}", id),
                crop_type: None,
                status: None,
                area_hectares: 1.0,
                coordinates,
                holes,
                created_at: None,
            }
        };
        let fields = vec![
            record(1, square.clone(), Some(vec![pond])),
            record(2, square[..2].to_vec(), None),
        ];

        let overlay = MapOverlay::default().with_saved_fields(&fields);
        assert!(!overlay.is_empty());
        assert_eq!(overlay.saved_fields.len(), 1);
        let shape = &overlay.saved_fields[0];
        assert_eq!(shape.id, 1);
        assert_eq!(shape.outer[1], DisplayPoint::new(55.0, 37.1));
        assert_eq!(shape.holes.len(), 1);
        assert_eq!(shape.holes[0][0], DisplayPoint::new(55.02, 37.02));
        assert!(overlay.markers.is_empty());
        assert_eq!(overlay.bounds, None);
    }

    #[test]
    fn test_fit_view() {
        let overlay = MapOverlay::from_sketch(&sketch(&[
            [37.0, 55.0],
            [37.01, 55.0],
            [37.01, 55.01],
        ]));
        let center = overlay.fit_center().unwrap();
        assert_relative_eq!(center.lat, 55.005, max_relative = 1e-12);
        assert_relative_eq!(center.lng, 37.005, max_relative = 1e-12);
        assert_eq!(overlay.fit_zoom(), Some(15));

        assert_eq!(MapOverlay::default().fit_zoom(), None);
        let single = MapOverlay::from_sketch(&sketch(&[[37.0, 55.0]]));
        assert_eq!(single.fit_zoom(), Some(MAX_ZOOM));
    }
}
