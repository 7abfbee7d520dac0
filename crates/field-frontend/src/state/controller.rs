//! Field sketch controller
//!
//! The state machine behind field drawing. It owns the sketch, routes map
//! input to the ring being edited, recomputes the live area after every
//! command and hands the finished shape to a [`FieldStore`].
//!
//! ```text
//! Idle --start_drawing--> Drawing <--start_hole / finish_hole, cancel_hole--> CreatingHole
//!   ^                        |                                                    |
//!   +---- cancel_drawing / successful commit ---------------------------------------+
//! ```

use field_core::{
    DisplayPoint, FieldAttributes, FieldPayload, FieldRecord, RingError, Sketch,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::overlay::MapOverlay;
use crate::persistence::{FieldStore, PersistenceError};

/// Errors returned by sketch commands
#[derive(Debug, Clone, Error)]
pub enum SketchError {
    #[error(transparent)]
    Ring(#[from] RingError),

    #[error("The field boundary needs at least 3 points (has {count})")]
    OuterIncomplete { count: usize },

    #[error("Enter a field name")]
    EmptyName,

    #[error("A save is already in progress")]
    CommitInFlight,

    #[error("No save is in progress")]
    NoCommitInFlight,

    #[error("Failed to save field: {0}")]
    PersistenceFailure(#[from] PersistenceError),
}

/// Editing state: either nothing is being drawn, or a sketch is live
#[derive(Debug, Clone, Default)]
pub enum EditorMode {
    #[default]
    Idle,
    /// A sketch is being edited; a hole may be under construction inside it
    Drawing(Sketch),
}

impl EditorMode {
    /// Get the sketch if one is live
    pub fn sketch(&self) -> Option<&Sketch> {
        match self {
            EditorMode::Drawing(sketch) => Some(sketch),
            EditorMode::Idle => None,
        }
    }

    /// Get the mutable sketch if one is live
    pub fn sketch_mut(&mut self) -> Option<&mut Sketch> {
        match self {
            EditorMode::Drawing(sketch) => Some(sketch),
            EditorMode::Idle => None,
        }
    }
}

/// Read-back tag for the presentation shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchPhase {
    Idle,
    Drawing,
    CreatingHole,
}

impl SketchPhase {
    /// Get the display name of the phase
    pub fn name(&self) -> &'static str {
        match self {
            SketchPhase::Idle => "Idle",
            SketchPhase::Drawing => "Drawing",
            SketchPhase::CreatingHole => "Creating hole",
        }
    }
}

/// The sketch state a save was started from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingCommit {
    session: Uuid,
    revision: u64,
}

/// Drives one field editing session
#[derive(Debug, Clone, Default)]
pub struct FieldSketchController {
    mode: EditorMode,
    live_area: f64,
    /// Bumped by every command that may change the sketch
    revision: u64,
    pending_commit: Option<PendingCommit>,
}

impl FieldSketchController {
    pub fn new() -> Self {
        Self::default()
    }

    // ============== Read-backs ==============

    pub fn phase(&self) -> SketchPhase {
        match &self.mode {
            EditorMode::Idle => SketchPhase::Idle,
            EditorMode::Drawing(sketch) if sketch.in_progress_hole().is_some() => {
                SketchPhase::CreatingHole
            }
            EditorMode::Drawing(_) => SketchPhase::Drawing,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn sketch(&self) -> Option<&Sketch> {
        self.mode.sketch()
    }

    /// Session id of the live sketch
    pub fn session_id(&self) -> Option<Uuid> {
        self.sketch().map(|s| s.id)
    }

    /// True in Drawing and CreatingHole
    pub fn is_drawing(&self) -> bool {
        !matches!(self.mode, EditorMode::Idle)
    }

    pub fn is_creating_hole(&self) -> bool {
        self.phase() == SketchPhase::CreatingHole
    }

    /// Whether the outer ring has enough points to commit or cut holes
    pub fn outer_complete(&self) -> bool {
        self.sketch().is_some_and(|s| s.outer().is_complete())
    }

    /// Whether the hole under construction can be finished
    pub fn hole_complete(&self) -> bool {
        self.sketch()
            .and_then(Sketch::in_progress_hole)
            .is_some_and(|hole| hole.is_complete())
    }

    /// Net area in hectares, provisionally including a complete in-progress hole
    pub fn live_area(&self) -> f64 {
        self.live_area
    }

    /// Number of finished holes
    pub fn holes_count(&self) -> usize {
        self.sketch().map_or(0, |s| s.holes().len())
    }

    pub fn commit_in_flight(&self) -> bool {
        self.pending_commit.is_some()
    }

    /// Render snapshot for the map surface
    pub fn overlay(&self) -> MapOverlay {
        self.sketch().map(MapOverlay::from_sketch).unwrap_or_default()
    }

    /// Guidance line for the current state
    pub fn status_message(&self) -> String {
        match self.phase() {
            SketchPhase::Idle => "Start by outlining the field".to_string(),
            SketchPhase::CreatingHole if self.hole_complete() => {
                format!("Hole ready. Field area: {:.2} ha", self.live_area)
            }
            SketchPhase::CreatingHole => {
                "Mark the boundary of the excluded area (pond, building)".to_string()
            }
            SketchPhase::Drawing if self.outer_complete() => format!(
                "Field ready. Area: {:.2} ha. You can add holes",
                self.live_area
            ),
            SketchPhase::Drawing => "Mark the field corners on the map".to_string(),
        }
    }

    // ============== Commands ==============

    /// Start a new sketch, discarding any previous one
    pub fn start_drawing(&mut self) {
        let sketch = Sketch::new();
        info!("Started drawing field {}", sketch.id);
        self.mode = EditorMode::Drawing(sketch);
        self.recompute();
    }

    /// Append a clicked point to the ring being edited
    ///
    /// Clicks are ignored while idle.
    pub fn click(&mut self, point: DisplayPoint) {
        let Some(sketch) = self.mode.sketch_mut() else {
            debug!("Ignoring map click while idle");
            return;
        };
        let role = sketch.active_role();
        let editor = sketch.active_mut();
        editor.append(point.to_canonical());
        debug!("Added {:?} vertex {} at {:?}", role, editor.len() - 1, point);
        self.recompute();
    }

    /// Move a vertex of the ring being edited
    pub fn drag_vertex(&mut self, index: usize, point: DisplayPoint) -> Result<(), SketchError> {
        let result = match self.mode.sketch_mut() {
            Some(sketch) => sketch.active_mut().move_vertex(index, point.to_canonical()),
            None => Err(RingError::IndexOutOfRange { index, len: 0 }),
        };
        self.finish_edit(result.map_err(SketchError::from))
    }

    /// Delete a vertex of the ring being edited
    pub fn delete_vertex(&mut self, index: usize) -> Result<(), SketchError> {
        let result = match self.mode.sketch_mut() {
            Some(sketch) => sketch.active_mut().delete_vertex(index).map(|_| ()),
            None => Err(RingError::IndexOutOfRange { index, len: 0 }),
        };
        self.finish_edit(result.map_err(SketchError::from))
    }

    /// Begin cutting a hole; the outer ring must be complete
    pub fn start_hole(&mut self) -> Result<(), SketchError> {
        let sketch = self.complete_sketch_mut()?;
        sketch.begin_hole();
        info!("Started hole in field {}", sketch.id);
        self.recompute();
        Ok(())
    }

    /// Finish the hole under construction
    ///
    /// Returns false (and changes nothing) unless a hole with at least three
    /// points is in progress.
    pub fn finish_hole(&mut self) -> bool {
        let finished = self.mode.sketch_mut().is_some_and(Sketch::finish_hole);
        if finished {
            info!("Finished hole, {} total", self.holes_count());
        } else {
            debug!("Finish hole ignored: no complete hole in progress");
        }
        self.recompute();
        finished
    }

    /// Discard the hole under construction
    pub fn cancel_hole(&mut self) {
        if let Some(hole) = self.mode.sketch_mut().and_then(Sketch::discard_hole) {
            info!("Cancelled hole with {} points", hole.len());
        }
        self.recompute();
    }

    /// Discard the whole sketch and return to idle
    pub fn cancel_drawing(&mut self) {
        if let Some(id) = self.session_id() {
            info!("Cancelled drawing field {}", id);
        }
        self.mode = EditorMode::Idle;
        self.recompute();
    }

    /// Snapshot the sketch for saving and mark a save as in progress
    ///
    /// The payload's area is the net area over completed holes, rounded to
    /// two decimals. The sketch is left untouched.
    pub fn begin_commit(
        &mut self,
        name: &str,
        attributes: &FieldAttributes,
    ) -> Result<FieldPayload, SketchError> {
        if self.pending_commit.is_some() {
            warn!("Rejected save: another save is in progress");
            return Err(SketchError::CommitInFlight);
        }
        let sketch = self.complete_sketch_mut()?;
        if name.trim().is_empty() {
            return Err(SketchError::EmptyName);
        }

        let payload = FieldPayload::from_sketch(sketch, name, attributes);
        info!(
            "Saving field {} '{}' ({} ha, {} holes)",
            sketch.id,
            payload.name,
            payload.area_hectares,
            sketch.holes().len()
        );
        let session = sketch.id;
        self.pending_commit = Some(PendingCommit {
            session,
            revision: self.revision,
        });
        Ok(payload)
    }

    /// Apply the outcome of a save started with [`Self::begin_commit`]
    ///
    /// On success the saved sketch is discarded, but only if it is still the
    /// live sketch and has not been edited since the save began. On failure
    /// it is kept so the user can retry.
    pub fn finish_commit(
        &mut self,
        result: Result<FieldRecord, PersistenceError>,
    ) -> Result<FieldRecord, SketchError> {
        let Some(pending) = self.pending_commit.take() else {
            return Err(SketchError::NoCommitInFlight);
        };

        match result {
            Ok(record) => {
                info!("Field saved with id {}", record.id);
                let unchanged = self.session_id() == Some(pending.session)
                    && self.revision == pending.revision;
                if unchanged {
                    self.mode = EditorMode::Idle;
                    self.recompute();
                } else {
                    info!(
                        "Keeping sketch {:?}: it changed while field {} was saving",
                        self.session_id(),
                        pending.session
                    );
                }
                Ok(record)
            }
            Err(e) => {
                warn!("Failed to save field: {}", e);
                Err(SketchError::PersistenceFailure(e))
            }
        }
    }

    /// Save the sketch through `store`
    pub fn commit_field(
        &mut self,
        store: &mut dyn FieldStore,
        name: &str,
        attributes: &FieldAttributes,
    ) -> Result<FieldRecord, SketchError> {
        let payload = self.begin_commit(name, attributes)?;
        let result = store.create_field(&payload);
        self.finish_commit(result)
    }

    // ============== Internals ==============

    /// Recompute every derived value from the current state
    fn recompute(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.live_area = self.sketch().map_or(0.0, Sketch::live_area);
    }

    fn finish_edit(&mut self, result: Result<(), SketchError>) -> Result<(), SketchError> {
        match &result {
            Ok(()) => self.recompute(),
            Err(e) => warn!("Vertex edit refused: {}", e),
        }
        result
    }

    fn complete_sketch_mut(&mut self) -> Result<&mut Sketch, SketchError> {
        match self.mode.sketch_mut() {
            Some(sketch) if sketch.outer().is_complete() => Ok(sketch),
            other => Err(SketchError::OuterIncomplete {
                count: other.map_or(0, |s| s.outer().len()),
            }),
        }
    }
}
