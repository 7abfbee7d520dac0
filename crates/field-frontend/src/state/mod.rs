//! Application state and commands

mod controller;
mod overlay;

pub use controller::{EditorMode, FieldSketchController, SketchError, SketchPhase};
pub use overlay::{MAX_ZOOM, MapOverlay, SavedFieldShape, VertexMarker};

use std::sync::Arc;

use field_core::{DisplayPoint, FieldAttributes, FieldRecord};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Commands issued by the presentation shell and the map surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SketchAction {
    /// Begin a new field, discarding any current sketch
    StartDrawing,
    /// Map click at a display-order point
    MapClick { point: DisplayPoint },
    /// Vertex drag finished
    DragVertex { index: usize, point: DisplayPoint },
    /// Vertex delete handle clicked
    DeleteVertex { index: usize },
    StartHole,
    FinishHole,
    CancelHole,
    CancelDrawing,
    /// Save the sketch as a new field
    CommitField {
        name: String,
        #[serde(default)]
        attributes: FieldAttributes,
    },
}

impl SketchAction {
    /// Get a description of the action for display
    pub fn description(&self) -> &'static str {
        match self {
            SketchAction::StartDrawing => "Start Drawing",
            SketchAction::MapClick { .. } => "Add Point",
            SketchAction::DragVertex { .. } => "Move Point",
            SketchAction::DeleteVertex { .. } => "Delete Point",
            SketchAction::StartHole => "Start Hole",
            SketchAction::FinishHole => "Finish Hole",
            SketchAction::CancelHole => "Cancel Hole",
            SketchAction::CancelDrawing => "Cancel Drawing",
            SketchAction::CommitField { .. } => "Save Field",
        }
    }
}

/// Top-level application commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppAction {
    /// Reload the field list from the store
    RefreshFields,
    SketchAction(SketchAction),
}

impl From<SketchAction> for AppAction {
    fn from(action: SketchAction) -> Self {
        AppAction::SketchAction(action)
    }
}

/// Application state shared between the shell and the dispatcher
#[derive(Debug, Default)]
pub struct AppState {
    /// The editing session
    pub sketch: FieldSketchController,
    /// Known fields, newest first after a save
    pub fields: Vec<FieldRecord>,
    /// User-visible error from the last command, cleared on the next success
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full map overlay: saved fields under the current sketch
    pub fn overlay(&self) -> MapOverlay {
        self.sketch.overlay().with_saved_fields(&self.fields)
    }
}

/// Shared application state type
pub type SharedAppState = Arc<Mutex<AppState>>;

/// Create a new shared application state
pub fn create_shared_state() -> SharedAppState {
    Arc::new(Mutex::new(AppState::new()))
}
