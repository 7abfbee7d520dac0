//! Field Sketch Frontend
//!
//! Editing session for field boundaries: the sketch controller state
//! machine, command dispatch, persistence backends and configuration.

pub mod actions;
pub mod config;
pub mod persistence;
pub mod state;

pub use actions::{ActionContext, dispatch};
pub use config::{AppConfig, ConfigManager, SharedConfig};
pub use persistence::{FieldStore, HttpStore, MemoryStore, PersistenceError, SharedStore};
pub use state::{
    AppAction, AppState, FieldSketchController, MapOverlay, SharedAppState, SketchAction,
    SketchError, SketchPhase,
};
