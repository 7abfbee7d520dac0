//! Action handling
//!
//! Applies [`AppAction`]s to the shared application state. Errors are
//! logged and recorded in [`AppState::last_error`](crate::state::AppState)
//! for the shell to show; they never abort dispatch.

use field_core::FieldAttributes;
use tracing::{info, warn};

use crate::persistence::SharedStore;
use crate::state::{AppAction, SharedAppState, SketchAction, SketchError};

/// Everything a handler needs
#[derive(Clone)]
pub struct ActionContext {
    pub app_state: SharedAppState,
    pub store: SharedStore,
}

impl ActionContext {
    pub fn new(app_state: SharedAppState, store: SharedStore) -> Self {
        Self { app_state, store }
    }
}

/// Handle one action
pub fn dispatch(action: AppAction, ctx: &ActionContext) {
    match action {
        AppAction::RefreshFields => handle_refresh_fields(ctx),
        AppAction::SketchAction(action) => handle_sketch_action(action, ctx),
    }
}

/// Reload the field list; on failure the previous list is kept
fn handle_refresh_fields(ctx: &ActionContext) {
    let result = ctx.store.lock().list_fields();
    let mut state = ctx.app_state.lock();
    match result {
        Ok(fields) => {
            info!("Loaded {} fields", fields.len());
            state.fields = fields;
            state.last_error = None;
        }
        Err(e) => {
            warn!("Failed to load fields: {}", e);
            state.last_error = Some(format!("Failed to load fields: {}", e));
        }
    }
}

/// Handle sketch editing actions
fn handle_sketch_action(action: SketchAction, ctx: &ActionContext) {
    let description = action.description();
    let result = match action {
        SketchAction::StartDrawing => {
            ctx.app_state.lock().sketch.start_drawing();
            Ok(())
        }
        SketchAction::MapClick { point } => {
            ctx.app_state.lock().sketch.click(point);
            Ok(())
        }
        SketchAction::DragVertex { index, point } => {
            ctx.app_state.lock().sketch.drag_vertex(index, point)
        }
        SketchAction::DeleteVertex { index } => ctx.app_state.lock().sketch.delete_vertex(index),
        SketchAction::StartHole => ctx.app_state.lock().sketch.start_hole(),
        SketchAction::FinishHole => {
            ctx.app_state.lock().sketch.finish_hole();
            Ok(())
        }
        SketchAction::CancelHole => {
            ctx.app_state.lock().sketch.cancel_hole();
            Ok(())
        }
        SketchAction::CancelDrawing => {
            ctx.app_state.lock().sketch.cancel_drawing();
            Ok(())
        }
        SketchAction::CommitField { name, attributes } => handle_commit(ctx, &name, &attributes),
    };

    let mut state = ctx.app_state.lock();
    match result {
        Ok(()) => state.last_error = None,
        Err(e) => {
            warn!("{} failed: {}", description, e);
            state.last_error = Some(e.to_string());
        }
    }
}

/// Save the current sketch without holding the state lock during the store call
fn handle_commit(
    ctx: &ActionContext,
    name: &str,
    attributes: &FieldAttributes,
) -> Result<(), SketchError> {
    let payload = ctx.app_state.lock().sketch.begin_commit(name, attributes)?;

    let result = ctx.store.lock().create_field(&payload);

    let mut state = ctx.app_state.lock();
    let record = state.sketch.finish_commit(result)?;
    state.fields.insert(0, record);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FieldStore, MemoryStore, PersistenceError, share_store};
    use crate::state::{SketchPhase, create_shared_state};
    use field_core::{DisplayPoint, FieldPayload, FieldRecord};

    struct OfflineStore;

    impl FieldStore for OfflineStore {
        fn list_fields(&mut self) -> Result<Vec<FieldRecord>, PersistenceError> {
            Err(PersistenceError::Transport("offline".into()))
        }

        fn create_field(&mut self, _: &FieldPayload) -> Result<FieldRecord, PersistenceError> {
            Err(PersistenceError::Transport("offline".into()))
        }
    }

    fn context(store: SharedStore) -> ActionContext {
        ActionContext::new(create_shared_state(), store)
    }

    fn draw_square(ctx: &ActionContext) {
        dispatch(SketchAction::StartDrawing.into(), ctx);
        for (lat, lng) in [(0.0, 0.0), (0.0, 0.01), (0.01, 0.01), (0.01, 0.0)] {
            dispatch(
                SketchAction::MapClick {
                    point: DisplayPoint::new(lat, lng),
                }
                .into(),
                ctx,
            );
        }
    }

    fn commit(name: &str) -> AppAction {
        SketchAction::CommitField {
            name: name.into(),
            attributes: FieldAttributes::default(),
        }
        .into()
    }

    #[test]
    fn test_commit_prepends_record() {
        let ctx = context(share_store(MemoryStore::new()));
        draw_square(&ctx);
        dispatch(commit("First"), &ctx);
        draw_square(&ctx);
        dispatch(commit("Second"), &ctx);

        let state = ctx.app_state.lock();
        assert_eq!(state.last_error, None);
        assert_eq!(state.sketch.phase(), SketchPhase::Idle);
        let names: Vec<&str> = state.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(state.fields[0].area_hectares, 123.64);

        let overlay = state.overlay();
        assert_eq!(overlay.saved_fields.len(), 2);
        assert_eq!(overlay.saved_fields[0].name, "Second");
        assert!(overlay.markers.is_empty());
    }

    #[test]
    fn test_refresh_fields() {
        let ctx = context(share_store(MemoryStore::new()));
        draw_square(&ctx);
        dispatch(commit("Only"), &ctx);
        ctx.app_state.lock().fields.clear();

        dispatch(AppAction::RefreshFields, &ctx);
        assert_eq!(ctx.app_state.lock().fields.len(), 1);
    }

    #[test]
    fn test_errors_are_surfaced_and_cleared() {
        let ctx = context(share_store(MemoryStore::new()));
        dispatch(SketchAction::StartDrawing.into(), &ctx);
        dispatch(SketchAction::StartHole.into(), &ctx);
        {
            let state = ctx.app_state.lock();
            let error = state.last_error.as_deref().unwrap();
            assert!(error.contains("at least 3 points"));
        }

        dispatch(
            SketchAction::MapClick {
                point: DisplayPoint::new(1.0, 1.0),
            }
            .into(),
            &ctx,
        );
        assert_eq!(ctx.app_state.lock().last_error, None);
    }

    #[test]
    fn test_persistence_failure_keeps_sketch() {
        let ctx = context(share_store(OfflineStore));
        draw_square(&ctx);
        dispatch(commit("North"), &ctx);

        let state = ctx.app_state.lock();
        assert!(state.last_error.as_deref().unwrap().starts_with("Failed to save field"));
        assert!(state.fields.is_empty());
        assert_eq!(state.sketch.phase(), SketchPhase::Drawing);
        assert_eq!(state.sketch.sketch().unwrap().outer().len(), 4);
        assert!(!state.sketch.commit_in_flight());
    }

    #[test]
    fn test_refresh_failure_keeps_list() {
        let ctx = context(share_store(OfflineStore));
        dispatch(AppAction::RefreshFields, &ctx);

        let state = ctx.app_state.lock();
        assert!(state.fields.is_empty());
        assert!(state.last_error.as_deref().unwrap().contains("offline"));
    }

    #[test]
    fn test_actions_from_ron_script() {
        let script = r#"[
            SketchAction(StartDrawing),
            SketchAction(MapClick(point: (0.0, 0.0))),
            SketchAction(MapClick(point: (0.0, 0.01))),
            SketchAction(MapClick(point: (0.01, 0.01))),
            SketchAction(CommitField(name: "Scripted")),
            RefreshFields,
        ]"#;
        let actions: Vec<AppAction> = ron::from_str(script).unwrap();
        let ctx = context(share_store(MemoryStore::new()));
        for action in actions {
            dispatch(action, &ctx);
        }

        let state = ctx.app_state.lock();
        assert_eq!(state.fields.len(), 1);
        assert_eq!(state.fields[0].name, "Scripted");
    }
}
