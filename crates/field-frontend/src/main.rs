//! Field sketch session runner
//!
//! Replays a RON list of actions against a fresh editing session using the
//! configured store, then prints the session summary and known fields.
//!
//! Usage: `field-sketch <actions.ron>`
//!
//! On first run the default config is written so it can be edited; set
//! `FIELD_SKETCH_CONFIG` to use another file.

use std::path::PathBuf;
use std::process::ExitCode;

use field_frontend::config::create_shared_config;
use field_frontend::persistence::open_store;
use field_frontend::state::create_shared_state;
use field_frontend::{ActionContext, AppAction, dispatch};

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "field_frontend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(script_path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: field-sketch <actions.ron>");
        return ExitCode::FAILURE;
    };

    let config = create_shared_config();
    match config.write().write_defaults_if_missing() {
        Ok(true) => tracing::info!("Created default config"),
        Ok(false) => {}
        Err(e) => tracing::warn!("Could not write default config: {}", e),
    }
    tracing::info!(
        "Starting field sketch session (config: {:?})",
        config.read().config_file_path()
    );

    let script = match std::fs::read_to_string(&script_path) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("failed to read {}: {}", script_path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let actions: Vec<AppAction> = match ron::from_str(&script) {
        Ok(actions) => actions,
        Err(e) => {
            eprintln!("failed to parse {}: {}", script_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let store = open_store(&config.read().config().persistence);
    let ctx = ActionContext::new(create_shared_state(), store);
    for action in actions {
        dispatch(action, &ctx);
    }

    let state = ctx.app_state.lock();
    println!("phase: {}", state.sketch.phase().name());
    println!("live area: {:.2} ha", state.sketch.live_area());
    println!("holes: {}", state.sketch.holes_count());
    println!("saved shapes on map: {}", state.overlay().saved_fields.len());
    println!("status: {}", state.sketch.status_message());
    if let Some(error) = &state.last_error {
        println!("last error: {}", error);
    }
    match serde_json::to_string_pretty(&state.fields) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("failed to encode fields: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
