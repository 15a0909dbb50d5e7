//! Headless entry point: prints one screen's view model as JSON.
//!
//! Usage: `danjicare [dashboard|map|pipeline|schedule|claims|requests] [page]`

use chrono::Datelike;
use serde::Serialize;

use danjicare_lib::commands;
use danjicare_lib::renewal;
use danjicare_lib::state::AppState;

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize view: {}", e))
}

async fn render(state: &AppState, screen: &str, page: usize) -> Result<String, String> {
    match screen {
        "dashboard" => to_json(&commands::get_dashboard(state, page).await),
        "map" => to_json(&commands::get_coverage_map(state).await),
        "pipeline" => to_json(&commands::get_pipeline(state)),
        "schedule" => {
            let today = renewal::today();
            to_json(&commands::get_schedule(state, today.year(), today.month(), Some(today)))
        }
        "claims" => to_json(&commands::search_claims(state, "")),
        "requests" => to_json(&commands::get_request_history(state)),
        other => Err(format!("Unknown screen: {}", other)),
    }
}

#[tokio::main]
async fn main() {
    danjicare_lib::init_logging();

    let mut args = std::env::args().skip(1);
    let screen = args.next().unwrap_or_else(|| "dashboard".to_string());
    let page = args.next().and_then(|p| p.parse().ok()).unwrap_or(0);

    let state = AppState::new();
    match render(&state, &screen, page).await {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
