use crate::models::DiagnosticsResponse;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

fn presence(set: bool) -> &'static str {
    if set {
        "✅ Set"
    } else {
        "❌ Not Set"
    }
}

/// Report whether the document store is reachable. Always answers 200; every
/// failure is folded into the `database` status string.
pub async fn test_database(State(state): State<Arc<AppState>>) -> Json<DiagnosticsResponse> {
    let status = state.store.status().await;

    Json(DiagnosticsResponse {
        backend: "✅ Running",
        database: status.describe(),
        database_url: presence(state.config.database_url_set()),
        database_name: presence(state.config.database_name_set()),
        connection_status: if status.is_connected() {
            "Connected"
        } else {
            "Not Connected"
        },
        collections: status.collections().to_vec(),
    })
}
