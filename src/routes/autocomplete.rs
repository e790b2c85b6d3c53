//! Suggestion endpoint.

use axum::Json;
use axum::extract::State;
use frames::{AutocompleteRequest, AutocompleteResponse};
use tracing::debug;

use crate::state::AppState;

pub async fn autocomplete(
    State(state): State<AppState>,
    Json(request): Json<AutocompleteRequest>,
) -> Json<AutocompleteResponse> {
    debug!(
        len = request.code_context.len(),
        cursor_line = request.cursor_line,
        cursor_column = request.cursor_column,
        language = %request.language,
        "autocomplete requested"
    );
    let suggestion = state.completer.complete(&request).await;
    Json(AutocompleteResponse { suggestion })
}
