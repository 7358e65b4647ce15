//! Content proxy endpoints.
//!
//! Thin pass-through to the upstream content API with the fallback
//! policy applied. These handlers are infallible at the HTTP level:
//! whatever the upstream does, the client receives a 200 envelope.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::models::{ApiEnvelope, ContentItem};
use crate::state::AppState;

/// `GET /api/magazines` - the full catalog.
pub async fn list(State(state): State<AppState>) -> Json<ApiEnvelope<Vec<ContentItem>>> {
    let result = state.upstream().list_content().await;
    Json(state.policy().resolve_list(result))
}

/// `GET /api/magazines/{id}` - a single item.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiEnvelope<ContentItem>> {
    let result = state.upstream().content_by_id(&id).await;
    Json(state.policy().resolve_detail(&id, result))
}
