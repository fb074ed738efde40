use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::web::ExplorerState;

/// GET / → {Root}app/ (기본 탐색기 대체)
pub async fn redirect_root(State(state): State<ExplorerState>) -> impl IntoResponse {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, state.root.app_entry())],
    )
}
