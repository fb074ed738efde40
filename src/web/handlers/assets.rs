//! 웹 애플리케이션 정적 리소스 서빙
//!
//! GET {Root}app/assets/*   → 내장 assets 폴더 (진입 스크립트는 URL 치환)
//! GET {Root}app/index.html → index.html
//! GET {Root}app/favicon.ico
//! GET {Root}app, {Root}app/* → index.html (클라이언트 라우트)

use axum::{
    extract::State,
    http::{header, Uri},
    response::{IntoResponse, Response},
};

use crate::error::ExplorerError;
use crate::web::ExplorerState;

/// 요청 경로를 라우트 테이블로 해석하여 내장 리소스를 반환
pub async fn serve_app(
    State(state): State<ExplorerState>,
    uri: Uri,
) -> Result<Response, ExplorerError> {
    let served = state.assets.serve(uri.path()).map_err(|e| {
        tracing::debug!("Resource lookup failed for {}: {}", uri.path(), e);
        e
    })?;

    Ok(([(header::CONTENT_TYPE, served.mime)], served.content).into_response())
}
