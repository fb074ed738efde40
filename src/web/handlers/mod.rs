pub mod assets;
pub mod configuration;
pub mod redirect;

use axum::{
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Response},
};

use crate::error::ExplorerError;
use crate::web::{Endpoint, ExplorerState};

/// 모든 요청의 진입점: 경로로 엔드포인트를 찾은 뒤 메서드를 검사
pub async fn dispatch(State(state): State<ExplorerState>, method: Method, uri: Uri) -> Response {
    let Some(endpoint) = state.endpoint_for(uri.path()) else {
        return ExplorerError::ResourceNotFound(uri.path().to_string()).into_response();
    };

    if method != Method::GET {
        tracing::debug!("{} {} rejected: GET only", method, uri.path());
        return ExplorerError::MethodNotAllowed(method.to_string()).into_response();
    }

    match endpoint {
        Endpoint::App => assets::serve_app(State(state), uri).await.into_response(),
        Endpoint::Configuration => configuration::get_configuration(State(state))
            .await
            .into_response(),
        Endpoint::RootRedirect => redirect::redirect_root(State(state)).await.into_response(),
    }
}
