//! GET {Root}api/configuration — 웹 애플리케이션이 시작 시 읽는 설정

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::plugin::{resolve_plugin_statuses, PluginStatus};
use crate::web::ExplorerState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigurationResponse {
    pub ui_options: Value,
    pub plugins: BTreeMap<String, PluginStatus>,
}

/// 병합된 UiOptions + 요청 시점의 플러그인 상태
pub async fn get_configuration(State(state): State<ExplorerState>) -> Json<ConfigurationResponse> {
    let plugins =
        resolve_plugin_statuses(state.registry.as_ref(), &state.host_config, &state.root).await;

    Json(ConfigurationResponse {
        ui_options: state.settings.ui_options.clone(),
        plugins,
    })
}
