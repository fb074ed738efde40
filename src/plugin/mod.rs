//! 플러그인 상태 해석
//!
//! 요청마다 호스트 레지스트리를 새로 조회하여 플러그인별 `Enabled` 값을
//! 계산하고, 상대 `RootUri`를 UI 위치 기준으로 보정합니다.

pub mod policy;
pub mod registry;

pub use policy::{is_enabled, rule_for, EnablementRule, ENABLEMENT_POLICY};
pub use registry::{InMemoryRegistry, OrthancRestRegistry, PluginRegistry};

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::config::{HostConfiguration, MountRoot};

/// UI 자신의 스크립트 디스크립터 — 실제 플러그인이 아니므로 제외
pub const OWN_SCRIPT_DESCRIPTOR: &str = "explorer.js";

/// UI에 전달되는 플러그인 상태 (호스트 정보의 나머지 필드는 그대로 전달)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginStatus {
    #[serde(rename = "RootUri", skip_serializing_if = "Option::is_none")]
    pub root_uri: Option<String>,
    #[serde(rename = "Enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub info: Map<String, Value>,
}

impl PluginStatus {
    /// 호스트 정보에서 상태를 만듭니다. 비어있지 않은 `RootUri`에는 `prefix`를 붙입니다.
    pub fn from_info(mut info: Map<String, Value>, prefix: &str, enabled: bool) -> Self {
        let root_uri = match info.remove("RootUri") {
            Some(Value::String(uri)) if !uri.is_empty() => Some(format!("{}{}", prefix, uri)),
            Some(Value::String(uri)) => Some(uri),
            // 문자열이 아니면 손대지 않고 그대로 전달
            Some(other) => {
                info.insert("RootUri".to_string(), other);
                None
            }
            None => None,
        };
        // "Enabled"는 계산값으로 덮어씀
        info.remove("Enabled");

        Self {
            root_uri,
            enabled,
            info,
        }
    }
}

/// 로드된 모든 플러그인의 상태를 계산합니다.
///
/// 실패하지 않습니다: 목록 조회 실패는 빈 결과, 개별 정보 조회 실패는
/// `RootUri` 없는 항목으로 처리됩니다.
pub async fn resolve_plugin_statuses(
    registry: &dyn PluginRegistry,
    config: &HostConfiguration,
    root: &MountRoot,
) -> BTreeMap<String, PluginStatus> {
    let mut statuses = BTreeMap::new();

    let names = match registry.list_loaded_plugins().await {
        Ok(names) => names,
        Err(e) => {
            tracing::error!("Failed to list loaded plugins: {}", e);
            return statuses;
        }
    };

    // RootUri는 호스트 기본 UI 기준 상대 경로라 마운트 깊이만큼 올라가야 함
    let prefix = root.relative_prefix();

    for name in names {
        if name == OWN_SCRIPT_DESCRIPTOR {
            continue;
        }

        let info = match registry.plugin_info(&name).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!("Failed to get info for plugin '{}': {}", name, e);
                Map::new()
            }
        };

        let enabled = is_enabled(&name, config);
        tracing::debug!("Plugin '{}' enabled={}", name, enabled);
        statuses.insert(name, PluginStatus::from_info(info, &prefix, enabled));
    }

    statuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_root_uri_prefixed() {
        let status = PluginStatus::from_info(
            info(json!({"ID": "dicom-web", "RootUri": "sub/path"})),
            "../../",
            true,
        );
        assert_eq!(status.root_uri.as_deref(), Some("../../sub/path"));
        assert_eq!(status.info["ID"], "dicom-web");
    }

    #[test]
    fn test_empty_root_uri_not_rewritten() {
        let status = PluginStatus::from_info(info(json!({"RootUri": ""})), "../", true);
        assert_eq!(status.root_uri.as_deref(), Some(""));

        let status = PluginStatus::from_info(Map::new(), "../", true);
        assert!(status.root_uri.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let status = PluginStatus::from_info(
            info(json!({"ID": "wsi", "Version": "2.1", "RootUri": "wsi/app/", "Enabled": false})),
            "../",
            true,
        );
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            json!({"ID": "wsi", "Version": "2.1", "RootUri": "../wsi/app/", "Enabled": true})
        );

        let bare = serde_json::to_value(PluginStatus::from_info(Map::new(), "", false)).unwrap();
        assert_eq!(bare, json!({"Enabled": false}));
    }

    #[tokio::test]
    async fn test_skips_own_script_descriptor() {
        let registry = InMemoryRegistry::new()
            .with_plugin_info("explorer.js", json!({"RootUri": "x"}))
            .with_plugin_info("transfers", json!({}));
        let root = MountRoot::parse("/ui/").unwrap();

        let statuses =
            resolve_plugin_statuses(&registry, &HostConfiguration::default(), &root).await;
        assert!(!statuses.contains_key(OWN_SCRIPT_DESCRIPTOR));
        assert_eq!(statuses.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_degrades_entry() {
        let registry = InMemoryRegistry::new()
            .with_plugin("tcia")
            .with_plugin_info("wsi", json!({"RootUri": "wsi/app/viewer.html"}));
        let root = MountRoot::parse("/a/b/").unwrap();

        let statuses =
            resolve_plugin_statuses(&registry, &HostConfiguration::default(), &root).await;
        assert_eq!(statuses["tcia"].root_uri, None);
        assert!(!statuses["tcia"].enabled);
        assert_eq!(statuses["wsi"].root_uri.as_deref(), Some("../../wsi/app/viewer.html"));
        assert!(statuses["wsi"].enabled);
    }
}
