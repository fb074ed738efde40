//! 호스트 플러그인 레지스트리 조회
//!
//! Orthanc REST API의 `GET /plugins`, `GET /plugins/{name}`을 추상화합니다.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{ExplorerError, Result};

/// 호스트가 로드한 플러그인 목록과 정보를 제공하는 협력자
#[async_trait]
pub trait PluginRegistry: Send + Sync {
    /// 로드된 플러그인 이름 (호스트가 보고한 순서)
    async fn list_loaded_plugins(&self) -> Result<Vec<String>>;

    /// 플러그인 정보 객체 (`RootUri` 등)
    async fn plugin_info(&self, name: &str) -> Result<Map<String, Value>>;
}

// ═══════════════════════════════════════════════════════════════
//  Orthanc REST 구현
// ═══════════════════════════════════════════════════════════════

/// HTTP로 호스트 REST API에 질의하는 레지스트리
pub struct OrthancRestRegistry {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl OrthancRestRegistry {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ExplorerError::Host(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// `base_url` 뒤에 경로 세그먼트를 붙인 URL. 각 세그먼트는 퍼센트 인코딩됨.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ExplorerError::Host(format!("Invalid host URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ExplorerError::Host(format!("Invalid host URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, segments: &[&str]) -> Result<Value> {
        let url = self.endpoint(segments)?;
        let mut request = self.client.get(url.clone());
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExplorerError::Host(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::Host(format!("GET {}: HTTP {}", url, status)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ExplorerError::Host(format!("GET {}: invalid JSON: {}", url, e)))
    }
}

#[async_trait]
impl PluginRegistry for OrthancRestRegistry {
    async fn list_loaded_plugins(&self) -> Result<Vec<String>> {
        let list = self.get_json(&["plugins"]).await?;
        let names = list
            .as_array()
            .ok_or_else(|| ExplorerError::Host("/plugins did not return an array".to_string()))?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        Ok(names)
    }

    async fn plugin_info(&self, name: &str) -> Result<Map<String, Value>> {
        match self.get_json(&["plugins", name]).await? {
            Value::Object(info) => Ok(info),
            _ => Err(ExplorerError::Host(format!(
                "/plugins/{} did not return an object",
                name
            ))),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  메모리 구현
// ═══════════════════════════════════════════════════════════════

/// 고정된 플러그인 목록 — 테스트 및 호스트 없이 실행할 때 사용
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    names: Vec<String>,
    infos: HashMap<String, Map<String, Value>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 정보 없이 이름만 등록 (정보 조회는 실패)
    pub fn with_plugin(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    /// 이름과 정보를 함께 등록. 객체가 아닌 정보는 빈 객체로 취급.
    pub fn with_plugin_info(mut self, name: &str, info: Value) -> Self {
        self.names.push(name.to_string());
        let info = match info {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.infos.insert(name.to_string(), info);
        self
    }
}

#[async_trait]
impl PluginRegistry for InMemoryRegistry {
    async fn list_loaded_plugins(&self) -> Result<Vec<String>> {
        Ok(self.names.clone())
    }

    async fn plugin_info(&self, name: &str) -> Result<Map<String, Value>> {
        self.infos
            .get(name)
            .cloned()
            .ok_or_else(|| ExplorerError::Host(format!("Plugin '{}' has no info", name)))
    }
}
