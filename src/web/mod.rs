//! Explorer HTTP 라우팅
//!
//! ## 엔드포인트 (`{Root}` = 설정된 마운트 경로)
//! - `GET {Root}app...`            — 웹 애플리케이션 (라우트 테이블 해석)
//! - `GET {Root}api/configuration` — UiOptions + 플러그인 상태
//! - `GET /`                       — `ReplaceDefaultExplorer`일 때 앱으로 리다이렉트
//!
//! `Root`는 axum 경로 패턴에 넣지 않고 단일 fallback 핸들러에서 문자 그대로
//! 비교합니다. 일치한 경로에 GET 이외의 메서드(HEAD 포함)는 405 + `Allow: GET`.

pub mod handlers;

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{ExplorerSettings, HostConfiguration, MountRoot};
use crate::error::ExplorerError;
use crate::plugin::PluginRegistry;
use crate::resource::{AssetRoutes, ROUTE_TABLE};

/// 요청 경로가 가리키는 엔드포인트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    App,
    Configuration,
    RootRedirect,
}

/// 핸들러 공유 상태 — 시작 후 불변
#[derive(Clone)]
pub struct ExplorerState {
    pub settings: Arc<ExplorerSettings>,
    pub root: MountRoot,
    pub host_config: Arc<HostConfiguration>,
    pub registry: Arc<dyn PluginRegistry>,
    pub assets: Arc<AssetRoutes>,
}

impl ExplorerState {
    /// 경로를 엔드포인트로 해석. 어느 것과도 일치하지 않으면 `None` (404).
    pub fn endpoint_for(&self, path: &str) -> Option<Endpoint> {
        if path == self.root.join("api/configuration") {
            Some(Endpoint::Configuration)
        } else if self.settings.replace_default_explorer && path == "/" {
            Some(Endpoint::RootRedirect)
        } else if self.assets.matches(path) {
            Some(Endpoint::App)
        } else {
            None
        }
    }
}

/// 초기화가 끝난 플러그인 — 설정이 활성화되어 있고 `Root`가 유효할 때만 존재
pub struct Explorer {
    settings: Arc<ExplorerSettings>,
    root: MountRoot,
    host_config: Arc<HostConfiguration>,
    assets: Arc<AssetRoutes>,
}

impl Explorer {
    /// 설정을 읽고 병합합니다.
    ///
    /// - `Err`: 치명적 초기화 실패 (잘못된 `Root` 등) — 라우트를 등록하지 않음
    /// - `Ok(None)`: 플러그인 비활성화
    pub fn initialize(host_config: HostConfiguration) -> Result<Option<Self>, ExplorerError> {
        match Self::try_initialize(host_config) {
            Ok(explorer) => Ok(explorer),
            Err(e) => {
                tracing::error!("Exception while initializing the Orthanc-Explorer 2 plugin: {}", e);
                Err(e)
            }
        }
    }

    fn try_initialize(host_config: HostConfiguration) -> Result<Option<Self>, ExplorerError> {
        let settings = ExplorerSettings::load(&host_config)?;

        if !settings.enable {
            tracing::warn!("Orthanc Explorer 2 plugin is disabled");
            return Ok(None);
        }

        let root = settings
            .root
            .clone()
            .ok_or_else(|| ExplorerError::Config("'Root' is missing".to_string()))?;
        tracing::warn!("URI to the Orthanc-Explorer 2 application: {}", root);

        let assets = AssetRoutes::new(&root)?;

        Ok(Some(Self {
            settings: Arc::new(settings),
            root,
            host_config: Arc::new(host_config),
            assets: Arc::new(assets),
        }))
    }

    pub fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    pub fn root(&self) -> &MountRoot {
        &self.root
    }

    /// 호스트에 알리는 플러그인 RootUri
    pub fn plugin_root_uri(&self) -> String {
        self.root.app_entry()
    }

    /// 응답하는 경로 목록. 앱 경로는 라우트 테이블의 정규식 형태 그대로.
    pub fn registered_routes(&self) -> Vec<String> {
        let mut routes: Vec<String> = ROUTE_TABLE
            .iter()
            .map(|(suffix, _, _)| self.root.join(suffix))
            .collect();
        routes.push(self.root.join("api/configuration"));
        if self.settings.replace_default_explorer {
            routes.push("/".to_string());
        }
        routes
    }

    /// axum Router 생성
    pub fn router(&self, registry: Arc<dyn PluginRegistry>) -> Router {
        let state = ExplorerState {
            settings: self.settings.clone(),
            root: self.root.clone(),
            host_config: self.host_config.clone(),
            registry,
            assets: self.assets.clone(),
        };

        Router::new()
            .fallback(handlers::dispatch)
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }
}

/// TCP 리스너에 바인딩하여 서빙
pub async fn serve(router: Router, listen_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("Orthanc Explorer 2 listening on http://{}", listen_addr);

    axum::serve(listener, router).await?;
    Ok(())
}
