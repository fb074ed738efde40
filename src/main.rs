use std::path::PathBuf;
use std::sync::Arc;

use oe2_core::{Explorer, HostConfiguration, OrthancRestRegistry, PluginRegistry};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!(
        "{} v{} starting ({})",
        oe2_core::PLUGIN_NAME,
        oe2_core::PLUGIN_VERSION,
        oe2_core::PLUGIN_DESCRIPTION
    );

    // 호스트 설정 파일 (또는 디렉토리). 없으면 기본 설정만 사용
    let host_config = match std::env::var("OE2_ORTHANC_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            tracing::info!("Reading Orthanc configuration from {}", path.display());
            HostConfiguration::load(&path)?
        }
        Err(_) => {
            tracing::warn!("OE2_ORTHANC_CONFIG not set, using default configuration only");
            HostConfiguration::default()
        }
    };

    // 잘못된 Root 등 치명적 초기화 실패는 라우트 등록 없이 종료
    let Some(explorer) = Explorer::initialize(host_config)? else {
        return Ok(());
    };

    let orthanc_url =
        std::env::var("OE2_ORTHANC_URL").unwrap_or_else(|_| "http://127.0.0.1:8042".to_string());
    let mut registry = OrthancRestRegistry::new(&orthanc_url)?;
    if let (Ok(username), Ok(password)) = (
        std::env::var("OE2_ORTHANC_USERNAME"),
        std::env::var("OE2_ORTHANC_PASSWORD"),
    ) {
        registry = registry.with_credentials(&username, &password);
    }
    let registry: Arc<dyn PluginRegistry> = Arc::new(registry);

    tracing::info!("Plugin root URI: {}", explorer.plugin_root_uri());
    for route in explorer.registered_routes() {
        tracing::debug!("Registered route {}", route);
    }

    let listen_addr =
        std::env::var("OE2_LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:8043".to_string());
    if let Err(e) = oe2_core::web::serve(explorer.router(registry), &listen_addr).await {
        tracing::error!("HTTP server error: {}", e);
    }

    tracing::info!("Orthanc Explorer 2 shutting down");
    Ok(())
}
