pub mod config;
pub mod error;
pub mod plugin;
pub mod resource;
pub mod web;

pub use config::{merge_json, ExplorerSettings, HostConfiguration, MountRoot};
pub use error::ExplorerError;
pub use plugin::{resolve_plugin_statuses, InMemoryRegistry, OrthancRestRegistry, PluginRegistry};
pub use web::Explorer;

/// 호스트에 등록되는 플러그인 이름
pub const PLUGIN_NAME: &str = "orthanc-explorer-2";
pub const PLUGIN_DESCRIPTION: &str = "Advanced User Interface for Orthanc";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");
