//! 설정 시스템
//!
//! 1. 내장 기본 설정 (`resources/configuration.json`, 주석 허용 JSON)
//! 2. 호스트 설정의 `OrthancExplorer2` 섹션 (사용자 override)
//!
//! 두 트리를 시작 시 한 번 병합하여 불변 `ExplorerSettings`를 만듭니다.

pub mod jsonc;
mod merge;

pub use merge::{merge_json, merged};

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{ExplorerError, Result};

/// 플러그인 설정 섹션 이름
pub const SECTION_NAME: &str = "OrthancExplorer2";

/// 빌드 시 내장되는 기본 설정 문서
pub const DEFAULT_CONFIGURATION: &str = include_str!("../../resources/configuration.json");

// ═══════════════════════════════════════════════════════════════
//  호스트 설정
// ═══════════════════════════════════════════════════════════════

/// 호스트(Orthanc)의 전체 설정 트리
#[derive(Debug, Clone, Default)]
pub struct HostConfiguration {
    root: Map<String, Value>,
}

impl HostConfiguration {
    /// 객체가 아닌 값이면 빈 설정으로 취급
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(root) => Self { root },
            _ => Self::default(),
        }
    }

    /// 파일 하나 또는 `*.json` 파일들이 있는 디렉토리에서 설정을 읽습니다.
    /// 디렉토리의 경우 파일 이름 순으로 최상위 키를 합칩니다 (뒤의 파일이 우선).
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            let mut files: Vec<_> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            files.sort();

            let mut root = Map::new();
            for file in &files {
                tracing::debug!("Reading host configuration file {}", file.display());
                if let Value::Object(section) = Self::read_file(file)? {
                    root.extend(section);
                }
            }
            Ok(Self { root })
        } else {
            Ok(Self::from_value(Self::read_file(path)?))
        }
    }

    fn read_file(path: &Path) -> Result<Value> {
        let content = std::fs::read_to_string(path)?;
        jsonc::parse_object(&content, &path.display().to_string())
    }

    /// 해당 이름의 값이 존재하고 객체인지
    pub fn is_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    pub fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.root.get(name).and_then(Value::as_object)
    }

    /// 섹션 내 boolean 값. 섹션 또는 값이 없거나 boolean이 아니면 `false`.
    pub fn boolean_value(&self, section: &str, key: &str) -> bool {
        let Some(value) = self.section(section).and_then(|s| s.get(key)) else {
            return false;
        };
        match value.as_bool() {
            Some(flag) => flag,
            None => {
                tracing::warn!(
                    "Configuration value {}.{} is not a boolean, treating it as false",
                    section,
                    key
                );
                false
            }
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }
}

// ═══════════════════════════════════════════════════════════════
//  마운트 경로
// ═══════════════════════════════════════════════════════════════

/// 검증된 마운트 기본 경로 — 반드시 `/`로 시작하고 `/`로 끝남
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRoot(String);

impl MountRoot {
    pub fn parse(root: &str) -> Result<Self> {
        if root.is_empty() || !root.starts_with('/') || !root.ends_with('/') {
            return Err(ExplorerError::InvalidRoot(root.to_string()));
        }
        Ok(Self(root.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 끝의 `/`를 뗀 경로 (`/` 자체는 빈 문자열)
    fn trimmed(&self) -> &str {
        &self.0[..self.0.len() - 1]
    }

    /// 비어있지 않은 경로 세그먼트 수 (`/ui/` → 1, `/a/b/` → 2)
    pub fn segment_count(&self) -> usize {
        self.0.split('/').filter(|s| !s.is_empty()).count()
    }

    /// 플러그인 RootUri 앞에 붙일 상대 경로 접두사
    pub fn relative_prefix(&self) -> String {
        "../".repeat(self.segment_count())
    }

    /// `{root}{suffix}` 형태의 절대 경로
    pub fn join(&self, suffix: &str) -> String {
        format!("{}{}", self.0, suffix)
    }

    /// 웹 애플리케이션 진입 경로 — 호스트에 알리는 플러그인 RootUri
    pub fn app_entry(&self) -> String {
        self.join("app/")
    }

    pub fn ui_base_url(&self) -> String {
        format!("{}/app", self.trimmed())
    }

    pub fn ui_api_base_url(&self) -> String {
        format!("{}/api/", self.trimmed())
    }
}

impl std::fmt::Display for MountRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ═══════════════════════════════════════════════════════════════
//  병합된 플러그인 설정
// ═══════════════════════════════════════════════════════════════

/// 기본 설정 + 사용자 섹션을 병합한 결과 (프로세스 수명 동안 불변)
#[derive(Debug, Clone)]
pub struct ExplorerSettings {
    pub enable: bool,
    /// `enable`이 false면 검증하지 않으므로 `None`일 수 있음
    pub root: Option<MountRoot>,
    pub replace_default_explorer: bool,
    pub ui_options: Value,
}

impl ExplorerSettings {
    /// 내장 기본 설정을 사용하여 로드
    pub fn load(host: &HostConfiguration) -> Result<Self> {
        Self::load_with_defaults(DEFAULT_CONFIGURATION, host)
    }

    pub fn load_with_defaults(default_document: &str, host: &HostConfiguration) -> Result<Self> {
        let defaults = jsonc::parse_object(default_document, "default configuration")?;
        let mut merged = defaults.get(SECTION_NAME).cloned().unwrap_or(Value::Null);

        if let Some(section) = host.section(SECTION_NAME) {
            tracing::debug!("Merging user '{}' section over defaults", SECTION_NAME);
            merge_json(&mut merged, &Value::Object(section.clone()));
        }

        Self::from_merged(&merged)
    }

    /// 병합된 트리에서 필드 추출. `Enable`이 true일 때만 `Root`를 검증합니다.
    pub fn from_merged(merged: &Value) -> Result<Self> {
        let enable = merged.get("Enable").and_then(Value::as_bool).unwrap_or(false);
        let replace_default_explorer = merged
            .get("ReplaceDefaultExplorer")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let ui_options = merged.get("UiOptions").cloned().unwrap_or(Value::Null);

        let root = if enable {
            let raw = merged.get("Root").and_then(Value::as_str).unwrap_or_default();
            Some(MountRoot::parse(raw)?)
        } else {
            None
        };

        Ok(Self {
            enable,
            root,
            replace_default_explorer,
            ui_options,
        })
    }
}
