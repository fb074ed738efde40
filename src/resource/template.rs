//! `${NAME}` / `${NAME:-default}` 치환

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::config::MountRoot;
use crate::error::{ExplorerError, Result};

static VARIABLE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn variable_pattern() -> &'static Regex {
    // 대문자 식별자만 — 번들 안의 JS 템플릿 리터럴(`${name}`)은 건드리지 않음
    VARIABLE_PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z][A-Z0-9_]*)(?::-([^}]*))?\}").expect("static pattern is valid")
    })
}

/// 치환 사전
#[derive(Debug, Clone, Default)]
pub struct TemplateVariables(HashMap<&'static str, String>);

impl TemplateVariables {
    /// 웹 애플리케이션이 사용하는 기본 URL 세 가지
    pub fn for_root(root: &MountRoot) -> Self {
        let mut vars = HashMap::new();
        vars.insert("ORTHANC_API_BASE_URL", "/".to_string());
        vars.insert("OE2_BASE_URL", root.ui_base_url());
        vars.insert("OE2_API_BASE_URL", root.ui_api_base_url());
        Self(vars)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// 사전에 없는 이름은 기본값(없으면 빈 문자열)으로 치환.
/// 내용이 UTF-8이 아니면 에러 — 호출자가 원본을 그대로 서빙합니다.
pub fn substitute_variables(content: &[u8], vars: &TemplateVariables) -> Result<String> {
    let text = std::str::from_utf8(content)
        .map_err(|e| ExplorerError::Template(format!("content is not UTF-8: {}", e)))?;

    let replaced = variable_pattern().replace_all(text, |caps: &Captures| {
        let name = &caps[1];
        match vars.get(name) {
            Some(value) => value.to_string(),
            None => caps.get(2).map(|d| d.as_str().to_string()).unwrap_or_default(),
        }
    });

    Ok(replaced.into_owned())
}
