//! 내장 웹 애플리케이션 리소스
//!
//! `resources/web-application` 디렉토리를 컴파일 시점에 바이너리에 포함하고,
//! 라우트 패턴 → 리소스 + MIME 테이블로 요청 경로를 해석합니다.

mod template;

pub use template::{substitute_variables, TemplateVariables};

use include_dir::{include_dir, Dir};
use regex::Regex;

use crate::config::MountRoot;
use crate::error::{ExplorerError, Result};

// Embed the web application at compile time
static WEB_APPLICATION: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources/web-application");

pub const MIME_HTML: &str = "text/html";
pub const MIME_ICO: &str = "image/x-icon";
pub const MIME_JAVASCRIPT: &str = "application/javascript";
pub const MIME_BINARY: &str = "application/octet-stream";

/// 파일 확장자로 MIME 타입 추정
pub fn detect_mime_type(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => MIME_HTML,
        "js" | "mjs" => MIME_JAVASCRIPT,
        "css" => "text/css",
        "json" => "application/json",
        "map" => "application/json",
        "ico" => MIME_ICO,
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "txt" => "text/plain",
        "wasm" => "application/wasm",
        _ => MIME_BINARY,
    }
}

/// 내장 리소스 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// `assets/` 폴더 — 캡처된 경로로 파일 선택
    AssetsFolder,
    IndexDocument,
    Favicon,
}

impl Resource {
    fn file_path(self) -> &'static str {
        match self {
            Self::AssetsFolder => "assets",
            Self::IndexDocument => "index.html",
            Self::Favicon => "favicon.ico",
        }
    }
}

/// 응답으로 보낼 리소스 내용
#[derive(Debug, Clone)]
pub struct ServedResource {
    pub content: Vec<u8>,
    pub mime: &'static str,
}

/// `{Root}` 뒤에 붙는 정규식 접미사 → 리소스 + MIME.
/// vue-router와 라우팅을 나눔: 앞쪽은 실제 정적 파일,
/// 뒤쪽은 클라이언트 라우트라 모두 index.html을 반환
pub const ROUTE_TABLE: &[(&str, Resource, Option<&str>)] = &[
    ("app/assets/(.*)", Resource::AssetsFolder, None),
    ("app/index.html", Resource::IndexDocument, Some(MIME_HTML)),
    ("app/favicon.ico", Resource::Favicon, Some(MIME_ICO)),
    ("app/(.*)", Resource::IndexDocument, Some(MIME_HTML)),
    ("app", Resource::IndexDocument, Some(MIME_HTML)),
];

/// 라우트 테이블 항목: 정규식 패턴 → 리소스 + MIME (폴더는 `None` = 확장자로 추정)
struct RouteEntry {
    pattern: Regex,
    resource: Resource,
    mime: Option<&'static str>,
}

/// 웹 애플리케이션 라우트 테이블. 첫 번째로 일치하는 패턴이 사용됩니다.
pub struct AssetRoutes {
    entries: Vec<RouteEntry>,
    variables: TemplateVariables,
}

impl AssetRoutes {
    pub fn new(root: &MountRoot) -> Result<Self> {
        let entries = ROUTE_TABLE
            .iter()
            .map(|&(suffix, resource, mime)| {
                let pattern = format!("^{}{}$", regex::escape(root.as_str()), suffix);
                let pattern = Regex::new(&pattern)
                    .map_err(|e| ExplorerError::Config(format!("Invalid route pattern: {}", e)))?;
                Ok(RouteEntry { pattern, resource, mime })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            entries,
            variables: TemplateVariables::for_root(root),
        })
    }

    /// 경로가 라우트 테이블의 어떤 패턴과 일치하는지
    pub fn matches(&self, request_path: &str) -> bool {
        self.entries.iter().any(|entry| entry.pattern.is_match(request_path))
    }

    /// 요청 경로를 리소스로 해석하여 내용을 반환
    pub fn serve(&self, request_path: &str) -> Result<ServedResource> {
        for entry in &self.entries {
            let Some(captures) = entry.pattern.captures(request_path) else {
                continue;
            };

            return match entry.resource {
                Resource::AssetsFolder => {
                    let relative = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                    self.serve_asset(relative)
                }
                resource => {
                    let content = embedded_file(resource.file_path())?;
                    Ok(ServedResource {
                        content: content.to_vec(),
                        mime: entry.mime.unwrap_or(MIME_BINARY),
                    })
                }
            };
        }

        Err(ExplorerError::ResourceNotFound(request_path.to_string()))
    }

    fn serve_asset(&self, relative: &str) -> Result<ServedResource> {
        let path = format!("{}/{}", Resource::AssetsFolder.file_path(), relative);
        let mime = detect_mime_type(&path);
        let content = embedded_file(&path)?;

        // 번들 진입 스크립트에만 기본 URL 치환 적용
        if mime == MIME_JAVASCRIPT && relative.starts_with("index.") {
            match substitute_variables(content, &self.variables) {
                Ok(replaced) => {
                    return Ok(ServedResource {
                        content: replaced.into_bytes(),
                        mime,
                    })
                }
                Err(e) => {
                    tracing::error!("{} substitution error: {}", path, e);
                }
            }
        }

        Ok(ServedResource {
            content: content.to_vec(),
            mime,
        })
    }
}

fn embedded_file(path: &str) -> Result<&'static [u8]> {
    // 상위 디렉토리 탈출 차단
    if path.split('/').any(|segment| segment == "..") {
        return Err(ExplorerError::ResourceNotFound(path.to_string()));
    }

    WEB_APPLICATION
        .get_file(path)
        .map(|file| file.contents())
        .ok_or_else(|| ExplorerError::ResourceNotFound(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes(root: &str) -> AssetRoutes {
        AssetRoutes::new(&MountRoot::parse(root).unwrap()).unwrap()
    }

    #[test]
    fn test_detect_mime_type() {
        assert_eq!(detect_mime_type("/index.html"), MIME_HTML);
        assert_eq!(detect_mime_type("assets/index.js"), MIME_JAVASCRIPT);
        assert_eq!(detect_mime_type("assets/INDEX.CSS"), "text/css");
        assert_eq!(detect_mime_type("assets/font.woff2"), "font/woff2");
        assert_eq!(detect_mime_type("assets/noext"), MIME_BINARY);
    }

    #[test]
    fn test_index_variants() {
        let routes = routes("/ui/");
        for path in ["/ui/app", "/ui/app/", "/ui/app/index.html", "/ui/app/studies/1.2.3"] {
            let served = routes.serve(path).unwrap();
            assert_eq!(served.mime, MIME_HTML, "{}", path);
            assert!(String::from_utf8_lossy(&served.content).contains("<div id=\"app\">"));
        }
    }

    #[test]
    fn test_favicon() {
        let served = routes("/ui/").serve("/ui/app/favicon.ico").unwrap();
        assert_eq!(served.mime, MIME_ICO);
        assert!(!served.content.is_empty());
    }

    #[test]
    fn test_entry_script_substituted() {
        let served = routes("/orthanc/ui/").serve("/orthanc/ui/app/assets/index.js").unwrap();
        assert_eq!(served.mime, MIME_JAVASCRIPT);
        let script = String::from_utf8(served.content).unwrap();
        assert!(script.contains("\"/orthanc/ui/app\""));
        assert!(script.contains("\"/orthanc/ui/api/\""));
        assert!(!script.contains("${OE2_BASE_URL}"));
        // 소문자 JS 템플릿 리터럴은 그대로
        assert!(script.contains("${name}"));
    }

    #[test]
    fn test_other_assets_untouched() {
        let served = routes("/ui/").serve("/ui/app/assets/index.css").unwrap();
        assert_eq!(served.mime, "text/css");
        assert_eq!(served.content, embedded_file("assets/index.css").unwrap());
    }

    #[test]
    fn test_missing_asset() {
        let result = routes("/ui/").serve("/ui/app/assets/missing.js");
        assert!(matches!(result, Err(ExplorerError::ResourceNotFound(_))));
    }

    #[test]
    fn test_traversal_rejected() {
        let result = routes("/ui/").serve("/ui/app/assets/../index.html");
        assert!(matches!(result, Err(ExplorerError::ResourceNotFound(_))));
    }

    #[test]
    fn test_outside_root_not_matched() {
        assert!(routes("/ui/").serve("/other/app").is_err());
        assert!(routes("/ui/").serve("/ui/application").is_err());
        assert!(!routes("/ui/").matches("/ui/application"));
        assert!(routes("/ui/").matches("/ui/app/assets/missing.js"));
    }

    #[test]
    fn test_root_metacharacters_are_literal() {
        let star = routes("/a*b/");
        assert!(star.matches("/a*b/app/"));
        assert!(!star.matches("/aaab/app/"));
        assert!(!star.matches("/b/app/"));

        let colon = routes("/:x/");
        assert!(colon.matches("/:x/app"));
        assert!(!colon.matches("/anything/app"));
    }
}
