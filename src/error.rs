//! Explorer 전용 에러 타입 — 에러 종류를 구분하여 HTTP 핸들러에서
//! 적절한 상태 코드를 반환할 수 있게 합니다.

use axum::http::{header, StatusCode};

/// 설정 로딩, 리소스 서빙, 호스트 조회 중 발생할 수 있는 에러 유형
#[derive(thiserror::Error, Debug)]
pub enum ExplorerError {
    #[error("'Root' configuration shall start with a '/' and end with a '/': {0}")]
    InvalidRoot(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Host request failed: {0}")]
    Host(String),

    #[error("Template substitution failed: {0}")]
    Template(String),

    #[error("Resource '{0}' not found")]
    ResourceNotFound(String),

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),
}

impl ExplorerError {
    /// HTTP 상태 코드 매핑
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Host(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidRoot(_) | Self::Config(_) | Self::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Io(_) | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON 에러 응답 생성
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "success": false,
            "error": self.to_string(),
            "error_code": self.error_code(),
        })
    }

    /// 머신 리더블 에러 코드
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRoot(_) => "INVALID_ROOT",
            Self::Config(_) => "INVALID_CONFIG",
            Self::Json(_) => "JSON_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Host(_) => "HOST_ERROR",
            Self::Template(_) => "TEMPLATE_ERROR",
            Self::ResourceNotFound(_) => "RESOURCE_NOT_FOUND",
            Self::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
        }
    }
}

/// axum 핸들러에서 ExplorerError를 직접 반환할 수 있도록 IntoResponse 구현
impl axum::response::IntoResponse for ExplorerError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = axum::Json(self.to_json());
        let mut response = (status, body).into_response();
        // 모든 엔드포인트는 GET 전용
        if matches!(self, Self::MethodNotAllowed(_)) {
            response
                .headers_mut()
                .insert(header::ALLOW, header::HeaderValue::from_static("GET"));
        }
        response
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ExplorerError::ResourceNotFound("/x.js".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ExplorerError::Host("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ExplorerError::InvalidRoot("app".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_json_body() {
        let err = ExplorerError::InvalidRoot("app".into());
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "INVALID_ROOT");
        assert!(body["error"].as_str().unwrap().ends_with(": app"));
    }

    #[test]
    fn test_method_not_allowed_response() {
        use axum::response::IntoResponse;

        let err = ExplorerError::MethodNotAllowed("HEAD".into());
        assert_eq!(err.error_code(), "METHOD_NOT_ALLOWED");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET");
    }
}
