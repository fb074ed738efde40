//! Orthanc 설정 파일은 `//` 및 `/* */` 주석을 허용하는 JSON 입니다.
//! 주석을 공백으로 치환한 뒤 serde_json으로 파싱합니다 (줄 번호 유지).

use serde_json::Value;

use crate::error::{ExplorerError, Result};

/// 문자열 리터럴 밖의 주석을 제거합니다.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                // 줄 끝까지 건너뜀
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// 주석이 포함된 JSON 문서를 파싱합니다.
pub fn parse(input: &str) -> Result<Value> {
    let stripped = strip_comments(input);
    Ok(serde_json::from_str(&stripped)?)
}

/// 파싱 결과가 객체가 아니면 설정 에러
pub fn parse_object(input: &str, origin: &str) -> Result<Value> {
    let value = parse(input)?;
    if !value.is_object() {
        return Err(ExplorerError::Config(format!(
            "{} is not a JSON object",
            origin
        )));
    }
    Ok(value)
}
