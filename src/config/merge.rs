//! 설정 트리 병합
//!
//! - 양쪽 모두 객체: 키 단위 재귀 병합
//! - 그 외 (스칼라, 배열, null): override 값이 통째로 대체

use serde_json::Value;

/// `overlay`를 `base` 위에 재귀적으로 병합합니다 (`base`를 제자리에서 수정).
///
/// 루트가 객체가 아닌 입력은 아무것도 하지 않습니다.
pub fn merge_json(base: &mut Value, overlay: &Value) {
    let (Value::Object(base_map), Value::Object(overlay_map)) = (base, overlay) else {
        return;
    };

    for (key, overlay_value) in overlay_map {
        let both_objects = matches!(
            (base_map.get(key), overlay_value),
            (Some(Value::Object(_)), Value::Object(_))
        );

        if !both_objects {
            base_map.insert(key.clone(), overlay_value.clone());
        } else if let Some(base_child) = base_map.get_mut(key) {
            merge_json(base_child, overlay_value);
        }
    }
}

/// `merge_json`의 불변 버전 — 새 트리를 반환
pub fn merged(base: &Value, overlay: &Value) -> Value {
    let mut result = base.clone();
    merge_json(&mut result, overlay);
    result
}
