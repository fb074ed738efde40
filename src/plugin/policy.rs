//! 플러그인별 활성화 규칙 테이블
//!
//! 호스트가 로드한 플러그인이라도 해당 설정 섹션이 없으면 실제로는 동작하지
//! 않는 경우가 많아, UI에 보여줄 `Enabled` 값을 이름별 규칙으로 결정합니다.

use crate::config::HostConfiguration;

/// 활성화 규칙
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnablementRule {
    /// 항상 활성
    Always,
    /// `section.flag`가 true일 때만 (섹션/값이 없으면 false)
    Flag {
        section: &'static str,
        flag: &'static str,
    },
    /// 섹션이 존재하면 활성
    SectionPresent { section: &'static str },
    /// 섹션이 존재하고 그 안에 `key`가 있으면 활성
    SectionWithKey {
        section: &'static str,
        key: &'static str,
    },
}

impl EnablementRule {
    pub fn evaluate(&self, config: &HostConfiguration) -> bool {
        match *self {
            Self::Always => true,
            Self::Flag { section, flag } => config.boolean_value(section, flag),
            Self::SectionPresent { section } => config.is_section(section),
            Self::SectionWithKey { section, key } => config
                .section(section)
                .is_some_and(|s| s.contains_key(key)),
        }
    }
}

/// 이름 → 규칙 테이블. 여기 없는 플러그인은 로드되었으면 활성으로 간주합니다.
///
/// odbc-* 는 "PostgreSQL", postgresql-* 는 "Odbc" 섹션을 봅니다 (배포된 동작 그대로).
pub const ENABLEMENT_POLICY: &[(&str, EnablementRule)] = &[
    (
        "authorization",
        EnablementRule::SectionWithKey { section: "Authorization", key: "WebService" },
    ),
    ("connectivity-checks", EnablementRule::Always),
    ("dicom-web", EnablementRule::Flag { section: "DicomWeb", flag: "Enable" }),
    ("gdcm", EnablementRule::Flag { section: "Gdcm", flag: "Enable" }),
    ("mysql-index", EnablementRule::Flag { section: "MySQL", flag: "EnableIndex" }),
    ("mysql-storage", EnablementRule::Flag { section: "MySQL", flag: "EnableStorage" }),
    ("odbc-index", EnablementRule::Flag { section: "PostgreSQL", flag: "EnableIndex" }),
    ("odbc-storage", EnablementRule::Flag { section: "PostgreSQL", flag: "EnableStorage" }),
    ("postgresql-index", EnablementRule::Flag { section: "Odbc", flag: "EnableIndex" }),
    ("postgresql-storage", EnablementRule::Flag { section: "Odbc", flag: "EnableStorage" }),
    ("osimis-web-viewer", EnablementRule::SectionPresent { section: "WebViewer" }),
    ("python", EnablementRule::SectionPresent { section: "PythonScript" }),
    ("serve-folders", EnablementRule::SectionPresent { section: "ServeFolders" }),
    ("stone-webviewer", EnablementRule::SectionPresent { section: "StoneWebViewer" }),
    ("tcia", EnablementRule::Flag { section: "Tcia", flag: "Enable" }),
    ("transfers", EnablementRule::Always),
    ("web-viewer", EnablementRule::Always),
    ("worklists", EnablementRule::Flag { section: "Worklists", flag: "Enable" }),
    ("wsi", EnablementRule::Always),
];

pub fn rule_for(plugin_name: &str) -> Option<EnablementRule> {
    ENABLEMENT_POLICY
        .iter()
        .find(|(name, _)| *name == plugin_name)
        .map(|(_, rule)| *rule)
}

pub fn is_enabled(plugin_name: &str, config: &HostConfiguration) -> bool {
    rule_for(plugin_name).map_or(true, |rule| rule.evaluate(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> HostConfiguration {
        HostConfiguration::from_value(value)
    }

    #[test]
    fn test_absent_sections_disable_everything_but_always() {
        let empty = HostConfiguration::default();
        for (name, rule) in ENABLEMENT_POLICY {
            let expected = *rule == EnablementRule::Always;
            assert_eq!(is_enabled(name, &empty), expected, "{}", name);
        }
    }

    #[test]
    fn test_always_entries() {
        let always: Vec<&str> = ENABLEMENT_POLICY
            .iter()
            .filter(|(_, rule)| *rule == EnablementRule::Always)
            .map(|(name, _)| *name)
            .collect();
        assert_eq!(always, vec!["connectivity-checks", "transfers", "web-viewer", "wsi"]);
    }

    #[test]
    fn test_unknown_plugin_enabled() {
        assert!(rule_for("my-custom-plugin").is_none());
        assert!(is_enabled("my-custom-plugin", &HostConfiguration::default()));
    }

    #[test]
    fn test_flag_rules() {
        let cfg = config(json!({
            "DicomWeb": { "Enable": true },
            "Gdcm": { "Enable": false },
            "MySQL": { "EnableIndex": true },
            "Worklists": {}
        }));
        assert!(is_enabled("dicom-web", &cfg));
        assert!(!is_enabled("gdcm", &cfg));
        assert!(is_enabled("mysql-index", &cfg));
        assert!(!is_enabled("mysql-storage", &cfg));
        assert!(!is_enabled("worklists", &cfg));
    }

    #[test]
    fn test_odbc_and_postgresql_sections_cross_wired() {
        let cfg = config(json!({
            "PostgreSQL": { "EnableIndex": true, "EnableStorage": true }
        }));
        assert!(is_enabled("odbc-index", &cfg));
        assert!(is_enabled("odbc-storage", &cfg));
        assert!(!is_enabled("postgresql-index", &cfg));
        assert!(!is_enabled("postgresql-storage", &cfg));

        let cfg = config(json!({ "Odbc": { "EnableIndex": true } }));
        assert!(is_enabled("postgresql-index", &cfg));
        assert!(!is_enabled("odbc-index", &cfg));
    }

    #[test]
    fn test_section_present_rules() {
        let cfg = config(json!({
            "WebViewer": {},
            "PythonScript": "script.py",
            "StoneWebViewer": { "DateFormat": "DD/MM/YYYY" }
        }));
        assert!(is_enabled("osimis-web-viewer", &cfg));
        // 객체가 아닌 값은 섹션이 아님
        assert!(!is_enabled("python", &cfg));
        assert!(is_enabled("stone-webviewer", &cfg));
        assert!(!is_enabled("serve-folders", &cfg));
    }

    #[test]
    fn test_authorization_requires_web_service() {
        let cfg = config(json!({ "Authorization": { "StandardConfigurations": [] } }));
        assert!(!is_enabled("authorization", &cfg));

        let cfg = config(json!({ "Authorization": { "WebService": "http://auth/" } }));
        assert!(is_enabled("authorization", &cfg));
    }
}
