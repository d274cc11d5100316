use serde::Deserialize;

pub const DEFAULT_LOG_FILE: &str = "connectivity_log.json";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings for the connectivity checker.
/// Every field has a default, so an empty or partial YAML document is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path of the JSON file holding the check history.
    pub log_file: String,

    /// Per-request timeout in seconds, used when the operator does not enter one.
    pub timeout_seconds: u64,

    /// The User-Agent header sent with every probe.
    pub user_agent: String,

    /// Defaults for the periodic monitor.
    pub monitor: MonitorSettings,

    /// Number of records shown by the recent checks view.
    pub recent_count: usize,
}

/// Default interval and duration of the periodic monitor, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub interval_seconds: u64,
    pub duration_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_file: DEFAULT_LOG_FILE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            monitor: MonitorSettings::default(),
            recent_count: 10,
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            duration_seconds: 3600,
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.log_file, "connectivity_log.json");
        assert_eq!(settings.timeout_seconds, 10);
        assert_eq!(settings.monitor.interval_seconds, 60);
        assert_eq!(settings.monitor.duration_seconds, 3600);
        assert!(settings.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_settings_deserialization() {
        let yaml = r#"
                    log_file: /var/lib/sitecheck/history.json
                    timeout_seconds: 3
                    monitor:
                        interval_seconds: 15
                    "#;

        let settings: Settings = serde_yaml::from_str(yaml).expect("Invalid YAML");
        assert_eq!(settings.log_file, "/var/lib/sitecheck/history.json");
        assert_eq!(settings.timeout_seconds, 3);
        assert_eq!(settings.monitor.interval_seconds, 15);
        // unspecified fields fall back to their defaults
        assert_eq!(settings.monitor.duration_seconds, 3600);
        assert_eq!(settings.recent_count, 10);
        assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").expect("Invalid YAML");
        assert_eq!(settings.log_file, DEFAULT_LOG_FILE);
        assert_eq!(settings.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }
}
