//! Immutable rewrite rules derived from the config file.

use crate::config::RewriteSettings;

/// Rewrite rules owned by one filter instance for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    pub rewrite_subdomain: bool,
    pub replacement_host: Option<String>,
    /// Empty, or starting with `/`.
    pub base_path: String,
    pub keep_original_path: bool,
    pub fallback_path: Option<String>,
}

impl RewriteConfig {
    /// Normalize the raw settings: prefix the base path with `/` and turn
    /// empty strings into `None`.
    pub fn from_settings(settings: &RewriteSettings) -> Self {
        Self {
            rewrite_subdomain: settings.rewrite_subdomain,
            replacement_host: non_empty(&settings.replacement_host),
            base_path: normalize_base_path(&settings.base_path),
            keep_original_path: settings.keep_path,
            fallback_path: non_empty(&settings.fallback_path),
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self::from_settings(&RewriteSettings::default())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn normalize_base_path(base_path: &str) -> String {
    if base_path.is_empty() || base_path.starts_with('/') {
        base_path.to_string()
    } else {
        format!("/{}", base_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_gets_leading_slash() {
        let settings = RewriteSettings {
            base_path: "api".into(),
            ..Default::default()
        };
        assert_eq!(RewriteConfig::from_settings(&settings).base_path, "/api");
    }

    #[test]
    fn test_base_path_kept_when_normalized() {
        let settings = RewriteSettings {
            base_path: "/api".into(),
            ..Default::default()
        };
        assert_eq!(RewriteConfig::from_settings(&settings).base_path, "/api");
        assert_eq!(RewriteConfig::default().base_path, "");
    }

    #[test]
    fn test_empty_strings_disable_options() {
        let config = RewriteConfig::default();
        assert!(config.replacement_host.is_none());
        assert!(config.fallback_path.is_none());
        assert!(config.rewrite_subdomain);
        assert!(config.keep_original_path);
    }
}
