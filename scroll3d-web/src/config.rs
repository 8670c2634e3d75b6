/// JSON configuration handed to the browser host
use log::Level;
use serde::Deserialize;

use scroll3d_core::config::{DispatchConfig, ModelEntry, ObserverConfig, TimingsConfig};
use scroll3d_core::ShowcaseConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub models: Vec<ModelEntry>,
    pub timings: TimingsConfig,
    pub dispatch: DispatchConfig,
    pub observer: ObserverConfig,
    pub model_selector: String,
    pub container_selector: String,
    pub section_selector: String,
    pub active_class: String,
    pub loaded_class: String,
    pub log_level: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        let showcase = ShowcaseConfig::default();
        Self {
            models: showcase.models,
            timings: showcase.timings,
            dispatch: showcase.dispatch,
            observer: showcase.observer,
            model_selector: "#ms3d-main-model".to_string(),
            container_selector: ".ms3d-container".to_string(),
            section_selector: ".ms3d-text-panel".to_string(),
            active_class: "active-section".to_string(),
            loaded_class: "ms3d-fade-effect".to_string(),
            log_level: None,
        }
    }
}

impl WebConfig {
    /// Empty input means all defaults
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(input)
    }

    /// Showcase configuration for the sections found on the page
    pub fn showcase(&self, section_regions: Vec<String>) -> ShowcaseConfig {
        ShowcaseConfig {
            sections: section_regions,
            models: self.models.clone(),
            timings: self.timings.clone(),
            dispatch: self.dispatch.clone(),
            observer: self.observer.clone(),
        }
    }

    /// Console log level, `info` unless a known level name is configured
    pub fn log_level(&self) -> Level {
        self.log_level
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or(Level::Info)
    }

    /// `rootMargin` for the intersection observer, shrinking top and bottom
    pub fn root_margin(&self) -> String {
        let pct = self.observer.root_margin * 100.0;
        format!("-{pct}% 0px -{pct}% 0px")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scroll3d_core::ConfigError;

    #[test]
    fn test_empty_input_is_default() {
        let config = WebConfig::from_json("  ").unwrap();
        assert_eq!(config.models.len(), 5);
        assert_eq!(config.section_selector, ".ms3d-text-panel");
        assert_eq!(config.root_margin(), "-20% 0px -20% 0px");
        assert_eq!(config.log_level(), Level::Info);
    }

    #[test]
    fn test_log_level_names() {
        let config = WebConfig::from_json(r#"{ "log_level": "debug" }"#).unwrap();
        assert_eq!(config.log_level(), Level::Debug);
        let config = WebConfig::from_json(r#"{ "log_level": "chatty" }"#).unwrap();
        assert_eq!(config.log_level(), Level::Info);
    }

    #[test]
    fn test_partial_json() {
        let config = WebConfig::from_json(
            r#"{
                "models": [{ "src": "/a.glb", "camera_orbit": "0deg 90deg 100%" }],
                "dispatch": { "debounce_ms": 32 },
                "active_class": "is-active"
            }"#,
        )
        .unwrap();
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.dispatch.debounce_ms, 32);
        assert_eq!(config.dispatch.startup_delay_ms, 500);
        assert_eq!(config.active_class, "is-active");
        assert_eq!(config.model_selector, "#ms3d-main-model");
    }

    #[test]
    fn test_section_count_must_match_models() {
        let config = WebConfig::default();
        let showcase = config.showcase(vec!["only".to_string()]);
        assert!(matches!(
            showcase.registry(),
            Err(ConfigError::LengthMismatch { sections: 1, bindings: 5 })
        ));
        assert!(WebConfig::from_json("{").is_err());
    }
}
