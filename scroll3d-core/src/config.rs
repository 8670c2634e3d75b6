/// Static showcase configuration
///
/// Loaded once at startup. Every field except `sections` and `models` has a
/// default, so a minimal TOML file only lists the sections and their models:
///
/// ```toml
/// sections = ["intro", "details"]
///
/// [[models]]
/// src = "/models/intro.glb"
/// camera_orbit = "45deg 75deg 105%"
///
/// [[models]]
/// src = "/models/details.glb"
/// camera_orbit = "-45deg 75deg 105%"
/// ```
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::dispatch::DispatchSettings;
use crate::error::{ConfigError, Result};
use crate::observer::ObserverSettings;
use crate::registry::{ModelBinding, SectionRegistry};
use crate::transition::TransitionTimings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub src: String,
    pub camera_orbit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingsConfig {
    pub fade_out_ms: u64,
    pub settle_ms: u64,
    pub fade_in_ms: u64,
    pub style_transition_ms: u64,
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self {
            fade_out_ms: 300,
            settle_ms: 150,
            fade_in_ms: 300,
            style_transition_ms: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub debounce_ms: u64,
    pub startup_delay_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 16,
            startup_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub thresholds: Vec<f64>,
    pub root_margin: f64,
    pub min_ratio: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![0.0, 0.25, 0.5, 0.75, 1.0],
            root_margin: 0.2,
            min_ratio: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowcaseConfig {
    pub sections: Vec<String>,
    pub models: Vec<ModelEntry>,
    #[serde(default)]
    pub timings: TimingsConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub observer: ObserverConfig,
}

impl ShowcaseConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn registry(&self) -> Result<SectionRegistry> {
        let bindings = self
            .models
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                ModelBinding::parse(index, entry.src.clone(), &entry.camera_orbit)
            })
            .collect::<Result<Vec<_>>>()?;
        SectionRegistry::new(self.sections.clone(), bindings)
    }

    pub fn transition_timings(&self) -> TransitionTimings {
        let t = &self.timings;
        TransitionTimings {
            fade_out: Duration::from_millis(t.fade_out_ms),
            settle: Duration::from_millis(t.settle_ms),
            fade_in: Duration::from_millis(t.fade_in_ms),
            style_transition: Duration::from_millis(t.style_transition_ms),
        }
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            debounce: Duration::from_millis(self.dispatch.debounce_ms),
            startup_delay: Duration::from_millis(self.dispatch.startup_delay_ms),
        }
    }

    pub fn observer_settings(&self) -> Result<ObserverSettings> {
        let o = &self.observer;
        if o.thresholds.is_empty() {
            return Err(invalid("observer.thresholds", "at least one threshold is required"));
        }
        if o.thresholds.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(invalid("observer.thresholds", "thresholds must lie in [0, 1]"));
        }
        if o.thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("observer.thresholds", "thresholds must be strictly ascending"));
        }
        if !(0.0..0.5).contains(&o.root_margin) {
            return Err(invalid("observer.root_margin", "margin must lie in [0, 0.5)"));
        }
        if !(0.0..=1.0).contains(&o.min_ratio) {
            return Err(invalid("observer.min_ratio", "ratio must lie in [0, 1]"));
        }
        Ok(ObserverSettings {
            thresholds: o.thresholds.clone(),
            root_margin: o.root_margin,
            min_ratio: o.min_ratio,
        })
    }
}

impl Default for ShowcaseConfig {
    /// Five sections, each with its own model and viewing angle
    fn default() -> Self {
        let models = [
            ("/models/model1.glb", "45deg 75deg 105%"),
            ("/models/model2.glb", "-45deg 75deg 105%"),
            ("/models/model3.glb", "0deg 90deg 120%"),
            ("/models/model4.glb", "180deg 75deg 105%"),
            ("/models/model5.glb", "0deg 45deg 90%"),
        ];
        Self {
            sections: (1..=models.len()).map(|i| format!("section-{i}")).collect(),
            models: models
                .iter()
                .map(|(src, orbit)| ModelEntry {
                    src: src.to_string(),
                    camera_orbit: orbit.to_string(),
                })
                .collect(),
            timings: TimingsConfig::default(),
            dispatch: DispatchConfig::default(),
            observer: ObserverConfig::default(),
        }
    }
}

fn invalid(field: &'static str, message: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        field,
        message: message.to_string(),
    }
}
