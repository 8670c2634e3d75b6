/// The model display surface and its notifications
use crate::error::ResourceLoadError;
use crate::orbit::CameraOrbit;
use crate::transform::ViewportStyle;

/// Output side of the engine: the single model viewport plus the section
/// highlight flags. Only the transition controller writes to it.
pub trait ModelSurface {
    /// Resource currently assigned to the viewport
    fn loaded_source(&self) -> Option<String>;
    fn set_source(&mut self, source: &str);
    fn set_camera_orbit(&mut self, orbit: &CameraOrbit);
    fn apply_style(&mut self, style: &ViewportStyle);
    fn set_section_active(&mut self, index: usize, active: bool);
    /// Cosmetic marker toggled once a model finished loading
    fn mark_loaded(&mut self);
}

/// Notifications emitted by the display surface
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    Loaded { source: String },
    Failed(ResourceLoadError),
}

/// In-memory surface that records what was applied to it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceState {
    pub source: Option<String>,
    pub camera_orbit: Option<CameraOrbit>,
    pub style: ViewportStyle,
    pub active_sections: Vec<bool>,
    pub loaded: bool,
    /// Number of times the resource was replaced
    pub source_swaps: usize,
}

impl SurfaceState {
    pub fn new(section_count: usize) -> Self {
        Self {
            active_sections: vec![false; section_count],
            ..Self::default()
        }
    }

    pub fn active_count(&self) -> usize {
        self.active_sections.iter().filter(|a| **a).count()
    }

    pub fn active_section(&self) -> Option<usize> {
        self.active_sections.iter().position(|a| *a)
    }
}

impl ModelSurface for SurfaceState {
    fn loaded_source(&self) -> Option<String> {
        self.source.clone()
    }

    fn set_source(&mut self, source: &str) {
        self.source = Some(source.to_string());
        self.source_swaps += 1;
    }

    fn set_camera_orbit(&mut self, orbit: &CameraOrbit) {
        self.camera_orbit = Some(*orbit);
    }

    fn apply_style(&mut self, style: &ViewportStyle) {
        self.style = *style;
    }

    fn set_section_active(&mut self, index: usize, active: bool) {
        if index >= self.active_sections.len() {
            self.active_sections.resize(index + 1, false);
        }
        self.active_sections[index] = active;
    }

    fn mark_loaded(&mut self) {
        self.loaded = true;
    }
}
