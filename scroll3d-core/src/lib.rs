/// scroll3d core library - scroll-driven model showcase engine
///
/// This library maps scroll position over a fixed list of page sections to a
/// single active section and drives the model viewport transitions for it.
/// It never reads a clock or touches a platform API: hosts pass timestamps
/// and implement the layout and surface traits.

pub mod config;
pub mod debug;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod observer;
pub mod orbit;
pub mod registry;
pub mod resolver;
pub mod surface;
pub mod transform;
pub mod transition;

// Re-export commonly used types
pub use config::ShowcaseConfig;
pub use debug::{Inspector, SectionPosition};
pub use engine::ShowcaseEngine;
pub use error::{ConfigError, ResourceLoadError};
pub use geometry::{LayoutSnapshot, PageLayout, Rect, Viewport};
pub use observer::IntersectionEntry;
pub use orbit::CameraOrbit;
pub use registry::{ModelBinding, SectionRegistry};
pub use surface::{ModelEvent, ModelSurface, SurfaceState};
pub use transform::ViewportStyle;
pub use transition::{Activation, Phase, Rejection};
