/// Visual state of the model viewport during transitions
use nalgebra::{Matrix4, Vector3};
use std::time::Duration;

/// Opacity, scale and yaw applied to the viewport element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportStyle {
    pub opacity: f64,
    pub scale: f64,
    /// Rotation around the vertical axis, in degrees
    pub rotate_y: f64,
    /// Length of the eased style transition towards this state
    pub transition: Option<Duration>,
}

impl ViewportStyle {
    /// Fully shown, untransformed
    pub fn shown() -> Self {
        Self {
            opacity: 1.0,
            scale: 1.0,
            rotate_y: 0.0,
            transition: None,
        }
    }

    /// Dimmed, shrunk and turned away while a model is being swapped
    pub fn faded() -> Self {
        Self {
            opacity: 0.2,
            scale: 0.9,
            rotate_y: 15.0,
            transition: None,
        }
    }

    pub fn with_transition(mut self, duration: Duration) -> Self {
        self.transition = Some(duration);
        self
    }

    /// Scale then yaw, matching `scale(s) rotateY(a)`
    pub fn matrix(&self) -> Matrix4<f64> {
        let scale = Matrix4::new_scaling(self.scale);
        let yaw = Matrix4::new_rotation(Vector3::new(0.0, self.rotate_y.to_radians(), 0.0));
        scale * yaw
    }

    /// Share of its full width the viewport covers on screen once scaled and turned
    pub fn footprint(&self) -> f64 {
        self.matrix()[(0, 0)].abs()
    }

    /// CSS `transform` value
    pub fn css_transform(&self) -> String {
        format!("scale({}) rotateY({}deg)", self.scale, self.rotate_y)
    }

    /// CSS `matrix3d(...)` of [`Self::matrix`], column-major as CSS expects
    pub fn css_matrix3d(&self) -> String {
        let values: Vec<String> = self.matrix().iter().map(|v| format!("{:.6}", v)).collect();
        format!("matrix3d({})", values.join(", "))
    }

    /// CSS `transition` value, if any
    pub fn css_transition(&self) -> Option<String> {
        self.transition.map(|d| {
            let secs = d.as_secs_f64();
            format!("opacity {secs}s ease, transform {secs}s ease")
        })
    }
}

impl Default for ViewportStyle {
    fn default() -> Self {
        Self::shown()
    }
}
