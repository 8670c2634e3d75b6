/// A vertical span in viewport coordinates (top is relative to the viewport top).
/// Shared by the resolver, observer and debug surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Whether any part of the span lies inside a viewport of the given height
    pub fn is_visible_in(&self, viewport_height: f64) -> bool {
        self.top < viewport_height && self.bottom() > 0.0
    }

    /// Visible height of the span inside the band `[band_top, band_bottom]`
    pub fn overlap_with(&self, band_top: f64, band_bottom: f64) -> f64 {
        (self.bottom().min(band_bottom) - self.top.max(band_top)).max(0.0)
    }
}

/// The scrolling viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub height: f64,
}

impl Viewport {
    pub fn new(height: f64) -> Self {
        Self { height }
    }

    pub fn center(&self) -> f64 {
        self.height / 2.0
    }

    /// The band left after shrinking top and bottom by `margin` of the height each
    pub fn observed_band(&self, margin: f64) -> (f64, f64) {
        let inset = self.height * margin;
        (inset, self.height - inset)
    }
}

/// Read access to the live page geometry.
///
/// Implemented by hosts on top of whatever layout facility they have; every
/// call reflects the geometry at the moment of the call.
pub trait PageLayout {
    fn viewport(&self) -> Viewport;
    fn container_rect(&self) -> Rect;
    fn section_count(&self) -> usize;
    fn section_rect(&self, index: usize) -> Rect;

    /// All section rects in order
    fn section_rects(&self) -> Vec<Rect> {
        (0..self.section_count()).map(|i| self.section_rect(i)).collect()
    }
}

/// A frozen copy of page geometry
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub viewport: Viewport,
    pub container: Rect,
    pub sections: Vec<Rect>,
}

impl LayoutSnapshot {
    pub fn new(viewport_height: f64, container: Rect, sections: Vec<Rect>) -> Self {
        Self {
            viewport: Viewport::new(viewport_height),
            container,
            sections,
        }
    }

    /// Sections of equal height stacked back to back inside the container
    pub fn stacked(
        viewport_height: f64,
        container_top: f64,
        section_height: f64,
        count: usize,
    ) -> Self {
        let sections = (0..count)
            .map(|i| Rect::new(container_top + i as f64 * section_height, section_height))
            .collect();
        Self::new(
            viewport_height,
            Rect::new(container_top, section_height * count as f64),
            sections,
        )
    }
}

impl PageLayout for LayoutSnapshot {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn container_rect(&self) -> Rect {
        self.container
    }

    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn section_rect(&self, index: usize) -> Rect {
        self.sections[index]
    }

    fn section_rects(&self) -> Vec<Rect> {
        self.sections.clone()
    }
}
