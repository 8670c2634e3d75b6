/// Diagnostic inspection of a running engine
use std::fmt;
use std::time::Duration;

use crate::engine::ShowcaseEngine;
use crate::geometry::PageLayout;
use crate::resolver;
use crate::surface::ModelSurface;
use crate::transition::{Activation, Rejection};

/// Geometry of one section as seen from the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionPosition {
    pub index: usize,
    pub top: f64,
    pub bottom: f64,
    pub height: f64,
    pub visible: bool,
    pub center: f64,
}

impl fmt::Display for SectionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "section {}: top={:.0} bottom={:.0} height={:.0} visible={} center={:.0}",
            self.index + 1,
            self.top,
            self.bottom,
            self.height,
            self.visible,
            self.center
        )
    }
}

pub fn section_positions<L: PageLayout + ?Sized>(layout: &L) -> Vec<SectionPosition> {
    let viewport = layout.viewport();
    layout
        .section_rects()
        .into_iter()
        .enumerate()
        .map(|(index, rect)| SectionPosition {
            index,
            top: rect.top,
            bottom: rect.bottom(),
            height: rect.height,
            visible: rect.is_visible_in(viewport.height),
            center: rect.center(),
        })
        .collect()
}

/// `0.5` renders as `"50.0%"`
pub fn format_progress(progress: f64) -> String {
    format!("{:.1}%", progress * 100.0)
}

/// Borrowed view over an engine for the debug surface
pub struct Inspector<'a> {
    engine: &'a mut ShowcaseEngine,
}

impl<'a> Inspector<'a> {
    pub fn new(engine: &'a mut ShowcaseEngine) -> Self {
        Self { engine }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.engine.current_index()
    }

    /// Manual activation. Negative or too-large indices are ignored.
    pub fn activate<S: ModelSurface + ?Sized>(
        &mut self,
        index: i64,
        now: Duration,
        surface: &mut S,
    ) -> Activation {
        log::info!("manual activation requested: {}", index);
        match usize::try_from(index) {
            Ok(index) => self.engine.request_activate(index, now, surface),
            Err(_) => Activation::Ignored(Rejection::OutOfRange),
        }
    }

    pub fn scroll_progress<L: PageLayout + ?Sized>(&self, layout: &L) -> f64 {
        let progress = resolver::scroll_progress(layout.container_rect(), layout.viewport());
        log::debug!("scroll progress: {}", format_progress(progress));
        progress
    }

    pub fn section_positions<L: PageLayout + ?Sized>(&self, layout: &L) -> Vec<SectionPosition> {
        let positions = section_positions(layout);
        for position in &positions {
            log::debug!("{}", position);
        }
        positions
    }
}
