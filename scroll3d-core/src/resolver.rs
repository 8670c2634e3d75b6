/// Scroll position to active section resolution
///
/// Two independent strategies, each a pure function of the page geometry:
///
/// - **ratio**: how far the container has scrolled past the viewport,
///   bucketed into `section_count` equal slices;
/// - **proximity**: which visible section has its center nearest the
///   viewport center.
///
/// [`resolve`] prefers proximity and falls back to ratio only when no section
/// is visible.
use crate::geometry::{PageLayout, Rect, Viewport};

/// Fraction of the container scrolled past the viewport top, in `[0, 1]`.
///
/// A container that is not taller than the viewport has no scroll range and
/// reports 0.
pub fn scroll_progress(container: Rect, viewport: Viewport) -> f64 {
    let range = container.height - viewport.height;
    if range <= 0.0 {
        return 0.0;
    }
    (-container.top / range).clamp(0.0, 1.0)
}

/// Section index from the container's scroll progress.
///
/// `None` when the container is entirely outside the viewport or there are no
/// sections.
pub fn ratio_index(container: Rect, viewport: Viewport, section_count: usize) -> Option<usize> {
    if section_count == 0 {
        return None;
    }
    if container.top > viewport.height || container.bottom() < 0.0 {
        return None;
    }

    let progress = scroll_progress(container, viewport);
    let index = (progress * section_count as f64).floor() as usize;
    Some(index.min(section_count - 1))
}

/// Index of the visible section whose center is closest to the viewport center.
///
/// Ties go to the lowest index. `None` when nothing is visible.
pub fn proximity_index(sections: &[Rect], viewport: Viewport) -> Option<usize> {
    let center = viewport.center();
    let mut best: Option<(usize, f64)> = None;

    for (index, rect) in sections.iter().enumerate() {
        if !rect.is_visible_in(viewport.height) {
            continue;
        }
        let distance = (rect.center() - center).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }

    best.map(|(index, _)| index)
}

/// Prefer the proximity result, fall back to the ratio result
pub fn reconcile(proximity: Option<usize>, ratio: Option<usize>) -> Option<usize> {
    proximity.or(ratio)
}

/// Active section for the current page geometry
pub fn resolve<L: PageLayout + ?Sized>(layout: &L) -> Option<usize> {
    let viewport = layout.viewport();
    let sections = layout.section_rects();
    let proximity = proximity_index(&sections, viewport);
    let ratio = ratio_index(layout.container_rect(), viewport, sections.len());
    let resolved = reconcile(proximity, ratio);
    log::trace!(
        "resolve: proximity={:?} ratio={:?} -> {:?}",
        proximity,
        ratio,
        resolved
    );
    resolved
}
