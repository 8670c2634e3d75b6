/// Intersection-ratio signal, independent of scroll math
use crate::geometry::{PageLayout, Rect, Viewport};

/// How much of one section is visible inside the observed band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub index: usize,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverSettings {
    /// Ratios at which an update is reported, ascending
    pub thresholds: Vec<f64>,
    /// Fraction of the viewport height removed from both top and bottom
    pub root_margin: f64,
    /// A nomination needs a ratio strictly above this
    pub min_ratio: f64,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            thresholds: vec![0.0, 0.25, 0.5, 0.75, 1.0],
            root_margin: 0.2,
            min_ratio: 0.3,
        }
    }
}

/// Fraction of `rect` inside the band `[band_top, band_bottom]`
pub fn intersection_ratio(rect: Rect, band: (f64, f64)) -> f64 {
    if rect.height <= 0.0 {
        return 0.0;
    }
    (rect.overlap_with(band.0, band.1) / rect.height).clamp(0.0, 1.0)
}

pub struct VisibilityObserver {
    settings: ObserverSettings,
    /// Threshold bucket per section from the previous observation
    buckets: Vec<Option<usize>>,
}

impl VisibilityObserver {
    pub fn new(settings: ObserverSettings) -> Self {
        Self {
            settings,
            buckets: Vec::new(),
        }
    }

    pub fn settings(&self) -> &ObserverSettings {
        &self.settings
    }

    /// Section with the highest ratio in a batch, if it clears the minimum and
    /// is not already the committed index.
    ///
    /// Only a strictly greater ratio replaces the running maximum, so the
    /// earliest entry wins ties.
    pub fn select(&self, entries: &[IntersectionEntry], current: Option<usize>) -> Option<usize> {
        let mut best: Option<IntersectionEntry> = None;
        let mut max_ratio = 0.0;
        for entry in entries {
            if entry.ratio > max_ratio {
                max_ratio = entry.ratio;
                best = Some(*entry);
            }
        }

        let best = best?;
        if best.ratio > self.settings.min_ratio && Some(best.index) != current {
            Some(best.index)
        } else {
            None
        }
    }

    /// Compute the current ratios and report the sections whose threshold
    /// bucket changed since the previous call.
    ///
    /// The first call reports every section.
    pub fn observe<L: PageLayout + ?Sized>(&mut self, layout: &L) -> Vec<IntersectionEntry> {
        let viewport: Viewport = layout.viewport();
        let band = viewport.observed_band(self.settings.root_margin);
        let count = layout.section_count();
        if self.buckets.len() != count {
            self.buckets = vec![None; count];
        }

        let mut entries = Vec::new();
        for index in 0..count {
            let ratio = intersection_ratio(layout.section_rect(index), band);
            let bucket = Some(self.bucket_of(ratio));
            if self.buckets[index] != bucket {
                self.buckets[index] = bucket;
                entries.push(IntersectionEntry { index, ratio });
            }
        }
        entries
    }

    /// Number of thresholds reached. Zero means not intersecting at all.
    fn bucket_of(&self, ratio: f64) -> usize {
        if ratio <= 0.0 {
            return 0;
        }
        self.settings
            .thresholds
            .iter()
            .filter(|t| ratio >= **t)
            .count()
    }
}

impl Default for VisibilityObserver {
    fn default() -> Self {
        Self::new(ObserverSettings::default())
    }
}
