/// A scrollable page of text panels laid out in terminal rows
use scroll3d_core::{PageLayout, Rect, Viewport};

/// Which part of the page a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Header,
    Section { index: usize, row: usize },
    Footer,
    Beyond,
}

/// Header, the section container, and a footer, stacked vertically
#[derive(Debug, Clone)]
pub struct VirtualPage {
    pub viewport_rows: usize,
    pub header_rows: usize,
    pub section_rows: usize,
    pub footer_rows: usize,
    pub section_count: usize,
    /// Rows scrolled past the top of the page
    pub scroll: usize,
}

impl VirtualPage {
    pub fn new(viewport_rows: usize, section_rows: usize, section_count: usize) -> Self {
        Self {
            viewport_rows,
            header_rows: viewport_rows / 2,
            section_rows: section_rows.max(1),
            footer_rows: viewport_rows / 2,
            section_count,
            scroll: 0,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.header_rows + self.section_rows * self.section_count + self.footer_rows
    }

    pub fn max_scroll(&self) -> usize {
        self.total_rows().saturating_sub(self.viewport_rows)
    }

    /// Move by `delta` rows, clamped to the page. Returns whether anything moved.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let target = (self.scroll as isize + delta).clamp(0, self.max_scroll() as isize) as usize;
        let moved = target != self.scroll;
        self.scroll = target;
        moved
    }

    pub fn scroll_to(&mut self, row: usize) -> bool {
        let target = row.min(self.max_scroll());
        let moved = target != self.scroll;
        self.scroll = target;
        moved
    }

    /// Scroll so that section `index` starts at the top of the viewport
    pub fn scroll_to_section(&mut self, index: usize) -> bool {
        self.scroll_to(self.header_rows + index * self.section_rows)
    }

    pub fn resize(&mut self, viewport_rows: usize) {
        self.viewport_rows = viewport_rows;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Region shown at screen row `y`
    pub fn region_at(&self, y: usize) -> Region {
        let row = self.scroll + y;
        let container_end = self.header_rows + self.section_rows * self.section_count;
        if row < self.header_rows {
            Region::Header
        } else if row < container_end {
            let offset = row - self.header_rows;
            Region::Section {
                index: offset / self.section_rows,
                row: offset % self.section_rows,
            }
        } else if row < self.total_rows() {
            Region::Footer
        } else {
            Region::Beyond
        }
    }
}

impl PageLayout for VirtualPage {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_rows as f64)
    }

    fn container_rect(&self) -> Rect {
        Rect::new(
            self.header_rows as f64 - self.scroll as f64,
            (self.section_rows * self.section_count) as f64,
        )
    }

    fn section_count(&self) -> usize {
        self.section_count
    }

    fn section_rect(&self, index: usize) -> Rect {
        let container = self.container_rect();
        Rect::new(
            container.top + (index * self.section_rows) as f64,
            self.section_rows as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scroll3d_core::resolver;

    #[test]
    fn test_scroll_is_clamped() {
        let mut page = VirtualPage::new(20, 20, 5);
        assert_eq!(page.total_rows(), 120);
        assert!(!page.scroll_by(-5));
        assert!(page.scroll_by(1000));
        assert_eq!(page.scroll, 100);
    }

    #[test]
    fn test_regions() {
        let mut page = VirtualPage::new(20, 20, 5);
        assert_eq!(page.region_at(0), Region::Header);
        assert_eq!(page.region_at(10), Region::Section { index: 0, row: 0 });
        page.scroll_to_section(2);
        assert_eq!(page.region_at(0), Region::Section { index: 2, row: 0 });
        assert_eq!(page.region_at(19), Region::Section { index: 2, row: 19 });
    }

    #[test]
    fn test_layout_feeds_resolver() {
        let mut page = VirtualPage::new(20, 20, 5);
        page.scroll_to_section(3);
        assert_eq!(page.section_rect(3).top, 0.0);
        assert_eq!(resolver::resolve(&page), Some(3));
    }
}
