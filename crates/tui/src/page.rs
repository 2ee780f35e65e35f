//! The page as a tall column: a hero, four sticky showcase segments of
//! one viewport each, and a contact footer.

use std::cell::Cell;

use folio_core::LayoutProbe;
use folio_protocol::{ScrollState, SectionBounds, Viewport};

pub const SHOWCASE_IDS: [&str; 4] = ["projects", "experience", "skills", "background"];
pub const PAGE_IDS: [&str; 6] = [
    "home",
    "projects",
    "experience",
    "skills",
    "background",
    "contact",
];
pub const PAGE_LABELS: [&str; 6] = [
    "Home",
    "Projects",
    "Experience",
    "Skills",
    "Background",
    "Contact",
];

pub fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

pub struct Page {
    offset: Cell<f64>,
    width: Cell<f64>,
    height: Cell<f64>,
    footer_height: f64,
}

impl Page {
    pub fn new(width: f64, height: f64, footer_height: f64) -> Self {
        Self {
            offset: Cell::new(0.0),
            width: Cell::new(width),
            height: Cell::new(height),
            footer_height,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width.get(), self.height.get())
    }

    pub fn offset(&self) -> f64 {
        self.offset.get()
    }

    pub fn showcase_top(&self) -> f64 {
        self.height.get()
    }

    pub fn footer_top(&self) -> f64 {
        self.showcase_top() + SHOWCASE_IDS.len() as f64 * self.height.get()
    }

    pub fn document_height(&self) -> f64 {
        self.footer_top() + self.footer_height
    }

    pub fn max_offset(&self) -> f64 {
        (self.document_height() - self.height.get()).max(0.0)
    }

    /// Screen row of the showcase panel. It scrolls in, stays pinned while
    /// its segments pass, then scrolls out.
    pub fn showcase_screen_top(&self) -> f64 {
        let offset = self.offset();
        let top = self.showcase_top();
        let pinned_until = self.footer_top() - self.height.get();
        if offset < top {
            top - offset
        } else if offset <= pinned_until {
            0.0
        } else {
            pinned_until - offset
        }
    }

    /// Returns whether the offset moved.
    pub fn scroll_to(&self, offset: f64) -> bool {
        let clamped = offset.clamp(0.0, self.max_offset());
        let moved = clamped != self.offset.get();
        self.offset.set(clamped);
        moved
    }

    pub fn scroll_by(&self, delta: f64) -> bool {
        self.scroll_to(self.offset() + delta)
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.width.set(width);
        self.height.set(height);
        self.scroll_to(self.offset());
    }

    fn bounds_of(&self, id: &str) -> Option<SectionBounds> {
        let height = self.height.get();
        let (start, end) = match id {
            "home" => (0.0, height),
            "contact" => (self.footer_top(), self.document_height()),
            _ => {
                let index = SHOWCASE_IDS.iter().position(|known| *known == id)?;
                let start = self.showcase_top() + index as f64 * height;
                (start, start + height)
            }
        };
        Some(SectionBounds::new(id, start, end))
    }
}

impl LayoutProbe for Page {
    fn scroll_state(&self) -> ScrollState {
        ScrollState::new(self.offset(), self.height.get())
            .with_document_height(self.document_height())
    }

    fn measure(&self, ids: &[String]) -> Vec<SectionBounds> {
        ids.iter().filter_map(|id| self.bounds_of(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showcase_pins_while_its_segments_pass() {
        let page = Page::new(80.0, 20.0, 10.0);
        assert_eq!(page.showcase_screen_top(), 20.0);
        page.scroll_to(10.0);
        assert_eq!(page.showcase_screen_top(), 10.0);
        page.scroll_to(50.0);
        assert_eq!(page.showcase_screen_top(), 0.0);
        page.scroll_to(80.0);
        assert_eq!(page.showcase_screen_top(), 0.0);
        page.scroll_to(90.0);
        assert_eq!(page.showcase_screen_top(), -10.0);
    }

    #[test]
    fn scrolling_is_clamped_to_document() {
        let page = Page::new(80.0, 20.0, 10.0);
        assert!(!page.scroll_by(-5.0));
        assert!(page.scroll_to(1000.0));
        assert_eq!(page.offset(), page.max_offset());
        assert_eq!(page.max_offset(), 90.0);
    }

    #[test]
    fn measures_known_sections_in_order() {
        let page = Page::new(80.0, 20.0, 10.0);
        let bounds = page.measure(&ids(&PAGE_IDS));
        assert_eq!(bounds.len(), PAGE_IDS.len());
        assert_eq!(bounds[1].boundary_start, 20.0);
        assert_eq!(bounds[5].boundary_end, 110.0);
        assert!(page.measure(&ids(&["missing"])).is_empty());
    }
}
