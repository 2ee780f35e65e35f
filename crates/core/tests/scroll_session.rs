//! Integration test: drive a page through mount, throttled scroll bursts,
//! a layout shift, and unmount, the way a host front end does.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use folio_core::views::ViewMetrics;
use folio_core::views::section_dots::{DotRail, render_section_dots};
use folio_core::views::showcase::{ShowcaseState, render_showcase};
use folio_core::{
    FrameThrottle, LayoutProbe, LocalScrollSource, Portfolio, ProjectFilter, ScrollEvent,
    SectionIndicators, SectionTracker, ShowcaseSection, Subscription, TrackedSections,
    scroll_target_for_section,
};
use folio_protocol::{
    Action, Point, RenderCommand, ScrollState, SectionBounds, SectionLayout, TrackerConfig,
    Viewport, hit_test,
};

const VIEWPORT: f64 = 600.0;

/// A page with a hero followed by four viewport-tall showcase segments.
struct Page {
    offset: Cell<f64>,
    hero_height: Cell<f64>,
}

impl Page {
    fn new() -> Self {
        Self {
            offset: Cell::new(0.0),
            hero_height: Cell::new(VIEWPORT),
        }
    }
}

impl LayoutProbe for Page {
    fn scroll_state(&self) -> ScrollState {
        let document = self.hero_height.get() + 4.0 * VIEWPORT + VIEWPORT;
        ScrollState::new(self.offset.get(), VIEWPORT).with_document_height(document)
    }

    fn measure(&self, ids: &[String]) -> Vec<SectionBounds> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let start = self.hero_height.get() + i as f64 * VIEWPORT;
                SectionBounds::new(id.clone(), start, start + VIEWPORT)
            })
            .collect()
    }
}

fn showcase_ids() -> Vec<String> {
    ["projects", "experience", "skills", "background"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

struct Host {
    page: Rc<Page>,
    tracked: Rc<RefCell<TrackedSections>>,
    throttle: Rc<RefCell<FrameThrottle>>,
    frames_requested: Rc<Cell<usize>>,
}

impl Host {
    fn new() -> Self {
        Self {
            page: Rc::new(Page::new()),
            tracked: Rc::new(RefCell::new(TrackedSections::new(
                showcase_ids(),
                SectionTracker::new("showcase", TrackerConfig::default()),
            ))),
            throttle: Rc::new(RefCell::new(FrameThrottle::default())),
            frames_requested: Rc::new(Cell::new(0)),
        }
    }

    fn mount(&self, source: &Rc<LocalScrollSource>) -> Subscription<LocalScrollSource> {
        let page = Rc::clone(&self.page);
        let tracked = Rc::clone(&self.tracked);
        let throttle = Rc::clone(&self.throttle);
        let frames = Rc::clone(&self.frames_requested);
        let handler = Box::new(move |event: ScrollEvent| match event {
            ScrollEvent::Mount => {
                tracked.borrow_mut().refresh(page.as_ref());
            }
            ScrollEvent::Scroll | ScrollEvent::Resize => {
                if throttle.borrow_mut().request() {
                    frames.set(frames.get() + 1);
                }
            }
        });
        match Subscription::acquire(source, handler) {
            Ok(sub) => sub,
            Err(never) => match never {},
        }
    }

    fn frame(&self, now_ms: u64) {
        if self
            .throttle
            .borrow_mut()
            .on_frame(Duration::from_millis(now_ms))
        {
            self.tracked.borrow_mut().refresh(self.page.as_ref());
        }
    }

    fn active(&self) -> usize {
        self.tracked.borrow().tracker().current().active_index
    }
}

#[test]
fn mount_scroll_burst_and_unmount() {
    let source = Rc::new(LocalScrollSource::new());
    let host = Host::new();

    let subscription = host.mount(&source);
    assert_eq!(source.listener_count(), 1);
    assert_eq!(host.active(), 0);

    // A burst of scroll events inside one frame schedules a single callback.
    for offset in [700.0, 900.0, 1300.0] {
        host.page.offset.set(offset);
        source.emit(ScrollEvent::Scroll);
    }
    assert_eq!(host.frames_requested.get(), 1);
    host.frame(16);
    // (1300 - 600) / 600 = 1.17
    assert_eq!(host.active(), 1);

    subscription.release();
    assert_eq!(source.listener_count(), 0);

    host.page.offset.set(2500.0);
    source.emit(ScrollEvent::Scroll);
    host.frame(48);
    assert_eq!(host.frames_requested.get(), 1);
    assert_eq!(host.active(), 1);
}

#[test]
fn resize_recomputes_from_fresh_layout() {
    let source = Rc::new(LocalScrollSource::new());
    let host = Host::new();
    let _subscription = host.mount(&source);

    host.page.offset.set(1900.0);
    source.emit(ScrollEvent::Scroll);
    host.frame(16);
    // (1900 - 600) / 600 = 2.17
    assert_eq!(host.active(), 2);

    // The hero grows on a narrower window; the same offset is now earlier
    // in the showcase.
    host.page.hero_height.set(1200.0);
    source.emit(ScrollEvent::Resize);
    host.frame(40);
    assert_eq!(host.active(), 1);
}

#[test]
fn dropping_the_subscription_releases_the_listener() {
    let source = Rc::new(LocalScrollSource::new());
    let host = Host::new();
    {
        let _subscription = host.mount(&source);
        assert_eq!(source.listener_count(), 1);
    }
    assert_eq!(source.listener_count(), 0);
}

#[test]
fn clicking_a_dot_lands_in_its_section() {
    let page = Page::new();
    let ids = showcase_ids();
    let sections = page.measure(&ids);
    let mut indicators = SectionIndicators::new(ids.len());
    let labels = ["Projects", "Experience", "Skills", "Background"];
    let viewport = Viewport::new(1000.0, VIEWPORT);

    let commands = render_section_dots(
        &viewport,
        &ViewMetrics::PIXELS,
        &DotRail {
            labels: &labels,
            indicators: &indicators,
            progress: 0.0,
            hovered: None,
            visible: true,
        },
    );
    let third_dot = commands
        .iter()
        .filter_map(|c| match c {
            RenderCommand::DrawRect {
                rect,
                action: Some(Action::ScrollToSection(2)),
                ..
            } => Some(*rect),
            _ => None,
        })
        .next()
        .expect("dot for the third section");
    let center = Point::new(
        third_dot.x + third_dot.w / 2.0,
        third_dot.y + third_dot.h / 2.0,
    );
    let Some(Action::ScrollToSection(index)) = hit_test(&commands, center) else {
        panic!("dot click should navigate");
    };

    let target = scroll_target_for_section(&sections, index, VIEWPORT, &SectionLayout::VirtualGrid);
    page.offset.set(target);

    let mut tracker = SectionTracker::new("dots", TrackerConfig::default());
    let update = tracker
        .update(&page.measure(&ids), &page.scroll_state())
        .expect("first update");
    assert_eq!(update.result.active_index, 2);
    assert!(!update.result.content_visible);

    let transitions = indicators.advance(update.result.active_index);
    assert_eq!(transitions.len(), 3);
}

#[test]
fn showcase_selection_follows_active_section() {
    let portfolio = Portfolio::bundled().expect("bundled content");
    let page = Page::new();
    let ids = showcase_ids();
    let viewport = Viewport::new(160.0, 50.0);
    let mut tracker = SectionTracker::new("showcase", TrackerConfig::default());
    let mut state = ShowcaseState::new();

    // Into the projects panel far enough to reveal its content.
    page.offset.set(600.0 + 0.5 * VIEWPORT);
    let update = tracker
        .update(&page.measure(&ids), &page.scroll_state())
        .expect("first update");
    state.apply(&update);
    assert!(update.result.content_visible);

    let commands = render_showcase(
        &viewport,
        &ViewMetrics::CELLS,
        &portfolio,
        &state,
        &update.result,
    );
    let second_row = commands
        .iter()
        .find_map(|c| match c {
            RenderCommand::DrawRect {
                rect,
                action: Some(Action::SelectItem(1)),
                ..
            } => Some(*rect),
            _ => None,
        })
        .expect("second list row");
    let hit = hit_test(&commands, Point::new(second_row.x + 1.0, second_row.y + 0.5));
    assert_eq!(hit, Some(Action::SelectItem(1)));
    let items = portfolio.showcase_items(ShowcaseSection::Projects, ProjectFilter::All);
    assert!(state.select(1, items.len()));

    page.offset.set(600.0 + 1.5 * VIEWPORT);
    let update = tracker
        .update(&page.measure(&ids), &page.scroll_state())
        .expect("moved to experience");
    state.apply(&update);
    assert_eq!(state.active_section(), 1);
    assert_eq!(state.selected_item(), 0);
}

