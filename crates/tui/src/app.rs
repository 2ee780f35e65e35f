use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use folio_core::reveal::{
    DEFAULT_CHARACTER_DELAY_MS, EntranceDelay, RevealGate, revealed_characters, stagger_delay_ms,
    visible_ratio,
};
use folio_core::views::ViewMetrics;
use folio_core::views::hero::render_hero;
use folio_core::views::progress_bar::render_progress_bar;
use folio_core::views::section_dots::{DotRail, render_section_dots};
use folio_core::views::showcase::{ShowcaseState, render_showcase};
use folio_core::{
    FolioConfig, FrameThrottle, LayoutProbe, LocalScrollSource, Portfolio, ProjectFilter,
    ScrollEvent, SectionIndicators, SectionTracker, ShowcaseSection, Subscription,
    TrackedSections, align_to_ids, document_progress, scroll_target_for_section,
};
use folio_protocol::{
    Action, Point, RenderCommand, SectionLayout, TextAlign, ThemeToken, Viewport, hit_test,
};
use tracing::debug;

use crate::page::{PAGE_IDS, PAGE_LABELS, Page, SHOWCASE_IDS, ids};

const HERO_START_DELAY: Duration = Duration::from_millis(500);
const FOOTER_ROW_STAGGER_MS: u32 = 120;
const FOOTER_LINES: f64 = 12.0;

/// Which part of the page a layer of commands belongs to. Actions carry
/// indices into different section lists, so hit tests need to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Hero,
    Showcase,
    Footer,
    Dots,
    Progress,
}

/// Commands of one page part, drawn `dy` rows below their own origin.
#[derive(Debug, Clone)]
pub struct Layer {
    pub kind: LayerKind,
    pub commands: Vec<RenderCommand>,
    pub dy: f64,
}

/// Layers in paint order.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub layers: Vec<Layer>,
}

impl Frame {
    /// Topmost layer action under `point`.
    pub fn hit(&self, point: Point) -> Option<(LayerKind, Action)> {
        self.layers.iter().rev().find_map(|layer| {
            let local = Point::new(point.x, point.y - layer.dy);
            hit_test(&layer.commands, local).map(|action| (layer.kind, action))
        })
    }

    /// All layers shifted into screen space, for static export.
    pub fn flatten(&self) -> Vec<RenderCommand> {
        self.layers
            .iter()
            .flat_map(|layer| layer.commands.iter().map(|cmd| shifted(cmd, layer.dy)))
            .collect()
    }
}

fn shifted(cmd: &RenderCommand, dy: f64) -> RenderCommand {
    let mut cmd = cmd.clone();
    match &mut cmd {
        RenderCommand::DrawRect { rect, .. } => rect.y += dy,
        RenderCommand::DrawText { position, .. } => position.y += dy,
        RenderCommand::DrawLine { from, to, .. } => {
            from.y += dy;
            to.y += dy;
        }
        RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
    }
    cmd
}

/// Per-consumer tracker state. Each consumer owns its own tracker.
struct Consumers {
    showcase: RefCell<TrackedSections>,
    dots: RefCell<TrackedSections>,
    indicators: RefCell<SectionIndicators>,
    selection: RefCell<ShowcaseState>,
}

impl Consumers {
    fn new(config: &FolioConfig) -> Self {
        Self {
            showcase: RefCell::new(TrackedSections::new(
                ids(&SHOWCASE_IDS),
                SectionTracker::new("showcase", config.showcase),
            )),
            dots: RefCell::new(TrackedSections::new(
                ids(&PAGE_IDS),
                SectionTracker::new("section-dots", config.section_dots),
            )),
            indicators: RefCell::new(SectionIndicators::new(PAGE_IDS.len())),
            selection: RefCell::new(ShowcaseState::new()),
        }
    }

    fn refresh(&self, page: &Page) {
        if let Some(update) = self.showcase.borrow_mut().refresh(page) {
            self.selection.borrow_mut().apply(&update);
        }
        if let Some(update) = self.dots.borrow_mut().refresh(page)
            && update.active_changed()
        {
            let transitions = self
                .indicators
                .borrow_mut()
                .advance(update.result.active_index);
            for t in transitions {
                debug!(position = t.position, from = ?t.from, to = ?t.to, "indicator");
            }
        }
    }
}

pub struct App {
    config: FolioConfig,
    portfolio: Portfolio,
    metrics: ViewMetrics,
    page: Rc<Page>,
    consumers: Rc<Consumers>,
    throttle: Rc<RefCell<FrameThrottle>>,
    source: Rc<LocalScrollSource>,
    subscription: Option<Subscription<LocalScrollSource>>,
    mounted_at: Duration,
    progress_entrance: EntranceDelay,
    dots_entrance: EntranceDelay,
    footer_gate: RevealGate,
    footer_revealed_at: Option<Duration>,
    hovered_dot: Option<usize>,
    frame: Frame,
}

impl App {
    pub fn new(
        config: FolioConfig,
        portfolio: Portfolio,
        metrics: ViewMetrics,
        viewport: Viewport,
    ) -> Self {
        let page = Rc::new(Page::new(
            viewport.width,
            viewport.height,
            FOOTER_LINES * metrics.line,
        ));
        let consumers = Rc::new(Consumers::new(&config));
        Self {
            throttle: Rc::new(RefCell::new(FrameThrottle::new(config.frame_interval()))),
            progress_entrance: EntranceDelay::new(config.progress_bar_delay()),
            dots_entrance: EntranceDelay::new(config.section_dots_delay()),
            footer_gate: config.reveal,
            config,
            portfolio,
            metrics,
            page,
            consumers,
            source: Rc::new(LocalScrollSource::new()),
            subscription: None,
            mounted_at: Duration::ZERO,
            footer_revealed_at: None,
            hovered_dot: None,
            frame: Frame::default(),
        }
    }

    /// Subscribe to scroll events and compute the first result.
    pub fn mount(&mut self, now: Duration) {
        let page = Rc::clone(&self.page);
        let consumers = Rc::clone(&self.consumers);
        let throttle = Rc::clone(&self.throttle);
        let handler = Box::new(move |event: ScrollEvent| match event {
            ScrollEvent::Mount => consumers.refresh(&page),
            ScrollEvent::Scroll | ScrollEvent::Resize => {
                throttle.borrow_mut().request();
            }
        });
        self.subscription = match Subscription::acquire(&self.source, handler) {
            Ok(subscription) => Some(subscription),
            Err(never) => match never {},
        };
        self.mounted_at = now;
        self.progress_entrance.mount(now);
        self.dots_entrance.mount(now);
    }

    pub fn unmount(&mut self) {
        self.subscription = None;
        self.throttle.borrow_mut().cancel();
        self.progress_entrance.unmount();
        self.dots_entrance.unmount();
    }

    /// Run the pending recomputation if a frame is due.
    pub fn tick(&mut self, now: Duration) {
        if self.throttle.borrow_mut().on_frame(now) {
            self.consumers.refresh(&self.page);
        }
    }

    pub fn scroll_by(&mut self, rows: f64) {
        if self.page.scroll_by(rows * self.metrics.line) {
            self.source.emit(ScrollEvent::Scroll);
        }
    }

    pub fn scroll_step(&mut self, notches: f64) {
        self.scroll_by(notches * self.config.scroll_step);
    }

    pub fn page_by(&mut self, pages: f64) {
        let rows = pages * self.page.viewport().height / self.metrics.line;
        self.scroll_by(rows);
    }

    pub fn scroll_to(&mut self, offset: f64) {
        if self.page.scroll_to(offset) {
            self.source.emit(ScrollEvent::Scroll);
        }
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_to(self.page.max_offset());
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.page.resize(viewport.width, viewport.height);
        self.source.emit(ScrollEvent::Resize);
    }

    /// Move the showcase list selection by `delta` items.
    pub fn select_relative(&mut self, delta: isize) {
        let count = self.active_items();
        let current = self.consumers.selection.borrow().selected_item();
        let next = current.saturating_add_signed(delta).min(count.saturating_sub(1));
        self.consumers.selection.borrow_mut().select(next, count);
    }

    pub fn hover(&mut self, point: Point) {
        self.hovered_dot = match self.frame.hit(point) {
            Some((LayerKind::Dots, Action::ScrollToSection(index))) => Some(index),
            _ => None,
        };
    }

    pub fn click(&mut self, point: Point) {
        let Some((kind, action)) = self.frame.hit(point) else {
            return;
        };
        debug!(?kind, ?action, "click");
        match action {
            Action::ScrollToSection(index) => {
                let (names, layout): (&[&str], SectionLayout) = match kind {
                    LayerKind::Dots => (PAGE_IDS.as_slice(), self.config.section_dots.layout),
                    _ => (SHOWCASE_IDS.as_slice(), self.config.showcase.layout),
                };
                let names = ids(names);
                let sections = align_to_ids(&names, self.page.measure(&names));
                let target = scroll_target_for_section(
                    &sections,
                    index,
                    self.page.viewport().height,
                    &layout,
                );
                self.scroll_to(target);
            }
            Action::SelectItem(index) => {
                let count = self.active_items();
                self.consumers.selection.borrow_mut().select(index, count);
            }
        }
    }

    /// Switch the project panel to the next filter.
    pub fn cycle_project_filter(&mut self) -> ProjectFilter {
        let filter = self.consumers.selection.borrow_mut().cycle_filter();
        debug!(filter = filter.label(), "project filter");
        filter
    }

    fn active_items(&self) -> usize {
        let active = self.consumers.showcase.borrow().tracker().current().active_index;
        let filter = self.consumers.selection.borrow().project_filter();
        ShowcaseSection::at(active)
            .map_or(0, |section| self.portfolio.showcase_items(section, filter).len())
    }

    /// Build the layers for this frame and keep them for hit testing.
    pub fn render(&mut self, now: Duration) -> &Frame {
        let viewport = self.page.viewport();
        let offset = self.page.offset();
        let metrics = self.metrics;
        let mut layers = Vec::new();

        if offset < viewport.height {
            let name_len = self.portfolio.profile.name.chars().count();
            let revealed = revealed_characters(
                name_len,
                now.saturating_sub(self.mounted_at),
                Duration::from_millis(DEFAULT_CHARACTER_DELAY_MS),
                HERO_START_DELAY,
            );
            layers.push(Layer {
                kind: LayerKind::Hero,
                commands: render_hero(&viewport, &metrics, &self.portfolio.profile, revealed),
                dy: -offset,
            });
        }

        let showcase_top = self.page.showcase_screen_top();
        if showcase_top < viewport.height && showcase_top > -viewport.height {
            let result = self.consumers.showcase.borrow().tracker().current();
            layers.push(Layer {
                kind: LayerKind::Showcase,
                commands: render_showcase(
                    &viewport,
                    &metrics,
                    &self.portfolio,
                    &self.consumers.selection.borrow(),
                    &result,
                ),
                dy: showcase_top,
            });
        }

        let footer_top = self.page.footer_top();
        let footer_bottom = self.page.document_height();
        let ratio = visible_ratio(footer_top, footer_bottom, offset, viewport.height);
        if self.footer_gate.observe(ratio) {
            let revealed_at = *self.footer_revealed_at.get_or_insert(now);
            layers.push(Layer {
                kind: LayerKind::Footer,
                commands: self.render_footer(&viewport, now.saturating_sub(revealed_at)),
                dy: footer_top - offset,
            });
        }

        let dots = self.consumers.dots.borrow();
        let progress = dots.tracker().current().progress_within_section;
        layers.push(Layer {
            kind: LayerKind::Dots,
            commands: render_section_dots(
                &viewport,
                &metrics,
                &DotRail {
                    labels: &PAGE_LABELS,
                    indicators: &self.consumers.indicators.borrow(),
                    progress,
                    hovered: self.hovered_dot,
                    visible: self.dots_entrance.is_visible(now),
                },
            ),
            dy: 0.0,
        });
        drop(dots);

        layers.push(Layer {
            kind: LayerKind::Progress,
            commands: render_progress_bar(
                &viewport,
                &metrics,
                document_progress(&self.page.scroll_state()),
                self.progress_entrance.is_visible(now),
            ),
            dy: 0.0,
        });

        self.frame = Frame { layers };
        &self.frame
    }

    /// Contact block; rows fade in one after another once revealed.
    fn render_footer(&self, viewport: &Viewport, since_reveal: Duration) -> Vec<RenderCommand> {
        let profile = &self.portfolio.profile;
        let rows = [
            ("Get in Touch".to_owned(), ThemeToken::TextMuted),
            (profile.links.email.clone(), ThemeToken::AccentBright),
            (profile.links.github.clone(), ThemeToken::TextSecondary),
            (profile.links.linkedin.clone(), ThemeToken::TextSecondary),
            (format!("© {}", profile.name), ThemeToken::TextMuted),
        ];
        let elapsed = u32::try_from(since_reveal.as_millis()).unwrap_or(u32::MAX);
        let line = self.metrics.line;
        let mut commands = vec![RenderCommand::BeginGroup {
            id: "contact".into(),
            label: Some("Contact".into()),
        }];
        for (index, (text, color)) in rows.into_iter().enumerate() {
            if elapsed < stagger_delay_ms(0, index, FOOTER_ROW_STAGGER_MS) {
                break;
            }
            commands.push(RenderCommand::DrawText {
                position: Point::new(viewport.width / 2.0, line * (2.0 + 2.0 * index as f64)),
                text,
                color,
                font_size: self.metrics.font_size,
                align: TextAlign::Center,
            });
        }
        commands.push(RenderCommand::EndGroup);
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let portfolio = Portfolio::bundled().expect("bundled content");
        let mut app = App::new(
            FolioConfig::default(),
            portfolio,
            ViewMetrics::CELLS,
            Viewport::new(120.0, 30.0),
        );
        app.mount(Duration::ZERO);
        app
    }

    fn layer(frame: &Frame, kind: LayerKind) -> Option<&Layer> {
        frame.layers.iter().find(|layer| layer.kind == kind)
    }

    #[test]
    fn chrome_waits_for_entrance_delays() {
        let mut app = app();
        let frame = app.render(Duration::from_millis(100));
        assert!(layer(frame, LayerKind::Dots).is_some_and(|l| l.commands.is_empty()));
        assert!(layer(frame, LayerKind::Progress).is_some_and(|l| l.commands.is_empty()));

        let frame = app.render(Duration::from_secs(4));
        assert!(layer(frame, LayerKind::Dots).is_some_and(|l| !l.commands.is_empty()));
        assert!(layer(frame, LayerKind::Progress).is_some_and(|l| !l.commands.is_empty()));
    }

    #[test]
    fn scroll_burst_recomputes_once_per_frame() {
        let mut app = app();
        app.scroll_by(20.0);
        app.scroll_by(20.0);
        assert!(app.throttle.borrow().is_pending());
        app.tick(Duration::from_millis(16));
        assert!(!app.throttle.borrow().is_pending());
        // offset 40 with a 30-row viewport: (40 - 30) / 30 into the showcase
        let result = app.consumers.showcase.borrow().tracker().current();
        assert_eq!(result.active_index, 0);
        assert!(result.content_visible);
    }

    #[test]
    fn clicking_a_dot_scrolls_to_its_section() {
        let mut app = app();
        let now = Duration::from_secs(5);
        let frame = app.render(now);
        let dots = layer(frame, LayerKind::Dots).expect("dot layer");
        let target = dots
            .commands
            .iter()
            .find_map(|c| match c {
                RenderCommand::DrawRect {
                    rect,
                    action: Some(Action::ScrollToSection(5)),
                    ..
                } => Some(Point::new(rect.x, rect.y)),
                _ => None,
            })
            .expect("contact dot");
        app.click(target);
        assert_eq!(app.page.offset(), app.page.max_offset());
        app.tick(Duration::from_secs(6));
        assert_eq!(app.consumers.indicators.borrow().active(), 5);
    }

    #[test]
    fn footer_reveals_once_scrolled_into_view() {
        let mut app = app();
        app.scroll_to_end();
        app.tick(Duration::from_millis(16));
        let frame = app.render(Duration::from_secs(5));
        let footer = layer(frame, LayerKind::Footer).expect("footer layer");
        let first = footer
            .commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawText { .. }))
            .count();
        assert_eq!(first, 1);

        let frame = app.render(Duration::from_secs(6));
        let footer = layer(frame, LayerKind::Footer).expect("footer layer");
        let all = footer
            .commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawText { .. }))
            .count();
        assert_eq!(all, 5);
    }

    #[test]
    fn project_filter_limits_selectable_items() {
        let mut app = app();
        assert_eq!(app.cycle_project_filter(), ProjectFilter::Featured);
        let featured = app
            .portfolio
            .projects_matching(ProjectFilter::Featured)
            .count()
            .min(folio_core::content::SHOWCASE_PROJECT_LIMIT);
        assert_eq!(app.active_items(), featured);

        app.select_relative(100);
        let selected = app.consumers.selection.borrow().selected_item();
        assert_eq!(selected, featured - 1);
    }

    #[test]
    fn unmount_releases_listener() {
        let mut app = app();
        assert_eq!(app.source.listener_count(), 1);
        app.unmount();
        assert_eq!(app.source.listener_count(), 0);
        app.scroll_by(10.0);
        assert!(!app.throttle.borrow().is_pending());
    }

    #[test]
    fn flatten_shifts_layers_to_screen() {
        let mut app = app();
        app.scroll_by(5.0);
        let frame = app.render(Duration::from_secs(5));
        let hero_text = frame
            .flatten()
            .into_iter()
            .find_map(|c| match c {
                RenderCommand::DrawText { position, .. } => Some(position.y),
                _ => None,
            })
            .expect("hero text");
        // hero name sits two rows above the centre, shifted up by 5
        assert_eq!(hero_text, 15.0 - 2.0 - 5.0);
    }
}
