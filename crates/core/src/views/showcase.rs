use folio_protocol::{
    Action, Point, Rect, RenderCommand, TextAlign, ThemeToken, TrackerResult, Viewport,
};

use crate::consumer::TrackerUpdate;
use crate::content::{Portfolio, ProjectFilter, ShowcaseItem, ShowcaseSection};
use crate::indicator::IndicatorState;
use crate::tracker::clamp_unit;

use super::{ViewMetrics, text, truncate, wrap_text};

const STEP_COLUMN_SHARE: f64 = 0.22;
const DETAIL_SHARE: f64 = 0.6;
const TECH_SHOWN: usize = 5;
const METRICS_SHOWN: usize = 2;

/// Selection held by the showcase between frames.
///
/// Whenever the active section changes the list selection goes back to the
/// first item, since the list now shows a different panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShowcaseState {
    active_section: usize,
    selected_item: usize,
    project_filter: ProjectFilter,
}

impl ShowcaseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_section(&self) -> usize {
        self.active_section
    }

    pub fn selected_item(&self) -> usize {
        self.selected_item
    }

    pub fn project_filter(&self) -> ProjectFilter {
        self.project_filter
    }

    /// Move to the next project filter. The list changes, so the selection
    /// starts over.
    pub fn cycle_filter(&mut self) -> ProjectFilter {
        self.project_filter = self.project_filter.next();
        self.selected_item = 0;
        self.project_filter
    }

    pub fn apply(&mut self, update: &TrackerUpdate) {
        if update.active_changed() && update.result.active_index != self.active_section {
            self.active_section = update.result.active_index;
            self.selected_item = 0;
        }
    }

    /// Select a list item. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize, item_count: usize) -> bool {
        if index >= item_count || index == self.selected_item {
            return false;
        }
        self.selected_item = index;
        true
    }
}

/// Render the sticky showcase: pills, numbered steps, and once revealed the
/// detail and list panels of the active section.
pub fn render_showcase(
    viewport: &Viewport,
    metrics: &ViewMetrics,
    portfolio: &Portfolio,
    state: &ShowcaseState,
    result: &TrackerResult,
) -> Vec<RenderCommand> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Vec::new();
    }
    let last = ShowcaseSection::ALL.len() - 1;
    let active = result.active_index.min(last);
    let section = ShowcaseSection::ALL[active];

    let mut commands = Vec::with_capacity(64);
    commands.push(RenderCommand::BeginGroup {
        id: "showcase".into(),
        label: Some("Showcase".into()),
    });
    commands.push(plain_rect(
        Rect::new(0.0, 0.0, viewport.width, viewport.height),
        ThemeToken::Background,
    ));

    let pad = 2.0 * metrics.char_width;
    render_pills(&mut commands, metrics, pad, active, result.progress_within_section);

    let step_width = (viewport.width * STEP_COLUMN_SHARE).max(16.0 * metrics.char_width);
    render_steps(&mut commands, metrics, pad, step_width, active);

    let content = Rect::new(
        pad + step_width + pad,
        3.0 * metrics.line,
        (viewport.width - step_width - 4.0 * pad).max(0.0),
        (viewport.height - 4.0 * metrics.line).max(0.0),
    );

    if result.content_visible {
        let items = portfolio.showcase_items(section, state.project_filter());
        let selected = state.selected_item().min(items.len().saturating_sub(1));
        let detail_width = content.w * DETAIL_SHARE;
        let detail = Rect::new(content.x, content.y, detail_width - pad, content.h);
        let list = Rect::new(
            content.x + detail_width,
            content.y,
            content.w - detail_width,
            content.h,
        );
        if let Some(item) = items.get(selected) {
            render_detail(&mut commands, metrics, detail, item);
        }
        render_list(&mut commands, metrics, list, &items, selected);
        if section == ShowcaseSection::Projects {
            commands.push(text(
                content.x + content.w,
                content.y - metrics.line,
                state.project_filter().label(),
                ThemeToken::TextMuted,
                metrics,
                TextAlign::Right,
            ));
        }
    } else {
        render_header(&mut commands, metrics, content, section);
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

fn render_pills(
    commands: &mut Vec<RenderCommand>,
    metrics: &ViewMetrics,
    pad: f64,
    active: usize,
    progress: f64,
) {
    let mut x = pad;
    let y = metrics.line;
    for (position, section) in ShowcaseSection::ALL.iter().enumerate() {
        let width = (section.title().chars().count() + 4) as f64 * metrics.char_width;
        let is_active = position == active;
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, y, width, metrics.line),
            color: if is_active {
                ThemeToken::PillActive
            } else {
                ThemeToken::PillIdle
            },
            border_color: None,
            label: Some(section.title().into()),
            action: Some(Action::ScrollToSection(position)),
        });
        if is_active {
            let fill = width * clamp_unit(progress);
            if fill > 0.0 {
                commands.push(RenderCommand::DrawLine {
                    from: Point::new(x, y + metrics.line),
                    to: Point::new(x + fill, y + metrics.line),
                    color: ThemeToken::ProgressFill,
                    width: metrics.bar,
                });
            }
        }
        x += width + metrics.char_width;
    }
}

fn render_steps(
    commands: &mut Vec<RenderCommand>,
    metrics: &ViewMetrics,
    pad: f64,
    width: f64,
    active: usize,
) {
    let top = 4.0 * metrics.line;
    for (position, section) in ShowcaseSection::ALL.iter().enumerate() {
        let y = top + position as f64 * 2.0 * metrics.line;
        let state = IndicatorState::for_position(position, active);
        let (number_color, title_color, background) = match state {
            IndicatorState::Active => (
                ThemeToken::StepNumber,
                ThemeToken::TextPrimary,
                ThemeToken::CardBackground,
            ),
            IndicatorState::Approaching => (
                ThemeToken::TextSecondary,
                ThemeToken::TextSecondary,
                ThemeToken::Background,
            ),
            IndicatorState::Inactive => (
                ThemeToken::TextMuted,
                ThemeToken::TextMuted,
                ThemeToken::Background,
            ),
        };
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(pad, y, width, metrics.line),
            color: background,
            border_color: None,
            label: None,
            action: Some(Action::ScrollToSection(position)),
        });
        commands.push(text(
            pad,
            y,
            section.number(),
            number_color,
            metrics,
            TextAlign::Left,
        ));
        commands.push(text(
            pad + 4.0 * metrics.char_width,
            y,
            section.title(),
            title_color,
            metrics,
            TextAlign::Left,
        ));
    }
}

fn render_header(
    commands: &mut Vec<RenderCommand>,
    metrics: &ViewMetrics,
    area: Rect,
    section: ShowcaseSection,
) {
    let (title, subtitle) = section.header();
    let center_x = area.x + area.w / 2.0;
    let center_y = area.y + area.h / 2.0;
    let max_chars = metrics.chars_in(area.w);
    for (offset, line, color) in [
        (-2.0, title, ThemeToken::TextPrimary),
        (0.0, subtitle, ThemeToken::TextSecondary),
        (2.0, "Scroll to explore", ThemeToken::TextMuted),
    ] {
        commands.push(text(
            center_x,
            center_y + offset * metrics.line,
            truncate(line, max_chars),
            color,
            metrics,
            TextAlign::Center,
        ));
    }
}

fn render_detail(
    commands: &mut Vec<RenderCommand>,
    metrics: &ViewMetrics,
    area: Rect,
    item: &ShowcaseItem<'_>,
) {
    commands.push(RenderCommand::DrawRect {
        rect: area,
        color: ThemeToken::CardBackground,
        border_color: Some(ThemeToken::CardBorder),
        label: None,
        action: None,
    });
    let inner_x = area.x + metrics.char_width;
    let max_chars = metrics.chars_in(area.w - 2.0 * metrics.char_width);
    let max_lines = ((area.h - metrics.line) / metrics.line).floor().max(0.0) as usize;

    let lines = detail_lines(item)
        .into_iter()
        .flat_map(|(content, color)| {
            wrap_text(&content, max_chars)
                .into_iter()
                .map(move |line| (line, color))
        })
        .take(max_lines);
    for (row, (line, color)) in lines.enumerate() {
        commands.push(text(
            inner_x,
            area.y + metrics.line * (row as f64 + 1.0),
            line,
            color,
            metrics,
            TextAlign::Left,
        ));
    }
}

fn render_list(
    commands: &mut Vec<RenderCommand>,
    metrics: &ViewMetrics,
    area: Rect,
    items: &[ShowcaseItem<'_>],
    selected: usize,
) {
    let row_height = 3.0 * metrics.line;
    let max_chars = metrics.chars_in(area.w - 2.0 * metrics.char_width);
    for (index, item) in items.iter().enumerate() {
        let y = area.y + index as f64 * row_height;
        if y + row_height > area.y + area.h {
            break;
        }
        let row = item.list_row();
        let is_selected = index == selected;
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(area.x, y, area.w, row_height - metrics.line / 2.0),
            color: if is_selected {
                ThemeToken::CardSelected
            } else {
                ThemeToken::CardBackground
            },
            border_color: is_selected.then_some(ThemeToken::Accent),
            label: None,
            action: Some(Action::SelectItem(index)),
        });
        let inner_x = area.x + metrics.char_width;
        commands.push(text(
            inner_x,
            y,
            truncate(&row.title, max_chars),
            ThemeToken::TextPrimary,
            metrics,
            TextAlign::Left,
        ));
        commands.push(text(
            inner_x,
            y + metrics.line,
            truncate(&row.subtitle, max_chars),
            ThemeToken::TextSecondary,
            metrics,
            TextAlign::Left,
        ));
        if let Some(trailing) = row.trailing {
            commands.push(text(
                area.x + area.w - metrics.char_width,
                y,
                trailing,
                ThemeToken::TextMuted,
                metrics,
                TextAlign::Right,
            ));
        }
    }
}

fn detail_lines(item: &ShowcaseItem<'_>) -> Vec<(String, ThemeToken)> {
    let mut lines = Vec::new();
    match item {
        ShowcaseItem::Project(project) => {
            lines.push((project.subtitle.clone(), ThemeToken::TextMuted));
            lines.push((project.title.clone(), ThemeToken::TextPrimary));
            lines.push((project.summary.clone(), ThemeToken::TextSecondary));
            for metric in project.metrics.iter().take(METRICS_SHOWN) {
                let color = if metric.highlight {
                    ThemeToken::MetricHighlight
                } else {
                    ThemeToken::TextPrimary
                };
                lines.push((format!("{} {}", metric.value, metric.label), color));
            }
            if !project.tech_stack.is_empty() {
                let shown: Vec<&str> = project
                    .tech_stack
                    .iter()
                    .take(TECH_SHOWN)
                    .map(String::as_str)
                    .collect();
                lines.push((shown.join(" · "), ThemeToken::Accent));
            }
            let links = &project.links;
            for (name, link) in [
                ("GitHub", &links.github),
                ("Live", &links.live),
                ("Docs", &links.docs),
            ] {
                if link.is_some() {
                    lines.push((format!("{name} →"), ThemeToken::AccentBright));
                }
            }
        }
        ShowcaseItem::Experience(exp) => {
            lines.push((exp.period.clone(), ThemeToken::TextMuted));
            lines.push((exp.role.clone(), ThemeToken::TextPrimary));
            let company = match &exp.location {
                Some(location) => format!("{} • {location}", exp.company),
                None => exp.company.clone(),
            };
            lines.push((company, ThemeToken::Accent));
            for bullet in &exp.description {
                lines.push((format!("- {bullet}"), ThemeToken::TextSecondary));
            }
            if !exp.technologies.is_empty() {
                lines.push((exp.technologies.join(" · "), ThemeToken::TextMuted));
            }
        }
        ShowcaseItem::Skills(category) => {
            lines.push(("Expertise Area".into(), ThemeToken::TextMuted));
            lines.push((category.name.clone(), ThemeToken::TextPrimary));
            lines.push((category.skills.join(" · "), ThemeToken::TextSecondary));
        }
        ShowcaseItem::Bio(bio) => {
            lines.push(("About".into(), ThemeToken::TextMuted));
            lines.push(((*bio).to_owned(), ThemeToken::TextSecondary));
        }
        ShowcaseItem::CurrentRole(role) => {
            lines.push(("Current Position".into(), ThemeToken::TextMuted));
            lines.push((role.title.clone(), ThemeToken::TextPrimary));
            lines.push((role.company.clone(), ThemeToken::Accent));
            lines.push((role.description.clone(), ThemeToken::TextSecondary));
        }
        ShowcaseItem::Links(links) => {
            lines.push(("Get in Touch".into(), ThemeToken::TextMuted));
            lines.push((links.email.clone(), ThemeToken::AccentBright));
            lines.push((links.github.clone(), ThemeToken::TextSecondary));
            lines.push((links.linkedin.clone(), ThemeToken::TextSecondary));
        }
    }
    lines
}

fn plain_rect(rect: Rect, color: ThemeToken) -> RenderCommand {
    RenderCommand::DrawRect {
        rect,
        color,
        border_color: None,
        label: None,
        action: None,
    }
}
