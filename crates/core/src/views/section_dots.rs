use folio_protocol::{Action, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::indicator::{IndicatorState, SectionIndicators};
use crate::tracker::clamp_unit;

use super::{ViewMetrics, text};

/// Share of the viewport height covered by the rail, centred vertically.
const RAIL_SPAN: f64 = 0.4;

/// Inputs of the dot rail for one frame.
#[derive(Debug, Clone, Copy)]
pub struct DotRail<'a> {
    pub labels: &'a [&'a str],
    pub indicators: &'a SectionIndicators,
    pub progress: f64,
    pub hovered: Option<usize>,
    pub visible: bool,
}

/// Render the fixed navigation rail on the right edge of the viewport.
///
/// The rail fill grows with `(active + progress) / count`. Each dot is
/// clickable and asks the host to scroll to its section. The label is shown
/// for the active section and for the one under the pointer.
pub fn render_section_dots(
    viewport: &Viewport,
    metrics: &ViewMetrics,
    rail: &DotRail<'_>,
) -> Vec<RenderCommand> {
    let count = rail.labels.len().min(rail.indicators.len());
    if !rail.visible || count == 0 {
        return Vec::new();
    }

    let rail_x = viewport.width - 2.0 * metrics.char_width;
    let rail_height = viewport.height * RAIL_SPAN;
    let rail_top = (viewport.height - rail_height) / 2.0;
    let segment = rail_height / count as f64;
    let active = rail.indicators.active().min(count - 1);
    let filled = ((active as f64 + clamp_unit(rail.progress)) / count as f64).min(1.0);

    let mut commands = Vec::with_capacity(count * 2 + 6);
    commands.push(RenderCommand::BeginGroup {
        id: "section-dots".into(),
        label: Some("Section navigation".into()),
    });

    commands.push(rail_rect(
        Rect::new(rail_x, rail_top, metrics.bar, rail_height),
        ThemeToken::DotRail,
    ));
    if filled > 0.0 {
        commands.push(rail_rect(
            Rect::new(rail_x, rail_top, metrics.bar, rail_height * filled),
            ThemeToken::DotRailFill,
        ));
    }
    commands.push(rail_rect(
        Rect::new(rail_x, rail_top + segment * active as f64, metrics.bar, segment),
        ThemeToken::AccentDeep,
    ));

    for (position, label) in rail.labels.iter().take(count).enumerate() {
        let state = rail
            .indicators
            .state(position)
            .unwrap_or(IndicatorState::Inactive);
        let center_y = rail_top + segment * (position as f64 + 0.5);
        let dot = Rect::new(
            rail_x - metrics.char_width / 2.0,
            center_y - metrics.line / 2.0,
            metrics.char_width + metrics.bar,
            metrics.line,
        );
        commands.push(RenderCommand::DrawRect {
            rect: dot,
            color: dot_color(state),
            border_color: rail
                .indicators
                .is_transitioning(position)
                .then_some(ThemeToken::AccentBright),
            label: None,
            action: Some(Action::ScrollToSection(position)),
        });

        let is_active = state == IndicatorState::Active;
        if is_active || rail.hovered == Some(position) {
            let color = if is_active {
                ThemeToken::Accent
            } else {
                ThemeToken::TextSecondary
            };
            commands.push(text(
                dot.x - metrics.char_width,
                center_y,
                *label,
                color,
                metrics,
                TextAlign::Right,
            ));
        }
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

fn dot_color(state: IndicatorState) -> ThemeToken {
    match state {
        IndicatorState::Inactive => ThemeToken::DotInactive,
        IndicatorState::Approaching => ThemeToken::DotPassed,
        IndicatorState::Active => ThemeToken::DotActive,
    }
}

fn rail_rect(rect: Rect, color: ThemeToken) -> RenderCommand {
    RenderCommand::DrawRect {
        rect,
        color,
        border_color: None,
        label: None,
        action: None,
    }
}
