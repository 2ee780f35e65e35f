use folio_protocol::{Point, Rect, RenderCommand, ThemeToken, Viewport};

use crate::tracker::clamp_unit;

use super::ViewMetrics;

/// Render the page-wide reading progress bar pinned to the top edge.
///
/// `fraction` is the document scroll fraction. Nothing is drawn before the
/// entrance delay has passed.
pub fn render_progress_bar(
    viewport: &Viewport,
    metrics: &ViewMetrics,
    fraction: f64,
    visible: bool,
) -> Vec<RenderCommand> {
    if !visible || viewport.width <= 0.0 {
        return Vec::new();
    }
    let fraction = clamp_unit(fraction);
    let fill_width = viewport.width * fraction;

    let mut commands = Vec::with_capacity(5);
    commands.push(RenderCommand::BeginGroup {
        id: "scroll-progress".into(),
        label: Some("Reading progress".into()),
    });

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, viewport.width, metrics.bar),
        color: ThemeToken::ProgressTrack,
        border_color: None,
        label: None,
        action: None,
    });

    if fill_width > 0.0 {
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, fill_width, metrics.bar),
            color: ThemeToken::ProgressFill,
            border_color: None,
            label: None,
            action: None,
        });
        // Glow at the leading edge
        let edge = (fill_width - metrics.char_width).max(0.0);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(edge, 0.0),
            to: Point::new(fill_width, 0.0),
            color: ThemeToken::ProgressGlow,
            width: metrics.bar,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_width(commands: &[RenderCommand]) -> Option<f64> {
        commands.iter().find_map(|c| match c {
            RenderCommand::DrawRect {
                rect,
                color: ThemeToken::ProgressFill,
                ..
            } => Some(rect.w),
            _ => None,
        })
    }

    #[test]
    fn fill_tracks_fraction() {
        let vp = Viewport::new(200.0, 40.0);
        let cmds = render_progress_bar(&vp, &ViewMetrics::PIXELS, 0.25, true);
        assert_eq!(fill_width(&cmds), Some(50.0));
        assert!(matches!(cmds.first(), Some(RenderCommand::BeginGroup { .. })));
        assert!(matches!(cmds.last(), Some(RenderCommand::EndGroup)));
    }

    #[test]
    fn hidden_before_entrance() {
        let vp = Viewport::new(200.0, 40.0);
        assert!(render_progress_bar(&vp, &ViewMetrics::PIXELS, 0.5, false).is_empty());
    }

    #[test]
    fn empty_track_at_top_of_page() {
        let vp = Viewport::new(80.0, 24.0);
        let cmds = render_progress_bar(&vp, &ViewMetrics::CELLS, 0.0, true);
        assert_eq!(fill_width(&cmds), None);
        assert_eq!(cmds.len(), 3);
    }

    #[test]
    fn out_of_range_fraction_is_clamped() {
        let vp = Viewport::new(100.0, 10.0);
        let cmds = render_progress_bar(&vp, &ViewMetrics::CELLS, 1.7, true);
        assert_eq!(fill_width(&cmds), Some(100.0));
    }
}
