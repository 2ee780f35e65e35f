use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// Views emit a `Vec<RenderCommand>` per tick. Renderers consume this list
/// sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a text label and an action
    /// triggered when the rectangle is clicked.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        label: Option<String>,
        action: Option<Action>,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Begin a logical group (e.g. the dot rail). Renderers may use this
    /// for layering or accessibility.
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// What a clickable region asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Scroll so that the section at this index becomes active.
    ScrollToSection(usize),
    /// Select an item in the showcase list panel.
    SelectItem(usize),
}

impl RenderCommand {
    /// Action of a `DrawRect` whose rectangle contains `point`.
    pub fn hit(&self, point: Point) -> Option<Action> {
        match self {
            RenderCommand::DrawRect {
                rect,
                action: Some(action),
                ..
            } if rect.contains(point) => Some(*action),
            _ => None,
        }
    }
}

/// Last action under `point`; later commands are drawn on top.
pub fn hit_test(commands: &[RenderCommand], point: Point) -> Option<Action> {
    commands.iter().rev().find_map(|cmd| cmd.hit(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_with(action: Option<Action>, x: f64) -> RenderCommand {
        RenderCommand::DrawRect {
            rect: Rect::new(x, 0.0, 10.0, 10.0),
            color: ThemeToken::Surface,
            border_color: None,
            label: None,
            action,
        }
    }

    #[test]
    fn hit_prefers_topmost() {
        let cmds = vec![
            rect_with(Some(Action::SelectItem(0)), 0.0),
            rect_with(Some(Action::SelectItem(1)), 5.0),
        ];
        assert_eq!(hit_test(&cmds, Point::new(7.0, 1.0)), Some(Action::SelectItem(1)));
        assert_eq!(hit_test(&cmds, Point::new(2.0, 1.0)), Some(Action::SelectItem(0)));
    }

    #[test]
    fn rects_without_action_are_transparent() {
        let cmds = vec![
            rect_with(Some(Action::ScrollToSection(2)), 0.0),
            rect_with(None, 0.0),
        ];
        assert_eq!(
            hit_test(&cmds, Point::new(1.0, 1.0)),
            Some(Action::ScrollToSection(2))
        );
        assert_eq!(hit_test(&cmds, Point::new(50.0, 1.0)), None);
    }
}
