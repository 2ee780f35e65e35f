use folio_protocol::{RenderCommand, TextAlign, ThemeMode, ThemeToken};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::app::{Frame, Layer};

pub fn theme_to_color(token: ThemeToken, mode: ThemeMode) -> Color {
    let c = token.resolve(mode);
    Color::Rgb(c.r, c.g, c.b)
}

/// Paint every layer of `frame` into `area`, one unit per cell.
pub fn draw_frame(buf: &mut Buffer, area: Rect, frame: &Frame, mode: ThemeMode) {
    Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(theme_to_color(ThemeToken::Background, mode)))
        .render(area, buf);
    for layer in &frame.layers {
        draw_layer(buf, area, layer, mode);
    }
}

fn draw_layer(buf: &mut Buffer, area: Rect, layer: &Layer, mode: ThemeMode) {
    for cmd in &layer.commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                ..
            } => {
                let Some((col, row, width, height)) =
                    to_cells(area, rect.x, rect.y + layer.dy, rect.w, rect.h)
                else {
                    continue;
                };
                let bg = theme_to_color(*color, mode);
                for y in row..row + height {
                    for x in col..col + width {
                        buf[(area.x + x, area.y + y)].set_char(' ').set_bg(bg);
                    }
                }
                if let Some(border) = border_color {
                    let fg = theme_to_color(*border, mode);
                    for y in row..row + height {
                        buf[(area.x + col, area.y + y)].set_char('▎').set_fg(fg);
                    }
                }
                // Labels fit inside the rect or not at all
                if let Some(label) = label
                    && usize::from(width) >= label.chars().count() + 2
                {
                    let fg = theme_to_color(ThemeToken::TextPrimary, mode);
                    put_str(buf, area, col + 1, row, label, fg);
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let len = text.chars().count() as f64;
                let x = match align {
                    TextAlign::Left => position.x,
                    TextAlign::Center => position.x - len / 2.0,
                    TextAlign::Right => position.x - len,
                };
                let y = (position.y + layer.dy).floor();
                if y < 0.0 || y >= f64::from(area.height) {
                    continue;
                }
                let fg = theme_to_color(*color, mode);
                let skip = if x < 0.0 { (-x).ceil() as usize } else { 0 };
                let visible: String = text.chars().skip(skip).collect();
                let col = x.max(0.0).floor() as u16;
                put_str(buf, area, col, y as u16, &visible, fg);
            }
            RenderCommand::DrawLine {
                from, to, color, ..
            } => {
                let fg = theme_to_color(*color, mode);
                if (from.y - to.y).abs() < f64::EPSILON {
                    let (x0, x1) = (from.x.min(to.x), from.x.max(to.x));
                    let Some((col, row, width, _)) =
                        to_cells(area, x0, from.y + layer.dy, (x1 - x0).max(1.0), 1.0)
                    else {
                        continue;
                    };
                    for x in col..col + width {
                        buf[(area.x + x, area.y + row)].set_char('━').set_fg(fg);
                    }
                } else {
                    let (y0, y1) = (from.y.min(to.y), from.y.max(to.y));
                    let Some((col, row, _, height)) =
                        to_cells(area, from.x, y0 + layer.dy, 1.0, (y1 - y0).max(1.0))
                    else {
                        continue;
                    };
                    for y in row..row + height {
                        buf[(area.x + col, area.y + y)].set_char('┃').set_fg(fg);
                    }
                }
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

/// Clip a rectangle in cell units to `area`. Returns `(col, row, width,
/// height)` relative to the area, or `None` when nothing is left.
fn to_cells(area: Rect, x: f64, y: f64, w: f64, h: f64) -> Option<(u16, u16, u16, u16)> {
    let left = x.floor().max(0.0);
    let top = y.floor().max(0.0);
    let right = (x + w).ceil().min(f64::from(area.width));
    let bottom = (y + h).ceil().min(f64::from(area.height));
    if right <= left || bottom <= top {
        return None;
    }
    Some((
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

fn put_str(buf: &mut Buffer, area: Rect, col: u16, row: u16, text: &str, fg: Color) {
    let (x0, y) = (area.x + col, area.y + row);
    if y >= area.y + area.height {
        return;
    }
    for (i, ch) in text.chars().enumerate() {
        let Ok(offset) = u16::try_from(i) else { break };
        let x = x0.saturating_add(offset);
        if x >= area.x + area.width {
            break;
        }
        buf[(x, y)].set_char(ch).set_fg(fg);
    }
}
