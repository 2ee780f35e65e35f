//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use folio_protocol::{RenderCommand, TextAlign, ThemeMode, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions. Colors come from
/// the palette of `mode`. Clickable rectangles carry their action as a
/// `data-action` attribute so a static page can still wire navigation.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, mode: ThemeMode) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:14px">"#,
    ));
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        css(ThemeToken::Background, mode),
    ));

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                action,
            } => {
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    css(*color, mode),
                ));
                if let Some(border) = border_color {
                    svg.push_str(&format!(r#" stroke="{}""#, css(*border, mode)));
                }
                if let Some(action) = action {
                    let action = escape_xml(&format!("{action:?}"));
                    svg.push_str(&format!(r#" data-action="{action}""#));
                }
                svg.push('>');
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
                svg.push_str("</rect>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{line_width}"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    css(*color, mode),
                ));
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    css(*color, mode),
                    escape_xml(text),
                ));
            }
            RenderCommand::BeginGroup { id, .. } => {
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn css(token: ThemeToken, mode: ThemeMode) -> String {
    token.resolve(mode).to_css()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
