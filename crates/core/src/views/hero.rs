use folio_protocol::{Profile, RenderCommand, TextAlign, ThemeToken, Viewport};

use super::{ViewMetrics, text, truncate, wrap_text};

/// Render the landing hero with the owner's name typed out
/// `revealed_chars` characters at a time. The tagline appears once the
/// whole name is shown.
pub fn render_hero(
    viewport: &Viewport,
    metrics: &ViewMetrics,
    profile: &Profile,
    revealed_chars: usize,
) -> Vec<RenderCommand> {
    let center_x = viewport.width / 2.0;
    let center_y = viewport.height / 2.0;
    let max_chars = metrics.chars_in(viewport.width * 0.8);

    let mut commands = vec![RenderCommand::BeginGroup {
        id: "hero".into(),
        label: Some(profile.name.clone()),
    }];

    let name_len = profile.name.chars().count();
    let typed: String = profile.name.chars().take(revealed_chars).collect();
    commands.push(text(
        center_x,
        center_y - 2.0 * metrics.line,
        typed,
        ThemeToken::TextPrimary,
        metrics,
        TextAlign::Center,
    ));

    if revealed_chars >= name_len {
        for (row, line) in wrap_text(&profile.tagline, max_chars).into_iter().enumerate() {
            commands.push(text(
                center_x,
                center_y + row as f64 * metrics.line,
                line,
                ThemeToken::TextSecondary,
                metrics,
                TextAlign::Center,
            ));
        }
        commands.push(text(
            center_x,
            viewport.height - 2.0 * metrics.line,
            truncate(&profile.current_role.title, max_chars),
            ThemeToken::Accent,
            metrics,
            TextAlign::Center,
        ));
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Portfolio;

    fn texts(commands: &[RenderCommand]) -> Vec<String> {
        commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn name_types_out_before_tagline() {
        let portfolio = Portfolio::bundled().expect("bundled content parses");
        let profile = &portfolio.profile;
        let vp = Viewport::new(100.0, 30.0);

        let partial = texts(&render_hero(&vp, &ViewMetrics::CELLS, profile, 3));
        let expected: String = profile.name.chars().take(3).collect();
        assert_eq!(partial, vec![expected]);

        let full = texts(&render_hero(&vp, &ViewMetrics::CELLS, profile, usize::MAX));
        assert_eq!(full[0], profile.name);
        assert!(full.len() > 2);
    }
}
