use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Surface,
    Border,

    TextPrimary,
    TextSecondary,
    TextMuted,

    Accent,
    AccentBright,
    AccentDeep,

    // Progress bar
    ProgressTrack,
    ProgressFill,
    ProgressGlow,

    // Section dots
    DotInactive,
    DotPassed,
    DotActive,
    DotRail,
    DotRailFill,

    // Showcase
    PillIdle,
    PillActive,
    StepNumber,
    CardBackground,
    CardSelected,
    CardBorder,
    TagBackground,
    MetricHighlight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeToken {
    pub fn resolve(self, mode: ThemeMode) -> Color {
        match mode {
            ThemeMode::Dark => resolve_dark(self),
            ThemeMode::Light => resolve_light(self),
        }
    }
}

// Warm-neutral palette with an orange accent.
mod palette {
    use crate::types::Color;

    pub const DARK_BASE_PRIMARY: Color = Color::hex(0x020202);
    pub const DARK_BASE_SECONDARY: Color = Color::hex(0x101010);
    pub const LIGHT_BASE_PRIMARY: Color = Color::hex(0xeeeeee);
    pub const LIGHT_BASE_SECONDARY: Color = Color::hex(0xfafafa);

    pub const ACCENT_100: Color = Color::hex(0xef6f2e);
    pub const ACCENT_200: Color = Color::hex(0xee6018);
    pub const ACCENT_300: Color = Color::hex(0xd15010);

    pub const BASE_300: Color = Color::hex(0xb8b3b0);
    pub const BASE_400: Color = Color::hex(0xa49d9a);
    pub const BASE_500: Color = Color::hex(0x8a8380);
    pub const BASE_600: Color = Color::hex(0x5c5855);
    pub const BASE_700: Color = Color::hex(0x4d4947);
    pub const BASE_800: Color = Color::hex(0x3d3a39);
    pub const BASE_900: Color = Color::hex(0x2e2c2b);
    pub const BASE_1000: Color = Color::hex(0x1f1d1c);
}

fn resolve_dark(token: ThemeToken) -> Color {
    use ThemeToken::*;
    use palette::*;
    match token {
        Background => DARK_BASE_PRIMARY,
        Surface => DARK_BASE_SECONDARY,
        Border => BASE_800,

        TextPrimary => LIGHT_BASE_PRIMARY,
        TextSecondary => BASE_300,
        TextMuted => BASE_500,

        Accent => ACCENT_200,
        AccentBright => ACCENT_100,
        AccentDeep => ACCENT_300,

        ProgressTrack => Color::rgba(0x2e, 0x2c, 0x2b, 128), // base-900 / 50%
        ProgressFill => ACCENT_200,
        ProgressGlow => Color::rgba(0xef, 0x6f, 0x2e, 160),

        DotInactive => BASE_700,
        DotPassed => BASE_400,
        DotActive => ACCENT_200,
        DotRail => BASE_800,
        DotRailFill => ACCENT_200,

        PillIdle => BASE_800,
        PillActive => ACCENT_200,
        StepNumber => BASE_600,
        CardBackground => BASE_1000,
        CardSelected => DARK_BASE_SECONDARY,
        CardBorder => BASE_800,
        TagBackground => BASE_900,
        MetricHighlight => ACCENT_100,
    }
}

fn resolve_light(token: ThemeToken) -> Color {
    use ThemeToken::*;
    use palette::*;
    match token {
        Background => LIGHT_BASE_SECONDARY,
        Surface => LIGHT_BASE_PRIMARY,
        Border => BASE_300,

        TextPrimary => DARK_BASE_PRIMARY,
        TextSecondary => BASE_700,
        TextMuted => BASE_500,

        Accent => ACCENT_300,
        AccentBright => ACCENT_200,
        AccentDeep => ACCENT_300,

        ProgressTrack => Color::rgba(0xb8, 0xb3, 0xb0, 128),
        ProgressFill => ACCENT_300,
        ProgressGlow => Color::rgba(0xd1, 0x50, 0x10, 120),

        DotInactive => BASE_300,
        DotPassed => BASE_600,
        DotActive => ACCENT_300,
        DotRail => BASE_300,
        DotRailFill => ACCENT_300,

        PillIdle => BASE_300,
        PillActive => ACCENT_300,
        StepNumber => BASE_500,
        CardBackground => LIGHT_BASE_PRIMARY,
        CardSelected => Color::rgb(0xff, 0xff, 0xff),
        CardBorder => BASE_300,
        TagBackground => Color::hex(0xe4e1df),
        MetricHighlight => ACCENT_300,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_tracks_mode() {
        assert_eq!(ThemeToken::Accent.resolve(ThemeMode::Dark), Color::hex(0xee6018));
        assert_eq!(ThemeToken::Accent.resolve(ThemeMode::Light), Color::hex(0xd15010));
    }

    #[test]
    fn text_contrasts_with_background() {
        for mode in [ThemeMode::Dark, ThemeMode::Light] {
            let bg = ThemeToken::Background.resolve(mode);
            let fg = ThemeToken::TextPrimary.resolve(mode);
            let luma = |c: Color| u32::from(c.r) + u32::from(c.g) + u32::from(c.b);
            assert!(luma(bg).abs_diff(luma(fg)) > 500, "{mode:?}");
        }
    }
}
