//! Staged content reveal: visibility gates, entrance delays, and the hero's
//! character-by-character type-in.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shows an element once enough of it is inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealGate {
    /// Visible fraction of the element required to reveal it.
    pub threshold: f64,
    /// Keep the element revealed after it first appears.
    pub trigger_once: bool,
    #[serde(skip)]
    revealed: bool,
}

impl RevealGate {
    pub fn new(threshold: f64, trigger_once: bool) -> Self {
        Self {
            threshold,
            trigger_once,
            revealed: false,
        }
    }

    /// Feed the element's current visible ratio; returns whether it is shown.
    pub fn observe(&mut self, visible_ratio: f64) -> bool {
        let ratio = if visible_ratio.is_finite() {
            visible_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let intersecting = ratio > 0.0 && ratio >= self.threshold;
        self.revealed = if self.trigger_once {
            self.revealed || intersecting
        } else {
            intersecting
        };
        self.revealed
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

impl Default for RevealGate {
    fn default() -> Self {
        Self::new(0.1, true)
    }
}

/// Visible share of an element spanning `[top, bottom)` in a viewport
/// spanning `[view_top, view_top + view_height)`, all document-relative.
pub fn visible_ratio(top: f64, bottom: f64, view_top: f64, view_height: f64) -> f64 {
    let height = bottom - top;
    if height.is_nan() || height <= 0.0 {
        return 0.0;
    }
    let visible = (bottom.min(view_top + view_height) - top.max(view_top)).max(0.0);
    (visible / height).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealAnimation {
    #[default]
    FadeUp,
    FadeLeft,
    FadeRight,
    FadeIn,
    Scale,
}

impl RevealAnimation {
    /// CSS class applied once the element is revealed.
    pub fn css_class(self) -> &'static str {
        match self {
            RevealAnimation::FadeUp => "animate-fadeInUp",
            RevealAnimation::FadeLeft => "animate-fadeLeft",
            RevealAnimation::FadeRight => "animate-fadeRight",
            RevealAnimation::FadeIn => "animate-fadeIn",
            RevealAnimation::Scale => "animate-scaleIn",
        }
    }
}

/// Transition delay of the `index`-th item in a staggered group.
pub fn stagger_delay_ms(delay_ms: u32, index: usize, stagger_ms: u32) -> u32 {
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    delay_ms.saturating_add(index.saturating_mul(stagger_ms))
}

pub const DEFAULT_CHARACTER_DELAY_MS: u64 = 50;

/// Number of characters of a `text_len`-long string shown after `elapsed`,
/// revealing one every `per_char` once `start_delay` has passed.
pub fn revealed_characters(
    text_len: usize,
    elapsed: Duration,
    per_char: Duration,
    start_delay: Duration,
) -> usize {
    let Some(running) = elapsed.checked_sub(start_delay) else {
        return 0;
    };
    if per_char.is_zero() {
        return text_len;
    }
    let steps = running.as_nanos() / per_char.as_nanos();
    usize::try_from(steps).unwrap_or(usize::MAX).min(text_len)
}

/// Chrome that fades in a fixed time after mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntranceDelay {
    delay: Duration,
    mounted_at: Option<Duration>,
}

impl EntranceDelay {
    pub const PROGRESS_BAR: Duration = Duration::from_millis(3000);
    pub const SECTION_DOTS: Duration = Duration::from_millis(2000);

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            mounted_at: None,
        }
    }

    pub fn mount(&mut self, now: Duration) {
        self.mounted_at = Some(now);
    }

    pub fn unmount(&mut self) {
        self.mounted_at = None;
    }

    pub fn is_visible(&self, now: Duration) -> bool {
        self.mounted_at
            .is_some_and(|mounted| now.saturating_sub(mounted) >= self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_once_latches() {
        let mut gate = RevealGate::default();
        assert!(!gate.observe(0.05));
        assert!(gate.observe(0.1));
        assert!(gate.observe(0.0));
        assert!(gate.is_revealed());
    }

    #[test]
    fn repeating_gate_follows_ratio() {
        let mut gate = RevealGate::new(0.2, false);
        assert!(gate.observe(0.5));
        assert!(!gate.observe(0.1));
        assert!(gate.observe(0.2));
    }

    #[test]
    fn zero_threshold_still_needs_some_visibility() {
        let mut gate = RevealGate::new(0.0, true);
        assert!(!gate.observe(0.0));
        assert!(gate.observe(0.01));
    }

    #[test]
    fn ratio_of_partially_visible_element() {
        assert!((visible_ratio(900.0, 1100.0, 0.0, 1000.0) - 0.5).abs() < 1e-9);
        assert_eq!(visible_ratio(0.0, 100.0, 500.0, 800.0), 0.0);
        assert_eq!(visible_ratio(100.0, 100.0, 0.0, 800.0), 0.0);
    }

    #[test]
    fn stagger_adds_per_index() {
        assert_eq!(stagger_delay_ms(100, 0, 50), 100);
        assert_eq!(stagger_delay_ms(100, 3, 50), 250);
        assert_eq!(stagger_delay_ms(u32::MAX, 3, 50), u32::MAX);
    }

    #[test]
    fn characters_appear_after_start_delay() {
        let per = Duration::from_millis(DEFAULT_CHARACTER_DELAY_MS);
        let start = Duration::from_millis(500);
        assert_eq!(revealed_characters(10, Duration::from_millis(400), per, start), 0);
        assert_eq!(revealed_characters(10, Duration::from_millis(649), per, start), 2);
        assert_eq!(revealed_characters(10, Duration::from_secs(60), per, start), 10);
        assert_eq!(revealed_characters(10, Duration::ZERO, Duration::ZERO, Duration::ZERO), 10);
    }

    #[test]
    fn entrance_waits_for_delay() {
        let mut entrance = EntranceDelay::new(EntranceDelay::SECTION_DOTS);
        assert!(!entrance.is_visible(Duration::from_secs(10)));
        entrance.mount(Duration::from_millis(100));
        assert!(!entrance.is_visible(Duration::from_millis(2099)));
        assert!(entrance.is_visible(Duration::from_millis(2100)));
        entrance.unmount();
        assert!(!entrance.is_visible(Duration::from_millis(5000)));
    }
}
