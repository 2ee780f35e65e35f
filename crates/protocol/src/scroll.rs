use serde::{Deserialize, Serialize};

/// Snapshot of the host's scroll position and viewport, taken on every
/// scroll or resize tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    /// Current vertical scroll position of the document (px).
    pub viewport_scroll_offset: f64,
    /// Visible height of the viewport (px).
    pub viewport_height: f64,
    /// Full scrollable height of the document (px). Only consulted for
    /// page-wide fractions; zero means unknown.
    #[serde(default)]
    pub document_height: f64,
}

impl ScrollState {
    pub fn new(viewport_scroll_offset: f64, viewport_height: f64) -> Self {
        Self {
            viewport_scroll_offset,
            viewport_height,
            document_height: 0.0,
        }
    }

    pub fn with_document_height(mut self, document_height: f64) -> Self {
        self.document_height = document_height;
        self
    }

    /// Copy with every non-finite or negative field replaced by zero.
    pub fn sanitized(&self) -> Self {
        let clean = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            viewport_scroll_offset: clean(self.viewport_scroll_offset),
            viewport_height: clean(self.viewport_height).max(0.0),
            document_height: clean(self.document_height).max(0.0),
        }
    }
}

/// A logical page region, measured fresh from the rendered layout.
///
/// Boundaries are document-relative pixel offsets. They are never cached
/// across layout changes; the probe that produces them re-reads the layout
/// on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    /// Stable key for the section (e.g. `"projects"`).
    pub id: String,
    pub boundary_start: f64,
    pub boundary_end: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, boundary_start: f64, boundary_end: f64) -> Self {
        Self {
            id: id.into(),
            boundary_start,
            boundary_end,
        }
    }

    pub fn height(&self) -> f64 {
        (self.boundary_end - self.boundary_start).max(0.0)
    }
}

/// Output of one tracker evaluation. Consumers read it; they never mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerResult {
    /// Index of the section currently in focus, always `< sections.len()`.
    pub active_index: usize,
    /// Fraction scrolled through the active section, clamped to `[0, 1]`.
    pub progress_within_section: f64,
    /// Whether gated content has passed its reveal threshold.
    pub content_visible: bool,
}

impl TrackerResult {
    /// The result reported before any scrolling has happened.
    pub const AT_REST: Self = Self {
        active_index: 0,
        progress_within_section: 0.0,
        content_visible: false,
    };
}

impl Default for TrackerResult {
    fn default() -> Self {
        Self::AT_REST
    }
}

/// How a consumer maps section boundaries onto a continuous
/// section-index-plus-fraction value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionLayout {
    /// One tall container split into equal, viewport-high segments; the
    /// container top is the first section's start.
    #[default]
    VirtualGrid,
    /// Discrete elements, each observed for viewport intersection.
    Elements {
        /// Visible share of an element (relative to the smaller of its own
        /// height and the viewport height) at which it counts as crossed.
        #[serde(default = "default_intersection_threshold")]
        intersection_threshold: f64,
        /// Span of the final section, as a fraction of its height, over
        /// which its progress runs from 0 to 1.
        #[serde(default = "default_last_section_span")]
        last_section_span: f64,
    },
    /// The container is measured from entering at the viewport bottom to
    /// leaving at the viewport top.
    Traversal,
}

impl SectionLayout {
    pub fn elements() -> Self {
        Self::Elements {
            intersection_threshold: default_intersection_threshold(),
            last_section_span: default_last_section_span(),
        }
    }
}

/// What `reveal_threshold` is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealBasis {
    /// Progress within the active section.
    #[default]
    Section,
    /// The continuous index-plus-fraction value over the whole container.
    Container,
    /// Page-wide scroll fraction.
    Document,
}

/// Per-consumer tracker settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub reveal_threshold: f64,
    pub clamp_to_last_section: bool,
    pub layout: SectionLayout,
    pub reveal_basis: RevealBasis,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.2,
            clamp_to_last_section: true,
            layout: SectionLayout::VirtualGrid,
            reveal_basis: RevealBasis::Section,
        }
    }
}

fn default_intersection_threshold() -> f64 {
    0.5
}

fn default_last_section_span() -> f64 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_drops_nan_and_negative_heights() {
        let state = ScrollState {
            viewport_scroll_offset: f64::NAN,
            viewport_height: -10.0,
            document_height: f64::INFINITY,
        };
        let clean = state.sanitized();
        assert_eq!(clean.viewport_scroll_offset, 0.0);
        assert_eq!(clean.viewport_height, 0.0);
        assert_eq!(clean.document_height, 0.0);
    }

    #[test]
    fn negative_offset_survives_sanitizing() {
        let clean = ScrollState::new(-40.0, 800.0).sanitized();
        assert_eq!(clean.viewport_scroll_offset, -40.0);
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"reveal_threshold": 0.35}"#).expect("partial config");
        assert!((config.reveal_threshold - 0.35).abs() < f64::EPSILON);
        assert!(config.clamp_to_last_section);
        assert_eq!(config.layout, SectionLayout::VirtualGrid);
        assert_eq!(config.reveal_basis, RevealBasis::Section);
    }

    #[test]
    fn elements_layout_defaults_thresholds() {
        let layout: SectionLayout =
            serde_json::from_str(r#"{"kind": "elements"}"#).expect("elements layout");
        assert_eq!(layout, SectionLayout::elements());
    }
}
