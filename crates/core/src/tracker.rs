//! Scroll position to (active section, progress, visibility).
//!
//! Every scroll-synchronized element of the page (progress bar, dot rail,
//! staged reveals, multi-panel showcases) goes through
//! [`compute_tracker_result`]. It is a pure function: the caller owns the
//! event subscription and re-invokes it on every scroll, resize, and mount.

use folio_protocol::{
    RevealBasis, ScrollState, SectionBounds, SectionLayout, TrackerConfig, TrackerResult,
};
use tracing::trace;

/// Added to a segment's top so a jump lands inside the segment rather than
/// on the boundary shared with the previous one.
const SEGMENT_ENTRY_NUDGE: f64 = 10.0;

/// Continuous section-index-plus-fraction produced by a layout strategy.
#[derive(Debug, Clone, Copy)]
struct Position {
    /// Index picked by the layout, not yet clamped to the section count.
    index: usize,
    /// `index` plus the unclamped fraction into that section.
    raw: f64,
    /// The viewport top has moved past the end of the final section.
    past_end: bool,
}

/// Evaluate the tracker for one scroll tick.
///
/// Out-of-range and non-finite inputs are clamped, never rejected. An empty
/// `sections` slice or a viewport without height yields
/// [`TrackerResult::AT_REST`]. At or above the top of the page the result
/// is always at rest, whatever the layout.
pub fn compute_tracker_result(
    sections: &[SectionBounds],
    scroll_state: &ScrollState,
    config: &TrackerConfig,
) -> TrackerResult {
    let state = scroll_state.sanitized();
    if sections.is_empty() || state.viewport_height <= 0.0 || state.viewport_scroll_offset <= 0.0
    {
        return TrackerResult::AT_REST;
    }

    let position = match config.layout {
        SectionLayout::VirtualGrid => grid_position(sections, &state),
        SectionLayout::Elements {
            intersection_threshold,
            last_section_span,
        } => element_position(sections, &state, intersection_threshold, last_section_span),
        SectionLayout::Traversal => traversal_position(sections, &state),
    };

    let result = resolve(position, sections.len(), &state, config);
    trace!(
        offset = state.viewport_scroll_offset,
        raw = position.raw,
        active = result.active_index,
        progress = result.progress_within_section,
        visible = result.content_visible,
        "tracker evaluated"
    );
    result
}

/// Page-wide scroll fraction in `[0, 1]`; zero when the page cannot scroll.
pub fn document_progress(scroll_state: &ScrollState) -> f64 {
    let state = scroll_state.sanitized();
    let scrollable = state.document_height - state.viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    clamp_unit(state.viewport_scroll_offset / scrollable)
}

/// Scroll offset that makes section `index` active under `layout`.
///
/// `index` is clamped into range; an empty slice targets the page top.
pub fn scroll_target_for_section(
    sections: &[SectionBounds],
    index: usize,
    viewport_height: f64,
    layout: &SectionLayout,
) -> f64 {
    let (Some(first), Some(last)) = (sections.first(), sections.last()) else {
        return 0.0;
    };
    let index = index.min(sections.len() - 1);
    let vh = if viewport_height.is_finite() {
        viewport_height.max(0.0)
    } else {
        0.0
    };

    match layout {
        SectionLayout::VirtualGrid => {
            first.boundary_start + index as f64 * vh + SEGMENT_ENTRY_NUDGE
        }
        SectionLayout::Elements { .. } => sections[index].boundary_start,
        SectionLayout::Traversal => {
            let height = (last.boundary_end - first.boundary_start).max(0.0);
            let fraction = (index as f64 + 0.5) / sections.len() as f64;
            (fraction * (height + vh) - vh + first.boundary_start).max(0.0)
        }
    }
}

fn grid_position(sections: &[SectionBounds], state: &ScrollState) -> Position {
    let container_top = sections[0].boundary_start;
    let raw = (state.viewport_scroll_offset - container_top) / state.viewport_height;
    let index = if raw <= 0.0 { 0 } else { raw.floor() as usize };
    Position {
        index,
        raw,
        past_end: raw > sections.len() as f64,
    }
}

fn element_position(
    sections: &[SectionBounds],
    state: &ScrollState,
    intersection_threshold: f64,
    last_section_span: f64,
) -> Position {
    let view_top = state.viewport_scroll_offset;
    let view_bottom = view_top + state.viewport_height;

    // A section stays crossed from the moment it is sufficiently visible
    // until the user scrolls back above it, so the last crossed index only
    // grows while scrolling down.
    let index = sections
        .iter()
        .rposition(|section| {
            let visible = (section.boundary_end.min(view_bottom)
                - section.boundary_start.max(view_top))
            .max(0.0);
            let basis = section.height().min(state.viewport_height);
            section.boundary_start <= view_top
                || (basis > 0.0 && visible >= intersection_threshold * basis)
        })
        .unwrap_or(0);

    let current = &sections[index];
    let scrolled = (view_top - current.boundary_start).max(0.0);
    let span = match sections.get(index + 1) {
        Some(next) => next.boundary_start - current.boundary_start,
        None => current.height() * last_section_span,
    };
    let fraction = if span > 0.0 {
        scrolled / span
    } else if scrolled > 0.0 {
        1.0
    } else {
        0.0
    };

    let past_end = sections
        .last()
        .is_some_and(|last| view_top > last.boundary_end);

    Position {
        index,
        raw: index as f64 + fraction,
        past_end,
    }
}

fn traversal_position(sections: &[SectionBounds], state: &ScrollState) -> Position {
    let top = sections[0].boundary_start;
    let bottom = sections[sections.len() - 1].boundary_end;
    let height = (bottom - top).max(0.0);
    let vh = state.viewport_height;

    let entered = state.viewport_scroll_offset + vh - top;
    let fraction = clamp_unit(entered / (height + vh));
    let raw = fraction * sections.len() as f64;
    Position {
        index: raw.floor() as usize,
        raw,
        past_end: state.viewport_scroll_offset > bottom,
    }
}

fn resolve(
    position: Position,
    count: usize,
    state: &ScrollState,
    config: &TrackerConfig,
) -> TrackerResult {
    let last = count.saturating_sub(1);
    if position.past_end && !config.clamp_to_last_section {
        return TrackerResult {
            active_index: last,
            progress_within_section: 0.0,
            content_visible: false,
        };
    }

    let active_index = position.index.min(last);
    let local = position.raw - active_index as f64;
    let measured = match config.reveal_basis {
        RevealBasis::Section => local,
        RevealBasis::Container => position.raw,
        RevealBasis::Document => document_progress(state),
    };

    TrackerResult {
        active_index,
        progress_within_section: clamp_unit(local),
        content_visible: measured > config.reveal_threshold,
    }
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(count: usize, top: f64, vh: f64) -> Vec<SectionBounds> {
        (0..count)
            .map(|i| {
                let start = top + i as f64 * vh;
                SectionBounds::new(format!("s{i}"), start, start + vh)
            })
            .collect()
    }

    fn at(offset: f64) -> ScrollState {
        ScrollState::new(offset, 800.0).with_document_height(5000.0)
    }

    #[test]
    fn reveal_threshold_boundary() {
        let sections = grid(4, 0.0, 800.0);
        let config = TrackerConfig::default();

        let below = compute_tracker_result(&sections, &at(152.0), &config);
        assert_eq!(below.active_index, 0);
        assert!((below.progress_within_section - 0.19).abs() < 1e-9);
        assert!(!below.content_visible);

        let above = compute_tracker_result(&sections, &at(168.0), &config);
        assert_eq!(above.active_index, 0);
        assert!((above.progress_within_section - 0.21).abs() < 1e-9);
        assert!(above.content_visible);
    }

    #[test]
    fn grid_offsets_by_container_top() {
        let sections = grid(4, 1000.0, 800.0);
        let config = TrackerConfig::default();
        let result = compute_tracker_result(&sections, &at(1000.0 + 800.0 * 2.5), &config);
        assert_eq!(result.active_index, 2);
        assert!((result.progress_within_section - 0.5).abs() < 1e-9);

        let before = compute_tracker_result(&sections, &at(400.0), &TrackerConfig::default());
        assert_eq!(before, TrackerResult::AT_REST);
    }

    #[test]
    fn pinned_past_the_end() {
        let sections = grid(4, 0.0, 800.0);
        let result = compute_tracker_result(&sections, &at(1.0e7), &TrackerConfig::default());
        assert_eq!(result.active_index, 3);
        assert_eq!(result.progress_within_section, 1.0);
        assert!(result.content_visible);
    }

    #[test]
    fn released_past_the_end_without_clamping() {
        let sections = grid(4, 0.0, 800.0);
        let config = TrackerConfig {
            clamp_to_last_section: false,
            ..TrackerConfig::default()
        };
        let result = compute_tracker_result(&sections, &at(4000.0), &config);
        assert_eq!(result.active_index, 3);
        assert_eq!(result.progress_within_section, 0.0);
        assert!(!result.content_visible);

        // Inside the final segment nothing changes.
        let inside = compute_tracker_result(&sections, &at(3000.0), &config);
        assert_eq!(inside.active_index, 3);
        assert!((inside.progress_within_section - 0.75).abs() < 1e-9);
    }

    #[test]
    fn container_basis_compares_whole_container() {
        let sections = grid(4, 0.0, 800.0);
        let config = TrackerConfig {
            reveal_basis: RevealBasis::Container,
            ..TrackerConfig::default()
        };
        // Start of the second segment: local progress is ~0 but the
        // container as a whole is well past the threshold.
        let result = compute_tracker_result(&sections, &at(805.0), &config);
        assert_eq!(result.active_index, 1);
        assert!(result.content_visible);

        let default = TrackerConfig::default();
        let section_basis = compute_tracker_result(&sections, &at(805.0), &default);
        assert!(!section_basis.content_visible);
    }

    #[test]
    fn document_basis_uses_page_fraction() {
        let sections = grid(2, 0.0, 800.0);
        let config = TrackerConfig {
            reveal_threshold: 0.5,
            reveal_basis: RevealBasis::Document,
            ..TrackerConfig::default()
        };
        // scrollable = 5000 - 800 = 4200
        assert!(!compute_tracker_result(&sections, &at(2000.0), &config).content_visible);
        assert!(compute_tracker_result(&sections, &at(2200.0), &config).content_visible);
    }

    #[test]
    fn elements_activate_at_half_visibility() {
        let sections = vec![
            SectionBounds::new("hero", 0.0, 1000.0),
            SectionBounds::new("showcase", 1000.0, 4200.0),
        ];
        let config = TrackerConfig {
            layout: SectionLayout::elements(),
            ..TrackerConfig::default()
        };

        // 300px of the showcase visible: below half a viewport.
        let early = compute_tracker_result(&sections, &at(500.0), &config);
        assert_eq!(early.active_index, 0);
        assert!((early.progress_within_section - 0.5).abs() < 1e-9);

        // 500px visible: crossed.
        let crossed = compute_tracker_result(&sections, &at(700.0), &config);
        assert_eq!(crossed.active_index, 1);
        assert_eq!(crossed.progress_within_section, 0.0);

        // Final section runs over half its height.
        let deep = compute_tracker_result(&sections, &at(1000.0 + 800.0), &config);
        assert_eq!(deep.active_index, 1);
        assert!((deep.progress_within_section - 0.5).abs() < 1e-9);
    }

    #[test]
    fn elements_use_sibling_gap() {
        let sections = vec![
            SectionBounds::new("a", 0.0, 600.0),
            SectionBounds::new("b", 1000.0, 1400.0),
            SectionBounds::new("c", 1400.0, 3000.0),
        ];
        let config = TrackerConfig {
            layout: SectionLayout::elements(),
            ..TrackerConfig::default()
        };
        // "a" spans 1000px to its sibling; "b" is only 50px into view.
        let result = compute_tracker_result(&sections, &at(250.0), &config);
        assert_eq!(result.active_index, 0);
        assert!((result.progress_within_section - 0.25).abs() < 1e-9);
    }

    #[test]
    fn traversal_spreads_sections_over_enter_to_exit() {
        let sections = grid(3, 2000.0, 600.0); // container 2000..3800
        let config = TrackerConfig {
            layout: SectionLayout::Traversal,
            ..TrackerConfig::default()
        };
        // total travel = 1800 + 800 = 2600; entered at offset 1200.
        let entering = compute_tracker_result(&sections, &at(1200.0 + 2600.0 / 6.0), &config);
        assert_eq!(entering.active_index, 0);
        assert!((entering.progress_within_section - 0.5).abs() < 1e-9);

        let leaving = compute_tracker_result(&sections, &at(3800.0), &config);
        assert_eq!(leaving.active_index, 2);
        assert_eq!(leaving.progress_within_section, 1.0);
    }

    #[test]
    fn degenerate_inputs_rest() {
        let sections = grid(4, 0.0, 800.0);
        let config = TrackerConfig::default();
        assert_eq!(
            compute_tracker_result(&[], &at(500.0), &config),
            TrackerResult::AT_REST
        );
        assert_eq!(
            compute_tracker_result(&sections, &ScrollState::new(500.0, 0.0), &config),
            TrackerResult::AT_REST
        );
        assert_eq!(
            compute_tracker_result(&sections, &ScrollState::new(f64::NAN, 800.0), &config),
            TrackerResult::AT_REST
        );
    }

    #[test]
    fn document_progress_bounds() {
        assert_eq!(document_progress(&ScrollState::new(100.0, 800.0)), 0.0);
        let state = ScrollState::new(2100.0, 800.0).with_document_height(5000.0);
        assert!((document_progress(&state) - 0.5).abs() < 1e-9);
        let beyond = ScrollState::new(9000.0, 800.0).with_document_height(5000.0);
        assert_eq!(document_progress(&beyond), 1.0);
    }

    #[test]
    fn scroll_targets_land_inside_their_section() {
        let sections = grid(4, 1200.0, 800.0);
        for layout in [
            SectionLayout::VirtualGrid,
            SectionLayout::elements(),
            SectionLayout::Traversal,
        ] {
            let config = TrackerConfig {
                layout,
                ..TrackerConfig::default()
            };
            for index in 0..4 {
                let target = scroll_target_for_section(&sections, index, 800.0, &layout);
                let result = compute_tracker_result(&sections, &at(target), &config);
                assert_eq!(result.active_index, index, "{layout:?} -> {index}");
            }
        }
        let clamped = scroll_target_for_section(&sections, 99, 800.0, &SectionLayout::VirtualGrid);
        assert!((clamped - (1200.0 + 3.0 * 800.0 + 10.0)).abs() < 1e-9);
    }
}
