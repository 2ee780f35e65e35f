use folio_protocol::{ScrollState, SectionBounds, TrackerConfig, TrackerResult};
use tracing::debug;

use crate::subscription::LayoutProbe;
use crate::tracker::compute_tracker_result;

/// One consumer's view of the tracker: its settings plus the last result it
/// rendered, kept only to skip redundant updates.
#[derive(Debug, Clone)]
pub struct SectionTracker {
    name: &'static str,
    config: TrackerConfig,
    last: Option<TrackerResult>,
}

/// A result that differs from the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerUpdate {
    pub result: TrackerResult,
    /// Active index before this update; `None` on the first evaluation.
    pub previous_index: Option<usize>,
}

impl TrackerUpdate {
    pub fn active_changed(&self) -> bool {
        self.previous_index != Some(self.result.active_index)
    }
}

impl SectionTracker {
    pub fn new(name: &'static str, config: TrackerConfig) -> Self {
        Self {
            name,
            config,
            last: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Last result seen, or the at-rest result before the first update.
    pub fn current(&self) -> TrackerResult {
        self.last.unwrap_or_default()
    }

    /// Recompute from fresh boundaries. Returns `None` when the result is
    /// identical to the one already held.
    pub fn update(
        &mut self,
        sections: &[SectionBounds],
        scroll_state: &ScrollState,
    ) -> Option<TrackerUpdate> {
        let result = compute_tracker_result(sections, scroll_state, &self.config);
        if self.last == Some(result) {
            return None;
        }

        let previous_index = self.last.map(|prev| prev.active_index);
        self.last = Some(result);
        let update = TrackerUpdate {
            result,
            previous_index,
        };
        if update.active_changed() {
            debug!(
                consumer = self.name,
                from = ?previous_index,
                to = result.active_index,
                "active section changed"
            );
        }
        Some(update)
    }

    /// Forget the last result so the next update always reports.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// A tracker bound to a list of section ids.
///
/// Boundaries are measured through the probe on every refresh, so layout
/// shifts between events never leave stale geometry behind.
#[derive(Debug, Clone)]
pub struct TrackedSections {
    ids: Vec<String>,
    tracker: SectionTracker,
}

impl TrackedSections {
    pub fn new(ids: Vec<String>, tracker: SectionTracker) -> Self {
        Self { ids, tracker }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn tracker(&self) -> &SectionTracker {
        &self.tracker
    }

    /// Id of the section the last result points at.
    pub fn active_id(&self) -> Option<&str> {
        self.ids
            .get(self.tracker.current().active_index)
            .map(String::as_str)
    }

    /// Current boundaries, one per id.
    pub fn measure(&self, probe: &impl LayoutProbe) -> Vec<SectionBounds> {
        align_to_ids(&self.ids, probe.measure(&self.ids))
    }

    pub fn refresh(&mut self, probe: &impl LayoutProbe) -> Option<TrackerUpdate> {
        let sections = self.measure(probe);
        let scroll_state = probe.scroll_state();
        self.tracker.update(&sections, &scroll_state)
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
    }
}

/// Line `measured` up with `ids` so that result indices always refer to
/// `ids`.
///
/// A section the probe could not find becomes a zero-height placeholder at
/// the end of the section before it (or at the first measured start when
/// nothing precedes it), which keeps boundaries ordered. When nothing was
/// measured at all the result is empty and the tracker stays at rest.
pub fn align_to_ids(ids: &[String], measured: Vec<SectionBounds>) -> Vec<SectionBounds> {
    if measured.len() == ids.len() && measured.iter().zip(ids).all(|(b, id)| b.id == *id) {
        return measured;
    }
    let Some(first_start) = measured.first().map(|b| b.boundary_start) else {
        return Vec::new();
    };

    let mut aligned: Vec<SectionBounds> = Vec::with_capacity(ids.len());
    for id in ids {
        let bounds = match measured.iter().find(|b| b.id == *id) {
            Some(found) => found.clone(),
            None => {
                let at = aligned.last().map_or(first_start, |prev| prev.boundary_end);
                debug!(id = id.as_str(), "section not laid out; using placeholder");
                SectionBounds::new(id.clone(), at, at)
            }
        };
        aligned.push(bounds);
    }
    aligned
}
