use serde::Serialize;

/// Highlight state of one section marker (dot, pill, or step).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorState {
    /// Not reached yet.
    Inactive,
    /// Scrolled past; no longer current.
    Approaching,
    Active,
}

impl IndicatorState {
    /// State of the marker at `position` while `active_index` is current.
    pub fn for_position(position: usize, active_index: usize) -> Self {
        use std::cmp::Ordering::*;
        match position.cmp(&active_index) {
            Less => IndicatorState::Approaching,
            Equal => IndicatorState::Active,
            Greater => IndicatorState::Inactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorTransition {
    pub position: usize,
    pub from: IndicatorState,
    pub to: IndicatorState,
}

/// Marker states for a fixed set of sections.
///
/// The states follow the active index in whichever direction the user
/// scrolls: moving forward retires sections to `Approaching`, moving back
/// re-activates them and returns later ones to `Inactive`.
#[derive(Debug, Clone)]
pub struct SectionIndicators {
    states: Vec<IndicatorState>,
    active: usize,
    previous: Option<usize>,
}

impl SectionIndicators {
    pub fn new(count: usize) -> Self {
        Self {
            states: (0..count)
                .map(|position| IndicatorState::for_position(position, 0))
                .collect(),
            active: 0,
            previous: None,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn state(&self, position: usize) -> Option<IndicatorState> {
        self.states.get(position).copied()
    }

    pub fn states(&self) -> &[IndicatorState] {
        &self.states
    }

    /// Apply a new active index and return every marker that changed.
    /// Indices past the end are pinned to the last marker.
    pub fn advance(&mut self, active_index: usize) -> Vec<IndicatorTransition> {
        let Some(last) = self.states.len().checked_sub(1) else {
            return Vec::new();
        };
        let active_index = active_index.min(last);
        if active_index == self.active {
            self.previous = None;
            return Vec::new();
        }

        self.previous = Some(self.active);
        self.active = active_index;

        let mut transitions = Vec::new();
        for (position, state) in self.states.iter_mut().enumerate() {
            let next = IndicatorState::for_position(position, active_index);
            if *state != next {
                transitions.push(IndicatorTransition {
                    position,
                    from: *state,
                    to: next,
                });
                *state = next;
            }
        }
        transitions
    }

    /// Whether `position` is one of the two markers swapping during the
    /// most recent change of active section.
    pub fn is_transitioning(&self, position: usize) -> bool {
        self.previous
            .is_some_and(|previous| position == previous || position == self.active)
    }
}
