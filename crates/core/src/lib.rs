//! Scroll-driven section tracking for folio.
//!
//! [`tracker`] holds the pure computation. The other modules wrap it for
//! one consumer at a time: change detection, indicator states, frame
//! throttling, scoped listeners, reveal gates, content, and views.

pub mod config;
pub mod consumer;
pub mod content;
pub mod error;
pub mod indicator;
pub mod reveal;
pub mod subscription;
pub mod svg;
pub mod throttle;
pub mod tracker;
pub mod views;

pub use config::{FolioConfig, LogLevel, load_config, parse_config};
pub use consumer::{SectionTracker, TrackedSections, TrackerUpdate, align_to_ids};
pub use content::{Portfolio, ProjectFilter, ShowcaseItem, ShowcaseSection};
pub use error::{ConfigError, ContentError};
pub use indicator::{IndicatorState, IndicatorTransition, SectionIndicators};
pub use subscription::{
    LayoutProbe, ListenerId, LocalScrollSource, ScrollEvent, ScrollSource, Subscription,
};
pub use throttle::FrameThrottle;
pub use tracker::{compute_tracker_result, document_progress, scroll_target_for_section};
