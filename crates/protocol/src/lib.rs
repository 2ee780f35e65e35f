pub mod commands;
pub mod content;
pub mod scroll;
pub mod theme;
pub mod types;

pub use commands::{Action, RenderCommand, TextAlign, hit_test};
pub use content::{
    CurrentRole, Experience, Profile, ProfileLinks, Project, ProjectCategory, ProjectLinks,
    ProjectMetric, SkillCategory,
};
pub use scroll::{
    RevealBasis, ScrollState, SectionBounds, SectionLayout, TrackerConfig, TrackerResult,
};
pub use theme::{ThemeMode, ThemeToken};
pub use types::{Color, Point, Rect, Viewport};
