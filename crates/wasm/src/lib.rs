//! Browser bridge: the stateful [`ScrollTracker`] plus stateless helpers
//! that take and return JSON.

mod dom;
mod error;
mod scroll_tracker;

use std::time::Duration;

use folio_core::reveal::{self, RevealAnimation};
use folio_core::views::ViewMetrics;
use folio_core::views::progress_bar::render_progress_bar as render_bar;
use folio_core::{ContentError, Portfolio, ProjectFilter, tracker};
use folio_protocol::{
    RenderCommand, ScrollState, SectionBounds, SectionLayout, ThemeMode, TrackerConfig, Viewport,
};
use wasm_bindgen::prelude::*;

pub use dom::{DomLayout, DomScrollSource};
pub use error::SourceError;
pub use scroll_tracker::ScrollTracker;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// `TrackerConfig` from JSON; an empty string means the defaults.
pub(crate) fn tracker_config(json: &str) -> Result<TrackerConfig, serde_json::Error> {
    if json.trim().is_empty() {
        return Ok(TrackerConfig::default());
    }
    serde_json::from_str(json)
}

/// One tracker evaluation. Takes `SectionBounds[]`, `ScrollState`, and
/// `TrackerConfig` as JSON and returns a `TrackerResult` as JSON. An empty
/// config string uses the defaults.
#[wasm_bindgen]
pub fn compute_tracker_result(
    sections_json: &str,
    scroll_state_json: &str,
    config_json: &str,
) -> Result<String, JsError> {
    let sections: Vec<SectionBounds> =
        serde_json::from_str(sections_json).map_err(|e| JsError::new(&e.to_string()))?;
    let state: ScrollState =
        serde_json::from_str(scroll_state_json).map_err(|e| JsError::new(&e.to_string()))?;
    let config = tracker_config(config_json).map_err(|e| JsError::new(&e.to_string()))?;
    let result = tracker::compute_tracker_result(&sections, &state, &config);
    serde_json::to_string(&result).map_err(|e| JsError::new(&e.to_string()))
}

#[wasm_bindgen]
pub fn document_progress(scroll_offset: f64, viewport_height: f64, document_height: f64) -> f64 {
    let state =
        ScrollState::new(scroll_offset, viewport_height).with_document_height(document_height);
    tracker::document_progress(&state)
}

/// Scroll offset that makes section `index` active.
#[wasm_bindgen]
pub fn scroll_target_for_section(
    sections_json: &str,
    index: usize,
    viewport_height: f64,
    layout_json: &str,
) -> Result<f64, JsError> {
    let sections: Vec<SectionBounds> =
        serde_json::from_str(sections_json).map_err(|e| JsError::new(&e.to_string()))?;
    let layout: SectionLayout =
        serde_json::from_str(layout_json).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(tracker::scroll_target_for_section(
        &sections,
        index,
        viewport_height,
        &layout,
    ))
}

/// Characters of the hero heading shown after `elapsed_ms`.
#[wasm_bindgen]
pub fn revealed_characters(
    text_len: usize,
    elapsed_ms: u32,
    per_char_ms: u32,
    start_delay_ms: u32,
) -> usize {
    reveal::revealed_characters(
        text_len,
        Duration::from_millis(u64::from(elapsed_ms)),
        Duration::from_millis(u64::from(per_char_ms)),
        Duration::from_millis(u64::from(start_delay_ms)),
    )
}

#[wasm_bindgen]
pub fn stagger_delay_ms(delay_ms: u32, index: usize, stagger_ms: u32) -> u32 {
    reveal::stagger_delay_ms(delay_ms, index, stagger_ms)
}

/// CSS class for a revealed element, e.g. `"fade-left"` → `"animate-fadeLeft"`.
#[wasm_bindgen]
pub fn reveal_class(animation: &str) -> Result<String, JsError> {
    let animation: RevealAnimation =
        serde_json::from_value(serde_json::Value::String(animation.to_owned()))
            .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(animation.css_class().to_owned())
}

/// The bundled portfolio content as JSON.
#[wasm_bindgen]
pub fn bundled_portfolio() -> Result<String, JsError> {
    let portfolio = Portfolio::bundled().map_err(|e| JsError::new(&e.to_string()))?;
    serde_json::to_string(&portfolio).map_err(|e| JsError::new(&e.to_string()))
}

/// Bundled projects matching `filter` (`"all"`, `"featured"`, or a
/// category such as `"ai"`) as JSON.
#[wasm_bindgen]
pub fn projects(filter: &str) -> Result<String, JsError> {
    project_list(filter).map_err(|e| JsError::new(&e.to_string()))
}

fn project_list(filter: &str) -> Result<String, ContentError> {
    let filter: ProjectFilter = filter.parse()?;
    let portfolio = Portfolio::bundled()?;
    let matching: Vec<_> = portfolio.projects_matching(filter).collect();
    Ok(serde_json::to_string(&matching)?)
}

/// Render commands of the reading progress bar as JSON.
#[wasm_bindgen]
pub fn render_progress_bar(
    width: f64,
    height: f64,
    fraction: f64,
    visible: bool,
) -> Result<String, JsError> {
    let commands = render_bar(
        &Viewport::new(width, height),
        &ViewMetrics::PIXELS,
        fraction,
        visible,
    );
    serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
}

/// Serialize a JSON command list to a standalone SVG document. `theme` is
/// `"dark"` or `"light"`.
#[wasm_bindgen]
pub fn render_svg(
    commands_json: &str,
    width: f64,
    height: f64,
    theme: &str,
) -> Result<String, JsError> {
    let commands: Vec<RenderCommand> =
        serde_json::from_str(commands_json).map_err(|e| JsError::new(&e.to_string()))?;
    let mode = match theme {
        "dark" => ThemeMode::Dark,
        "light" => ThemeMode::Light,
        _ => return Err(JsError::new(&format!("unknown theme: {theme}"))),
    };
    Ok(folio_core::svg::render_svg(&commands, width, height, mode))
}
