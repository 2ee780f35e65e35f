use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use folio_core::{
    FrameThrottle, ScrollEvent, SectionTracker, Subscription, TrackedSections, TrackerUpdate,
};
use folio_protocol::TrackerResult;
use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::dom::{DomLayout, DomScrollSource};
use crate::error::SourceError;
use crate::tracker_config;

/// Payload handed to the JS callback on every changed result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePayload<'a> {
    active_index: usize,
    /// Id of the active section, as passed to the constructor.
    active_id: Option<&'a str>,
    progress_within_section: f64,
    content_visible: bool,
    previous_index: Option<usize>,
    active_changed: bool,
}

impl<'a> UpdatePayload<'a> {
    fn new(update: &TrackerUpdate, tracked: &'a TrackedSections) -> Self {
        Self {
            active_index: update.result.active_index,
            active_id: tracked.active_id(),
            progress_within_section: update.result.progress_within_section,
            content_visible: update.result.content_visible,
            previous_index: update.previous_index,
            active_changed: update.active_changed(),
        }
    }
}

struct FrameLoop {
    window: Window,
    layout: DomLayout,
    tracked: RefCell<TrackedSections>,
    throttle: RefCell<FrameThrottle>,
    on_update: Function,
}

impl FrameLoop {
    fn on_event(self: &Rc<Self>, event: ScrollEvent) {
        match event {
            ScrollEvent::Mount => self.refresh(),
            ScrollEvent::Scroll | ScrollEvent::Resize => {
                if self.throttle.borrow_mut().request() {
                    self.schedule_frame();
                }
            }
        }
    }

    fn schedule_frame(self: &Rc<Self>) {
        let this = Rc::clone(self);
        let callback = Closure::once_into_js(move |timestamp: f64| this.on_frame(timestamp));
        if let Err(err) = self
            .window
            .request_animation_frame(callback.unchecked_ref())
        {
            web_sys::console::error_1(&err);
            self.throttle.borrow_mut().cancel();
        }
    }

    fn on_frame(self: &Rc<Self>, timestamp_ms: f64) {
        let now = Duration::try_from_secs_f64(timestamp_ms / 1000.0).unwrap_or_default();
        let run = self.throttle.borrow_mut().on_frame(now);
        if run {
            self.refresh();
        } else if self.throttle.borrow().is_pending() {
            self.schedule_frame();
        }
    }

    fn refresh(&self) {
        let update = self.tracked.borrow_mut().refresh(&self.layout);
        if let Some(update) = update {
            self.notify(&update);
        }
    }

    fn notify(&self, update: &TrackerUpdate) {
        let json = {
            let tracked = self.tracked.borrow();
            serde_json::to_string(&UpdatePayload::new(update, &tracked))
        };
        match json {
            Ok(json) => {
                if let Err(err) = self.on_update.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    web_sys::console::error_1(&err);
                }
            }
            Err(err) => web_sys::console::error_1(&JsValue::from_str(&err.to_string())),
        }
    }
}

/// Tracks a list of page sections and calls `on_update` with a JSON result
/// whenever it changes, at most once per animation frame.
#[wasm_bindgen]
pub struct ScrollTracker {
    frame_loop: Rc<FrameLoop>,
    source: Rc<DomScrollSource>,
    subscription: Option<Subscription<DomScrollSource>>,
}

#[wasm_bindgen]
impl ScrollTracker {
    /// `config_json` is a `TrackerConfig`; pass an empty string for the
    /// defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        section_ids: Vec<String>,
        config_json: &str,
        on_update: Function,
    ) -> Result<ScrollTracker, JsError> {
        let config = tracker_config(config_json).map_err(|e| JsError::new(&e.to_string()))?;
        let window = web_sys::window().ok_or_else(|| JsError::from(SourceError::NoWindow))?;
        let layout = DomLayout::new(window.clone())?;
        let source = Rc::new(DomScrollSource::new(window.clone()));
        let tracked = TrackedSections::new(section_ids, SectionTracker::new("dom", config));

        Ok(ScrollTracker {
            frame_loop: Rc::new(FrameLoop {
                window,
                layout,
                tracked: RefCell::new(tracked),
                throttle: RefCell::new(FrameThrottle::default()),
                on_update,
            }),
            source,
            subscription: None,
        })
    }

    /// Start listening. The first result is delivered synchronously.
    pub fn mount(&mut self) -> Result<(), JsError> {
        if self.subscription.is_some() {
            return Ok(());
        }
        let frame_loop = Rc::clone(&self.frame_loop);
        let subscription =
            Subscription::acquire(&self.source, Box::new(move |event| frame_loop.on_event(event)))?;
        self.subscription = Some(subscription);
        Ok(())
    }

    /// Stop listening and drop any pending frame.
    pub fn unmount(&mut self) {
        self.subscription = None;
        self.frame_loop.throttle.borrow_mut().cancel();
        self.frame_loop.tracked.borrow_mut().reset();
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Last result as JSON.
    pub fn current(&self) -> Result<String, JsError> {
        let result: TrackerResult = self.frame_loop.tracked.borrow().tracker().current();
        serde_json::to_string(&result).map_err(|e| JsError::new(&e.to_string()))
    }
}
