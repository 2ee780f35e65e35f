//! Window scroll/resize events and live layout measurement.

use std::cell::{Cell, RefCell};

use folio_core::{LayoutProbe, ListenerId, ScrollEvent, ScrollSource};
use folio_core::subscription::ScrollHandler;
use folio_protocol::{ScrollState, SectionBounds};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Event, Window};

use crate::error::SourceError;

const EVENTS: [&str; 2] = ["scroll", "resize"];

struct DomListener {
    id: ListenerId,
    callback: Closure<dyn FnMut(Event)>,
}

/// Delivers the window's `scroll` and `resize` events.
pub struct DomScrollSource {
    window: Window,
    listeners: RefCell<Vec<DomListener>>,
    next_id: Cell<u64>,
}

impl DomScrollSource {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    fn detach(&self, callback: &Closure<dyn FnMut(Event)>) {
        for name in EVENTS {
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
            {
                web_sys::console::warn_1(&err);
            }
        }
    }
}

impl ScrollSource for DomScrollSource {
    type Error = SourceError;

    fn listen(&self, mut handler: ScrollHandler) -> Result<ListenerId, SourceError> {
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let kind = if event.type_() == "resize" {
                ScrollEvent::Resize
            } else {
                ScrollEvent::Scroll
            };
            handler(kind);
        });

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        for name in EVENTS {
            let added = self
                .window
                .add_event_listener_with_callback_and_add_event_listener_options(
                    name,
                    callback.as_ref().unchecked_ref(),
                    &options,
                );
            if let Err(err) = added {
                self.detach(&callback);
                return Err(SourceError::listener(name, &err));
            }
        }

        let id = ListenerId::new(self.next_id.get());
        self.next_id.set(id.get() + 1);
        self.listeners.borrow_mut().push(DomListener { id, callback });
        Ok(id)
    }

    fn unlisten(&self, id: ListenerId) {
        let removed = {
            let mut listeners = self.listeners.borrow_mut();
            listeners
                .iter()
                .position(|listener| listener.id == id)
                .map(|pos| listeners.remove(pos))
        };
        if let Some(listener) = removed {
            self.detach(&listener.callback);
        }
    }
}

/// Reads scroll position and section rectangles from the live document.
pub struct DomLayout {
    window: Window,
    document: Document,
}

impl DomLayout {
    pub fn new(window: Window) -> Result<Self, SourceError> {
        let document = window.document().ok_or(SourceError::NoDocument)?;
        Ok(Self { window, document })
    }

    fn scroll_top(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

impl LayoutProbe for DomLayout {
    fn scroll_state(&self) -> ScrollState {
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0);
        let document_height = self
            .document
            .document_element()
            .map_or(0.0, |root| f64::from(root.scroll_height()));
        ScrollState::new(self.scroll_top(), viewport_height).with_document_height(document_height)
    }

    fn measure(&self, ids: &[String]) -> Vec<SectionBounds> {
        // Client rects are viewport-relative; shift them into document space.
        let scroll_top = self.scroll_top();
        ids.iter()
            .filter_map(|id| {
                let rect = self.document.get_element_by_id(id)?.get_bounding_client_rect();
                let start = rect.top() + scroll_top;
                Some(SectionBounds::new(id.clone(), start, start + rect.height()))
            })
            .collect()
    }
}
