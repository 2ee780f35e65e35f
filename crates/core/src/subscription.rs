//! Scoped event subscriptions.
//!
//! A consumer acquires a [`Subscription`] on mount and the listener is
//! released when the guard is dropped, however the consumer goes away.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use folio_protocol::{ScrollState, SectionBounds};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollEvent {
    /// Delivered once, synchronously, when the subscription is acquired.
    Mount,
    Scroll,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

pub type ScrollHandler = Box<dyn FnMut(ScrollEvent)>;

/// Something that delivers scroll and resize notifications serially on one
/// thread.
pub trait ScrollSource {
    type Error;

    fn listen(&self, handler: ScrollHandler) -> Result<ListenerId, Self::Error>;

    /// Stop delivering to `id`. Unknown ids are ignored.
    fn unlisten(&self, id: ListenerId);
}

/// Read access to the live layout. Every call measures afresh; nothing is
/// cached across layout changes.
pub trait LayoutProbe {
    fn scroll_state(&self) -> ScrollState;

    /// Boundaries of the sections named in `ids`, in the same order.
    /// Sections that are not currently laid out may be skipped;
    /// [`TrackedSections`](crate::TrackedSections) fills them back in so
    /// indices keep referring to `ids`.
    fn measure(&self, ids: &[String]) -> Vec<SectionBounds>;
}

/// Listener registration that is released on drop.
pub struct Subscription<S: ScrollSource> {
    source: Rc<S>,
    id: Option<ListenerId>,
}

impl<S: ScrollSource> Subscription<S> {
    /// Run `handler` once with [`ScrollEvent::Mount`], then register it.
    pub fn acquire(source: &Rc<S>, mut handler: ScrollHandler) -> Result<Self, S::Error> {
        handler(ScrollEvent::Mount);
        let id = source.listen(handler)?;
        trace!(id = id.get(), "scroll subscription acquired");
        Ok(Self {
            source: Rc::clone(source),
            id: Some(id),
        })
    }

    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    /// Release now instead of waiting for drop.
    pub fn release(mut self) {
        self.unlisten();
    }

    fn unlisten(&mut self) {
        if let Some(id) = self.id.take() {
            self.source.unlisten(id);
            trace!(id = id.get(), "scroll subscription released");
        }
    }
}

impl<S: ScrollSource> Drop for Subscription<S> {
    fn drop(&mut self) {
        self.unlisten();
    }
}

/// In-process source for hosts that poll their own input, such as the
/// terminal front end.
#[derive(Default)]
pub struct LocalScrollSource {
    listeners: RefCell<Vec<(ListenerId, ScrollHandler)>>,
    // Ids released while `emit` has the listener list checked out.
    released_during_emit: RefCell<Vec<ListenerId>>,
    emitting: Cell<bool>,
    next_id: Cell<u64>,
}

impl LocalScrollSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `event` to every listener in registration order. Handlers
    /// may subscribe or unsubscribe while being called.
    pub fn emit(&self, event: ScrollEvent) {
        let mut active = std::mem::take(&mut *self.listeners.borrow_mut());
        self.emitting.set(true);
        for (_, handler) in active.iter_mut() {
            handler(event);
        }
        self.emitting.set(false);

        let released = std::mem::take(&mut *self.released_during_emit.borrow_mut());
        active.retain(|(id, _)| !released.contains(id));

        let mut listeners = self.listeners.borrow_mut();
        let added = std::mem::take(&mut *listeners);
        *listeners = active;
        listeners.extend(added);
    }
}

impl ScrollSource for LocalScrollSource {
    type Error = Infallible;

    fn listen(&self, handler: ScrollHandler) -> Result<ListenerId, Infallible> {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, handler));
        Ok(id)
    }

    fn unlisten(&self, id: ListenerId) {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        if listeners.len() == before && self.emitting.get() {
            self.released_during_emit.borrow_mut().push(id);
        }
    }
}
