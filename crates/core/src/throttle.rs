use std::time::Duration;

/// One frame at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Coalesces bursts of scroll/resize notifications into at most one
/// recomputation per animation frame.
///
/// Timestamps are supplied by the host (`performance.now()` in the browser,
/// elapsed time since start in the terminal) so the throttle never reads a
/// clock itself.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    min_interval: Duration,
    pending: bool,
    last_run: Option<Duration>,
}

impl FrameThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            pending: false,
            last_run: None,
        }
    }

    /// Note that an event arrived. Returns `true` when the host must
    /// schedule a frame callback; further events before that frame return
    /// `false`.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Called from the frame callback. Returns `true` when the pending
    /// recomputation should run now. A frame arriving sooner than the
    /// minimum interval after the previous run keeps the request pending.
    pub fn on_frame(&mut self, now: Duration) -> bool {
        if !self.pending {
            return false;
        }
        if let Some(last) = self.last_run
            && now.saturating_sub(last) < self.min_interval
        {
            return false;
        }
        self.pending = false;
        self.last_run = Some(now);
        true
    }

    /// Drop any pending request, e.g. when the consumer unmounts.
    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}
