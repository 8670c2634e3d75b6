/// Debounce and single-flight guard between raw scroll events and resolution
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchSettings {
    /// Quiet period after the last scroll/resize event
    pub debounce: Duration,
    /// Delay between page readiness and the initial section check
    pub startup_delay: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(16),
            startup_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScrollDispatcher {
    debounce: Duration,
    /// The one pending debounce timer
    deadline: Option<Duration>,
    /// A frame-aligned resolution pass has been requested and not yet run
    frame_pending: bool,
}

impl ScrollDispatcher {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
            frame_pending: false,
        }
    }

    /// Record a scroll/resize event, replacing any pending timer
    pub fn notify(&mut self, now: Duration) {
        self.deadline = Some(now + self.debounce);
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Fire the debounce timer if due. Returns `true` when this expiry
    /// requested a new frame pass; an expiry while a pass is still pending is
    /// dropped.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                if self.frame_pending {
                    log::trace!("debounce expired with a frame pass already pending");
                    false
                } else {
                    self.frame_pending = true;
                    true
                }
            }
            _ => false,
        }
    }

    /// Claim the pending frame pass. Returns `true` at most once per request.
    pub fn begin_frame(&mut self) -> bool {
        std::mem::replace(&mut self.frame_pending, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_burst_is_coalesced() {
        let mut dispatcher = ScrollDispatcher::new(ms(16));
        for t in 0..20 {
            dispatcher.notify(Duration::from_micros(t * 500));
            assert!(!dispatcher.poll(Duration::from_micros(t * 500)));
        }
        // Last event at 9.5ms, so the timer fires at 25.5ms
        assert_eq!(dispatcher.deadline(), Some(Duration::from_micros(25_500)));
        assert!(!dispatcher.poll(ms(25)));
        assert!(dispatcher.poll(ms(26)));
        assert!(dispatcher.begin_frame());
        assert!(!dispatcher.begin_frame());
        assert!(!dispatcher.poll(ms(100)));
    }

    #[test]
    fn test_single_flight_guard() {
        let mut dispatcher = ScrollDispatcher::new(ms(16));
        dispatcher.notify(ms(0));
        assert!(dispatcher.poll(ms(16)));

        // Another expiry before the frame ran is dropped
        dispatcher.notify(ms(17));
        assert!(!dispatcher.poll(ms(33)));
        assert!(dispatcher.frame_pending());
        assert_eq!(dispatcher.deadline(), None);

        assert!(dispatcher.begin_frame());
        dispatcher.notify(ms(40));
        assert!(dispatcher.poll(ms(56)));
    }
}
