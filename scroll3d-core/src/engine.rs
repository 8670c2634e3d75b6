/// The showcase engine: one owner for every moving part
///
/// Hosts feed it raw signals (scroll events, intersection batches, model
/// notifications) and call [`ShowcaseEngine::tick`] whenever time has passed.
/// Within one tick the order is fixed:
///
/// 1. transition phases that are due (the lock may clear here);
/// 2. the startup check, once, if its delay elapsed;
/// 3. the queued visibility nomination;
/// 4. the debounce timer and, if it fired, the scroll resolution pass.
///
/// The first accepted request takes the transition lock, so a visibility
/// nomination beats a scroll pass that resolves in the same tick.
use std::time::Duration;

use crate::config::ShowcaseConfig;
use crate::debug::Inspector;
use crate::dispatch::{DispatchSettings, ScrollDispatcher};
use crate::error::Result;
use crate::geometry::PageLayout;
use crate::observer::{IntersectionEntry, ObserverSettings, VisibilityObserver};
use crate::registry::SectionRegistry;
use crate::resolver;
use crate::surface::{ModelEvent, ModelSurface};
use crate::transition::{Activation, TransitionController, TransitionTimings};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Startup {
    Waiting,
    Scheduled(Duration),
    Done,
}

pub struct ShowcaseEngine {
    controller: TransitionController,
    observer: VisibilityObserver,
    dispatcher: ScrollDispatcher,
    startup_delay: Duration,
    startup: Startup,
    nomination: Option<usize>,
}

impl ShowcaseEngine {
    pub fn new(config: &ShowcaseConfig) -> Result<Self> {
        Ok(Self::from_parts(
            config.registry()?,
            config.transition_timings(),
            config.dispatch_settings(),
            config.observer_settings()?,
        ))
    }

    pub fn from_parts(
        registry: SectionRegistry,
        timings: TransitionTimings,
        dispatch: DispatchSettings,
        observer: ObserverSettings,
    ) -> Self {
        log::info!("showcase engine ready with {} sections", registry.count());
        Self {
            controller: TransitionController::new(registry, timings),
            observer: VisibilityObserver::new(observer),
            dispatcher: ScrollDispatcher::new(dispatch.debounce),
            startup_delay: dispatch.startup_delay,
            startup: Startup::Waiting,
            nomination: None,
        }
    }

    pub fn registry(&self) -> &SectionRegistry {
        self.controller.registry()
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn observer_settings(&self) -> &ObserverSettings {
        self.observer.settings()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.controller.current_index()
    }

    pub fn is_changing(&self) -> bool {
        self.controller.is_changing()
    }

    /// The page finished loading. Arms the startup check; later calls are ignored.
    pub fn page_ready(&mut self, now: Duration) {
        if self.startup == Startup::Waiting {
            self.startup = Startup::Scheduled(now + self.startup_delay);
        }
    }

    /// A raw scroll or resize event
    pub fn scroll_event(&mut self, now: Duration) {
        self.dispatcher.notify(now);
    }

    /// A batch of intersection updates from the host's observation facility.
    /// The nomination, if any, is applied on the next tick.
    pub fn intersections(&mut self, entries: &[IntersectionEntry]) {
        if let Some(index) = self.observer.select(entries, self.current_index()) {
            log::debug!("observer nominated section {}", index + 1);
            self.nomination = Some(index);
        }
    }

    /// Compute intersection updates from the layout, for hosts without a
    /// native observation facility
    pub fn observe_layout<L: PageLayout + ?Sized>(&mut self, layout: &L) {
        let entries = self.observer.observe(layout);
        if !entries.is_empty() {
            self.intersections(&entries);
        }
    }

    pub fn model_event<S: ModelSurface + ?Sized>(&mut self, event: &ModelEvent, surface: &mut S) {
        match event {
            ModelEvent::Loaded { source } => {
                log::info!("model loaded: {}", source);
                surface.mark_loaded();
            }
            ModelEvent::Failed(err) => {
                log::error!("{}", err);
            }
        }
    }

    /// Activate a section directly, subject to the usual no-op rules
    pub fn request_activate<S: ModelSurface + ?Sized>(
        &mut self,
        index: usize,
        now: Duration,
        surface: &mut S,
    ) -> Activation {
        self.controller.request_activate(index, now, surface)
    }

    /// Steps 1-4 of the tick order, with the resolution pass run inline
    pub fn tick<L, S>(&mut self, now: Duration, layout: &L, surface: &mut S)
    where
        L: PageLayout + ?Sized,
        S: ModelSurface + ?Sized,
    {
        self.advance(now, layout, surface);
        if self.poll_dispatch(now) {
            self.animation_frame(now, layout, surface);
        }
    }

    /// Steps 1-3 of the tick order. Hosts with real frame callbacks call this,
    /// then [`Self::poll_dispatch`], and run the pass on their next frame.
    pub fn advance<L, S>(&mut self, now: Duration, layout: &L, surface: &mut S)
    where
        L: PageLayout + ?Sized,
        S: ModelSurface + ?Sized,
    {
        self.controller.advance(now, surface);
        self.run_startup(now, layout, surface);

        if let Some(index) = self.nomination.take() {
            self.controller.request_activate(index, now, surface);
        }
    }

    /// Fire the debounce timer if due. `true` means the host should run
    /// [`Self::animation_frame`] on its next frame.
    pub fn poll_dispatch(&mut self, now: Duration) -> bool {
        self.dispatcher.poll(now)
    }

    /// The frame-aligned resolution pass. Does nothing unless a pass was
    /// requested by [`Self::poll_dispatch`].
    pub fn animation_frame<L, S>(
        &mut self,
        now: Duration,
        layout: &L,
        surface: &mut S,
    ) -> Option<Activation>
    where
        L: PageLayout + ?Sized,
        S: ModelSurface + ?Sized,
    {
        if !self.dispatcher.begin_frame() {
            return None;
        }

        self.controller.advance(now, surface);
        let index = resolver::resolve(layout)?;
        if Some(index) == self.current_index() {
            return None;
        }
        log::debug!("scroll resolved section {}", index + 1);
        Some(self.controller.request_activate(index, now, surface))
    }

    /// Earliest time at which [`Self::tick`] has work to do
    pub fn next_wakeup(&self) -> Option<Duration> {
        let startup = match self.startup {
            Startup::Scheduled(at) => Some(at),
            _ => None,
        };
        [self.controller.next_deadline(), self.dispatcher.deadline(), startup]
            .into_iter()
            .flatten()
            .min()
    }

    pub fn inspector(&mut self) -> Inspector<'_> {
        Inspector::new(self)
    }

    fn run_startup<L, S>(&mut self, now: Duration, layout: &L, surface: &mut S)
    where
        L: PageLayout + ?Sized,
        S: ModelSurface + ?Sized,
    {
        let Startup::Scheduled(at) = self.startup else {
            return;
        };
        if now < at {
            return;
        }
        self.startup = Startup::Done;

        let sections = layout.section_rects();
        match resolver::proximity_index(&sections, layout.viewport()) {
            Some(index) => {
                log::info!("initial section: {}", index + 1);
                self.controller.request_activate(index, now, surface);
            }
            None => {
                log::info!("no section visible at startup, defaulting to the first");
                self.controller.request_activate(0, now, surface);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceLoadError;
    use crate::geometry::LayoutSnapshot;
    use crate::surface::SurfaceState;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn engine() -> ShowcaseEngine {
        ShowcaseEngine::new(&ShowcaseConfig::default()).unwrap()
    }

    #[test]
    fn test_startup_picks_visible_section() {
        let mut engine = engine();
        let mut surface = SurfaceState::new(5);
        let layout = LayoutSnapshot::stacked(1000.0, -2900.0, 1000.0, 5);

        engine.page_ready(ms(0));
        engine.tick(ms(499), &layout, &mut surface);
        assert_eq!(engine.current_index(), None);
        engine.tick(ms(500), &layout, &mut surface);
        assert_eq!(engine.current_index(), Some(3));
    }

    #[test]
    fn test_startup_defaults_to_first_section() {
        let mut engine = engine();
        let mut surface = SurfaceState::new(5);
        let layout = LayoutSnapshot::stacked(1000.0, 3000.0, 1000.0, 5);

        engine.page_ready(ms(0));
        engine.page_ready(ms(400));
        assert_eq!(engine.next_wakeup(), Some(ms(500)));
        engine.tick(ms(500), &layout, &mut surface);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(surface.active_section(), Some(0));
    }

    #[test]
    fn test_nomination_wins_same_tick() {
        let mut engine = engine();
        let mut surface = SurfaceState::new(5);
        // Scroll geometry says section 1
        let layout = LayoutSnapshot::stacked(1000.0, -1000.0, 1000.0, 5);

        engine.scroll_event(ms(0));
        engine.intersections(&[IntersectionEntry { index: 4, ratio: 0.9 }]);
        engine.tick(ms(16), &layout, &mut surface);
        assert_eq!(engine.current_index(), Some(4));
        assert!(engine.is_changing());
    }

    #[test]
    fn test_scroll_pass_picks_up_after_unlock() {
        let mut engine = engine();
        let mut surface = SurfaceState::new(5);
        let layout = LayoutSnapshot::stacked(1000.0, -1000.0, 1000.0, 5);

        engine.request_activate(0, ms(0), &mut surface);
        engine.scroll_event(ms(10));
        engine.tick(ms(26), &layout, &mut surface);
        // Dropped while the first transition runs
        assert_eq!(engine.current_index(), Some(0));

        engine.tick(ms(750), &layout, &mut surface);
        assert!(!engine.is_changing());
        engine.scroll_event(ms(760));
        engine.tick(ms(776), &layout, &mut surface);
        assert_eq!(engine.current_index(), Some(1));
    }

    #[test]
    fn test_model_events_do_not_touch_state() {
        let mut engine = engine();
        let mut surface = SurfaceState::new(5);
        engine.request_activate(2, ms(0), &mut surface);

        let failure = ModelEvent::Failed(ResourceLoadError {
            source_ref: "/models/model3.glb".to_string(),
            reason: "404".to_string(),
        });
        engine.model_event(&failure, &mut surface);
        assert!(!surface.loaded);
        assert_eq!(engine.current_index(), Some(2));
        assert!(engine.is_changing());

        engine.model_event(
            &ModelEvent::Loaded {
                source: "/models/model3.glb".to_string(),
            },
            &mut surface,
        );
        assert!(surface.loaded);
    }

    #[test]
    fn test_frame_without_request_does_nothing() {
        let mut engine = engine();
        let mut surface = SurfaceState::new(5);
        let layout = LayoutSnapshot::stacked(1000.0, -1000.0, 1000.0, 5);
        assert_eq!(engine.animation_frame(ms(0), &layout, &mut surface), None);
        assert_eq!(engine.current_index(), None);
    }
}
