/// Serialized model swaps
///
/// Every accepted activation runs the same timeline:
///
/// ```text
/// t0                    t0+fade_out          +settle           +fade_in
/// |-- FadingOut --------|-- Swapping --------|-- FadingIn -------|-- Idle
/// fade/scale out        swap model + camera  fade/scale in       unlock
/// ```
///
/// While the controller is not `Idle`, every request is dropped. Nothing is
/// queued: the next scroll or visibility signal after the unlock re-derives
/// the wanted section.
use std::time::Duration;

use crate::registry::SectionRegistry;
use crate::surface::ModelSurface;
use crate::transform::ViewportStyle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTimings {
    /// From fade-out start to the model swap
    pub fade_out: Duration,
    /// From the swap to fade-in start
    pub settle: Duration,
    /// From fade-in start to unlock
    pub fade_in: Duration,
    /// Duration of the eased style change applied to the viewport
    pub style_transition: Duration,
}

impl TransitionTimings {
    /// Time from an accepted request until the next one can be accepted
    pub fn total(&self) -> Duration {
        self.fade_out + self.settle + self.fade_in
    }
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            fade_out: Duration::from_millis(300),
            settle: Duration::from_millis(150),
            fade_in: Duration::from_millis(300),
            style_transition: Duration::from_millis(600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    FadingOut { target: usize, until: Duration },
    Swapping { until: Duration },
    FadingIn { until: Duration },
}

/// Why a request was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AlreadyActive,
    InProgress,
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Started,
    Ignored(Rejection),
}

impl Activation {
    pub fn is_started(&self) -> bool {
        matches!(self, Activation::Started)
    }
}

pub struct TransitionController {
    registry: SectionRegistry,
    timings: TransitionTimings,
    phase: Phase,
    current: Option<usize>,
    active: Vec<bool>,
}

impl TransitionController {
    pub fn new(registry: SectionRegistry, timings: TransitionTimings) -> Self {
        let active = vec![false; registry.count()];
        Self {
            registry,
            timings,
            phase: Phase::Idle,
            current: None,
            active,
        }
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn timings(&self) -> &TransitionTimings {
        &self.timings
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The transition lock
    pub fn is_changing(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn active_flags(&self) -> &[bool] {
        &self.active
    }

    /// Commit `index` and start its transition, unless it is already current,
    /// a transition is running, or it is out of range.
    pub fn request_activate<S: ModelSurface + ?Sized>(
        &mut self,
        index: usize,
        now: Duration,
        surface: &mut S,
    ) -> Activation {
        let rejection = if Some(index) == self.current {
            Some(Rejection::AlreadyActive)
        } else if self.is_changing() {
            Some(Rejection::InProgress)
        } else if index >= self.registry.count() {
            Some(Rejection::OutOfRange)
        } else {
            None
        };
        if let Some(rejection) = rejection {
            log::debug!("activation of section {} ignored: {:?}", index, rejection);
            return Activation::Ignored(rejection);
        }

        log::info!("section {} active, starting model transition", index + 1);
        self.current = Some(index);
        self.phase = Phase::FadingOut {
            target: index,
            until: now + self.timings.fade_out,
        };

        for (i, flag) in self.active.iter_mut().enumerate() {
            if *flag {
                *flag = false;
                surface.set_section_active(i, false);
            }
        }
        self.active[index] = true;
        surface.set_section_active(index, true);

        surface.apply_style(&ViewportStyle::faded().with_transition(self.timings.style_transition));
        Activation::Started
    }

    /// Run every phase change that is due at `now`
    pub fn advance<S: ModelSurface + ?Sized>(&mut self, now: Duration, surface: &mut S) {
        loop {
            match self.phase {
                Phase::FadingOut { target, until } if now >= until => {
                    self.swap_model(target, surface);
                    self.phase = Phase::Swapping {
                        until: until + self.timings.settle,
                    };
                }
                Phase::Swapping { until } if now >= until => {
                    surface.apply_style(
                        &ViewportStyle::shown().with_transition(self.timings.style_transition),
                    );
                    self.phase = Phase::FadingIn {
                        until: until + self.timings.fade_in,
                    };
                }
                Phase::FadingIn { until } if now >= until => {
                    log::debug!("transition finished");
                    self.phase = Phase::Idle;
                }
                _ => break,
            }
        }
    }

    /// When the next phase change is due
    pub fn next_deadline(&self) -> Option<Duration> {
        match self.phase {
            Phase::Idle => None,
            Phase::FadingOut { until, .. }
            | Phase::Swapping { until }
            | Phase::FadingIn { until } => Some(until),
        }
    }

    fn swap_model<S: ModelSurface + ?Sized>(&self, index: usize, surface: &mut S) {
        let Some(binding) = self.registry.binding_at(index) else {
            return;
        };
        if surface.loaded_source().as_deref() != Some(binding.source.as_str()) {
            surface.set_source(&binding.source);
            log::info!("model updated: {}", binding.source);
        }
        surface.set_camera_orbit(&binding.camera_orbit);
        log::info!("camera orbit: {}", binding.camera_orbit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ModelBinding;
    use crate::surface::SurfaceState;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn controller(sources: &[&str]) -> TransitionController {
        let bindings = sources
            .iter()
            .enumerate()
            .map(|(i, src)| ModelBinding::parse(i, *src, "0deg 75deg 105%").unwrap())
            .collect();
        let regions: Vec<String> = (0..sources.len()).map(|i| format!("s{i}")).collect();
        let registry = SectionRegistry::new(regions, bindings).unwrap();
        TransitionController::new(registry, TransitionTimings::default())
    }

    #[test]
    fn test_full_timeline() {
        let mut ctl = controller(&["/a.glb", "/b.glb", "/c.glb"]);
        let mut surface = SurfaceState::new(3);
        assert_eq!(ctl.timings().total(), ms(750));

        assert!(ctl.request_activate(1, ms(0), &mut surface).is_started());
        assert_eq!(ctl.current_index(), Some(1));
        assert!(ctl.is_changing());
        assert_eq!(surface.style.opacity, 0.2);
        assert_eq!(surface.active_section(), Some(1));
        assert!(surface.source.is_none());

        ctl.advance(ms(299), &mut surface);
        assert!(surface.source.is_none());

        ctl.advance(ms(300), &mut surface);
        assert_eq!(surface.source.as_deref(), Some("/b.glb"));
        assert!(surface.camera_orbit.is_some());
        assert_eq!(surface.style.opacity, 0.2);

        ctl.advance(ms(450), &mut surface);
        assert_eq!(surface.style, ViewportStyle::shown().with_transition(ms(600)));
        assert!(ctl.is_changing());

        ctl.advance(ms(749), &mut surface);
        assert!(ctl.is_changing());
        ctl.advance(ms(750), &mut surface);
        assert!(!ctl.is_changing());
        assert_eq!(ctl.next_deadline(), None);
    }

    #[test]
    fn test_late_advance_runs_all_due_phases() {
        let mut ctl = controller(&["/a.glb", "/b.glb"]);
        let mut surface = SurfaceState::new(2);
        ctl.request_activate(0, ms(1000), &mut surface);
        assert_eq!(ctl.next_deadline(), Some(ms(1300)));

        ctl.advance(ms(5000), &mut surface);
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(surface.source.as_deref(), Some("/a.glb"));
        assert_eq!(surface.style.opacity, 1.0);
    }

    #[test]
    fn test_rejections() {
        let mut ctl = controller(&["/a.glb", "/b.glb", "/c.glb"]);
        let mut surface = SurfaceState::new(3);

        assert_eq!(
            ctl.request_activate(3, ms(0), &mut surface),
            Activation::Ignored(Rejection::OutOfRange)
        );
        assert_eq!(ctl.current_index(), None);

        ctl.request_activate(1, ms(0), &mut surface);
        assert_eq!(
            ctl.request_activate(1, ms(10), &mut surface),
            Activation::Ignored(Rejection::AlreadyActive)
        );
        assert_eq!(
            ctl.request_activate(2, ms(10), &mut surface),
            Activation::Ignored(Rejection::InProgress)
        );
        assert_eq!(ctl.current_index(), Some(1));

        ctl.advance(ms(750), &mut surface);
        // Current index stays a no-op once unlocked too
        assert_eq!(
            ctl.request_activate(1, ms(800), &mut surface),
            Activation::Ignored(Rejection::AlreadyActive)
        );
        assert!(ctl.request_activate(2, ms(800), &mut surface).is_started());
    }

    #[test]
    fn test_exclusive_active_flag() {
        let mut ctl = controller(&["/a.glb", "/b.glb", "/c.glb"]);
        let mut surface = SurfaceState::new(3);
        let mut now = ms(0);
        for index in [0, 2, 1, 0] {
            ctl.request_activate(index, now, &mut surface);
            assert_eq!(ctl.active_flags().iter().filter(|f| **f).count(), 1);
            assert_eq!(surface.active_count(), 1);
            assert_eq!(surface.active_section(), Some(index));
            now += ms(750);
            ctl.advance(now, &mut surface);
        }
    }

    #[test]
    fn test_same_resource_is_not_reloaded() {
        let mut ctl = controller(&["/shared.glb", "/shared.glb"]);
        let mut surface = SurfaceState::new(2);

        ctl.request_activate(0, ms(0), &mut surface);
        ctl.advance(ms(750), &mut surface);
        assert_eq!(surface.source_swaps, 1);

        ctl.request_activate(1, ms(800), &mut surface);
        ctl.advance(ms(1550), &mut surface);
        assert_eq!(surface.source_swaps, 1);
        assert_eq!(ctl.current_index(), Some(1));
    }
}
