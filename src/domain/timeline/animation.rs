//! Frame-driven interpolation of axis domains.
//!
//! The scheduler never touches a real frame clock: it samples an injected
//! [`TimeSource`] whenever the host calls [`AnimationScheduler::tick`].

use std::cell::Cell;
use std::rc::Rc;

use strum::{AsRefStr, EnumString};

use super::value_objects::AxisDomain;

pub const DEFAULT_ANIMATION_MS: f64 = 600.0;

/// Millisecond clock.
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

/// Clock advanced by hand; used by tests and by hosts without rAF.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now: Cell<f64>,
}

impl ManualTimeSource {
    pub fn new(start_ms: f64) -> Self {
        Self { now: Cell::new(start_ms) }
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
pub enum Easing {
    #[strum(serialize = "linear")]
    Linear,
    #[default]
    #[strum(serialize = "ease-out")]
    EaseOutCubic,
    #[strum(serialize = "ease-in-out")]
    EaseInOutCubic,
}

impl Easing {
    /// Maps progress `t` in `[0, 1]` onto eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

type FrameCallback = Box<dyn FnMut(AxisDomain)>;

struct Tween {
    from: AxisDomain,
    to: AxisDomain,
    started_at: f64,
    duration_ms: f64,
    on_frame: FrameCallback,
}

impl Tween {
    fn sample(&self, now: f64, easing: Easing) -> (AxisDomain, bool) {
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let progress = (now - self.started_at) / self.duration_ms;
        if progress >= 1.0 {
            (self.to, true)
        } else {
            (self.from.lerp(&self.to, easing.apply(progress)), false)
        }
    }
}

/// Single-slot animation runner: starting a tween cancels the previous one.
pub struct AnimationScheduler {
    clock: Rc<dyn TimeSource>,
    easing: Easing,
    active: Option<Tween>,
}

impl AnimationScheduler {
    pub fn new(clock: Rc<dyn TimeSource>, easing: Easing) -> Self {
        Self { clock, easing, active: None }
    }

    pub fn start(
        &mut self,
        from: AxisDomain,
        to: AxisDomain,
        duration_ms: f64,
        on_frame: impl FnMut(AxisDomain) + 'static,
    ) {
        self.cancel();
        self.active = Some(Tween {
            from,
            to,
            started_at: self.clock.now_ms(),
            duration_ms,
            on_frame: Box::new(on_frame),
        });
    }

    /// Drop the in-flight tween without emitting a final frame.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn target(&self) -> Option<AxisDomain> {
        self.active.as_ref().map(|tween| tween.to)
    }

    /// Emit one frame. Returns whether the tween is still running.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();
        let Some(tween) = self.active.as_mut() else {
            return false;
        };
        let (value, finished) = tween.sample(now, self.easing);
        (tween.on_frame)(value);
        if finished {
            self.active = None;
        }
        !finished
    }
}

/// Animated value exposed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedDomain {
    pub domain: AxisDomain,
    pub is_animating: bool,
}

/// Eases an axis domain towards each new target instead of snapping.
pub struct DomainAnimator {
    current: Rc<Cell<AxisDomain>>,
    scheduler: AnimationScheduler,
    duration_ms: f64,
}

impl DomainAnimator {
    pub fn new(initial: AxisDomain, clock: Rc<dyn TimeSource>, duration_ms: f64) -> Self {
        Self {
            current: Rc::new(Cell::new(initial)),
            scheduler: AnimationScheduler::new(clock, Easing::EaseOutCubic),
            duration_ms,
        }
    }

    /// Retarget. A retarget mid-flight restarts from the current interpolated
    /// value, never from the stale start.
    pub fn set_target(&mut self, target: AxisDomain) -> bool {
        if let Some(in_flight) = self.scheduler.target() {
            if in_flight.approx_eq(&target) {
                return false;
            }
            // Bring `current` up to now before restarting from it.
            self.scheduler.tick();
        }
        let from = self.current.get();
        if !self.scheduler.is_running() && from.approx_eq(&target) {
            return false;
        }
        let sink = Rc::clone(&self.current);
        self.scheduler.start(from, target, self.duration_ms, move |value| sink.set(value));
        true
    }

    /// Jump without animating (first layout, resize).
    pub fn snap_to(&mut self, domain: AxisDomain) {
        self.scheduler.cancel();
        self.current.set(domain);
    }

    pub fn tick(&mut self) -> bool {
        self.scheduler.tick()
    }

    pub fn state(&self) -> AnimatedDomain {
        AnimatedDomain { domain: self.current.get(), is_animating: self.scheduler.is_running() }
    }
}
