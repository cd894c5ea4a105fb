use std::rc::Rc;

use crate::application::debounce::Debouncer;
use crate::domain::logging::LogComponent;
use crate::domain::timeline::{Bounds, PersistedPosition, TimeSource, Viewport};
use crate::log_debug;

/// Multiplicative step for discrete zoom actions.
pub const ZOOM_STEP: f64 = 1.2;
/// Discrete pan step in screen pixels, independent of zoom.
pub const PAN_STEP_PX: f64 = 120.0;
pub const DEFAULT_SAVE_DEBOUNCE_MS: f64 = 300.0;

/// Sole owner of the timeline [`Viewport`].
///
/// Every transition clamps into [`Bounds`] before it becomes visible, and
/// every transition that changes the view schedules a debounced save.
pub struct ViewportController {
    viewport: Viewport,
    container_width: f64,
    data_span_ms: f64,
    clock: Rc<dyn TimeSource>,
    pending_save: Debouncer<Viewport>,
}

impl ViewportController {
    pub fn new(
        container_width: f64,
        data_span_ms: f64,
        clock: Rc<dyn TimeSource>,
        save_debounce_ms: f64,
    ) -> Self {
        let mut controller = Self {
            viewport: Viewport::default(),
            container_width,
            data_span_ms,
            clock,
            pending_save: Debouncer::new(save_debounce_ms),
        };
        controller.viewport = controller.clamped(Viewport::default());
        controller
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Bounds for the current scale.
    pub fn bounds(&self) -> Bounds {
        Bounds::derive(self.container_width, self.data_span_ms, self.viewport.scale)
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// New container width or data span; re-clamps the current view.
    pub fn set_layout(&mut self, container_width: f64, data_span_ms: f64) -> bool {
        self.container_width = container_width;
        self.data_span_ms = data_span_ms;
        self.commit(self.viewport)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_at_point(ZOOM_STEP, self.container_width / 2.0, 0.0)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_at_point(1.0 / ZOOM_STEP, self.container_width / 2.0, 0.0)
    }

    /// Multiply the scale by `factor`, keeping the data under
    /// `(center_x, center_y)` on the same screen pixel.
    pub fn zoom_at_point(&mut self, factor: f64, center_x: f64, center_y: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.zoom_to(self.viewport.scale * factor, center_x, center_y)
    }

    /// Anchor-invariant zoom to an absolute scale.
    pub fn zoom_to(&mut self, scale: f64, center_x: f64, center_y: f64) -> bool {
        let old = self.viewport;
        let new_scale = self.bounds().clamp_scale(scale);
        if new_scale == old.scale {
            return false;
        }
        let ratio = new_scale / old.scale;
        let candidate = Viewport {
            scale: new_scale,
            translate_x: center_x - (center_x - old.translate_x) * ratio,
            translate_y: center_y - (center_y - old.translate_y) * ratio,
        };
        self.commit(candidate)
    }

    /// Shift horizontally; a no-op when the content fits the container.
    pub fn pan_by(&mut self, delta_x: f64) -> bool {
        if !delta_x.is_finite() || !self.bounds().can_pan() {
            return false;
        }
        self.commit(Viewport { translate_x: self.viewport.translate_x + delta_x, ..self.viewport })
    }

    pub fn pan_left(&mut self) -> bool {
        self.pan_by(PAN_STEP_PX)
    }

    pub fn pan_right(&mut self) -> bool {
        self.pan_by(-PAN_STEP_PX)
    }

    pub fn reset(&mut self) -> bool {
        self.commit(Viewport::default())
    }

    /// Pan just enough that `screen_x` sits `padding` pixels inside the edges.
    pub fn pan_into_view(&mut self, screen_x: f64, padding: f64) -> bool {
        let padding = padding.min(self.container_width / 2.0);
        if screen_x < padding {
            self.pan_by(padding - screen_x)
        } else if screen_x > self.container_width - padding {
            self.pan_by(self.container_width - padding - screen_x)
        } else {
            false
        }
    }

    /// Apply a saved position. Values are clamped, never trusted; no save is
    /// scheduled since nothing changed from the store's point of view.
    pub fn restore(&mut self, position: &PersistedPosition) -> Viewport {
        self.viewport = self.clamped(Viewport {
            scale: position.zoom,
            translate_x: position.scroll_x,
            translate_y: 0.0,
        });
        log_debug!(
            LogComponent::Application("Viewport"),
            "Restored scale={:.3} translateX={:.1}",
            self.viewport.scale,
            self.viewport.translate_x
        );
        self.viewport
    }

    /// The viewport to persist, once the debounce window has elapsed.
    pub fn take_due_save(&mut self) -> Option<Viewport> {
        self.pending_save.take_due(self.clock.now_ms())
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_save.is_pending()
    }

    /// The pending viewport regardless of the debounce deadline.
    pub fn flush_save(&mut self) -> Option<Viewport> {
        self.pending_save.flush()
    }

    fn clamped(&self, candidate: Viewport) -> Viewport {
        let scale_bounds = Bounds::derive(self.container_width, self.data_span_ms, 1.0);
        let scale = scale_bounds.clamp_scale(candidate.scale);
        let bounds = scale_bounds.at_scale(self.container_width, scale);
        Viewport {
            scale,
            translate_x: bounds.clamp_translate_x(candidate.translate_x),
            translate_y: bounds.clamp_translate_y(candidate.translate_y),
        }
    }

    fn commit(&mut self, candidate: Viewport) -> bool {
        let next = self.clamped(candidate);
        if next == self.viewport {
            return false;
        }
        self.viewport = next;
        self.pending_save.schedule(next, self.clock.now_ms());
        true
    }
}
