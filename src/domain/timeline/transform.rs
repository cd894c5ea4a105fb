//! Data-to-pixel mappings.
//!
//! Scales never clamp: inputs outside the domain map outside the pixel range,
//! and callers filter or clamp as they see fit.

use serde::Deserialize;
use strum::{AsRefStr, EnumString};

use super::entities::DataPoint;
use super::value_objects::{AxisDomain, PixelRange, TimeWindow, Viewport};

/// Stand-in for non-positive inputs before taking logarithms.
const LOG_EPSILON: f64 = 1e-12;

fn safe_log10(value: f64) -> f64 {
    if value > 0.0 { value.log10() } else { LOG_EPSILON.log10() }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: AxisDomain,
    range: PixelRange,
}

impl LinearScale {
    pub fn new(domain: AxisDomain, range: PixelRange) -> Self {
        Self { domain: domain.non_degenerate(), range }
    }

    pub fn domain(&self) -> AxisDomain {
        self.domain
    }

    pub fn apply(&self, value: f64) -> f64 {
        let t = (value - self.domain.min) / self.domain.span();
        self.range.start + t * self.range.len()
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let len = self.range.len();
        if len == 0.0 {
            return self.domain.min;
        }
        let t = (pixel - self.range.start) / len;
        self.domain.min + t * self.domain.span()
    }
}

/// Base-10 logarithmic scale for quantities spanning orders of magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    log_min: f64,
    log_max: f64,
    range: PixelRange,
}

impl LogScale {
    pub fn new(domain: AxisDomain, range: PixelRange) -> Self {
        let log_min = safe_log10(domain.min);
        let mut log_max = safe_log10(domain.max);
        if !log_min.is_finite() || !log_max.is_finite() || log_max == log_min {
            // One decade wide
            log_max = if log_min.is_finite() { log_min + 1.0 } else { 1.0 };
        }
        let log_min = if log_min.is_finite() { log_min } else { 0.0 };
        Self { log_min, log_max, range }
    }

    pub fn domain(&self) -> AxisDomain {
        AxisDomain::new(10f64.powf(self.log_min), 10f64.powf(self.log_max))
    }

    pub fn apply(&self, value: f64) -> f64 {
        let t = (safe_log10(value) - self.log_min) / (self.log_max - self.log_min);
        self.range.start + t * self.range.len()
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let len = self.range.len();
        if len == 0.0 {
            return 10f64.powf(self.log_min);
        }
        let t = (pixel - self.range.start) / len;
        10f64.powf(self.log_min + t * (self.log_max - self.log_min))
    }
}

/// Which mapping the value axis uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueScaleKind {
    /// Normalized 0–1 metrics.
    #[default]
    #[strum(serialize = "linear")]
    Linear,
    /// Quantities like training compute.
    #[strum(serialize = "log")]
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueScale {
    Linear(LinearScale),
    Log(LogScale),
}

impl ValueScale {
    pub fn new(kind: ValueScaleKind, domain: AxisDomain, range: PixelRange) -> Self {
        match kind {
            ValueScaleKind::Linear => ValueScale::Linear(LinearScale::new(domain, range)),
            ValueScaleKind::Log => ValueScale::Log(LogScale::new(domain, range)),
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        match self {
            ValueScale::Linear(scale) => scale.apply(value),
            ValueScale::Log(scale) => scale.apply(value),
        }
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        match self {
            ValueScale::Linear(scale) => scale.invert(pixel),
            ValueScale::Log(scale) => scale.invert(pixel),
        }
    }
}

/// Time axis at scale 1: the whole data span across the container width.
pub type TimeScale = LinearScale;

/// Everything needed to put a [`DataPoint`] on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub time: TimeScale,
    pub value: ValueScale,
}

impl Projection {
    /// Screen position under `viewport`. Only x is zoomed; the value axis
    /// auto-fits instead.
    pub fn project(&self, point: &DataPoint, viewport: &Viewport) -> (f64, f64) {
        let x = viewport.to_screen_x(self.time.apply(point.timestamp));
        let y = self.value.apply(point.value) + viewport.translate_y;
        (x, y)
    }

    /// Time slice visible through a container of `width` pixels.
    pub fn visible_window(&self, viewport: &Viewport, width: f64) -> TimeWindow {
        let start = self.time.invert(viewport.to_base_x(0.0));
        let end = self.time.invert(viewport.to_base_x(width));
        TimeWindow { start: start.min(end), end: start.max(end) }
    }
}

/// Target value-axis range for the points inside `window`.
///
/// Linear axes get 5% padding; log axes get half a decade on each side.
pub fn value_domain_for_window(
    points: &[DataPoint],
    window: TimeWindow,
    kind: ValueScaleKind,
) -> Option<AxisDomain> {
    let values = points.iter().filter(|p| window.contains(p.timestamp)).map(|p| p.value);
    match kind {
        ValueScaleKind::Linear => AxisDomain::from_values(values, 0.05),
        ValueScaleKind::Log => {
            let logs = AxisDomain::from_values(values.filter(|v| *v > 0.0).map(f64::log10), 0.0)?;
            Some(AxisDomain::new(10f64.powf(logs.min - 0.5), 10f64.powf(logs.max + 0.5)))
        }
    }
}
