use serde::{Deserialize, Serialize};

const DAY_MS: f64 = 86_400_000.0;

/// Numeric range `[min, max]` an axis maps to pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

impl AxisDomain {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        !self.min.is_finite() || !self.max.is_finite() || self.span() == 0.0
    }

    /// Zero-width or non-finite domains widen to `[min, min + 1]`.
    pub fn non_degenerate(self) -> Self {
        if !self.is_degenerate() {
            return self;
        }
        let min = if self.min.is_finite() { self.min } else { 0.0 };
        Self::new(min, min + 1.0)
    }

    /// Extent of `values` padded by `padding_ratio` of the span on each side.
    pub fn from_values(values: impl IntoIterator<Item = f64>, padding_ratio: f64) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })?;
        let pad = (max - min) * padding_ratio;
        Some(Self::new(min - pad, max + pad))
    }

    /// Linear interpolation towards `to` by `t` in `[0, 1]`.
    pub fn lerp(&self, to: &AxisDomain, t: f64) -> AxisDomain {
        AxisDomain::new(
            self.min + (to.min - self.min) * t,
            self.max + (to.max - self.max) * t,
        )
    }

    pub fn approx_eq(&self, other: &AxisDomain) -> bool {
        let tolerance = 1e-9 * self.span().abs().max(other.span().abs()).max(1.0);
        (self.min - other.min).abs() <= tolerance && (self.max - other.max).abs() <= tolerance
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Output pixel interval; `start` may exceed `end` for inverted (y-down) axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRange {
    pub start: f64,
    pub end: f64,
}

impl PixelRange {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }
}

/// Current scale and translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, translate_x: 0.0, translate_y: 0.0 }
    }
}

impl Viewport {
    /// Screen x for a content x laid out at scale 1.
    pub fn to_screen_x(&self, base_x: f64) -> f64 {
        base_x * self.scale + self.translate_x
    }

    /// Content x (scale 1) under a screen x.
    pub fn to_base_x(&self, screen_x: f64) -> f64 {
        (screen_x - self.translate_x) / self.scale
    }
}

/// Limits every exposed [`Viewport`] must satisfy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_scale: f64,
    pub max_scale: f64,
    pub min_translate_x: f64,
    pub max_translate_x: f64,
    pub min_translate_y: f64,
    pub max_translate_y: f64,
}

impl Bounds {
    pub const MIN_SCALE: f64 = 0.5;
    pub const MAX_SCALE_CAP: f64 = 20.0;
    /// Narrowest time span the container may show at max zoom.
    pub const MIN_VISIBLE_SPAN_MS: f64 = 30.0 * DAY_MS;

    /// Bounds for `scale`, given the container width and the data's time span.
    pub fn derive(container_width: f64, data_span_ms: f64, scale: f64) -> Self {
        let max_scale = if data_span_ms.is_finite() && data_span_ms > 0.0 {
            (data_span_ms / Self::MIN_VISIBLE_SPAN_MS).clamp(1.0, Self::MAX_SCALE_CAP)
        } else {
            1.0
        };
        let width = container_width.max(0.0);
        Self {
            min_scale: Self::MIN_SCALE,
            max_scale,
            min_translate_x: (width - width * scale).min(0.0),
            max_translate_x: 0.0,
            min_translate_y: 0.0,
            max_translate_y: 0.0,
        }
    }

    /// Same scale limits, translation limits recomputed for another scale.
    pub fn at_scale(&self, container_width: f64, scale: f64) -> Self {
        let width = container_width.max(0.0);
        Self { min_translate_x: (width - width * scale).min(0.0), ..*self }
    }

    pub fn clamp_scale(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.min_scale;
        }
        scale.clamp(self.min_scale, self.max_scale)
    }

    pub fn clamp_translate_x(&self, translate_x: f64) -> f64 {
        if translate_x.is_nan() {
            return self.max_translate_x;
        }
        translate_x.clamp(self.min_translate_x, self.max_translate_x)
    }

    pub fn clamp_translate_y(&self, translate_y: f64) -> f64 {
        if translate_y.is_nan() {
            return self.max_translate_y;
        }
        translate_y.clamp(self.min_translate_y, self.max_translate_y)
    }

    pub fn can_pan(&self) -> bool {
        self.min_translate_x < self.max_translate_x
    }

    pub fn contains(&self, viewport: &Viewport) -> bool {
        (self.min_scale..=self.max_scale).contains(&viewport.scale)
            && (self.min_translate_x..=self.max_translate_x).contains(&viewport.translate_x)
            && (self.min_translate_y..=self.max_translate_y).contains(&viewport.translate_y)
    }
}

/// Snapshot of the roving focus controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    pub focused_index: Option<usize>,
    pub item_count: usize,
}

/// Visible slice of the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn contains(&self, timestamp: f64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}
