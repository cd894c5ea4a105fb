use serde::Deserialize;

use crate::domain::timeline::ValueScaleKind;
use crate::domain::timeline::animation::DEFAULT_ANIMATION_MS;
use crate::domain::timeline::clustering::DEFAULT_CLUSTER_THRESHOLD_PX;
use crate::view_state::DEFAULT_SAVE_DEBOUNCE_MS;

/// Tunables for a timeline instance. Hosts may pass partial JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    pub value_scale: ValueScaleKind,
    pub cluster_threshold_px: f64,
    pub focus_wrap: bool,
    pub initial_focus_index: usize,
    pub save_debounce_ms: f64,
    pub animation_ms: f64,
    /// Margin kept between a focused point and the container edge.
    pub focus_padding_px: f64,
    /// Inset of the plot area inside the container.
    pub plot_inset_px: f64,
    /// Characters of claim text used in accessible descriptions.
    pub preview_chars: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            value_scale: ValueScaleKind::Linear,
            cluster_threshold_px: DEFAULT_CLUSTER_THRESHOLD_PX,
            focus_wrap: true,
            initial_focus_index: 0,
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            animation_ms: DEFAULT_ANIMATION_MS,
            focus_padding_px: 48.0,
            plot_inset_px: 24.0,
            preview_chars: 120,
        }
    }
}

impl TimelineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config = TimelineConfig::from_json(r#"{"valueScale":"log","focusWrap":false}"#).unwrap();
        assert_eq!(config.value_scale, ValueScaleKind::Log);
        assert!(!config.focus_wrap);
        assert_eq!(config.save_debounce_ms, 300.0);
        assert_eq!(TimelineConfig::from_json("").unwrap(), TimelineConfig::default());
    }
}
