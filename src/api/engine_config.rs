use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, ScreenScale};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, FontSpec};

/// Colors the engine writes into frames. Theme selection stays with the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPalette {
    pub x_axis_label_text: Color,
    pub y_axis_label_text: Color,
    pub axis_grid: Color,
    pub area_axis_grid: Color,
    pub tooltip_grid: Color,
    pub area_tooltip_grid: Color,
    pub tooltip_total_text: Color,
    /// Translucent color composited over bars that are not selected.
    pub non_selected_mask: Color,
}

impl ChartPalette {
    #[must_use]
    pub fn day() -> Self {
        let label = Color::rgb(152.0 / 255.0, 158.0 / 255.0, 163.0 / 255.0);
        let grid = Color::rgba(24.0 / 255.0, 45.0 / 255.0, 59.0 / 255.0, 0.1);
        Self {
            x_axis_label_text: label,
            y_axis_label_text: label,
            axis_grid: grid,
            area_axis_grid: grid,
            tooltip_grid: Color::rgba(0.0, 0.0, 0.0, 0.2),
            area_tooltip_grid: Color::rgba(0.0, 0.0, 0.0, 0.2),
            tooltip_total_text: Color::rgb(109.0 / 255.0, 109.0 / 255.0, 114.0 / 255.0),
            non_selected_mask: Color::rgba(1.0, 1.0, 1.0, 0.5),
        }
    }

    #[must_use]
    pub fn night() -> Self {
        let label = Color::rgb(93.0 / 255.0, 109.0 / 255.0, 126.0 / 255.0);
        Self {
            x_axis_label_text: label,
            y_axis_label_text: label,
            axis_grid: Color::rgba(133.0 / 255.0, 150.0 / 255.0, 171.0 / 255.0, 0.1),
            area_axis_grid: Color::rgba(1.0, 1.0, 1.0, 0.15),
            tooltip_grid: Color::rgba(133.0 / 255.0, 150.0 / 255.0, 171.0 / 255.0, 0.2),
            area_tooltip_grid: Color::rgba(1.0, 1.0, 1.0, 0.4),
            tooltip_total_text: Color::rgb(1.0, 1.0, 1.0),
            non_selected_mask: Color::rgba(33.0 / 255.0, 47.0 / 255.0, 63.0 / 255.0, 0.5),
        }
    }

    #[must_use]
    pub fn axis_grid_for(self, kind: ChartKind) -> Color {
        match kind {
            ChartKind::Area => self.area_axis_grid,
            ChartKind::Line | ChartKind::Bar => self.axis_grid,
        }
    }

    #[must_use]
    pub fn tooltip_grid_for(self, kind: ChartKind) -> Color {
        match kind {
            ChartKind::Area => self.area_tooltip_grid,
            ChartKind::Line | ChartKind::Bar => self.tooltip_grid,
        }
    }

    fn validate(self) -> ChartResult<()> {
        for color in [
            self.x_axis_label_text,
            self.y_axis_label_text,
            self.axis_grid,
            self.area_axis_grid,
            self.tooltip_grid,
            self.area_tooltip_grid,
            self.tooltip_total_text,
            self.non_selected_mask,
        ] {
            color
                .validate()
                .map_err(|e| ChartError::InvalidConfig(format!("palette: {e}")))?;
        }
        Ok(())
    }
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self::day()
    }
}

/// Engine tuning knobs.
///
/// Serializable so hosts can persist chart setup; every field has a default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: u64,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_label_font")]
    pub label_font: FontSpec,
    #[serde(default = "default_label_line_height_px")]
    pub label_line_height_px: f64,
    #[serde(default = "default_line_width_px")]
    pub line_width_px: f64,
    /// Minimum gap between X labels as a fraction of the label width.
    #[serde(default = "default_label_spacing_ratio")]
    pub label_spacing_ratio: f64,
    /// Horizontal widening of X label frames (fraction of label width) used
    /// by the overlap test.
    #[serde(default = "default_label_overlap_tolerance")]
    pub label_overlap_tolerance: f64,
    /// Smallest visible window fraction the host allows.
    #[serde(default = "default_min_window_fraction")]
    pub min_window_fraction: f64,
    #[serde(default = "default_screen_scale")]
    pub screen_scale: f64,
    #[serde(default = "default_label_jitter_seed")]
    pub label_jitter_seed: u64,
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_y_label_gap_px")]
    pub y_label_gap_px: f64,
    #[serde(default = "default_pie_edge_inset_px")]
    pub pie_edge_inset_px: f64,
    #[serde(default = "default_pie_label_max_font_px")]
    pub pie_label_max_font_px: f64,
    /// Fraction of a wedge's inscribed circle a pie label may fill.
    #[serde(default = "default_pie_label_fill_ratio")]
    pub pie_label_fill_ratio: f64,
    #[serde(default)]
    pub palette: ChartPalette,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: default_animation_duration_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            label_font: default_label_font(),
            label_line_height_px: default_label_line_height_px(),
            line_width_px: default_line_width_px(),
            label_spacing_ratio: default_label_spacing_ratio(),
            label_overlap_tolerance: default_label_overlap_tolerance(),
            min_window_fraction: default_min_window_fraction(),
            screen_scale: default_screen_scale(),
            label_jitter_seed: default_label_jitter_seed(),
            utc_offset_minutes: 0,
            y_label_gap_px: default_y_label_gap_px(),
            pie_edge_inset_px: default_pie_edge_inset_px(),
            pie_label_max_font_px: default_pie_label_max_font_px(),
            pie_label_fill_ratio: default_pie_label_fill_ratio(),
            palette: ChartPalette::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_animation_duration_ms(mut self, duration_ms: u64) -> Self {
        self.animation_duration_ms = duration_ms;
        self
    }

    #[must_use]
    pub fn with_frame_interval_ms(mut self, interval_ms: u64) -> Self {
        self.frame_interval_ms = interval_ms;
        self
    }

    #[must_use]
    pub fn with_label_font(mut self, font: FontSpec, line_height_px: f64) -> Self {
        self.label_font = font;
        self.label_line_height_px = line_height_px;
        self
    }

    #[must_use]
    pub fn with_line_width_px(mut self, width: f64) -> Self {
        self.line_width_px = width;
        self
    }

    #[must_use]
    pub fn with_label_spacing_ratio(mut self, ratio: f64) -> Self {
        self.label_spacing_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_label_overlap_tolerance(mut self, tolerance: f64) -> Self {
        self.label_overlap_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_min_window_fraction(mut self, fraction: f64) -> Self {
        self.min_window_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_screen_scale(mut self, scale: f64) -> Self {
        self.screen_scale = scale;
        self
    }

    #[must_use]
    pub fn with_label_jitter_seed(mut self, seed: u64) -> Self {
        self.label_jitter_seed = seed;
        self
    }

    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: ChartPalette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn animation_duration(self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[must_use]
    pub fn frame_interval(self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    #[must_use]
    pub fn screen(self) -> ScreenScale {
        ScreenScale::new(self.screen_scale)
    }

    /// Fixed offset used for every date string; invalid offsets fall back to UTC.
    #[must_use]
    pub fn utc_offset(self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn validate(self) -> ChartResult<()> {
        let positive = [
            ("label_font.size_px", self.label_font.size_px),
            ("label_line_height_px", self.label_line_height_px),
            ("line_width_px", self.line_width_px),
            ("screen_scale", self.screen_scale),
            ("pie_label_max_font_px", self.pie_label_max_font_px),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "`{name}` must be finite and > 0"
                )));
            }
        }
        let non_negative = [
            ("label_spacing_ratio", self.label_spacing_ratio),
            ("label_overlap_tolerance", self.label_overlap_tolerance),
            ("y_label_gap_px", self.y_label_gap_px),
            ("pie_edge_inset_px", self.pie_edge_inset_px),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "`{name}` must be finite and >= 0"
                )));
            }
        }
        if !self.min_window_fraction.is_finite()
            || self.min_window_fraction <= 0.0
            || self.min_window_fraction > 1.0
        {
            return Err(ChartError::InvalidConfig(
                "`min_window_fraction` must be in (0, 1]".to_owned(),
            ));
        }
        if !self.pie_label_fill_ratio.is_finite()
            || self.pie_label_fill_ratio <= 0.0
            || self.pie_label_fill_ratio > 1.0
        {
            return Err(ChartError::InvalidConfig(
                "`pie_label_fill_ratio` must be in (0, 1]".to_owned(),
            ));
        }
        if self.frame_interval_ms == 0 {
            return Err(ChartError::InvalidConfig(
                "`frame_interval_ms` must be > 0".to_owned(),
            ));
        }
        if FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).is_none() {
            return Err(ChartError::InvalidConfig(format!(
                "`utc_offset_minutes` {} is out of range",
                self.utc_offset_minutes
            )));
        }
        self.palette.validate()
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_animation_duration_ms() -> u64 {
    250
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_label_font() -> FontSpec {
    FontSpec::regular(11.0)
}

fn default_label_line_height_px() -> f64 {
    13.0
}

fn default_line_width_px() -> f64 {
    1.5
}

fn default_label_spacing_ratio() -> f64 {
    0.5
}

fn default_label_overlap_tolerance() -> f64 {
    0.25
}

fn default_min_window_fraction() -> f64 {
    0.05
}

fn default_screen_scale() -> f64 {
    1.0
}

fn default_label_jitter_seed() -> u64 {
    0x5eed_cafe
}

fn default_y_label_gap_px() -> f64 {
    4.0
}

fn default_pie_edge_inset_px() -> f64 {
    6.0
}

fn default_pie_label_max_font_px() -> f64 {
    30.0
}

fn default_pie_label_fill_ratio() -> f64 {
    0.75
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;

    #[test]
    fn json_round_trip_fills_missing_fields_with_defaults() {
        let parsed = EngineConfig::from_json_str(r#"{ "animation_duration_ms": 100 }"#)
            .expect("partial config parses");
        assert_eq!(parsed.animation_duration_ms, 100);
        assert_eq!(parsed.frame_interval_ms, 16);
        assert_eq!(parsed.palette, EngineConfig::default().palette);

        let json = parsed.to_json_pretty().expect("serialize");
        assert_eq!(EngineConfig::from_json_str(&json).expect("parse"), parsed);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::default().with_screen_scale(0.0).validate().is_err());
        assert!(EngineConfig::default().with_min_window_fraction(1.5).validate().is_err());
        assert!(EngineConfig::default().with_frame_interval_ms(0).validate().is_err());
        assert!(EngineConfig::default().with_utc_offset_minutes(48 * 60).validate().is_err());
    }

    #[test]
    fn utc_offset_converts_minutes() {
        let config = EngineConfig::default().with_utc_offset_minutes(180);
        assert_eq!(config.utc_offset().local_minus_utc(), 10_800);
    }
}
