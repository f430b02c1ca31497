use crate::style::ViewfinderStyle;
use crate::surface::Color;
use serde::Deserialize;

/// Where the scan frame sits when it does not fill the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameGravity {
    #[default]
    Center,
    Left,
    Top,
    Right,
    Bottom,
}

/// Where the label text is drawn relative to the scan frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLocation {
    Top,
    #[default]
    Bottom,
}

/// Overlay configuration.
///
/// Every cosmetic tuning value lives here rather than being hardcoded in the
/// renderers. All dimensions are view-local pixels; density scaling is the
/// host's concern. Deserializes from YAML with per-field defaults, so hosts
/// can override only what they need.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Visual variant; switching it mid-animation keeps the sweep phase.
    pub style: ViewfinderStyle,

    /// Fill outside the scan window. Fully transparent disables the mask.
    pub mask_color: Color,
    /// Scan frame border color.
    pub frame_color: Color,
    /// Corner bracket color.
    pub frame_corner_color: Color,
    /// Sweep decoration color (laser line or grid).
    pub laser_color: Color,

    /// Frame size as a fraction of the smaller view dimension.
    pub frame_ratio: f32,
    /// Explicit frame width; ignored when non-positive. Oversized frames are
    /// scaled down to fit, preserving aspect.
    pub frame_width: Option<f32>,
    /// Explicit frame height; ignored when non-positive. Oversized frames are
    /// scaled down to fit, preserving aspect.
    pub frame_height: Option<f32>,
    pub frame_gravity: FrameGravity,
    pub frame_padding_left: f32,
    pub frame_padding_top: f32,
    pub frame_padding_right: f32,
    pub frame_padding_bottom: f32,

    pub frame_line_stroke_width: f32,
    /// Length of each corner bracket arm.
    pub frame_corner_size: f32,
    pub frame_corner_stroke_width: f32,
    /// Rounds both the window cut-out and the border. The Popular style
    /// falls back to a built-in rounding when this is zero.
    pub frame_corner_radius: f32,

    /// Height of the sweep line.
    pub laser_line_height: f32,
    /// Normalized phase advance per tick.
    pub sweep_step: f32,
    /// Tick cadence of the sweep animation, in milliseconds.
    pub tick_interval_ms: u64,

    /// Number of grid columns for the Popular sweep.
    pub grid_column: u32,
    /// Height of the glowing band trailing the grid sweep.
    pub grid_height: f32,
    pub grid_stroke_width: f32,

    pub label_text: Option<String>,
    pub label_text_color: Color,
    pub label_text_size: f32,
    /// Gap between the label and the scan frame.
    pub label_text_padding: f32,
    pub label_text_location: LabelLocation,

    /// Default marker fill when no glyph is set.
    pub point_color: Color,
    pub point_stroke_color: Color,
    pub point_radius: f32,
    /// Outer stroke radius as a multiple of `point_radius`.
    pub point_stroke_ratio: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            style: ViewfinderStyle::Classic,
            mask_color: Color::rgba(0, 0, 0, 0x60),
            frame_color: Color::rgba(0x1f, 0xb3, 0xe2, 0x7f),
            frame_corner_color: Color::new(0x1f, 0xb3, 0xe2),
            laser_color: Color::new(0x1f, 0xb3, 0xe2),
            frame_ratio: 0.625,
            frame_width: None,
            frame_height: None,
            frame_gravity: FrameGravity::Center,
            frame_padding_left: 0.0,
            frame_padding_top: 0.0,
            frame_padding_right: 0.0,
            frame_padding_bottom: 0.0,
            frame_line_stroke_width: 1.0,
            frame_corner_size: 16.0,
            frame_corner_stroke_width: 4.0,
            frame_corner_radius: 0.0,
            laser_line_height: 5.0,
            sweep_step: 0.005,
            tick_interval_ms: 20,
            grid_column: 20,
            grid_height: 40.0,
            grid_stroke_width: 1.0,
            label_text: None,
            label_text_color: Color::new(0x99, 0x99, 0x99),
            label_text_size: 14.0,
            label_text_padding: 24.0,
            label_text_location: LabelLocation::Bottom,
            point_color: Color::new(0x1f, 0xb3, 0xe2),
            point_stroke_color: Color::WHITE,
            point_radius: 15.0,
            point_stroke_ratio: 1.2,
        }
    }
}

/// Errors that can occur when loading an overlay configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid overlay configuration: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

impl OverlayConfig {
    /// Loads a configuration from YAML, clamping out-of-range values.
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(input)?;
        config.sanitize();
        Ok(config)
    }

    /// Clamps every numeric field to its valid range. Invalid configuration
    /// is corrected, never rejected.
    pub fn sanitize(&mut self) {
        self.frame_ratio = self.frame_ratio.clamp(0.01, 1.0);
        self.frame_padding_left = self.frame_padding_left.max(0.0);
        self.frame_padding_top = self.frame_padding_top.max(0.0);
        self.frame_padding_right = self.frame_padding_right.max(0.0);
        self.frame_padding_bottom = self.frame_padding_bottom.max(0.0);
        self.frame_line_stroke_width = self.frame_line_stroke_width.max(0.0);
        self.frame_corner_size = self.frame_corner_size.max(0.0);
        self.frame_corner_stroke_width = self.frame_corner_stroke_width.max(0.0);
        self.frame_corner_radius = self.frame_corner_radius.max(0.0);
        self.laser_line_height = self.laser_line_height.max(1.0);
        self.sweep_step = self.sweep_step.clamp(1e-4, 1.0);
        self.tick_interval_ms = self.tick_interval_ms.max(1);
        self.grid_column = self.grid_column.max(1);
        self.grid_height = self.grid_height.max(0.0);
        self.grid_stroke_width = self.grid_stroke_width.max(0.0);
        self.label_text_size = self.label_text_size.max(1.0);
        self.label_text_padding = self.label_text_padding.max(0.0);
        self.point_radius = self.point_radius.max(1.0);
        self.point_stroke_ratio = self.point_stroke_ratio.max(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_is_classic() {
        assert_eq!(OverlayConfig::default().style, ViewfinderStyle::Classic);
    }

    #[test]
    fn loads_partial_yaml_over_defaults() {
        let config = OverlayConfig::from_yaml(
            "style: popular\nmask_color: \"#80000000\"\nframe_ratio: 0.5\n",
        )
        .unwrap();
        assert_eq!(config.style, ViewfinderStyle::Popular);
        assert_eq!(config.mask_color, Color::rgba(0, 0, 0, 0x80));
        assert_eq!(config.frame_ratio, 0.5);
        // Untouched fields keep their defaults.
        assert_eq!(config.grid_column, 20);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(OverlayConfig::from_yaml("lazer_color: \"#FF0000\"\n").is_err());
    }

    #[test]
    fn sanitize_clamps_invalid_values() {
        let mut config = OverlayConfig::default();
        config.frame_ratio = -3.0;
        config.frame_padding_left = -10.0;
        config.sweep_step = 0.0;
        config.grid_column = 0;
        config.tick_interval_ms = 0;
        config.sanitize();
        assert_eq!(config.frame_ratio, 0.01);
        assert_eq!(config.frame_padding_left, 0.0);
        assert!(config.sweep_step > 0.0);
        assert_eq!(config.grid_column, 1);
        assert_eq!(config.tick_interval_ms, 1);
    }

    #[test]
    fn yaml_values_are_sanitized() {
        let config = OverlayConfig::from_yaml("frame_ratio: 7.0\n").unwrap();
        assert_eq!(config.frame_ratio, 1.0);
    }
}
