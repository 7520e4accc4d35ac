//! Editor configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable configuration.

use kurbo::Size;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default grid unit in world coordinates.
pub const DEFAULT_GRID_SIZE: f64 = 75.0;

/// Default block edge length.
pub const DEFAULT_BLOCK_SIZE: f64 = 75.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid color '{0}': expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

/// An RGBA8 color written as `#rrggbb` or `#rrggbbaa` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Convert to a peniko color for renderers.
    pub fn color(&self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> Self {
        if c.a == 255 {
            format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
        }
    }
}

/// Visual constants for blocks and links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Arrowhead width (across the link).
    pub arrow_width: f64,
    /// Arrowhead height (along the link).
    pub arrow_height: f64,
    /// Link stroke width.
    pub stroke_width: f64,
    /// Default block width for new blocks.
    pub block_width: f64,
    /// Default block height for new blocks.
    pub block_height: f64,
    /// Link color.
    pub link_color: HexColor,
    /// Link color while one of its endpoints is selected.
    pub link_highlight_color: HexColor,
    /// Width of the outline drawn under a link.
    pub link_outline_width: f64,
    /// Color of the outline drawn under a link.
    pub link_outline_color: HexColor,
    /// Shadow blur applied to a selected block.
    pub highlight_blur: f64,
    /// Shadow opacity applied to a selected block.
    pub highlight_opacity: f64,
    /// Stroke color applied to a selected block.
    pub highlight_stroke: HexColor,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            arrow_width: 10.0,
            arrow_height: 10.0,
            stroke_width: 3.0,
            block_width: DEFAULT_BLOCK_SIZE,
            block_height: DEFAULT_BLOCK_SIZE,
            link_color: HexColor::rgb(0xff, 0xff, 0xff),
            link_highlight_color: HexColor::rgb(0x54, 0xaf, 0xff),
            link_outline_width: 5.0,
            link_outline_color: HexColor::rgb(0x75, 0x75, 0x75),
            highlight_blur: 10.0,
            highlight_opacity: 0.5,
            highlight_stroke: HexColor::rgba(0, 0, 0, 51),
        }
    }
}

impl VisualConfig {
    /// Size given to blocks whose profile does not set one.
    pub fn block_size(&self) -> Size {
        Size::new(self.block_width, self.block_height)
    }
}

/// Rubber-band rectangle appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub fill: HexColor,
    pub border: HexColor,
    pub border_width: f64,
    /// Corner rounding of the rectangle.
    pub corner_radius: f64,
    /// Opacity of the rectangle while a gesture is in progress.
    pub opacity: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            fill: HexColor::rgb(0x54, 0xaf, 0xff),
            border: HexColor::rgb(0x36, 0xa1, 0xff),
            border_width: 4.0,
            corner_radius: 5.0,
            opacity: 0.1,
        }
    }
}

/// Interaction switches consumed at the start of each gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Whether the rubber-band drag selection may start.
    pub drag_select: bool,
    /// Whether block clicks drive the connect/disconnect protocol.
    pub click_select: bool,
    /// Pointer travel (world units) after which a press on a block becomes a drag.
    pub drag_threshold: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_select: true,
            click_select: true,
            drag_threshold: 3.0,
        }
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid unit blocks snap to.
    pub grid_size: f64,
    pub visual: VisualConfig,
    pub selection: SelectionConfig,
    pub interaction: InteractionConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            visual: VisualConfig::default(),
            selection: SelectionConfig::default(),
            interaction: InteractionConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("grid_size", self.grid_size)?;
        positive("visual.block_width", self.visual.block_width)?;
        positive("visual.block_height", self.visual.block_height)?;
        non_negative("visual.arrow_width", self.visual.arrow_width)?;
        non_negative("visual.arrow_height", self.visual.arrow_height)?;
        non_negative("visual.highlight_blur", self.visual.highlight_blur)?;
        non_negative("selection.border_width", self.selection.border_width)?;
        non_negative("selection.corner_radius", self.selection.corner_radius)?;
        non_negative("interaction.drag_threshold", self.interaction.drag_threshold)?;
        unit("visual.highlight_opacity", self.visual.highlight_opacity)?;
        unit("selection.opacity", self.selection.opacity)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a non-negative number, got {value}"),
        })
    }
}

fn unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a value in 0..=1, got {value}"),
        })
    }
}
