// Overlay layout: where each text layer sits on the template image.
// Geometry is stored as fractions of the canvas and font sizes as pixels of
// the base canvas (1000x707), so a layout renders the same at any scale.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AppError, AppResult};

pub const BASE_WIDTH: u32 = 1000;
pub const BASE_HEIGHT: u32 = 707;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFace {
    #[default]
    Sans,
    Serif,
}

/// An opaque RGB colour, written as `#rrggbb` or `#rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);

    pub fn parse(s: &str) -> Option<Color> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color([r, g, b]))
            }
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 16 + v;
                }
                Some(Color(out))
            }
            _ => None,
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value).ok_or_else(|| format!("invalid colour '{}'", value))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        format!("#{:02x}{:02x}{:02x}", c.0[0], c.0[1], c.0[2])
    }
}

/// A paragraph inside a layer. Every run starts on a new line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: Some(true),
        }
    }
}

fn default_line_height() -> f32 {
    1.2
}

/// One absolutely positioned block of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    /// Left edge of the box, fraction of canvas width.
    pub x: f32,
    /// Top edge of the box, fraction of canvas height.
    pub y: f32,
    /// Box width, fraction of canvas width. Lines wrap inside it.
    pub width: f32,
    #[serde(default)]
    pub align: Align,
    /// Font size in base-canvas pixels.
    pub size: f32,
    #[serde(default)]
    pub face: FontFace,
    #[serde(default)]
    pub bold: bool,
    pub color: Color,
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    pub runs: Vec<TextRun>,
}

impl TextLayer {
    fn single(x: f32, y: f32, width: f32, text: &str) -> Self {
        Self {
            x,
            y,
            width,
            align: Align::Left,
            size: 16.0,
            face: FontFace::Sans,
            bold: false,
            color: Color::BLACK,
            line_height: default_line_height(),
            runs: vec![TextRun::plain(text)],
        }
    }

    fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn serif(mut self) -> Self {
        self.face = FontFace::Serif;
        self
    }

    fn color(mut self, hex: &str) -> Self {
        self.color = Color::parse(hex).unwrap_or(Color::BLACK);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default = "default_base_width")]
    pub base_width: u32,
    #[serde(default = "default_base_height")]
    pub base_height: u32,
    pub layers: Vec<TextLayer>,
}

fn default_base_width() -> u32 {
    BASE_WIDTH
}

fn default_base_height() -> u32 {
    BASE_HEIGHT
}

impl Default for Layout {
    fn default() -> Self {
        const BODY: &str = "There are many variations of passages of Lorem Ipsum available, but the majority have suffered alteration in some form, by injected humour, or randomised words which don't look even slightly believable.";

        let mut body = TextLayer::single(0.35, 0.55, 0.42, BODY)
            .align(Align::Center)
            .size(12.8)
            .color("#555555");
        body.line_height = 1.4;
        body.runs
            .push(TextRun::bold("For their outstanding contribution in: {event}"));

        let signature = |x: f32| {
            [
                TextLayer::single(x, 0.71, 0.18, "Marcus Smith")
                    .align(Align::Center)
                    .size(12.8)
                    .bold()
                    .color("#333333"),
                TextLayer::single(x, 0.73, 0.18, "General Manager")
                    .align(Align::Center)
                    .size(11.2)
                    .color("#555555"),
            ]
        };

        let mut layers = vec![
            TextLayer::single(0.22, 0.28, 0.112, "{college}")
                .size(16.0)
                .bold()
                .color("#ffffff"),
            TextLayer::single(0.35, 0.40, 0.40, "{name}")
                .align(Align::Right)
                .size(35.2)
                .bold()
                .serif()
                .color("#ffd700"),
            TextLayer::single(0.232, 0.295, 0.495, "{course}")
                .align(Align::Right)
                .size(14.4)
                .color("#333333"),
            body,
        ];
        layers.extend(signature(0.37));
        layers.extend(signature(0.60));

        Self {
            base_width: BASE_WIDTH,
            base_height: BASE_HEIGHT,
            layers,
        }
    }
}

impl Layout {
    pub fn from_json(json: &str) -> AppResult<Self> {
        let layout: Layout = serde_json::from_str(json)
            .map_err(|e| AppError::layout(format!("invalid layout JSON: {}", e)))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.base_width == 0 || self.base_height == 0 {
            return Err(AppError::layout("base canvas size must be non-zero"));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            let in_unit = |v: f32| (0.0..=1.0).contains(&v);
            if !in_unit(layer.x) || !in_unit(layer.y) {
                return Err(AppError::layout(format!(
                    "layer {}: position must be within 0..1",
                    i
                )));
            }
            if !(layer.width > 0.0 && layer.width <= 1.0) {
                return Err(AppError::layout(format!(
                    "layer {}: width must be within (0, 1]",
                    i
                )));
            }
            if !(layer.size > 0.0) || !(layer.line_height > 0.0) {
                return Err(AppError::layout(format!(
                    "layer {}: size and line height must be positive",
                    i
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Color::parse("#ffd700"), Some(Color([255, 215, 0])));
        assert_eq!(Color::parse("#333"), Some(Color([0x33, 0x33, 0x33])));
        assert_eq!(Color::parse("ffd700"), None);
        assert_eq!(Color::parse("#ggg"), None);
        assert_eq!(Color::parse("#12345"), None);
    }

    #[test]
    fn default_layout_binds_all_four_fields() {
        let layout = Layout::default();
        layout.validate().unwrap();
        let text: String = layout
            .layers
            .iter()
            .flat_map(|l| l.runs.iter().map(|r| r.text.as_str()))
            .collect();
        for token in ["{name}", "{course}", "{college}", "{event}"] {
            assert!(text.contains(token), "missing {}", token);
        }
    }

    #[test]
    fn json_layout_fills_defaults() {
        let layout = Layout::from_json(
            r##"{"layers":[{"x":0.1,"y":0.2,"width":0.5,"size":20,"color":"#000",
                "runs":[{"text":"{name}"}]}]}"##,
        )
        .unwrap();
        assert_eq!(layout.base_width, BASE_WIDTH);
        let layer = &layout.layers[0];
        assert_eq!(layer.align, Align::Left);
        assert_eq!(layer.face, FontFace::Sans);
        assert_eq!(layer.line_height, 1.2);
    }

    #[test]
    fn out_of_range_layer_is_rejected() {
        let err = Layout::from_json(
            r##"{"layers":[{"x":1.5,"y":0.2,"width":0.5,"size":20,"color":"#000","runs":[]}]}"##,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Layout(_)));
    }

    #[test]
    fn bad_colour_is_a_layout_error() {
        let err = Layout::from_json(
            r##"{"layers":[{"x":0.1,"y":0.2,"width":0.5,"size":20,"color":"red","runs":[]}]}"##,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid colour"));
    }
}
