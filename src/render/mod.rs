pub mod fonts;
pub mod text;

pub use fonts::FontSet;

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

use crate::certificate::{Align, CertificateRecord, Layout, TextLayer};
use crate::config::{Config, MAX_RENDER_SCALE};
use crate::error::{AppError, AppResult};

/// Rasterizes certificates: template background plus the layout's text
/// layers, drawn directly into an RGB canvas.
pub struct Renderer {
    background: RgbImage,
    layout: Layout,
    fonts: FontSet,
    scale: f32,
}

impl Renderer {
    /// `background` is scaled to cover the canvas (cropping the overflow)
    /// and flattened onto white.
    pub fn new(
        background: DynamicImage,
        layout: Layout,
        fonts: FontSet,
        scale: f32,
    ) -> AppResult<Self> {
        layout.validate()?;
        if !(scale.is_finite() && scale > 0.0 && scale <= MAX_RENDER_SCALE) {
            return Err(AppError::Config(format!("invalid render scale {}", scale)));
        }

        let width = ((layout.base_width as f32) * scale).round().max(1.0) as u32;
        let height = ((layout.base_height as f32) * scale).round().max(1.0) as u32;
        let covered = background.resize_to_fill(width, height, FilterType::Lanczos3);
        let background = flatten_on_white(&covered.to_rgba8());

        Ok(Self {
            background,
            layout,
            fonts,
            scale,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let layout = match &config.layout_file {
            Some(path) => {
                tracing::info!("Loading layout from {}", path.display());
                Layout::from_file(path)?
            }
            None => Layout::default(),
        };

        let background = if config.template_image.is_file() {
            image::open(&config.template_image)?
        } else {
            tracing::warn!(
                "Template image {} not found, rendering on a blank canvas",
                config.template_image.display()
            );
            DynamicImage::ImageRgb8(RgbImage::from_pixel(
                layout.base_width,
                layout.base_height,
                Rgb([255, 255, 255]),
            ))
        };

        let fonts = FontSet::load(
            config.font_dir.as_deref(),
            &config.font_sans,
            &config.font_serif,
        )?;

        Self::new(background, layout, fonts, config.render_scale)
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.background.dimensions()
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn render(&self, record: &CertificateRecord) -> RgbImage {
        let mut canvas = self.background.clone();
        for layer in &self.layout.layers {
            self.draw_layer(&mut canvas, layer, record);
        }
        canvas
    }

    fn draw_layer(&self, canvas: &mut RgbImage, layer: &TextLayer, record: &CertificateRecord) {
        let (width, height) = canvas.dimensions();
        let box_x = layer.x * width as f32;
        let box_w = layer.width * width as f32;
        let px = layer.size * self.scale;
        let advance = px * layer.line_height;

        let mut line_top = layer.y * height as f32;

        for run in &layer.runs {
            let bold = run.bold.unwrap_or(layer.bold);
            let font = self.fonts.face(layer.face, bold);
            let v = font.v_metrics(rusttype::Scale::uniform(px));
            // line boxes put half the leading above the glyphs, like CSS
            let half_leading = (advance - (v.ascent - v.descent)) / 2.0;

            let filled = record.fill(&run.text);
            for line in text::wrap_lines(font, px, &filled, box_w) {
                let line_w = text::text_width(font, px, &line);
                let x = match layer.align {
                    Align::Left => box_x,
                    Align::Center => box_x + (box_w - line_w) / 2.0,
                    Align::Right => box_x + box_w - line_w,
                };
                let baseline = line_top + half_leading + v.ascent;
                text::draw_line(canvas, font, px, x, baseline, layer.color, &line);
                line_top += advance;
            }
        }
    }
}

fn flatten_on_white(src: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let mix = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        Rgb([mix(r), mix(g), mix(b)])
    })
}
