use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};

use crate::certificate::Color;

/// Advance width of `text` at `px`, kerning included.
pub fn text_width(font: &Font<'static>, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Greedy word wrap. `\n` always breaks; a word wider than `max_width` keeps
/// its own line and overflows.
pub fn wrap_lines(font: &Font<'static>, px: f32, text: &str, max_width: f32) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if text_width(font, px, &candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }
    lines
}

/// Draws one line with its baseline at `baseline_y`, alpha-blending glyph
/// coverage onto the canvas. Pixels outside the canvas are clipped.
pub fn draw_line(
    img: &mut RgbImage,
    font: &Font<'static>,
    px: f32,
    x: f32,
    baseline_y: f32,
    color: Color,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let (width, height) = img.dimensions();

    for glyph in font.layout(text, scale, point(x, baseline_y)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, v| {
            let cx = gx as i32 + bb.min.x;
            let cy = gy as i32 + bb.min.y;
            if cx < 0 || cy < 0 || cx as u32 >= width || cy as u32 >= height {
                return;
            }
            let a = v.clamp(0.0, 1.0);
            if a <= 0.0 {
                return;
            }
            let dst = img.get_pixel_mut(cx as u32, cy as u32);
            *dst = blend(*dst, color, a);
        });
    }
}

fn blend(dst: Rgb<u8>, color: Color, alpha: f32) -> Rgb<u8> {
    let inv = 1.0 - alpha;
    let mix = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * inv).round() as u8;
    Rgb([
        mix(color.0[0], dst.0[0]),
        mix(color.0[1], dst.0[1]),
        mix(color.0[2], dst.0[2]),
    ])
}
