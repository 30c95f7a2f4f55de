//! Overlay drawing on RGB frames.
//!
//! All primitives clip to the image bounds, so shapes that extend past the
//! frame edge are drawn partially instead of failing.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use super::geometry::Point;

pub const REGION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const CENTER_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
pub const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;

/// Draw a rectangle outline of the given thickness, growing outwards.
pub fn draw_outline(
    img: &mut RgbImage,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: Rgb<u8>,
    thickness: u32,
) {
    if width == 0 || height == 0 {
        return;
    }
    // Edges past the image are clamped to just outside it.
    let (img_w, img_h) = (i64::from(img.width()), i64::from(img.height()));
    let t = i64::from(thickness);
    let clamp_x = |v: i64| v.clamp(-t - 1, img_w + t);
    let clamp_y = |v: i64| v.clamp(-t - 1, img_h + t);
    for offset in 0..t {
        let left = clamp_x(i64::from(x) - offset);
        let top = clamp_y(i64::from(y) - offset);
        let right = clamp_x(i64::from(x) + i64::from(width) + offset);
        let bottom = clamp_y(i64::from(y) + i64::from(height) + offset);
        if right <= left || bottom <= top {
            continue;
        }
        let rect = Rect::at(left as i32, top as i32)
            .of_size((right - left) as u32, (bottom - top) as u32);
        draw_hollow_rect_mut(img, rect, color);
    }
}

/// Draw a filled dot centered on `center`.
pub fn draw_dot(img: &mut RgbImage, center: Point, radius: i32, color: Rgb<u8>) {
    let r = i64::from(radius.max(0));
    let (x, y) = (i64::from(center.x), i64::from(center.y));
    if x + r < 0
        || y + r < 0
        || x - r >= i64::from(img.width())
        || y - r >= i64::from(img.height())
    {
        return;
    }
    draw_filled_circle_mut(img, (center.x, center.y), radius, color);
}

/// Draw text with a 5x7 bitmap font, each font pixel scaled to a
/// `scale` x `scale` block. `origin` is the top-left corner.
pub fn draw_text(img: &mut RgbImage, text: &str, origin: Point, scale: u32, color: Rgb<u8>) {
    let scale = scale.max(1);
    let advance = ((GLYPH_WIDTH + 1) * scale) as i32;

    for (i, ch) in text.to_uppercase().chars().enumerate() {
        let glyph_x = origin.x + i as i32 * advance;
        for (row, &bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 1 {
                    let px = glyph_x + (col * scale) as i32;
                    let py = origin.y + (row as u32 * scale) as i32;
                    draw_filled_rect_mut(img, Rect::at(px, py).of_size(scale, scale), color);
                }
            }
        }
    }
}

fn glyph(ch: char) -> [u8; 7] {
    match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        ' ' => [0; 7],
        _ => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}
