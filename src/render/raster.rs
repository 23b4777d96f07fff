// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::math::{clip_segment, Point};
use crate::overlay::{DirectionLine, OverlayGeometry};

const BOX_RGB: Rgb<u8> = Rgb([0, 255, 0]);
const YAW_RGB: Rgb<u8> = Rgb([255, 0, 0]);
const PITCH_RGB: Rgb<u8> = Rgb([0, 0, 255]);
const ROLL_RGB: Rgb<u8> = Rgb([0, 128, 0]);

const FRAME_WIDTH: f32 = 2.0;

/// Face box in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PixelBox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl PixelBox {
    fn from_overlay(overlay: &OverlayGeometry, image_width: u32, image_height: u32) -> Self {
        let b = &overlay.box_percent;
        let (w, h) = (image_width as f64, image_height as f64);
        PixelBox {
            x: (b.left / 100.0 * w) as f32,
            y: (b.top / 100.0 * h) as f32,
            width: (b.width / 100.0 * w) as f32,
            height: (b.height / 100.0 * h) as f32,
        }
    }

    /// Maps a point of the `0 0 100 100` viewBox onto the box, scaled
    /// uniformly and centered like an SVG with the default aspect ratio.
    fn view_box_to_pixels(&self, point: Point<f64>) -> Point<f32> {
        let scale = self.width.min(self.height) / 100.0;
        let offset_x = self.x + (self.width - 100.0 * scale) / 2.0;
        let offset_y = self.y + (self.height - 100.0 * scale) / 2.0;
        Point::new(
            offset_x + point.x as f32 * scale,
            offset_y + point.y as f32 * scale,
        )
    }

    /// Frame-padded canvas: the frame drawn along any of its edges falls
    /// outside the image.
    fn canvas(image_width: u32, image_height: u32) -> Self {
        PixelBox {
            x: -FRAME_WIDTH,
            y: -FRAME_WIDTH,
            width: image_width as f32 + 2.0 * FRAME_WIDTH,
            height: image_height as f32 + 2.0 * FRAME_WIDTH,
        }
    }

    fn is_drawable(&self) -> bool {
        [self.x, self.y, self.width, self.height].iter().all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Part of the box inside `bounds`, or `None` when they do not overlap.
    fn intersect(&self, bounds: &PixelBox) -> Option<PixelBox> {
        let (min, max) = (self.min(), self.max());
        let (bounds_min, bounds_max) = (bounds.min(), bounds.max());
        let left = min.x.max(bounds_min.x);
        let top = min.y.max(bounds_min.y);
        let right = max.x.min(bounds_max.x);
        let bottom = max.y.min(bounds_max.y);
        if right <= left || bottom <= top {
            return None;
        }
        Some(PixelBox {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }

    fn min(&self) -> Point<f32> {
        Point::new(self.x, self.y)
    }

    fn max(&self) -> Point<f32> {
        Point::new(self.x + self.width, self.y + self.height)
    }
}

/// Draws the overlays onto a copy of `image`: a two pixel green frame per
/// face and the yaw, pitch and roll lines clipped to the frame.
pub fn render_raster(image: &DynamicImage, overlays: &[OverlayGeometry]) -> RgbImage {
    let mut rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let canvas = PixelBox::canvas(width, height);

    for overlay in overlays {
        let pixel_box = PixelBox::from_overlay(overlay, width, height);
        if !pixel_box.is_drawable() {
            continue;
        }
        // Boxes may reach far past the image; only the visible part is drawn.
        let visible = match pixel_box.intersect(&canvas) {
            Some(visible) => visible,
            None => continue,
        };
        draw_frame(&mut rgb, &visible);

        for (line, color) in [
            (&overlay.lines.yaw, YAW_RGB),
            (&overlay.lines.pitch, PITCH_RGB),
            (&overlay.lines.roll, ROLL_RGB),
        ] {
            draw_direction_line(&mut rgb, &pixel_box, &visible, line, color);
        }
    }

    rgb
}

fn draw_frame(rgb: &mut RgbImage, pixel_box: &PixelBox) {
    let x = pixel_box.x.round() as i32;
    let y = pixel_box.y.round() as i32;
    let width = pixel_box.width.round() as i32;
    let height = pixel_box.height.round() as i32;

    for inset in 0..FRAME_WIDTH as i32 {
        let w = width - 2 * inset;
        let h = height - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let rect = Rect::at(x + inset, y + inset).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(rgb, rect, BOX_RGB);
    }
}

fn draw_direction_line(
    rgb: &mut RgbImage,
    pixel_box: &PixelBox,
    visible: &PixelBox,
    line: &DirectionLine,
    color: Rgb<u8>,
) {
    let start = pixel_box.view_box_to_pixels(line.start);
    let end = pixel_box.view_box_to_pixels(line.end);
    if ![start.x, start.y, end.x, end.y].iter().all(|v| v.is_finite()) {
        return;
    }
    if let Some((start, end)) = clip_segment(start, end, visible.min(), visible.max()) {
        draw_line_segment_mut(rgb, (start.x, start.y), (end.x, end.y), color);
    }
}
