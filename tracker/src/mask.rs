use image::{GrayImage, Luma, RgbImage};

use crate::{Hsv, HsvRange};

pub const ON: Luma<u8> = Luma([u8::MAX]);
pub const OFF: Luma<u8> = Luma([0]);

/// Binary mask of the pixels whose HSV colour falls inside `range`.
pub fn threshold(frame: &RgbImage, range: &HsvRange) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        if range.contains(Hsv::from_rgb(*frame.get_pixel(x, y))) {
            ON
        } else {
            OFF
        }
    })
}

/// 3x3 erosion, applied `iterations` times. Pixels outside the image are ignored.
pub fn erode(mask: &GrayImage, iterations: u32) -> GrayImage {
    morph(mask, iterations, |window| window.min())
}

/// 3x3 dilation, applied `iterations` times. Pixels outside the image are ignored.
pub fn dilate(mask: &GrayImage, iterations: u32) -> GrayImage {
    morph(mask, iterations, |window| window.max())
}

fn morph(
    mask: &GrayImage,
    iterations: u32,
    reduce: impl Fn(&mut dyn Iterator<Item = u8>) -> Option<u8>,
) -> GrayImage {
    let mut current = mask.clone();
    for _ in 0..iterations {
        let previous = current;
        current = GrayImage::from_fn(previous.width(), previous.height(), |x, y| {
            let mut window = neighborhood(x, y, previous.width(), previous.height())
                .map(|(nx, ny)| previous.get_pixel(nx, ny).0[0]);
            Luma([reduce(&mut window).unwrap_or(0)])
        });
    }
    current
}

fn neighborhood(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let xs = x.saturating_sub(1)..=(x + 1).min(width - 1);
    let ys = y.saturating_sub(1)..=(y + 1).min(height - 1);
    ys.flat_map(move |ny| xs.clone().map(move |nx| (nx, ny)))
}
