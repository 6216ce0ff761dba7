use anyhow::{Context, Result};
use image::RgbImage;
use rayon::prelude::*;

use crate::color::Rgb;
use crate::palette::Palette;

/// Quantize every pixel to its nearest palette color, row-parallel.
/// Used by the preview command so the user can judge the palette fit
/// before committing to a click replay.
pub fn quantize_image(img: &RgbImage, palette: &Palette) -> Result<RgbImage> {
    let (width, height) = img.dimensions();
    let src = img.as_raw();
    let row_bytes = width as usize * 3;

    let mut out = vec![0u8; src.len()];
    out.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let base = y * row_bytes;
            for x in 0..width as usize {
                let o = x * 3;
                let raw = Rgb::new(src[base + o], src[base + o + 1], src[base + o + 2]);
                let q = palette.nearest(raw);
                row[o] = q.r;
                row[o + 1] = q.g;
                row[o + 2] = q.b;
            }
        });

    RgbImage::from_raw(width, height, out).context("quantized buffer has unexpected size")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_snaps_to_palette() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgb([250, 250, 250]));
        img.put_pixel(1, 0, image::Rgb([10, 10, 10]));
        img.put_pixel(0, 1, image::Rgb([200, 30, 20]));
        img.put_pixel(1, 1, image::Rgb([0, 0, 0]));

        let palette = Palette::unmapped(&[
            Rgb::new(255, 255, 255),
            Rgb::new(0, 0, 0),
            Rgb::new(239, 19, 11),
        ])
        .unwrap();

        let out = quantize_image(&img, &palette).unwrap();
        assert_eq!(out.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(1, 0), &image::Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(0, 1), &image::Rgb([239, 19, 11]));
        assert_eq!(out.get_pixel(1, 1), &image::Rgb([0, 0, 0]));
    }
}
