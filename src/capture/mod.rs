use anyhow::{Context, Result};
use image::{RgbImage, RgbaImage};
use screenshots::Screen;

use crate::shared::Rect;

/// Narrow seam over screen capture so palette-region scanning can be
/// tested against synthetic images.
pub trait ScreenGrab {
    /// Capture the current on-screen contents of `region` (absolute
    /// screen coordinates) as an RGB pixel grid.
    fn grab(&self, region: Rect) -> Result<RgbImage>;
}

/// Drop the alpha channel from a captured frame. Swatch matching is
/// exact on RGB; screen captures are fully opaque anyway.
fn rgba_to_rgb(rgba: RgbaImage) -> RgbImage {
    image::DynamicImage::ImageRgba8(rgba).to_rgb8()
}

/// Production capture backed by the `screenshots` crate.
pub struct Screenshotter;

impl ScreenGrab for Screenshotter {
    fn grab(&self, region: Rect) -> Result<RgbImage> {
        let screen = Screen::from_point(region.x, region.y)
            .context("no display found under the palette region")?;
        // capture_area expects coordinates relative to the owning display.
        let rgba = screen
            .capture_area(
                region.x - screen.display_info.x,
                region.y - screen.display_info.y,
                region.width,
                region.height,
            )
            .context("screen capture failed")?;
        Ok(rgba_to_rgb(rgba))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_to_rgb_drops_alpha() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, image::Rgba([255, 113, 0, 255]));
        rgba.put_pixel(1, 0, image::Rgba([0, 0, 0, 0]));

        let rgb = rgba_to_rgb(rgba);
        assert_eq!(rgb.dimensions(), (2, 1));
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([255, 113, 0]));
        assert_eq!(rgb.get_pixel(1, 0), &image::Rgb([0, 0, 0]));
    }
}
