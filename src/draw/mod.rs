pub mod preview;

use anyhow::{Context, Result};
use fast_image_resize as fr;
use fr::images::Image;
use image::RgbImage;

use crate::color::Rgb;
use crate::input::{CancelToken, ClickKind, Pointer};
use crate::palette::Palette;
use crate::shared::Point;
use crate::utils::logger;

const BACKGROUND: Rgb = Rgb::new(255, 255, 255);

/// Resize to `target_width`, height scaled by the original aspect ratio.
/// Nearest-neighbor resampling: a smoothing filter would blend swatch
/// colors into intermediate values right before quantization.
pub fn rescale(img: &RgbImage, target_width: u32) -> Result<RgbImage> {
    let (orig_w, orig_h) = img.dimensions();
    let new_w = target_width.max(1);
    let new_h = ((new_w as f64 * orig_h as f64 / orig_w as f64).round() as u32).max(1);
    if (new_w, new_h) == (orig_w, orig_h) {
        return Ok(img.clone());
    }

    let src = Image::from_vec_u8(orig_w, orig_h, img.as_raw().clone(), fr::PixelType::U8x3)?;
    let mut dst = Image::new(new_w, new_h, fr::PixelType::U8x3);

    let mut resizer = fr::Resizer::new();
    resizer.resize(
        &src,
        &mut dst,
        &fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Nearest),
    )?;

    RgbImage::from_raw(new_w, new_h, dst.buffer().to_vec())
        .context("resized buffer has unexpected size")
}

/// Result of a draw pass.
#[derive(Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    pub pixels_drawn: u64,
    pub palette_switches: u64,
    pub cancelled: bool,
}

/// Replays an image as colored clicks anchored at a fixed screen origin.
/// One pass at a time; cancellation is polled between pixels.
pub struct Drawer {
    origin: Point,
    draw_click: ClickKind,
}

impl Drawer {
    pub fn new(origin: Point, draw_click: ClickKind) -> Self {
        Self { origin, draw_click }
    }

    /// One forward pass over the pixels in row-major order. The palette
    /// is re-selected only when the resolved color changes, so runs of
    /// same-colored pixels cost a single swatch click. Pure white pixels
    /// are the canvas background and are never painted.
    pub fn draw(
        &mut self,
        img: &RgbImage,
        palette: &mut Palette,
        pointer: &mut dyn Pointer,
        cancel: &CancelToken,
    ) -> Result<DrawOutcome> {
        let mut last_selected: Option<Rgb> = None;
        let mut pixels_drawn = 0u64;
        let mut palette_switches = 0u64;
        let mut cancelled = false;

        for (x, y, pixel) in img.enumerate_pixels() {
            let raw = Rgb::new(pixel[0], pixel[1], pixel[2]);

            let resolved = palette.closest(raw);
            if last_selected != Some(resolved) {
                palette.select(raw, pointer)?;
                last_selected = Some(resolved);
                palette_switches += 1;
            }

            if raw != BACKGROUND {
                pointer.move_to(self.origin.offset(x as i32, y as i32))?;
                pointer.click(self.draw_click)?;
                pixels_drawn += 1;
            }

            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
        }

        let outcome = DrawOutcome {
            pixels_drawn,
            palette_switches,
            cancelled,
        };
        if cancelled {
            println!(
                "⛔ Drawing cancelled: {} pixels drawn, {} palette switches",
                outcome.pixels_drawn, outcome.palette_switches
            );
        } else {
            println!(
                "✅ Drawing finished: {} pixels drawn, {} palette switches",
                outcome.pixels_drawn, outcome.palette_switches
            );
        }
        logger::info(&format!("draw pass done: {:?}", outcome));
        Ok(outcome)
    }
}
