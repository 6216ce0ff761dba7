use anyhow::{bail, Result};
use std::time::Duration;

use crate::capture::ScreenGrab;
use crate::color::Rgb;
use crate::input::ClickSource;
use crate::shared::{Point, Rect};
use crate::utils::logger;

/// Interactive acquisition of screen coordinates: the drawing origin and
/// the positions of the palette swatches, each captured from a user click.
pub struct Calibrator<'a> {
    clicks: &'a dyn ClickSource,
    timeout: Option<Duration>,
}

impl<'a> Calibrator<'a> {
    pub fn new(clicks: &'a dyn ClickSource, timeout: Option<Duration>) -> Self {
        Self { clicks, timeout }
    }

    fn capture_point(&self, prompt: &str) -> Result<Point> {
        println!("🖱️  {}", prompt);
        let pos = self.clicks.next_click(self.timeout)?;
        logger::debug(&format!("captured point ({}, {})", pos.x, pos.y));
        Ok(pos)
    }

    /// Capture the top-left anchor of the drawing canvas.
    pub fn calibrate_origin(&self) -> Result<Point> {
        self.capture_point("Click the top-left corner of the drawing canvas")
    }

    /// Capture the rectangle covering the on-screen palette. Degenerate or
    /// inverted corner pairs are retried until a valid rectangle arrives.
    pub fn capture_palette_region(&self) -> Result<Rect> {
        loop {
            let top_left = self.capture_point("Click the top-left corner of the palette")?;
            let bottom_right = self.capture_point("Click the bottom-right corner of the palette")?;
            match Rect::from_corners(top_left, bottom_right) {
                Some(rect) => return Ok(rect),
                None => {
                    logger::debug(&format!(
                        "rejected palette region corners ({}, {}) / ({}, {})",
                        top_left.x, top_left.y, bottom_right.x, bottom_right.y
                    ));
                }
            }
        }
    }

    /// Screenshot `region` and scan it in row-major order, assigning each
    /// target color the absolute screen position of the first pixel that
    /// matches it exactly. Stops early once every target is matched.
    /// Targets never seen are reported and left out of the mapping.
    pub fn build_palette_mapping(
        &self,
        targets: &[Rgb],
        region: Rect,
        grab: &dyn ScreenGrab,
    ) -> Result<Vec<(Rgb, Point)>> {
        let shot = grab.grab(region)?;
        let origin = region.origin();

        let mut positions: Vec<Option<Point>> = vec![None; targets.len()];
        let mut remaining = targets.len();

        'scan: for (x, y, pixel) in shot.enumerate_pixels() {
            let color = Rgb::new(pixel[0], pixel[1], pixel[2]);
            for (i, &target) in targets.iter().enumerate() {
                if positions[i].is_none() && target == color {
                    // First-encountered pixel wins; antialiased swatch
                    // edges are not disambiguated.
                    positions[i] = Some(origin.offset(x as i32, y as i32));
                    remaining -= 1;
                    if remaining == 0 {
                        break 'scan;
                    }
                    break;
                }
            }
        }

        let missing: Vec<String> = targets
            .iter()
            .zip(&positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|(c, _)| c.to_hex())
            .collect();
        if !missing.is_empty() {
            let list = missing.join(", ");
            eprintln!("⚠️  Palette colors not found on screen: {}", list);
            logger::error(&format!("palette colors not found: {}", list));
        }

        let mapping: Vec<(Rgb, Point)> = targets
            .iter()
            .zip(&positions)
            .filter_map(|(&c, pos)| pos.map(|p| (c, p)))
            .collect();
        if mapping.is_empty() {
            bail!("no palette colors found in the captured region");
        }
        logger::info(&format!(
            "palette mapping built: {}/{} colors found",
            mapping.len(),
            targets.len()
        ));
        Ok(mapping)
    }
}
