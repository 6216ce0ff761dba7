pub mod config;

pub use config::PaletteConfig;

use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::color::Rgb;
use crate::input::{ClickKind, Pointer};
use crate::shared::Point;

/// A target color and, when calibration found it on screen, the absolute
/// position of its swatch.
#[derive(Clone, Copy, Debug)]
pub struct PaletteEntry {
    pub color: Rgb,
    pub pos: Option<Point>,
}

/// The fixed set of selectable colors, in registration order, plus a
/// memo of nearest-color lookups. The entry set never changes after
/// construction; only the cache grows.
pub struct Palette {
    entries: Vec<PaletteEntry>,
    cache: HashMap<Rgb, Rgb>,
}

impl Palette {
    /// Build from the configured target colors and the calibrated
    /// color -> position mapping. Targets missing from the mapping stay
    /// as entries without a position so nearest-color ranking still sees
    /// them; selecting one fails explicitly.
    pub fn new(targets: &[Rgb], mapping: &[(Rgb, Point)]) -> Result<Self> {
        if targets.is_empty() {
            bail!("palette has no colors");
        }
        let positions: HashMap<Rgb, Point> = mapping.iter().copied().collect();
        let entries = targets
            .iter()
            .map(|&color| PaletteEntry {
                color,
                pos: positions.get(&color).copied(),
            })
            .collect();
        Ok(Self {
            entries,
            cache: HashMap::new(),
        })
    }

    /// Palette with no screen positions, for offline quantization.
    pub fn unmapped(targets: &[Rgb]) -> Result<Self> {
        Self::new(targets, &[])
    }

    /// Nearest palette color to `query` by squared RGB distance, no memo.
    /// Ties go to the earliest-registered entry.
    pub fn nearest(&self, query: Rgb) -> Rgb {
        // Entries are non-empty by construction.
        let mut best = self.entries[0].color;
        let mut best_dist = query.distance_squared(&best);
        for entry in &self.entries[1..] {
            let dist = query.distance_squared(&entry.color);
            if dist < best_dist {
                best = entry.color;
                best_dist = dist;
            }
        }
        best
    }

    /// Memoized [`Palette::nearest`]. The cache is a pure memo: for a
    /// fixed palette it always agrees with a fresh computation.
    pub fn closest(&mut self, query: Rgb) -> Rgb {
        if let Some(&hit) = self.cache.get(&query) {
            return hit;
        }
        let best = self.nearest(query);
        self.cache.insert(query, best);
        best
    }

    pub fn position_of(&self, color: Rgb) -> Option<Point> {
        self.entries
            .iter()
            .find(|e| e.color == color)
            .and_then(|e| e.pos)
    }

    /// Resolve the nearest palette color to `query` and click its swatch,
    /// switching the target app's active drawing color.
    pub fn select(&mut self, query: Rgb, pointer: &mut dyn Pointer) -> Result<Rgb> {
        let resolved = self.closest(query);
        let pos = match self.position_of(resolved) {
            Some(p) => p,
            // The swatch was never found during calibration; clicking an
            // undefined position would silently corrupt the drawing.
            None => bail!(
                "palette color {} was not found during calibration",
                resolved.to_hex()
            ),
        };
        pointer.move_to(pos)?;
        pointer.click(ClickKind::Full)?;
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingPointer {
        moves: Vec<Point>,
        clicks: Vec<ClickKind>,
    }

    impl RecordingPointer {
        fn new() -> Self {
            Self {
                moves: Vec::new(),
                clicks: Vec::new(),
            }
        }
    }

    impl Pointer for RecordingPointer {
        fn move_to(&mut self, pos: Point) -> Result<()> {
            self.moves.push(pos);
            Ok(())
        }

        fn click(&mut self, kind: ClickKind) -> Result<()> {
            self.clicks.push(kind);
            Ok(())
        }
    }

    fn black_white_palette() -> Palette {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        Palette::new(
            &[black, white],
            &[(black, Point::new(10, 10)), (white, Point::new(40, 10))],
        )
        .unwrap()
    }

    #[test]
    fn test_closest_picks_nearest() {
        let mut palette = black_white_palette();
        assert_eq!(palette.closest(Rgb::new(10, 10, 10)).to_hex(), "000000");
        assert_eq!(palette.closest(Rgb::new(250, 250, 250)).to_hex(), "ffffff");
    }

    #[test]
    fn test_closest_tie_goes_to_first_registered() {
        // (127,127,127) is 3*127^2 from black and 3*128^2 from white, so
        // not a true tie; build one with symmetric grays instead.
        let lo = Rgb::new(100, 100, 100);
        let hi = Rgb::new(140, 140, 140);
        let mut palette = Palette::unmapped(&[lo, hi]).unwrap();
        assert_eq!(palette.closest(Rgb::new(120, 120, 120)), lo);

        let mut reversed = Palette::unmapped(&[hi, lo]).unwrap();
        assert_eq!(reversed.closest(Rgb::new(120, 120, 120)), hi);
    }

    #[test]
    fn test_closest_is_memoized() {
        let mut palette = black_white_palette();
        let query = Rgb::new(10, 10, 10);
        let first = palette.closest(query);
        assert!(palette.cache.contains_key(&query));

        // Poison the cache entry: a second lookup must be served from the
        // cache, never recomputed.
        let sentinel = Rgb::new(1, 2, 3);
        palette.cache.insert(query, sentinel);
        assert_eq!(palette.closest(query), sentinel);
        assert_ne!(first, sentinel);
    }

    #[test]
    fn test_select_moves_and_full_clicks() {
        let mut palette = black_white_palette();
        let mut pointer = RecordingPointer::new();
        let resolved = palette.select(Rgb::new(5, 5, 5), &mut pointer).unwrap();
        assert_eq!(resolved.to_hex(), "000000");
        assert_eq!(pointer.moves, vec![Point::new(10, 10)]);
        assert_eq!(pointer.clicks, vec![ClickKind::Full]);
    }

    #[test]
    fn test_select_fails_for_uncalibrated_color() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        // White never found on screen.
        let mut palette = Palette::new(&[black, white], &[(black, Point::new(10, 10))]).unwrap();
        let mut pointer = RecordingPointer::new();
        let err = palette
            .select(Rgb::new(250, 250, 250), &mut pointer)
            .unwrap_err();
        assert!(err.to_string().contains("ffffff"));
        assert!(pointer.clicks.is_empty());
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(Palette::unmapped(&[]).is_err());
    }
}
