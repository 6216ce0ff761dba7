use anyhow::{bail, Result};

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Encode as 6 lowercase hex digits, each channel zero-padded to
    /// width 2 (e.g. channel 5 -> "05").
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse a 6-digit hex string, with or without a leading '#'.
    pub fn from_hex(s: &str) -> Result<Rgb> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("invalid hex color \"{}\": expected 6 hex digits", s);
        }
        // Length and digit checks above make these parses infallible.
        let r = u8::from_str_radix(&digits[0..2], 16)?;
        let g = u8::from_str_radix(&digits[2..4], 16)?;
        let b = u8::from_str_radix(&digits[4..6], 16)?;
        Ok(Rgb::new(r, g, b))
    }

    /// Squared euclidean distance to another color. Used for ranking
    /// nearest-palette matches, so the root is never taken.
    #[inline]
    pub fn distance_squared(&self, other: &Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}
