use palette::{LinSrgb, Srgb};

/// Core color type used throughout the mapper.
/// Wraps sRGB u8 components; equality is exact per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Decode a packed `0xRRGGBB` value. Bits above the low 24 are discarded.
    pub const fn from_rgb24(value: u64) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Parse a hexadecimal color string like `ff8800`, `#FF8800` or `0xff8800`.
    ///
    /// Any number of hex digits is accepted; only the low 24 bits (the last
    /// six digits) end up in the color, matching [`Color::from_rgb24`].
    /// Returns `None` if the string is empty or contains a non-hex character.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let digits = hex
            .strip_prefix('#')
            .or_else(|| hex.strip_prefix("0x"))
            .or_else(|| hex.strip_prefix("0X"))
            .unwrap_or(hex);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let low = &digits[digits.len().saturating_sub(6)..];
        u32::from_str_radix(low, 16)
            .ok()
            .map(|v| Self::from_rgb24(u64::from(v)))
    }

    /// Pack back into `0xRRGGBB`.
    pub fn to_rgb24(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to `palette::Srgb<u8>`.
    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// WCAG 2.0 relative luminance, used to pick readable label colors.
    pub fn relative_luminance(self) -> f32 {
        let linear: LinSrgb = self.to_srgb_u8().into_format::<f32>().into_linear();
        0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(pixel: image::Rgb<u8>) -> Self {
        let [r, g, b] = pixel.0;
        Self { r, g, b }
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(color: Color) -> Self {
        image::Rgb([color.r, color.g, color.b])
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
