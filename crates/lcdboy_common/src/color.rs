#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    #[inline]
    pub const fn new_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// Decode a CGB palette entry (little-endian `0bbbbbgggggrrrrr`).
    ///
    /// Each 5-bit channel is widened to 8 bits by replicating its top bits
    /// into the low bits, so 0x1F maps to 0xFF and 0 stays 0.
    pub const fn from_rgb555(value: u16) -> Color {
        let r = (value & 0x1F) as u8;
        let g = ((value >> 5) & 0x1F) as u8;
        let b = ((value >> 10) & 0x1F) as u8;
        Color::new_rgb(widen5(r), widen5(g), widen5(b))
    }

    #[inline]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    #[inline]
    pub const fn rgba(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    pub fn to_u32(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }
}

#[inline]
const fn widen5(channel: u8) -> u8 {
    (channel << 3) | (channel >> 2)
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn rgb555_extremes_widen_to_full_range() {
        assert_eq!(Color::from_rgb555(0x0000), Color::BLACK);
        assert_eq!(Color::from_rgb555(0x7FFF), Color::WHITE);
    }

    #[test]
    fn rgb555_channels_are_little_endian_red_first() {
        // Pure red, green and blue.
        assert_eq!(Color::from_rgb555(0x001F).rgb(), (0xFF, 0, 0));
        assert_eq!(Color::from_rgb555(0x03E0).rgb(), (0, 0xFF, 0));
        assert_eq!(Color::from_rgb555(0x7C00).rgb(), (0, 0, 0xFF));
        // Bit 15 is unused and ignored.
        assert_eq!(Color::from_rgb555(0x8000), Color::BLACK);
    }

    #[test]
    fn to_u32_packs_rgba_little_endian() {
        let c = Color::new_rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.to_u32(), 0x4433_2211);
    }
}
