use lcdboy_common::Color;

/// BCPS/BGPI, the background palette index register.
pub const BG_PALETTE_INDEX: u16 = 0xFF68;
/// OCPS/OBPI, the sprite palette index register.
pub const OBJ_PALETTE_INDEX: u16 = 0xFF6A;

const PALETTE_BYTES: usize = 64;

/// A CGB color palette store: an index register followed by a data port.
///
/// Eight palettes of four RGB555 colors, two bytes per color, little endian.
/// Writing the data port while auto-increment (index bit 7) is set advances
/// the index, wrapping within the 64 bytes. Reads never advance it.
#[derive(Clone, Debug)]
pub struct ColorPalette {
    index_address: u16,
    index: u8,
    auto_increment: bool,
    data: [u8; PALETTE_BYTES],
}

impl ColorPalette {
    pub fn new(index_address: u16) -> Self {
        Self {
            index_address,
            index: 0,
            auto_increment: false,
            data: [0; PALETTE_BYTES],
        }
    }

    /// Sprite palettes power up as 0xFF on CGB.
    pub fn filled(index_address: u16, value: u8) -> Self {
        let mut palette = Self::new(index_address);
        palette.data.fill(value);
        palette
    }

    #[inline]
    pub fn accepts(&self, addr: u16) -> bool {
        addr == self.index_address || addr == self.index_address + 1
    }

    pub fn read(&self, addr: u16) -> u8 {
        if addr == self.index_address {
            let auto = if self.auto_increment { 0x80 } else { 0 };
            // Bit 6 is unused and reads back set.
            self.index | auto | 0x40
        } else if addr == self.index_address + 1 {
            self.data[self.index as usize]
        } else {
            0xFF
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        if addr == self.index_address {
            self.index = value & 0x3F;
            self.auto_increment = (value & 0x80) != 0;
        } else if addr == self.index_address + 1 {
            self.data[self.index as usize] = value;
            if self.auto_increment {
                self.index = (self.index + 1) & 0x3F;
            }
        }
    }

    /// Raw RGB555 value of `color` (0..4) in `palette` (0..8).
    pub fn entry(&self, palette: usize, color: usize) -> u16 {
        debug_assert!(palette < 8 && color < 4);
        let i = (palette * 4 + color) * 2;
        u16::from_le_bytes([self.data[i], self.data[i + 1]])
    }

    pub fn color(&self, palette: usize, color: usize) -> Color {
        Color::from_rgb555(self.entry(palette, color))
    }

    pub fn palette(&self, palette: usize) -> [Color; 4] {
        std::array::from_fn(|color| self.color(palette, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_read_reports_auto_increment_and_unused_bit() {
        let mut bg = ColorPalette::new(BG_PALETTE_INDEX);
        bg.write(0xFF68, 0x85);
        assert_eq!(bg.read(0xFF68), 0xC5);
        bg.write(0xFF68, 0x05);
        assert_eq!(bg.read(0xFF68), 0x45);
    }

    #[test]
    fn auto_increment_wraps_at_64_bytes() {
        let mut bg = ColorPalette::new(BG_PALETTE_INDEX);
        bg.write(0xFF68, 0x80 | 0x3F);
        bg.write(0xFF69, 0x11);
        bg.write(0xFF69, 0x22);
        assert_eq!(bg.read(0xFF68) & 0x3F, 0x01);

        bg.write(0xFF68, 0x3F);
        assert_eq!(bg.read(0xFF69), 0x11);
        bg.write(0xFF68, 0x00);
        assert_eq!(bg.read(0xFF69), 0x22);
    }

    #[test]
    fn data_reads_do_not_advance_index() {
        let mut obj = ColorPalette::filled(OBJ_PALETTE_INDEX, 0xFF);
        obj.write(0xFF6A, 0x82);
        assert_eq!(obj.read(0xFF6B), 0xFF);
        assert_eq!(obj.read(0xFF6B), 0xFF);
        assert_eq!(obj.read(0xFF6A) & 0x3F, 0x02);
    }

    #[test]
    fn entries_decode_to_colors() {
        let mut bg = ColorPalette::new(BG_PALETTE_INDEX);
        // Palette 1, color 2: pure red (0x001F).
        bg.write(0xFF68, 0x80 | (4 + 2) * 2);
        bg.write(0xFF69, 0x1F);
        bg.write(0xFF69, 0x00);
        assert_eq!(bg.entry(1, 2), 0x001F);
        assert_eq!(bg.color(1, 2), Color::new_rgb(0xFF, 0, 0));
        assert_eq!(bg.palette(1)[0], Color::BLACK);
    }
}
