use bitflags::bitflags;

bitflags! {
    /// LCDC (FF40), the LCD mode-control register.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct LcdControl: u8 {
        const BG_WINDOW_ENABLE_PRIORITY = 1;
        const OBJ_ENABLE = 1 << 1;
        const OBJ_SIZE = 1 << 2;
        const BG_TILEMAP = 1 << 3;
        const BG_AND_WINDOW_TILES = 1 << 4;
        const WINDOW_ENABLE = 1 << 5;
        const WINDOW_TILEMAP = 1 << 6;
        const LCD_AND_PPU_ENABLE = 1 << 7;
    }
}

impl LcdControl {
    pub const ADDRESS: u16 = 0xFF40;

    #[inline]
    pub fn lcd_enabled(self) -> bool {
        self.contains(LcdControl::LCD_AND_PPU_ENABLE)
    }

    #[inline]
    pub fn window_enabled(self) -> bool {
        self.contains(LcdControl::WINDOW_ENABLE)
    }

    #[inline]
    pub fn sprites_enabled(self) -> bool {
        self.contains(LcdControl::OBJ_ENABLE)
    }

    /// Sprite height in lines: 8, or 16 when LCDC.2 is set.
    #[inline]
    pub fn sprite_height(self) -> u8 {
        if self.contains(LcdControl::OBJ_SIZE) {
            16
        } else {
            8
        }
    }
}
