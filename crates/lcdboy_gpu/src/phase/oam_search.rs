use super::{Phase, PhaseContext, PhaseStep};

/// Hardware limit on sprites selected for one line.
pub const MAX_SPRITES_PER_LINE: usize = 10;
/// Two dots per OAM entry, 40 entries.
pub const OAM_SEARCH_TICKS: u16 = 80;

const OAM_ENTRIES: u8 = 40;

/// One sprite attribute entry as selected by OAM search.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct SpriteEntry {
    /// Position in OAM (0..40).
    pub index: u8,
    /// Screen Y + 16.
    pub y: u8,
    /// Screen X + 8.
    pub x: u8,
    pub tile: u8,
    pub flags: u8,
}

/// Mode 2: pick the sprites that overlap the current line.
///
/// Each entry takes two dots: the Y byte is fetched on the first, the X byte
/// on the second, and the entry is selected at the end of the pair.
#[derive(Clone, Debug, Default)]
pub struct OamSearch {
    ticks: u16,
    sprites: Vec<SpriteEntry>,
}

impl OamSearch {
    pub fn new() -> Self {
        Self {
            ticks: 0,
            sprites: Vec::with_capacity(MAX_SPRITES_PER_LINE),
        }
    }

    /// Restart the scan for a new line.
    pub fn start(&mut self) {
        self.ticks = 0;
        self.sprites.clear();
    }

    /// Sprites selected so far, in OAM order.
    pub fn sprites(&self) -> &[SpriteEntry] {
        &self.sprites
    }

    fn evaluate(&mut self, index: u8, ctx: &PhaseContext<'_>) {
        if self.sprites.len() >= MAX_SPRITES_PER_LINE {
            return;
        }
        let base = ctx.oam.base() + index as u16 * 4;
        let y = ctx.oam.read(base);
        let line = ctx.ly() as u16 + 16;
        let top = y as u16;
        let height = ctx.lcdc.sprite_height() as u16;
        if line >= top && line < top + height {
            self.sprites.push(SpriteEntry {
                index,
                y,
                x: ctx.oam.read(base + 1),
                tile: ctx.oam.read(base + 2),
                flags: ctx.oam.read(base + 3),
            });
        }
    }
}

impl Phase for OamSearch {
    fn step(&mut self, ctx: &PhaseContext<'_>) -> PhaseStep {
        if self.is_done() {
            return PhaseStep::DONE;
        }
        if self.ticks % 2 == 1 {
            self.evaluate((self.ticks / 2) as u8, ctx);
        }
        self.ticks += 1;
        PhaseStep {
            done: self.is_done(),
            ..PhaseStep::RUNNING
        }
    }

    fn is_done(&self) -> bool {
        self.ticks >= OAM_ENTRIES as u16 * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Ram;
    use crate::registers::{GpuRegister, Registers};
    use crate::LcdControl;

    fn run(oam: &Ram, lcdc: LcdControl, ly: u8) -> (OamSearch, u16) {
        let mut regs = Registers::default();
        regs.put(GpuRegister::Ly, ly);
        let ctx = PhaseContext {
            lcdc,
            registers: &regs,
            oam,
        };
        let mut search = OamSearch::new();
        search.start();
        let mut steps = 0;
        while !search.step(&ctx).done {
            steps += 1;
        }
        (search, steps + 1)
    }

    fn put_sprite(oam: &mut Ram, index: u16, y: u8, x: u8) {
        let base = 0xFE00 + index * 4;
        oam.write(base, y);
        oam.write(base + 1, x);
        oam.write(base + 2, index as u8);
    }

    #[test]
    fn scan_takes_exactly_80_steps() {
        let oam = Ram::oam();
        let (search, steps) = run(&oam, LcdControl::empty(), 0);
        assert_eq!(steps, OAM_SEARCH_TICKS);
        assert!(search.sprites().is_empty());
    }

    #[test]
    fn selects_sprites_covering_the_line() {
        let mut oam = Ram::oam();
        // Screen rows 0..8.
        put_sprite(&mut oam, 3, 16, 20);
        // Screen rows 8..16, below line 0 in either size.
        put_sprite(&mut oam, 5, 24, 40);
        // Screen rows -8..0: never on line 0 in 8x8 mode.
        put_sprite(&mut oam, 7, 8, 60);

        let (search, _) = run(&oam, LcdControl::empty(), 0);
        let picked: Vec<u8> = search.sprites().iter().map(|s| s.index).collect();
        assert_eq!(picked, vec![3]);
        assert_eq!(search.sprites()[0].x, 20);
        assert_eq!(search.sprites()[0].tile, 3);

        let (search, _) = run(&oam, LcdControl::OBJ_SIZE, 0);
        let picked: Vec<u8> = search.sprites().iter().map(|s| s.index).collect();
        assert_eq!(picked, vec![3, 7]);
    }

    #[test]
    fn at_most_ten_sprites_per_line() {
        let mut oam = Ram::oam();
        for i in 0..40 {
            put_sprite(&mut oam, i, 16, 8 + i as u8);
        }
        let (search, _) = run(&oam, LcdControl::empty(), 3);
        assert_eq!(search.sprites().len(), MAX_SPRITES_PER_LINE);
        assert_eq!(search.sprites().last().map(|s| s.index), Some(9));
    }
}
