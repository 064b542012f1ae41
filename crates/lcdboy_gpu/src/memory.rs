/// First address of video RAM ($8000-$9FFF).
pub const VRAM_BASE: u16 = 0x8000;
/// Size of one VRAM bank.
pub const VRAM_SIZE: usize = 0x2000;
/// First address of sprite attribute memory ($FE00-$FE9F).
pub const OAM_BASE: u16 = 0xFE00;
/// 40 entries of 4 bytes each.
pub const OAM_SIZE: usize = 0xA0;

/// A contiguous, bus-mapped block of RAM.
///
/// Accesses outside the block are tolerated: reads return 0xFF and writes
/// are dropped, the same as an unmapped address on the real bus.
#[derive(Clone, Debug)]
pub struct Ram {
    base: u16,
    data: Box<[u8]>,
}

impl Ram {
    pub fn new(base: u16, len: usize) -> Self {
        debug_assert!(base as usize + len <= 0x10000);
        Self {
            base,
            data: vec![0; len].into_boxed_slice(),
        }
    }

    pub fn vram() -> Self {
        Self::new(VRAM_BASE, VRAM_SIZE)
    }

    pub fn oam() -> Self {
        Self::new(OAM_BASE, OAM_SIZE)
    }

    #[inline]
    pub fn base(&self) -> u16 {
        self.base
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn accepts(&self, addr: u16) -> bool {
        self.offset(addr).is_some()
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.offset(addr).map_or(0xFF, |i| self.data[i])
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        if let Some(i) = self.offset(addr) {
            self.data[i] = value;
        }
    }

    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    /// Raw contents, indexed from `base`.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, addr: u16) -> Option<usize> {
        let i = addr.checked_sub(self.base)? as usize;
        (i < self.data.len()).then_some(i)
    }
}
