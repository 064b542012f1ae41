use bitflags::bitflags;

/// Plain LCD registers held in the register bank.
///
/// LCDC is not part of the bank: it lives in its own [`LcdControl`] cell
/// because writes to it switch the display on and off.
///
/// [`LcdControl`]: crate::LcdControl
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GpuRegister {
    Stat,
    Scy,
    Scx,
    Ly,
    Lyc,
    Bgp,
    Obp0,
    Obp1,
    Wy,
    Wx,
    /// CGB VRAM bank select.
    Vbk,
}

impl GpuRegister {
    pub const ALL: [GpuRegister; 11] = [
        GpuRegister::Stat,
        GpuRegister::Scy,
        GpuRegister::Scx,
        GpuRegister::Ly,
        GpuRegister::Lyc,
        GpuRegister::Bgp,
        GpuRegister::Obp0,
        GpuRegister::Obp1,
        GpuRegister::Wy,
        GpuRegister::Wx,
        GpuRegister::Vbk,
    ];

    pub const fn address(self) -> u16 {
        match self {
            GpuRegister::Stat => 0xFF41,
            GpuRegister::Scy => 0xFF42,
            GpuRegister::Scx => 0xFF43,
            GpuRegister::Ly => 0xFF44,
            GpuRegister::Lyc => 0xFF45,
            GpuRegister::Bgp => 0xFF47,
            GpuRegister::Obp0 => 0xFF48,
            GpuRegister::Obp1 => 0xFF49,
            GpuRegister::Wy => 0xFF4A,
            GpuRegister::Wx => 0xFF4B,
            GpuRegister::Vbk => 0xFF4F,
        }
    }

    pub fn from_address(addr: u16) -> Option<GpuRegister> {
        GpuRegister::ALL.into_iter().find(|r| r.address() == addr)
    }

    /// LY is driven by the timing state machine only.
    #[inline]
    pub const fn cpu_writable(self) -> bool {
        !matches!(self, GpuRegister::Ly)
    }
}

bitflags! {
    /// STAT (FF41) interrupt-select bits.
    ///
    /// The same layout doubles as the set of currently active STAT interrupt
    /// sources; the STAT line is high when the two sets intersect.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct StatSelect: u8 {
        const HBLANK = 1 << 3;
        const VBLANK = 1 << 4;
        const OAM = 1 << 5;
        const LYC = 1 << 6;
    }
}

/// The LCD register bank.
#[derive(Clone, Debug, Default)]
pub struct Registers {
    values: [u8; GpuRegister::ALL.len()],
}

impl Registers {
    #[inline]
    pub fn get(&self, reg: GpuRegister) -> u8 {
        self.values[reg as usize]
    }

    /// Store without any CPU-side access rules.
    #[inline]
    pub fn put(&mut self, reg: GpuRegister, value: u8) {
        self.values[reg as usize] = value;
    }

    /// CPU-side write: read-only registers keep their value.
    pub fn write(&mut self, addr: u16, value: u8) {
        if let Some(reg) = GpuRegister::from_address(addr) {
            if reg.cpu_writable() {
                self.put(reg, value);
            }
        }
    }

    #[inline]
    pub fn ly(&self) -> u8 {
        self.get(GpuRegister::Ly)
    }

    #[inline]
    pub fn lyc(&self) -> u8 {
        self.get(GpuRegister::Lyc)
    }

    #[inline]
    pub fn stat_select(&self) -> StatSelect {
        StatSelect::from_bits_truncate(self.get(GpuRegister::Stat))
    }

    /// Selected VRAM bank (VBK bit 0).
    #[inline]
    pub fn vram_bank(&self) -> usize {
        (self.get(GpuRegister::Vbk) & 0x01) as usize
    }
}
