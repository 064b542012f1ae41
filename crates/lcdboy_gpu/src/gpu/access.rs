use super::Gpu;
use crate::display::Display;
use crate::dma::OamDma;
use crate::interrupts::InterruptSink;
use crate::registers::GpuRegister;
use crate::LcdControl;

/// The owner of a CPU-visible address at this instant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Region {
    /// A VRAM bank, already resolved through VBK.
    Vram(usize),
    Oam,
    Lcdc,
    Register(GpuRegister),
    BgPalette,
    ObjPalette,
}

impl<D: Display, I: InterruptSink, M: OamDma> Gpu<D, I, M> {
    /// Whether the CPU can currently reach VRAM.
    pub fn vram_accessible(&self) -> bool {
        !self.vram_locked
    }

    /// Whether the CPU can currently reach OAM. The DMA gate and the mode
    /// lock are independent and both must be open.
    pub fn oam_accessible(&self) -> bool {
        !self.dma.is_oam_blocked() && !self.oam_locked
    }

    /// Map `addr` to the region that answers it, or `None` if the address is
    /// unmapped or its region is locked right now.
    pub fn resolve(&self, addr: u16) -> Option<Region> {
        if self.vram0.accepts(addr) {
            if !self.vram_accessible() {
                return None;
            }
            let bank = if self.model.is_cgb() {
                self.registers.vram_bank()
            } else {
                0
            };
            return Some(Region::Vram(bank));
        }
        if self.oam.accepts(addr) {
            return self.oam_accessible().then_some(Region::Oam);
        }
        if addr == LcdControl::ADDRESS {
            return Some(Region::Lcdc);
        }
        if let Some(reg) = GpuRegister::from_address(addr) {
            return Some(Region::Register(reg));
        }
        if self.model.is_cgb() {
            if self.bg_palette.accepts(addr) {
                return Some(Region::BgPalette);
            }
            if self.obj_palette.accepts(addr) {
                return Some(Region::ObjPalette);
            }
        }
        None
    }

    pub fn accepts(&self, addr: u16) -> bool {
        self.resolve(addr).is_some()
    }

    /// CPU read. Unmapped and locked addresses read 0xFF.
    pub fn read(&self, addr: u16) -> u8 {
        match self.resolve(addr) {
            Some(Region::Vram(bank)) => self.vram_bank(bank).map_or(0xFF, |ram| ram.read(addr)),
            Some(Region::Oam) => self.oam.read(addr),
            Some(Region::Lcdc) => self.lcdc.bits(),
            Some(Region::Register(GpuRegister::Stat)) => self.read_stat(),
            Some(Region::Register(GpuRegister::Vbk)) => {
                if self.model.is_cgb() {
                    0xFE | self.registers.vram_bank() as u8
                } else {
                    0xFF
                }
            }
            Some(Region::Register(reg)) => self.registers.get(reg),
            Some(Region::BgPalette) => self.bg_palette.read(addr),
            Some(Region::ObjPalette) => self.obj_palette.read(addr),
            None => 0xFF,
        }
    }

    /// CPU write. Writes nothing currently accepts are dropped.
    pub fn write(&mut self, addr: u16, value: u8) {
        match self.resolve(addr) {
            Some(Region::Vram(bank)) => {
                if let Some(ram) = self.vram_bank_mut(bank) {
                    ram.write(addr, value);
                }
            }
            Some(Region::Oam) => self.oam.write(addr, value),
            Some(Region::Lcdc) => self.write_lcdc(value),
            Some(Region::Register(GpuRegister::Stat)) => self.write_stat(value),
            Some(Region::Register(GpuRegister::Vbk)) => {
                if self.model.is_cgb() {
                    self.registers.put(GpuRegister::Vbk, value & 0x01);
                }
            }
            Some(Region::Register(_)) => self.registers.write(addr, value),
            Some(Region::BgPalette) => self.bg_palette.write(addr, value),
            Some(Region::ObjPalette) => self.obj_palette.write(addr, value),
            None => log::trace!("dropped write {value:#04X} to {addr:#06X}"),
        }
    }
}
