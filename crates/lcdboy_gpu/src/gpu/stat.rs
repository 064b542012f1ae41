use super::Gpu;
use crate::display::Display;
use crate::dma::OamDma;
use crate::interrupts::{InterruptKind, InterruptSink};
use crate::registers::{GpuRegister, StatSelect};

/// Bits of STAT the CPU can write.
const STAT_WRITABLE: u8 = StatSelect::all().bits();

impl<D: Display, I: InterruptSink, M: OamDma> Gpu<D, I, M> {
    /// Latch LY == LYC into STAT bit 2 and the coincidence interrupt source.
    pub(super) fn sample_coincidence(&mut self) {
        let coincidence = self.registers.ly() == self.registers.lyc();
        self.ly_coincidence = coincidence;
        self.sources.set(StatSelect::LYC, coincidence);
    }

    pub(super) fn clear_coincidence(&mut self) {
        self.ly_coincidence = false;
        self.sources.remove(StatSelect::LYC);
    }

    /// Recompute the aggregated STAT line from the active sources and the
    /// enable bits, requesting INT $48 on a rising edge and withdrawing the
    /// request on a falling one. The line stays low while the LCD is off.
    pub(super) fn update_stat_line(&mut self) {
        let line = self.lcd_enabled && self.sources.intersects(self.registers.stat_select());
        if line == self.stat_line {
            return;
        }
        self.stat_line = line;
        if line {
            log::trace!(
                "STAT line high (sources={:?}, LY={})",
                self.sources,
                self.registers.ly()
            );
            self.interrupts.request_interrupt(InterruptKind::LcdStat);
        } else {
            self.interrupts.clear_interrupt(InterruptKind::LcdStat);
        }
    }

    /// STAT as the CPU sees it: stored enable bits, the coincidence latch,
    /// the current mode, and bit 7 which always reads set.
    pub(super) fn read_stat(&self) -> u8 {
        let select = self.registers.get(GpuRegister::Stat) & STAT_WRITABLE;
        let coincidence = if self.ly_coincidence { 0x04 } else { 0 };
        select | coincidence | self.mode().bits() | 0x80
    }

    /// Only the interrupt enable bits are stored; bits 0-2 are read-only.
    pub(super) fn write_stat(&mut self, value: u8) {
        self.registers.put(GpuRegister::Stat, value & STAT_WRITABLE);
        self.update_stat_line();
    }
}
