use super::{Gpu, TimingState};
use crate::display::Display;
use crate::dma::OamDma;
use crate::interrupts::InterruptSink;
use crate::registers::{GpuRegister, StatSelect};
use crate::LcdControl;

impl<D: Display, I: InterruptSink, M: OamDma> Gpu<D, I, M> {
    /// LCDC write. Only the edges of bit 7 have side effects; setting it
    /// again while the display is on leaves the timing alone.
    pub(super) fn write_lcdc(&mut self, value: u8) {
        let was_enabled = self.lcdc.lcd_enabled();
        self.lcdc = LcdControl::from_bits_retain(value);
        match (was_enabled, self.lcdc.lcd_enabled()) {
            (true, false) => self.disable_lcd(),
            (false, true) => self.enable_lcd(),
            _ => {}
        }
    }

    /// Stop the controller. LY keeps its value; the in-flight phase is
    /// discarded, both memory regions open up to the CPU and every STAT
    /// source drops.
    fn disable_lcd(&mut self) {
        self.lcd_enabled = false;
        self.active_phase = None;
        self.vram_locked = false;
        self.oam_locked = false;
        self.sources = StatSelect::empty();
        self.stat_line = false;
        log::debug!("LCD disabled at LY={} ({:?})", self.registers.ly(), self.state);
        self.display.disable_lcd();
    }

    /// Start a fresh frame: LY=0 and the first OAM search entered on this
    /// dot, exactly as at the end of a frame.
    fn enable_lcd(&mut self) {
        self.lcd_enabled = true;
        self.registers.put(GpuRegister::Ly, 0);
        self.reset_timing();
        self.sample_coincidence();
        self.enter(TimingState::Ly00M2);
        log::debug!("LCD enabled");
        self.display.enable_lcd();
    }
}
