mod access;
mod cycle;
mod mmio;
mod stat;
mod timing;


pub use access::Region;
pub use timing::{Action, TimingState, HBLANK_BODY_BASE_TICKS, LAST_LINE, VBLANK_LINE};

use crate::config::GpuConfig;
use crate::display::{Display, NullDisplay};
use crate::dma::{NoDma, OamDma};
use crate::interrupts::{InterruptFlags, InterruptSink};
use crate::memory::Ram;
use crate::palette::{ColorPalette, BG_PALETTE_INDEX, OBJ_PALETTE_INDEX};
use crate::phase::{LineCost, OamSearch, PhaseKind, PixelTransfer};
use crate::registers::{GpuRegister, Registers, StatSelect};
use crate::{GameBoyModel, LcdControl};

/// The externally visible LCD mode, as reported in STAT bits 0-1.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamSearch = 2,
    PixelTransfer = 3,
}

impl Mode {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// The LCD controller: timing state machine, STAT interrupt sources and the
/// bus arbiter for VRAM, OAM and the LCD registers.
///
/// The controller is advanced one dot at a time by [`Gpu::tick`]. It owns the
/// memory it arbitrates; the host wires in a display sink, the interrupt
/// aggregator and the OAM DMA unit as collaborators.
pub struct Gpu<D = NullDisplay, I = InterruptFlags, M = NoDma> {
    model: GameBoyModel,
    config: GpuConfig,

    vram0: Ram,
    /// Second VRAM bank, present on CGB only.
    vram1: Option<Ram>,
    oam: Ram,
    lcdc: LcdControl,
    registers: Registers,
    bg_palette: ColorPalette,
    obj_palette: ColorPalette,

    oam_search: OamSearch,
    pixel_transfer: PixelTransfer,
    active_phase: Option<PhaseKind>,

    state: TimingState,
    countdown: u16,
    line_cost: LineCost,
    ticks_in_line: u16,

    lcd_enabled: bool,
    vram_locked: bool,
    oam_locked: bool,
    /// LY == LYC as of the last sampling instant (STAT bit 2).
    ly_coincidence: bool,
    /// Active STAT interrupt sources.
    sources: StatSelect,
    /// Level of the aggregated STAT interrupt line.
    stat_line: bool,

    display: D,
    interrupts: I,
    dma: M,
}

impl Default for Gpu {
    fn default() -> Self {
        Gpu::new(
            GpuConfig::default(),
            NullDisplay,
            InterruptFlags::empty(),
            NoDma,
        )
    }
}

impl<D: Display, I: InterruptSink, M: OamDma> Gpu<D, I, M> {
    pub fn new(config: GpuConfig, display: D, interrupts: I, dma: M) -> Self {
        let model = config.model;
        let mut gpu = Self {
            model,
            config,
            vram0: Ram::vram(),
            vram1: model.is_cgb().then(Ram::vram),
            oam: Ram::oam(),
            lcdc: LcdControl::empty(),
            registers: Registers::default(),
            bg_palette: ColorPalette::new(BG_PALETTE_INDEX),
            obj_palette: ColorPalette::filled(OBJ_PALETTE_INDEX, 0xFF),
            oam_search: OamSearch::new(),
            pixel_transfer: PixelTransfer::new(),
            active_phase: None,
            state: TimingState::Ly00M2,
            countdown: 0,
            line_cost: LineCost::ZERO,
            ticks_in_line: 0,
            lcd_enabled: false,
            vram_locked: false,
            oam_locked: false,
            ly_coincidence: false,
            sources: StatSelect::empty(),
            stat_line: false,
            display,
            interrupts,
            dma,
        };
        gpu.power_on();
        gpu
    }

    /// Return to the configured power-on state.
    ///
    /// Memory is cleared, registers and palettes are reloaded from the
    /// config and the timing restarts at the top of a frame if LCDC bit 7 is
    /// set in the config. Collaborators are kept.
    pub fn reset(&mut self) {
        self.vram0.fill(0);
        if let Some(vram1) = self.vram1.as_mut() {
            vram1.fill(0);
        }
        self.oam.fill(0);
        self.bg_palette = ColorPalette::new(BG_PALETTE_INDEX);
        self.obj_palette = ColorPalette::filled(OBJ_PALETTE_INDEX, 0xFF);
        self.power_on();
    }

    fn power_on(&mut self) {
        self.registers = Registers::default();
        self.registers.put(GpuRegister::Lyc, self.config.lyc);
        self.registers.put(GpuRegister::Bgp, self.config.bgp);
        self.registers.put(GpuRegister::Obp0, self.config.obp0);
        self.registers.put(GpuRegister::Obp1, self.config.obp1);

        self.lcdc = LcdControl::empty();
        self.lcd_enabled = false;
        self.ly_coincidence = false;
        self.reset_timing();
        self.write_lcdc(self.config.lcdc);
    }

    pub fn model(&self) -> GameBoyModel {
        self.model
    }

    /// The visible mode. A disabled LCD reports HBlank.
    pub fn mode(&self) -> Mode {
        if self.lcd_enabled {
            self.state.mode()
        } else {
            Mode::HBlank
        }
    }

    pub fn timing_state(&self) -> TimingState {
        self.state
    }

    /// Ticks left in the current sub-state.
    pub fn countdown(&self) -> u16 {
        self.countdown
    }

    /// Extra mode 3 cost accumulated on the current line.
    pub fn line_cost(&self) -> LineCost {
        self.line_cost
    }

    /// Dots elapsed since the current line started.
    pub fn ticks_in_line(&self) -> u16 {
        self.ticks_in_line
    }

    pub fn ly(&self) -> u8 {
        self.registers.ly()
    }

    pub fn is_display_enabled(&self) -> bool {
        self.lcd_enabled
    }

    pub fn stat_sources(&self) -> StatSelect {
        self.sources
    }

    pub fn ly_coincidence(&self) -> bool {
        self.ly_coincidence
    }

    pub fn vram_locked(&self) -> bool {
        self.vram_locked
    }

    pub fn oam_locked(&self) -> bool {
        self.oam_locked
    }

    pub fn lcdc(&self) -> LcdControl {
        self.lcdc
    }

    /// Raw LCDC access. Unlike a bus write, changing bit 7 here does not
    /// switch the display on or off.
    pub fn lcdc_mut(&mut self) -> &mut LcdControl {
        &mut self.lcdc
    }

    /// Sprite attribute memory, bypassing the CPU-side locks.
    pub fn oam(&self) -> &Ram {
        &self.oam
    }

    /// Used by the DMA unit, which writes OAM regardless of the mode lock.
    pub fn oam_mut(&mut self) -> &mut Ram {
        &mut self.oam
    }

    /// VRAM bank `bank`, if the model has it.
    pub fn vram_bank(&self, bank: usize) -> Option<&Ram> {
        match bank {
            0 => Some(&self.vram0),
            1 => self.vram1.as_ref(),
            _ => None,
        }
    }

    fn vram_bank_mut(&mut self, bank: usize) -> Option<&mut Ram> {
        match bank {
            0 => Some(&mut self.vram0),
            1 => self.vram1.as_mut(),
            _ => None,
        }
    }

    pub fn bg_palette(&self) -> &ColorPalette {
        &self.bg_palette
    }

    pub fn obj_palette(&self) -> &ColorPalette {
        &self.obj_palette
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn interrupts(&self) -> &I {
        &self.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut I {
        &mut self.interrupts
    }

    pub fn dma(&self) -> &M {
        &self.dma
    }

    pub fn dma_mut(&mut self) -> &mut M {
        &mut self.dma
    }
}
