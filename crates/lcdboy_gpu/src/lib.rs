pub mod config;
pub mod display;
pub mod dma;
pub mod gpu;
pub mod interrupts;
pub mod lcdc;
pub mod memory;
pub mod palette;
pub mod phase;
pub mod registers;

pub use config::GpuConfig;
pub use display::{Display, NullDisplay};
pub use dma::{NoDma, OamDma};
pub use gpu::{Action, Gpu, Mode, TimingState};
pub use interrupts::{InterruptFlags, InterruptKind, InterruptSink};
pub use lcdc::LcdControl;
pub use registers::{GpuRegister, StatSelect};

/// Dots per scanline, identical for every line of the frame.
pub const LINE_TICKS: u32 = 456;
/// Lines per frame including the ten VBlank lines.
pub const LINES_PER_FRAME: u32 = 154;
/// Dots per full frame.
pub const FRAME_TICKS: u32 = LINE_TICKS * LINES_PER_FRAME;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum GameBoyModel {
    #[default]
    Dmg,
    /// Color hardware: second VRAM bank, VBK and the CGB palette stores.
    Cgb,
}

impl GameBoyModel {
    #[inline]
    pub fn is_cgb(self) -> bool {
        matches!(self, GameBoyModel::Cgb)
    }
}
