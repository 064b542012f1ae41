//! Rendering phases driven by the timing controller.
//!
//! A phase is started when its mode begins and stepped once per dot while the
//! mode lasts. Pixel transfer reports its variable cost through the
//! [`PhaseStep`] it returns, which lets the controller stretch mode 3 and
//! shorten the HBlank that follows by the same amount.

mod oam_search;
mod pixel_transfer;

use std::ops::AddAssign;

pub use oam_search::{OamSearch, SpriteEntry, MAX_SPRITES_PER_LINE, OAM_SEARCH_TICKS};
pub use pixel_transfer::{PixelTransfer, PIXEL_TRANSFER_BASE_TICKS};

use crate::memory::Ram;
use crate::registers::Registers;
use crate::LcdControl;

/// Extra dots a scanline spends in pixel transfer, split by cause.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct LineCost {
    /// Sprite fetch stalls for sprites on this line.
    pub sprite: u16,
    /// Background fetcher restart when the window starts.
    pub window: u16,
    /// Pixels discarded for SCX mod 8.
    pub scroll: u16,
}

impl LineCost {
    pub const ZERO: LineCost = LineCost {
        sprite: 0,
        window: 0,
        scroll: 0,
    };

    #[inline]
    pub const fn total(&self) -> u16 {
        self.sprite + self.window + self.scroll
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

impl AddAssign for LineCost {
    fn add_assign(&mut self, rhs: LineCost) {
        self.sprite += rhs.sprite;
        self.window += rhs.window;
        self.scroll += rhs.scroll;
    }
}

/// Outcome of one phase step.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PhaseStep {
    pub done: bool,
    /// Cost discovered during this step, to be added to the current line.
    pub extra: LineCost,
}

impl PhaseStep {
    pub const RUNNING: PhaseStep = PhaseStep {
        done: false,
        extra: LineCost::ZERO,
    };
    pub const DONE: PhaseStep = PhaseStep {
        done: true,
        extra: LineCost::ZERO,
    };
}

/// What a phase may look at while it runs.
///
/// Phases read memory directly; the CPU-side locks do not apply to them.
#[derive(Copy, Clone, Debug)]
pub struct PhaseContext<'a> {
    pub lcdc: LcdControl,
    pub registers: &'a Registers,
    pub oam: &'a Ram,
}

impl PhaseContext<'_> {
    #[inline]
    pub fn ly(&self) -> u8 {
        self.registers.ly()
    }
}

/// A rendering phase advanced one dot at a time.
pub trait Phase {
    fn step(&mut self, ctx: &PhaseContext<'_>) -> PhaseStep;

    fn is_done(&self) -> bool;
}

/// Which phase is currently being driven.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PhaseKind {
    OamSearch,
    PixelTransfer,
}
