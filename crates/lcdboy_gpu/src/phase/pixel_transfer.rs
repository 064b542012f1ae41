use super::{LineCost, Phase, PhaseContext, PhaseStep, SpriteEntry};
use crate::registers::GpuRegister;

/// Mode 3 length of a line with no sprites, no window and SCX mod 8 == 0.
pub const PIXEL_TRANSFER_BASE_TICKS: u16 = 169;

/// Fetcher restart when the window starts on a line.
const WINDOW_PENALTY: u16 = 6;
/// Sprites at X >= 168 are off the right edge and never fetched.
const SPRITE_X_LIMIT: u8 = 168;

/// Mode 3 cost model.
///
/// Pixel output itself is not modelled here; the phase only reproduces how
/// long the FIFO keeps the bus busy so the controller can place the mode 3 to
/// HBlank edge on the right dot. The cost is reported on the first step and
/// the phase completes after `PIXEL_TRANSFER_BASE_TICKS + cost.total()` steps.
#[derive(Clone, Debug, Default)]
pub struct PixelTransfer {
    sprites: Vec<SpriteEntry>,
    cost: Option<LineCost>,
    remaining: u16,
}

impl PixelTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin mode 3 with the sprites OAM search selected for this line.
    pub fn start(&mut self, sprites: &[SpriteEntry]) {
        self.sprites.clear();
        self.sprites.extend_from_slice(sprites);
        self.cost = None;
        self.remaining = PIXEL_TRANSFER_BASE_TICKS;
    }

    /// Cost of the current line, known after the first step.
    pub fn cost(&self) -> Option<LineCost> {
        self.cost
    }

    fn line_cost(&self, ctx: &PhaseContext<'_>) -> LineCost {
        let scx = ctx.registers.get(GpuRegister::Scx);
        let wy = ctx.registers.get(GpuRegister::Wy);
        let wx = ctx.registers.get(GpuRegister::Wx);

        let window_visible = ctx.lcdc.window_enabled() && wy <= ctx.ly() && wx <= 166;

        // Pandocs "Mode 3 length": each sprite stalls the fetcher for
        // 11 - min(5, (X + SCX) mod 8) dots.
        let sprite: u16 = if ctx.lcdc.sprites_enabled() {
            self.sprites
                .iter()
                .filter(|s| s.x < SPRITE_X_LIMIT)
                .map(|s| 11 - (s.x.wrapping_add(scx) % 8).min(5) as u16)
                .sum()
        } else {
            0
        };

        LineCost {
            sprite,
            window: if window_visible { WINDOW_PENALTY } else { 0 },
            scroll: (scx % 8) as u16,
        }
    }
}

impl Phase for PixelTransfer {
    fn step(&mut self, ctx: &PhaseContext<'_>) -> PhaseStep {
        if self.is_done() {
            return PhaseStep::DONE;
        }
        let mut extra = LineCost::ZERO;
        if self.cost.is_none() {
            extra = self.line_cost(ctx);
            self.cost = Some(extra);
            self.remaining += extra.total();
        }
        self.remaining -= 1;
        PhaseStep {
            done: self.is_done(),
            extra,
        }
    }

    fn is_done(&self) -> bool {
        self.remaining == 0
    }
}
