use super::{Action, Gpu, Mode, TimingState, LAST_LINE, VBLANK_LINE};
use crate::display::Display;
use crate::dma::OamDma;
use crate::interrupts::{InterruptKind, InterruptSink};
use crate::phase::{LineCost, Phase, PhaseContext, PhaseKind};
use crate::registers::{GpuRegister, StatSelect};

/// Upper bound on steps spent finishing a superseded phase. Far above the
/// longest mode so it only guards against a phase that never completes.
const DRAIN_LIMIT: u32 = 512;

impl<D: Display, I: InterruptSink, M: OamDma> Gpu<D, I, M> {
    /// Advance the controller by one dot.
    ///
    /// Returns the new mode when this dot changed the visible mode, `None`
    /// otherwise. A disabled LCD does not tick.
    pub fn tick(&mut self) -> Option<Mode> {
        if !self.lcd_enabled {
            return None;
        }
        let before = self.state.mode();

        self.step_phase();
        self.ticks_in_line = self.ticks_in_line.wrapping_add(1);
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return None;
        }
        self.advance();

        let after = self.state.mode();
        if after == before {
            return None;
        }
        log::trace!(
            "LCD mode {:?} -> {:?} (LY={}, {:?})",
            before,
            after,
            self.registers.ly(),
            self.state
        );
        Some(after)
    }

    /// Step the active phase once, folding any reported cost into mode 3.
    fn step_phase(&mut self) {
        let Some(kind) = self.active_phase else {
            return;
        };
        let ctx = PhaseContext {
            lcdc: self.lcdc,
            registers: &self.registers,
            oam: &self.oam,
        };
        let phase: &mut dyn Phase = match kind {
            PhaseKind::OamSearch => &mut self.oam_search,
            PhaseKind::PixelTransfer => &mut self.pixel_transfer,
        };
        if phase.is_done() {
            return;
        }
        let extra = phase.step(&ctx).extra;
        if !extra.is_zero() {
            debug_assert_eq!(self.state, TimingState::LyxxM3);
            self.line_cost += extra;
            self.countdown += extra.total();
        }
    }

    /// Leave the current sub-state for its successor.
    fn advance(&mut self) {
        let previous = self.state;
        let next = previous.next(self.registers.ly());
        if next.mode() != previous.mode() {
            self.finish_phase();
        }
        self.enter(next);
    }

    /// Enter `next`: run its entry actions, start its phase and load the
    /// countdown.
    pub(super) fn enter(&mut self, next: TimingState) {
        self.state = next;
        if next.starts_line() {
            self.ticks_in_line = 0;
        }
        for &action in next.actions() {
            self.apply(action);
        }
        if let Some(kind) = next.phase() {
            self.start_phase(kind);
        }
        self.countdown = next.ticks(&self.line_cost);
        self.update_stat_line();
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::LockVram => self.vram_locked = true,
            Action::LockOam => self.oam_locked = true,
            Action::UnlockVram => self.vram_locked = false,
            Action::UnlockOam => self.oam_locked = false,
            Action::Raise(source) => self.sources.insert(source),
            Action::Clear(source) => self.sources.remove(source),
            Action::ClearHBlankOnVisibleLine => {
                if self.registers.ly() < VBLANK_LINE {
                    self.sources.remove(StatSelect::HBLANK);
                }
            }
            Action::IncrementLy => {
                let ly = self.registers.ly() + 1;
                debug_assert!(ly <= LAST_LINE, "LY out of range: {ly}");
                self.registers.put(GpuRegister::Ly, ly);
            }
            Action::ResetLy => self.registers.put(GpuRegister::Ly, 0),
            Action::SampleCoincidence => self.sample_coincidence(),
            Action::ClearCoincidence => self.clear_coincidence(),
            Action::EnterVBlank => {
                if self.registers.ly() == VBLANK_LINE {
                    self.interrupts.request_interrupt(InterruptKind::VBlank);
                    self.sources.insert(StatSelect::VBLANK);
                    log::debug!("VBlank interrupt requested");
                }
            }
        }
    }

    fn start_phase(&mut self, kind: PhaseKind) {
        match kind {
            PhaseKind::OamSearch => self.oam_search.start(),
            PhaseKind::PixelTransfer => {
                self.line_cost = LineCost::ZERO;
                self.pixel_transfer.start(self.oam_search.sprites());
            }
        }
        self.active_phase = Some(kind);
    }

    /// Run the superseded phase to completion. Its cost can no longer
    /// stretch the mode it belonged to, so any reported extra is dropped.
    fn finish_phase(&mut self) {
        let Some(kind) = self.active_phase.take() else {
            return;
        };
        let ctx = PhaseContext {
            lcdc: self.lcdc,
            registers: &self.registers,
            oam: &self.oam,
        };
        let phase: &mut dyn Phase = match kind {
            PhaseKind::OamSearch => &mut self.oam_search,
            PhaseKind::PixelTransfer => &mut self.pixel_transfer,
        };
        let mut drained = 0;
        while !phase.is_done() && drained < DRAIN_LIMIT {
            phase.step(&ctx);
            drained += 1;
        }
        if drained > 0 {
            log::warn!(
                "{:?} phase unfinished at end of {:?}, drained {} steps",
                kind,
                self.state,
                drained
            );
        }
    }

    /// Park the state machine at the top of a frame with nothing running.
    /// Enabling the display then enters `Ly00M2` from here.
    pub(super) fn reset_timing(&mut self) {
        self.state = TimingState::Ly00M2;
        self.countdown = 0;
        self.line_cost = LineCost::ZERO;
        self.ticks_in_line = 0;
        self.active_phase = None;
        self.oam_search.start();
        self.vram_locked = false;
        self.oam_locked = false;
        self.sources = StatSelect::empty();
        self.stat_line = false;
    }
}
