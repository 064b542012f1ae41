//! The LCD timing table.
//!
//! The four STAT modes are too coarse to place every register and interrupt
//! edge on the right dot, so the controller walks fourteen sub-states instead.
//! Each sub-state carries three things: how many dots it lasts, the actions
//! that run on the dot it is entered, and the sub-state that follows it. The
//! visible mode is derived from the sub-state and never stored.
//!
//! One scanline is 456 dots: 8 + 72 (mode 2), 169 + cost (mode 3),
//! 1 + (202 - cost) + 4 (mode 0). Lines 144..=152 are a 452-dot VBlank line
//! plus the 4-dot LY increment, and line 153 is split up so that LY reads 0
//! for most of it.

use crate::phase::{LineCost, PhaseKind, PIXEL_TRANSFER_BASE_TICKS};
use crate::registers::StatSelect;

use super::Mode;

/// First LY of the vertical blanking interval.
pub const VBLANK_LINE: u8 = 144;
/// Last line of the frame.
pub const LAST_LINE: u8 = 153;

/// HBlank length of a line whose mode 3 had no extra cost.
pub const HBLANK_BODY_BASE_TICKS: u16 = 202;

/// A fine-grained LCD timing sub-state.
///
/// `Ly00*` states belong to the frame wrap-around where LY is already 0,
/// `Lyxx*` to the visible lines and `Ly9x*` to VBlank lines 144..=153.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TimingState {
    /// OAM search of line 0, before the scan locks OAM.
    Ly00M2,
    Ly00M2Wnd,
    /// OAM search of lines 1..=143.
    LyxxM2,
    LyxxM2Wnd,
    LyxxM3,
    /// The dot on which mode 3 hands the buses back.
    LyxxM0,
    LyxxM0_2,
    /// Last four dots of a visible line: LY has already moved on.
    LyxxM0Inc,
    Ly9xM1,
    Ly9xM1Inc,
    /// Line 153: LY drops to 0 on the first dot.
    Ly00M1,
    Ly00M1_1,
    Ly00M1_2,
    /// Last four dots of the frame.
    Ly00M0,
}

/// Something the controller does on the dot a sub-state is entered.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    LockVram,
    LockOam,
    UnlockVram,
    UnlockOam,
    /// Set a STAT interrupt source.
    Raise(StatSelect),
    /// Clear a STAT interrupt source.
    Clear(StatSelect),
    /// Clear the mode 0 source unless this increment entered VBlank.
    ClearHBlankOnVisibleLine,
    IncrementLy,
    ResetLy,
    /// Latch LY == LYC into STAT bit 2 and the LYC interrupt source.
    SampleCoincidence,
    /// Drop the latched coincidence and the LYC source.
    ClearCoincidence,
    /// On LY 144: request the VBlank interrupt and raise the mode 1 source.
    EnterVBlank,
}

impl TimingState {
    pub const ALL: [TimingState; 14] = [
        TimingState::Ly00M2,
        TimingState::Ly00M2Wnd,
        TimingState::LyxxM2,
        TimingState::LyxxM2Wnd,
        TimingState::LyxxM3,
        TimingState::LyxxM0,
        TimingState::LyxxM0_2,
        TimingState::LyxxM0Inc,
        TimingState::Ly9xM1,
        TimingState::Ly9xM1Inc,
        TimingState::Ly00M1,
        TimingState::Ly00M1_1,
        TimingState::Ly00M1_2,
        TimingState::Ly00M0,
    ];

    /// The STAT mode visible while in this sub-state.
    pub const fn mode(self) -> Mode {
        use TimingState::*;
        match self {
            Ly00M2 | Ly00M2Wnd | LyxxM2 | LyxxM2Wnd => Mode::OamSearch,
            LyxxM3 => Mode::PixelTransfer,
            LyxxM0 | LyxxM0_2 | LyxxM0Inc | Ly00M0 => Mode::HBlank,
            Ly9xM1 | Ly9xM1Inc | Ly00M1 | Ly00M1_1 | Ly00M1_2 => Mode::VBlank,
        }
    }

    /// Dots spent in this sub-state given the cost of the current line.
    ///
    /// Mode 3 grows by exactly what mode 0 shrinks, so the line stays 456
    /// dots whatever the cost.
    pub const fn ticks(self, cost: &LineCost) -> u16 {
        use TimingState::*;
        match self {
            Ly00M2 | LyxxM2 => 8,
            Ly00M2Wnd | LyxxM2Wnd => 72,
            LyxxM3 => PIXEL_TRANSFER_BASE_TICKS + cost.total(),
            LyxxM0 => 1,
            LyxxM0_2 => HBLANK_BODY_BASE_TICKS - cost.total(),
            LyxxM0Inc => 4,
            Ly9xM1 => 452,
            Ly9xM1Inc => 4,
            Ly00M1 => 4,
            Ly00M1_1 => 4,
            Ly00M1_2 => 444,
            Ly00M0 => 4,
        }
    }

    /// Actions run on the dot this sub-state is entered, in order.
    pub const fn actions(self) -> &'static [Action] {
        use Action::*;
        use TimingState::*;
        match self {
            Ly00M2 => &[LockOam, Raise(StatSelect::OAM), Clear(StatSelect::VBLANK)],
            Ly00M2Wnd | LyxxM2Wnd | Ly00M0 => &[],
            LyxxM2 => &[LockOam, SampleCoincidence],
            LyxxM3 => &[Clear(StatSelect::OAM), LockVram, LockOam],
            LyxxM0 => &[UnlockVram, UnlockOam],
            LyxxM0_2 => &[Raise(StatSelect::HBLANK)],
            LyxxM0Inc => &[
                IncrementLy,
                ClearHBlankOnVisibleLine,
                Raise(StatSelect::OAM),
                SampleCoincidence,
            ],
            Ly9xM1 => &[
                Clear(StatSelect::OAM),
                Clear(StatSelect::HBLANK),
                EnterVBlank,
                SampleCoincidence,
            ],
            Ly9xM1Inc => &[IncrementLy, ClearCoincidence],
            Ly00M1 => &[SampleCoincidence, ResetLy],
            Ly00M1_1 => &[ClearCoincidence],
            Ly00M1_2 => &[SampleCoincidence],
        }
    }

    /// The sub-state that follows this one. `ly` is the line counter after
    /// this sub-state's own actions ran.
    pub const fn next(self, ly: u8) -> TimingState {
        use TimingState::*;
        match self {
            Ly00M2 => Ly00M2Wnd,
            LyxxM2 => LyxxM2Wnd,
            Ly00M2Wnd | LyxxM2Wnd => LyxxM3,
            LyxxM3 => LyxxM0,
            LyxxM0 => LyxxM0_2,
            LyxxM0_2 => LyxxM0Inc,
            LyxxM0Inc => {
                if ly == VBLANK_LINE {
                    Ly9xM1
                } else {
                    LyxxM2
                }
            }
            Ly9xM1 => Ly9xM1Inc,
            Ly9xM1Inc => {
                if ly < LAST_LINE {
                    Ly9xM1
                } else {
                    Ly00M1
                }
            }
            Ly00M1 => Ly00M1_1,
            Ly00M1_1 => Ly00M1_2,
            Ly00M1_2 => Ly00M0,
            Ly00M0 => Ly00M2,
        }
    }

    /// The rendering phase that begins with this sub-state.
    pub const fn phase(self) -> Option<PhaseKind> {
        match self {
            TimingState::Ly00M2 | TimingState::LyxxM2 => Some(PhaseKind::OamSearch),
            TimingState::LyxxM3 => Some(PhaseKind::PixelTransfer),
            _ => None,
        }
    }

    /// Whether entering this sub-state starts a new 456-dot line.
    pub const fn starts_line(self) -> bool {
        matches!(
            self,
            TimingState::Ly00M2 | TimingState::LyxxM2 | TimingState::Ly9xM1 | TimingState::Ly00M1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Action::*;
    use TimingState::*;

    /// Walk one frame from `Ly00M2`, tracking LY the way the controller does.
    fn walk_frame(cost: LineCost) -> (u32, Vec<TimingState>) {
        let mut state = Ly00M2;
        let mut ly = 0u8;
        let mut total = 0u32;
        let mut visited = Vec::new();
        loop {
            visited.push(state);
            total += state.ticks(&cost) as u32;
            let next = state.next(ly);
            for action in next.actions() {
                match action {
                    IncrementLy => ly += 1,
                    ResetLy => ly = 0,
                    _ => {}
                }
            }
            state = next;
            if state == Ly00M2 {
                return (total, visited);
            }
        }
    }

    #[test]
    fn frame_is_70224_ticks_without_cost() {
        let (total, visited) = walk_frame(LineCost::ZERO);
        assert_eq!(total, 70_224);
        assert_eq!(visited.iter().filter(|&&s| s == LyxxM3).count(), 144);
        assert_eq!(visited.iter().filter(|&&s| s == Ly9xM1).count(), 9);
    }

    #[test]
    fn frame_length_is_independent_of_line_cost() {
        for cost in [
            LineCost {
                sprite: 110,
                window: 6,
                scroll: 7,
            },
            LineCost {
                sprite: 0,
                window: 6,
                scroll: 0,
            },
            LineCost {
                sprite: 11,
                window: 0,
                scroll: 5,
            },
        ] {
            assert_eq!(walk_frame(cost).0, 70_224, "{cost:?}");
        }
    }

    #[test]
    fn visible_line_is_456_ticks() {
        let cost = LineCost {
            sprite: 30,
            window: 6,
            scroll: 2,
        };
        let line: u16 = [LyxxM2, LyxxM2Wnd, LyxxM3, LyxxM0, LyxxM0_2, LyxxM0Inc]
            .iter()
            .map(|s| s.ticks(&cost))
            .sum();
        assert_eq!(line, 456);
        assert_eq!(LyxxM3.ticks(&cost), 169 + 38);
        assert_eq!(LyxxM0_2.ticks(&cost), 202 - 38);
    }

    #[test]
    fn mode_projection() {
        let modes: Vec<Mode> = TimingState::ALL.iter().map(|s| s.mode()).collect();
        assert_eq!(
            modes,
            vec![
                Mode::OamSearch,
                Mode::OamSearch,
                Mode::OamSearch,
                Mode::OamSearch,
                Mode::PixelTransfer,
                Mode::HBlank,
                Mode::HBlank,
                Mode::HBlank,
                Mode::VBlank,
                Mode::VBlank,
                Mode::VBlank,
                Mode::VBlank,
                Mode::VBlank,
                Mode::HBlank,
            ]
        );
    }

    #[test]
    fn oam_search_rows() {
        assert_eq!(Ly00M2.ticks(&LineCost::ZERO), 8);
        assert_eq!(
            Ly00M2.actions(),
            &[LockOam, Raise(StatSelect::OAM), Clear(StatSelect::VBLANK)]
        );
        assert_eq!(Ly00M2.next(0), Ly00M2Wnd);

        assert_eq!(LyxxM2.ticks(&LineCost::ZERO), 8);
        assert_eq!(LyxxM2.actions(), &[LockOam, SampleCoincidence]);
        assert_eq!(LyxxM2.next(5), LyxxM2Wnd);

        for wnd in [Ly00M2Wnd, LyxxM2Wnd] {
            assert_eq!(wnd.ticks(&LineCost::ZERO), 72);
            assert!(wnd.actions().is_empty());
            assert_eq!(wnd.next(0), LyxxM3);
        }
    }

    #[test]
    fn pixel_transfer_and_hblank_rows() {
        assert_eq!(
            LyxxM3.actions(),
            &[Clear(StatSelect::OAM), LockVram, LockOam]
        );
        assert_eq!(LyxxM3.next(10), LyxxM0);

        assert_eq!(LyxxM0.ticks(&LineCost::ZERO), 1);
        assert_eq!(LyxxM0.actions(), &[UnlockVram, UnlockOam]);
        assert_eq!(LyxxM0.next(10), LyxxM0_2);

        assert_eq!(LyxxM0_2.actions(), &[Raise(StatSelect::HBLANK)]);
        assert_eq!(LyxxM0_2.next(10), LyxxM0Inc);

        assert_eq!(LyxxM0Inc.ticks(&LineCost::ZERO), 4);
        assert_eq!(
            LyxxM0Inc.actions(),
            &[
                IncrementLy,
                ClearHBlankOnVisibleLine,
                Raise(StatSelect::OAM),
                SampleCoincidence
            ]
        );
        assert_eq!(LyxxM0Inc.next(143), LyxxM2);
        assert_eq!(LyxxM0Inc.next(144), Ly9xM1);
    }

    #[test]
    fn vblank_rows() {
        assert_eq!(Ly9xM1.ticks(&LineCost::ZERO), 452);
        assert_eq!(
            Ly9xM1.actions(),
            &[
                Clear(StatSelect::OAM),
                Clear(StatSelect::HBLANK),
                EnterVBlank,
                SampleCoincidence
            ]
        );
        assert_eq!(Ly9xM1.next(150), Ly9xM1Inc);

        assert_eq!(Ly9xM1Inc.ticks(&LineCost::ZERO), 4);
        assert_eq!(Ly9xM1Inc.actions(), &[IncrementLy, ClearCoincidence]);
        assert_eq!(Ly9xM1Inc.next(152), Ly9xM1);
        assert_eq!(Ly9xM1Inc.next(153), Ly00M1);
    }

    #[test]
    fn wrap_rows() {
        assert_eq!(Ly00M1.ticks(&LineCost::ZERO), 4);
        assert_eq!(Ly00M1.actions(), &[SampleCoincidence, ResetLy]);
        assert_eq!(Ly00M1.next(0), Ly00M1_1);

        assert_eq!(Ly00M1_1.ticks(&LineCost::ZERO), 4);
        assert_eq!(Ly00M1_1.actions(), &[ClearCoincidence]);
        assert_eq!(Ly00M1_1.next(0), Ly00M1_2);

        assert_eq!(Ly00M1_2.ticks(&LineCost::ZERO), 444);
        assert_eq!(Ly00M1_2.actions(), &[SampleCoincidence]);
        assert_eq!(Ly00M1_2.next(0), Ly00M0);

        assert_eq!(Ly00M0.ticks(&LineCost::ZERO), 4);
        assert!(Ly00M0.actions().is_empty());
        assert_eq!(Ly00M0.next(0), Ly00M2);
    }

    #[test]
    fn phases_start_only_on_mode_entry_states() {
        for state in TimingState::ALL {
            let expected = match state {
                Ly00M2 | LyxxM2 => Some(PhaseKind::OamSearch),
                LyxxM3 => Some(PhaseKind::PixelTransfer),
                _ => None,
            };
            assert_eq!(state.phase(), expected, "{state:?}");
        }
    }
}
