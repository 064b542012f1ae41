use bitflags::bitflags;

/// Interrupt lines the LCD controller drives.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InterruptKind {
    /// INT $40, raised once per frame when LY reaches 144.
    VBlank,
    /// INT $48, the aggregated STAT line.
    LcdStat,
}

impl InterruptKind {
    #[inline]
    pub const fn flag(self) -> InterruptFlags {
        match self {
            InterruptKind::VBlank => InterruptFlags::VBLANK,
            InterruptKind::LcdStat => InterruptFlags::LCD,
        }
    }
}

/// The interrupt-request aggregator (the IF register on real hardware).
pub trait InterruptSink {
    fn request_interrupt(&mut self, kind: InterruptKind);
    fn clear_interrupt(&mut self, kind: InterruptKind);
}

bitflags! {
    /// IF (FF0F) / IE (FFFF) bit layout.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 1;
        const LCD = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

impl InterruptSink for InterruptFlags {
    fn request_interrupt(&mut self, kind: InterruptKind) {
        self.insert(kind.flag());
    }

    fn clear_interrupt(&mut self, kind: InterruptKind) {
        self.remove(kind.flag());
    }
}

/// Buses that keep IF as a plain byte can hand it over directly.
impl InterruptSink for u8 {
    fn request_interrupt(&mut self, kind: InterruptKind) {
        *self |= kind.flag().bits();
    }

    fn clear_interrupt(&mut self, kind: InterruptKind) {
        *self &= !kind.flag().bits();
    }
}
