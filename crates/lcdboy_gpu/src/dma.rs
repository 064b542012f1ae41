/// Query side of the OAM DMA unit.
///
/// While a transfer is in flight the DMA engine owns the OAM bus and the CPU
/// sees 0xFF on reads and has its writes dropped. This gate is independent of
/// the controller's own mode 2/3 lock; the arbiter checks both.
pub trait OamDma {
    fn is_oam_blocked(&self) -> bool;
}

/// No DMA unit attached; OAM is never blocked by a transfer.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoDma;

impl OamDma for NoDma {
    fn is_oam_blocked(&self) -> bool {
        false
    }
}

/// Hosts that track DMA as a single "transfer active" flag.
impl OamDma for bool {
    fn is_oam_blocked(&self) -> bool {
        *self
    }
}
